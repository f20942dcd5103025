use core::ffi::c_int;

use portable_atomic::{AtomicBool, AtomicI32, Ordering};

// Set from the signal callback, read by the responder loop between transfers
pub static STOP_REQUESTED: AtomicBool = AtomicBool::new(false);
static STOP_SIGNAL: AtomicI32 = AtomicI32::new(0);

/// Signal callback. Only touches atomics so it is safe to run in signal
/// context.
pub extern "C" fn request_stop(signum: c_int) {
    STOP_SIGNAL.store(signum, Ordering::Relaxed);
    STOP_REQUESTED.store(true, Ordering::Release);
}

/// Signal number that requested the stop, if any.
pub fn stop_signal() -> Option<i32> {
    match STOP_SIGNAL.load(Ordering::Relaxed) {
        0 => None,
        signum => Some(signum),
    }
}
