//! BSC access through the pigpio C library.

use core::ffi::{c_int, c_uint};

use log::{debug, error, info};
use portable_atomic::{AtomicBool, Ordering};

use crate::bsc::{BscBus, BscControl, BscStatus, BscXfer};
use crate::error::InitError;
use crate::shutdown::request_stop;

#[link(name = "pigpio")]
unsafe extern "C" {
    fn gpioInitialise() -> c_int;
    fn gpioTerminate();
    fn bscXfer(bsc_xfer: *mut BscXfer) -> c_int;
    fn gpioSetSignalFunc(signum: c_uint, f: Option<extern "C" fn(c_int)>) -> c_int;
}

// pigpio keeps global state, so only one handle may exist at a time
static OPEN: AtomicBool = AtomicBool::new(false);

pub struct PigpioBsc {
    _private: (),
}

impl PigpioBsc {
    pub fn open() -> Result<Self, InitError> {
        if OPEN.swap(true, Ordering::AcqRel) {
            return Err(InitError::AlreadyOpen);
        }

        let version = unsafe { gpioInitialise() };
        if version < 0 {
            OPEN.store(false, Ordering::Release);
            return Err(InitError::Gpio(version));
        }
        info!("pigpio initialised, version {}", version);

        Ok(PigpioBsc { _private: () })
    }

    /// Route the given signals to the shared stop flag.
    ///
    /// pigpio installs its own handlers during initialisation, so this has to
    /// run after `open`.
    pub fn install_stop_handler(&self, signals: &[u32]) -> Result<(), InitError> {
        for &signal in signals {
            let code = unsafe { gpioSetSignalFunc(signal, Some(request_stop)) };
            if code < 0 {
                return Err(InitError::SignalHandler { signal, code });
            }
            debug!("Stop handler registered for signal {}", signal);
        }
        Ok(())
    }
}

impl BscBus for PigpioBsc {
    fn transfer(&mut self, xfer: &mut BscXfer) -> Result<BscStatus, i32> {
        let status = unsafe { bscXfer(xfer) };
        if status < 0 {
            return Err(status);
        }
        Ok(BscStatus::new(status as u32))
    }

    fn close(self) {
        // Teardown happens in Drop
    }
}

impl Drop for PigpioBsc {
    fn drop(&mut self) {
        let mut xfer = BscXfer::new(BscControl::DISABLED);
        let status = unsafe { bscXfer(&mut xfer) };
        if status < 0 {
            error!("Failed to disable BSC peripheral: {}", status);
        }
        unsafe { gpioTerminate() };
        OPEN.store(false, Ordering::Release);
        info!("GPIO terminated");
    }
}
