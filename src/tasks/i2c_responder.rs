use embassy_time::{Duration, Ticker};
use log::{debug, info, warn};
use portable_atomic::{AtomicBool, Ordering};

use crate::bsc::{BscBus, BscControl, BscXfer};
use crate::config::{CLOCK_STRETCHING, POLL_INTERVAL_US};
use crate::error::{InitError, ResponderError, TransferError, TransferPhase};
use crate::response_table::ResponseTable;

// The master selects a register by writing a single command byte and then
// reads back however many bytes that register holds. Only the first byte of a
// write burst is used as the command; any further bytes are ignored.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponderConfig {
    pub control: BscControl,
    pub poll_interval: Duration,
}

impl ResponderConfig {
    pub fn new(address: u8) -> Result<Self, InitError> {
        let mut control = BscControl::i2c_slave(address)?;
        if CLOCK_STRETCHING {
            control = control.with_clock_stretching();
        }
        Ok(ResponderConfig {
            control,
            poll_interval: Duration::from_micros(POLL_INTERVAL_US),
        })
    }
}

/// Result of a single dispatch pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Nothing was written by the master
    Idle,
    /// A response was handed to the BSC
    Responded { command: u8, len: usize },
    /// The command has no table entry; nothing was sent
    Unmapped(u8),
}

/// Poll the bus once and answer a pending command.
///
/// The transfer buffers are cleared before returning whenever a command was
/// received, whatever the lookup outcome.
pub fn step<B: BscBus>(
    bus: &mut B,
    table: &ResponseTable,
    xfer: &mut BscXfer,
) -> Result<Dispatch, TransferError> {
    bus.transfer(xfer).map_err(|status| TransferError {
        phase: TransferPhase::Receive,
        status,
    })?;

    let Some(&command) = xfer.received().first() else {
        return Ok(Dispatch::Idle);
    };
    info!("Received data (hex): {:02X?}", xfer.received());

    let dispatch = match table.lookup(command) {
        Some(response) => {
            let len = xfer.stage(response);
            for byte in xfer.staged() {
                debug!("Sending response byte 0x{:02X}", byte);
            }

            let status = bus.transfer(xfer).map_err(|status| TransferError {
                phase: TransferPhase::Transmit,
                status,
            })?;
            if status.tx_copied() < len {
                warn!(
                    "Only {} of {} response bytes reached the TX FIFO (tx level {}, rx level {})",
                    status.tx_copied(),
                    len,
                    status.tx_fifo_level(),
                    status.rx_fifo_level()
                );
            }
            info!("Response to 0x{:02X} sent: {:02X?}", command, response);
            Dispatch::Responded { command, len }
        }
        None => {
            info!("No response for command 0x{:02X}", command);
            Dispatch::Unmapped(command)
        }
    };

    xfer.clear();
    Ok(dispatch)
}

/// Serve register reads until `stop` is set or a transfer fails.
pub async fn serve<B: BscBus>(
    bus: &mut B,
    table: &ResponseTable,
    stop: &AtomicBool,
    config: &ResponderConfig,
) -> Result<(), TransferError> {
    let mut xfer = BscXfer::new(config.control);
    let mut ticker = Ticker::every(config.poll_interval);

    info!(
        "Serving {} registers at I2C address 0x{:02X}",
        table.len(),
        config.control.address()
    );

    loop {
        if stop.load(Ordering::Acquire) {
            info!("Stop requested, leaving I2C responder loop");
            return Ok(());
        }

        // Failures are reported by the caller
        step(bus, table, &mut xfer)?;

        ticker.next().await;
    }
}

/// Serve until stopped, then tear the bus down.
///
/// The bus is closed exactly once, also when the loop ends on a transfer
/// failure.
pub async fn run<B: BscBus>(
    mut bus: B,
    table: &ResponseTable,
    stop: &AtomicBool,
    config: &ResponderConfig,
) -> Result<(), ResponderError> {
    let result = serve(&mut bus, table, stop, config).await;
    bus.close();
    result.map_err(ResponderError::from)
}
