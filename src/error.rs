use thiserror::Error;

use crate::config::{EXIT_INIT_FAILURE, EXIT_TABLE_FAILURE, EXIT_TRANSFER_FAILURE};

/// Which half of a dispatch iteration a transfer belonged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferPhase {
    /// Polling the BSC for bytes written by the master
    Receive,
    /// Handing a staged response to the BSC
    Transmit,
}

impl core::fmt::Display for TransferPhase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TransferPhase::Receive => f.write_str("receive"),
            TransferPhase::Transmit => f.write_str("transmit"),
        }
    }
}

/// A bus transfer returned a negative status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("I2C {phase} transfer failed with status {status}")]
pub struct TransferError {
    pub phase: TransferPhase,
    pub status: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InitError {
    #[error("GPIO initialisation failed with status {0}")]
    Gpio(i32),
    #[error("BSC controller is already open")]
    AlreadyOpen,
    #[error("invalid 7-bit I2C address 0x{0:02x}")]
    InvalidAddress(u8),
    #[error("failed to register handler for signal {signal} (status {code})")]
    SignalHandler { signal: u32, code: i32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("response for command 0x{command:02x} is {len} bytes, the BSC buffer holds {max}")]
    ResponseTooLong { command: u8, len: usize, max: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponderError {
    #[error(transparent)]
    Init(#[from] InitError),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Transfer(#[from] TransferError),
}

impl ResponderError {
    pub fn exit_code(&self) -> u8 {
        match self {
            ResponderError::Init(_) => EXIT_INIT_FAILURE,
            ResponderError::Table(_) => EXIT_TABLE_FAILURE,
            ResponderError::Transfer(_) => EXIT_TRANSFER_FAILURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let init = ResponderError::from(InitError::Gpio(-1)).exit_code();
        let table = ResponderError::from(TableError::ResponseTooLong {
            command: 0x10,
            len: 600,
            max: 512,
        })
        .exit_code();
        let transfer = ResponderError::from(TransferError {
            phase: TransferPhase::Receive,
            status: -2,
        })
        .exit_code();

        assert_ne!(init, table);
        assert_ne!(init, transfer);
        assert_ne!(table, transfer);
        assert!(init != 0 && table != 0 && transfer != 0);
    }

    #[test]
    fn test_transfer_error_reports_status() {
        let err = TransferError {
            phase: TransferPhase::Transmit,
            status: -83,
        };
        assert_eq!(err.to_string(), "I2C transmit transfer failed with status -83");
    }
}
