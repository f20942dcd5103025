//! I2C slave emulator for the Raspberry Pi BSC peripheral.
//!
//! Answers register reads from an external I2C master with fixed byte
//! sequences taken from a compiled-in response table.

pub mod bsc;
pub mod config;
pub mod error;
#[cfg(feature = "pigpio")]
pub mod pigpio;
pub mod response_table;
pub mod shutdown;
pub mod tasks;

pub use bsc::{BscBus, BscControl, BscStatus, BscXfer};
pub use error::{InitError, ResponderError, TableError, TransferError, TransferPhase};
pub use response_table::ResponseTable;
pub use tasks::i2c_responder::{Dispatch, ResponderConfig};
