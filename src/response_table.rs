use std::collections::BTreeMap;

use log::warn;

use crate::config::BSC_FIFO_SIZE;
use crate::error::TableError;

/// Fixed register responses, keyed by the command byte the master writes.
///
/// Built once before the responder starts and never modified afterwards.
#[derive(Debug, Clone, Default)]
pub struct ResponseTable {
    entries: BTreeMap<u8, Box<[u8]>>,
    shadowed: Vec<u8>,
}

impl ResponseTable {
    /// Build the table from `(command, response)` pairs.
    ///
    /// If a command appears more than once, the later response replaces the
    /// earlier one. Each replaced command is logged and recorded.
    pub fn new(entries: &[(u8, &[u8])]) -> Result<Self, TableError> {
        let mut table = ResponseTable::default();

        for &(command, response) in entries {
            if response.len() > BSC_FIFO_SIZE {
                return Err(TableError::ResponseTooLong {
                    command,
                    len: response.len(),
                    max: BSC_FIFO_SIZE,
                });
            }
            if let Some(previous) = table.entries.insert(command, response.into()) {
                warn!(
                    "Duplicate response for command 0x{:02X}: {:02X?} replaced by {:02X?}",
                    command, previous, response
                );
                table.shadowed.push(command);
            }
        }

        Ok(table)
    }

    pub fn lookup(&self, command: u8) -> Option<&[u8]> {
        self.entries.get(&command).map(|response| &response[..])
    }

    // Commands that had an earlier entry overridden during construction
    pub fn shadowed_commands(&self) -> &[u8] {
        &self.shadowed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the entries in ascending command order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &[u8])> {
        self.entries.iter().map(|(&command, response)| (command, &response[..]))
    }
}
