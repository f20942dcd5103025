//! Broadcom Serial Controller (BSC) slave transfer model.
//!
//! The types here mirror pigpio's `bscXfer` interface: a control word that
//! configures the peripheral, a transfer buffer pair and a status word.

use core::ffi::c_int;

use crate::config::BSC_FIFO_SIZE;
use crate::error::InitError;

// Control register bits
const BSC_EN: u32 = 1 << 0;
const BSC_I2C: u32 = 1 << 2;
const BSC_TE: u32 = 1 << 8;
const BSC_RE: u32 = 1 << 9;
const BSC_CLOCK_STRETCH: u32 = 1 << 15;
const BSC_ADDR_SHIFT: u32 = 16;
const BSC_ADDR_MASK: u32 = 0x7f << BSC_ADDR_SHIFT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BscControl(u32);

impl BscControl {
    /// Control word that releases the BSC pins and disables the peripheral.
    pub const DISABLED: BscControl = BscControl(0);

    /// I2C slave mode at `address` with transmit and receive enabled.
    pub fn i2c_slave(address: u8) -> Result<Self, InitError> {
        if address > 0x7f {
            return Err(InitError::InvalidAddress(address));
        }
        Ok(BscControl(
            ((address as u32) << BSC_ADDR_SHIFT) | BSC_EN | BSC_I2C | BSC_TE | BSC_RE,
        ))
    }

    pub const fn with_clock_stretching(self) -> Self {
        BscControl(self.0 | BSC_CLOCK_STRETCH)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn address(self) -> u8 {
        ((self.0 & BSC_ADDR_MASK) >> BSC_ADDR_SHIFT) as u8
    }

    pub const fn clock_stretching(self) -> bool {
        self.0 & BSC_CLOCK_STRETCH != 0
    }
}

/// Decoded non-negative `bscXfer` status word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BscStatus(u32);

impl BscStatus {
    pub const fn new(raw: u32) -> Self {
        BscStatus(raw)
    }

    /// Bytes copied into the transmit FIFO by this transfer
    pub const fn tx_copied(self) -> usize {
        ((self.0 >> 16) & 0x1f) as usize
    }

    pub const fn rx_fifo_level(self) -> usize {
        ((self.0 >> 11) & 0x1f) as usize
    }

    pub const fn tx_fifo_level(self) -> usize {
        ((self.0 >> 6) & 0x1f) as usize
    }
}

/// One BSC transfer: bytes received from the master and bytes staged for it.
///
/// Layout matches pigpio's `bsc_xfer_t` so it can be handed to `bscXfer`
/// directly.
#[repr(C)]
#[derive(Clone)]
pub struct BscXfer {
    control: u32,
    rx_cnt: c_int,
    rx_buf: [u8; BSC_FIFO_SIZE],
    tx_cnt: c_int,
    tx_buf: [u8; BSC_FIFO_SIZE],
}

impl BscXfer {
    pub fn new(control: BscControl) -> Self {
        BscXfer {
            control: control.bits(),
            rx_cnt: 0,
            rx_buf: [0; BSC_FIFO_SIZE],
            tx_cnt: 0,
            tx_buf: [0; BSC_FIFO_SIZE],
        }
    }

    pub fn control(&self) -> BscControl {
        BscControl(self.control)
    }

    /// Bytes written by the master during the last transfer.
    pub fn received(&self) -> &[u8] {
        let len = (self.rx_cnt.max(0) as usize).min(BSC_FIFO_SIZE);
        &self.rx_buf[..len]
    }

    /// Bytes staged for the master's next read.
    pub fn staged(&self) -> &[u8] {
        let len = (self.tx_cnt.max(0) as usize).min(BSC_FIFO_SIZE);
        &self.tx_buf[..len]
    }

    /// Stage a response. Returns the number of bytes that fit the buffer.
    pub fn stage(&mut self, response: &[u8]) -> usize {
        let len = response.len().min(BSC_FIFO_SIZE);
        self.tx_buf[..len].copy_from_slice(&response[..len]);
        self.tx_cnt = len as c_int;
        len
    }

    // Used by adapters that fill the receive side themselves
    pub fn set_received(&mut self, data: &[u8]) -> usize {
        let len = data.len().min(BSC_FIFO_SIZE);
        self.rx_buf[..len].copy_from_slice(&data[..len]);
        self.rx_cnt = len as c_int;
        len
    }

    /// Reset both the received and the staged bytes.
    pub fn clear(&mut self) {
        self.rx_buf.fill(0);
        self.rx_cnt = 0;
        self.tx_buf.fill(0);
        self.tx_cnt = 0;
    }

    pub fn is_clear(&self) -> bool {
        self.rx_cnt == 0
            && self.tx_cnt == 0
            && self.rx_buf.iter().all(|&b| b == 0)
            && self.tx_buf.iter().all(|&b| b == 0)
    }
}

/// Hardware side of the responder.
pub trait BscBus {
    /// Run one BSC transfer. Staged bytes are handed to the transmit FIFO and
    /// anything the master wrote is copied into the receive buffer. A failed
    /// transfer yields the negative status reported by the controller.
    fn transfer(&mut self, xfer: &mut BscXfer) -> Result<BscStatus, i32>;

    /// Release the controller. Consumes the bus so teardown runs once.
    fn close(self)
    where
        Self: Sized;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_word_for_device_address() {
        let control = BscControl::i2c_slave(0x68).unwrap().with_clock_stretching();

        assert_eq!(control.bits(), 0x0068_8305);
        assert_eq!(control.address(), 0x68);
        assert!(control.clock_stretching());
    }

    #[test]
    fn test_control_word_without_stretching() {
        let control = BscControl::i2c_slave(0x13).unwrap();

        assert_eq!(control.bits(), 0x0013_0305);
        assert!(!control.clock_stretching());
    }

    #[test]
    fn test_eight_bit_address_rejected() {
        assert_eq!(
            BscControl::i2c_slave(0x80),
            Err(InitError::InvalidAddress(0x80))
        );
    }

    #[test]
    fn test_status_fields() {
        // 2 bytes copied, rx level 1, tx level 2, rx busy and tx busy flags set
        let status = BscStatus::new((2 << 16) | (1 << 11) | (2 << 6) | (1 << 5) | 1);

        assert_eq!(status.tx_copied(), 2);
        assert_eq!(status.rx_fifo_level(), 1);
        assert_eq!(status.tx_fifo_level(), 2);
    }

    #[test]
    fn test_stage_and_clear() {
        let mut xfer = BscXfer::new(BscControl::i2c_slave(0x68).unwrap());
        xfer.set_received(&[0x1A, 0x00]);
        assert_eq!(xfer.stage(&[0x09, 0xF0]), 2);

        assert_eq!(xfer.received(), &[0x1A, 0x00]);
        assert_eq!(xfer.staged(), &[0x09, 0xF0]);
        assert!(!xfer.is_clear());

        xfer.clear();
        assert!(xfer.received().is_empty());
        assert!(xfer.staged().is_empty());
        assert!(xfer.is_clear());
        assert_eq!(xfer.control().address(), 0x68);
    }

    #[test]
    fn test_received_ignores_bogus_count() {
        let mut xfer = BscXfer::new(BscControl::DISABLED);
        xfer.rx_cnt = -4;
        assert!(xfer.received().is_empty());

        xfer.rx_cnt = (BSC_FIFO_SIZE + 10) as c_int;
        assert_eq!(xfer.received().len(), BSC_FIFO_SIZE);
    }

    #[test]
    fn test_layout_matches_pigpio() {
        assert_eq!(
            core::mem::size_of::<BscXfer>(),
            4 + 4 + BSC_FIFO_SIZE + 4 + BSC_FIFO_SIZE
        );
    }
}
