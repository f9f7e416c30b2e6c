//! Two-wire control bus
//!
//! Camera sensors expose their configuration registers over I2C, or over
//! SCCB, the OmniVision variant that behaves like I2C without repeated
//! starts. Chip HALs implement [`I2cBus`] for their peripheral.

/// I2C (or SCCB) bus master
pub trait I2cBus {
    /// Error type for bus operations
    type Error;

    /// Write bytes to the device at `address`
    ///
    /// # Arguments
    /// * `address` - 7-bit device address
    /// * `data` - Bytes to write, register address first
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Read `buf.len()` bytes from the device at `address`
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error>;
}

/// Control bus configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self::FAST
    }
}

impl I2cConfig {
    /// 100 kHz, the safe choice for SCCB sensors on long ribbon cables
    pub const STANDARD: Self = Self { frequency: 100_000 };

    /// 400 kHz, supported by HM01B0 and OV5640
    pub const FAST: Self = Self { frequency: 400_000 };
}
