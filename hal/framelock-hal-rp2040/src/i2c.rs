//! Blocking I2C adapter
//!
//! Register access happens during open and release only, never from the
//! resync path, so a blocking bus is enough.

use embedded_hal::i2c::I2c;
use framelock_hal::I2cBus;

/// Any `embedded-hal` I2C master as an [`I2cBus`]
pub struct BlockingI2c<I> {
    inner: I,
}

impl<I: I2c> BlockingI2c<I> {
    pub fn new(inner: I) -> Self {
        Self { inner }
    }

    /// Give the peripheral back
    pub fn release(self) -> I {
        self.inner
    }
}

impl<I: I2c> I2cBus for BlockingI2c<I> {
    type Error = I::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.inner.write(address, data)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.inner.read(address, buf)
    }
}
