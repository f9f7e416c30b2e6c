//! Device register protocol
//!
//! Camera sensors are configured through a flat space of 8-bit registers
//! addressed by 16-bit register numbers. On the wire a register access is:
//!
//! ```text
//! write: [ADDR_HI] [ADDR_LO] [DATA 0] [DATA 1] ...
//! read:  [ADDR_HI] [ADDR_LO]   then a separate read of N bytes
//! ```
//!
//! The read is issued as two transactions because SCCB devices do not
//! accept a repeated start.

use crate::i2c::I2cBus;

/// Maximum data bytes in a single register write (register address excluded)
pub const MAX_WRITE_LEN: usize = 30;

/// Register protocol errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterError<E> {
    /// Underlying bus reported an error
    Bus(E),
    /// Write payload longer than [`MAX_WRITE_LEN`]
    PayloadTooLarge,
}

/// Addressable register read/write
pub trait RegisterBus {
    /// Error type for register operations
    type Error;

    /// Read `buf.len()` consecutive registers starting at `register`
    fn read(&mut self, register: u16, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Write `data` to consecutive registers starting at `register`
    fn write(&mut self, register: u16, data: &[u8]) -> Result<(), Self::Error>;

    /// Read a single register
    fn read_u8(&mut self, register: u16) -> Result<u8, Self::Error> {
        let mut buf = [0u8; 1];
        self.read(register, &mut buf)?;
        Ok(buf[0])
    }

    /// Write a single register
    fn write_u8(&mut self, register: u16, value: u8) -> Result<(), Self::Error> {
        self.write(register, &[value])
    }

    /// Read two consecutive registers as a big-endian value (e.g. chip IDs)
    fn read_u16(&mut self, register: u16) -> Result<u16, Self::Error> {
        let mut buf = [0u8; 2];
        self.read(register, &mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }
}

/// Register protocol over a two-wire bus
pub struct I2cRegisters<B> {
    bus: B,
    address: u8,
}

impl<B: I2cBus> I2cRegisters<B> {
    /// Create a register client for the device at `address`
    pub fn new(bus: B, address: u8) -> Self {
        Self { bus, address }
    }

    /// 7-bit device address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Give the bus back
    pub fn release(self) -> B {
        self.bus
    }
}

impl<B: I2cBus> RegisterBus for I2cRegisters<B> {
    type Error = RegisterError<B::Error>;

    fn read(&mut self, register: u16, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.bus
            .write(self.address, &register.to_be_bytes())
            .map_err(RegisterError::Bus)?;
        self.bus.read(self.address, buf).map_err(RegisterError::Bus)
    }

    fn write(&mut self, register: u16, data: &[u8]) -> Result<(), Self::Error> {
        if data.len() > MAX_WRITE_LEN {
            return Err(RegisterError::PayloadTooLarge);
        }

        let mut frame = [0u8; 2 + MAX_WRITE_LEN];
        frame[..2].copy_from_slice(&register.to_be_bytes());
        frame[2..2 + data.len()].copy_from_slice(data);

        self.bus
            .write(self.address, &frame[..2 + data.len()])
            .map_err(RegisterError::Bus)
    }
}
