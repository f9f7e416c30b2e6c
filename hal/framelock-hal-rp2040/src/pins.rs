//! Dynamic pin allocation for config-driven camera wiring
//!
//! Camera pins come from `camera.toml` as plain numbers, so GPIO pins are
//! moved into a bank once at startup and taken by number afterwards.
//!
//! GPIO4 and GPIO5 carry the sensor control bus (I2C0 SDA/SCL) and are
//! handed out typed, outside the bank.

use embassy_rp::gpio::AnyPin;
use embassy_rp::peripherals;
use embassy_rp::{Peri, Peripherals};
use heapless::Vec;

use framelock_core::config::PinAssignment;

/// GPIO pins on the RP2040
pub const GPIO_COUNT: usize = 30;

/// Control bus data pin
pub const I2C_SDA_PIN: u8 = 4;

/// Control bus clock pin
pub const I2C_SCL_PIN: u8 = 5;

/// Error when requesting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin(u8),
    /// Pin already taken
    AlreadyTaken(u8),
    /// Pin reserved for the control bus
    Reserved(u8),
}

/// Pins of one DVP camera interface
pub struct DvpPins {
    /// Data bus, D0 first
    pub data: Vec<Peri<'static, AnyPin>, 8>,
    /// HSYNC / HREF
    pub line_valid: Peri<'static, AnyPin>,
    /// VSYNC
    pub frame_valid: Peri<'static, AnyPin>,
    /// PCLK
    pub pixel_clock: Peri<'static, AnyPin>,
    /// XCLK output
    pub master_clock: Option<Peri<'static, AnyPin>>,
}

/// Pin bank that holds the GPIO pins and hands them out by number
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT],
}

/// Peripherals the camera needs besides bank pins
pub struct BoardPeripherals {
    pub pio0: Peri<'static, peripherals::PIO0>,
    pub pio1: Peri<'static, peripherals::PIO1>,
    pub i2c0: Peri<'static, peripherals::I2C0>,
    pub i2c_sda: Peri<'static, peripherals::PIN_4>,
    pub i2c_scl: Peri<'static, peripherals::PIN_5>,
    pub dma_ch0: Peri<'static, peripherals::DMA_CH0>,
    pub dma_ch1: Peri<'static, peripherals::DMA_CH1>,
    pub dma_ch2: Peri<'static, peripherals::DMA_CH2>,
    pub dma_ch3: Peri<'static, peripherals::DMA_CH3>,
}

impl PinBank {
    /// Split the embassy peripherals into the pin bank and everything else
    pub fn split(p: Peripherals) -> (Self, BoardPeripherals) {
        let board = BoardPeripherals {
            pio0: p.PIO0,
            pio1: p.PIO1,
            i2c0: p.I2C0,
            i2c_sda: p.PIN_4,
            i2c_scl: p.PIN_5,
            dma_ch0: p.DMA_CH0,
            dma_ch1: p.DMA_CH1,
            dma_ch2: p.DMA_CH2,
            dma_ch3: p.DMA_CH3,
        };
        let pins = [
            Some(p.PIN_0.into()),
            Some(p.PIN_1.into()),
            Some(p.PIN_2.into()),
            Some(p.PIN_3.into()),
            None,
            None,
            Some(p.PIN_6.into()),
            Some(p.PIN_7.into()),
            Some(p.PIN_8.into()),
            Some(p.PIN_9.into()),
            Some(p.PIN_10.into()),
            Some(p.PIN_11.into()),
            Some(p.PIN_12.into()),
            Some(p.PIN_13.into()),
            Some(p.PIN_14.into()),
            Some(p.PIN_15.into()),
            Some(p.PIN_16.into()),
            Some(p.PIN_17.into()),
            Some(p.PIN_18.into()),
            Some(p.PIN_19.into()),
            Some(p.PIN_20.into()),
            Some(p.PIN_21.into()),
            Some(p.PIN_22.into()),
            Some(p.PIN_23.into()),
            Some(p.PIN_24.into()),
            Some(p.PIN_25.into()),
            Some(p.PIN_26.into()),
            Some(p.PIN_27.into()),
            Some(p.PIN_28.into()),
            Some(p.PIN_29.into()),
        ];
        (Self { pins }, board)
    }

    fn check(&self, pin: u8) -> Result<(), PinError> {
        if pin as usize >= GPIO_COUNT {
            return Err(PinError::InvalidPin(pin));
        }
        if pin == I2C_SDA_PIN || pin == I2C_SCL_PIN {
            return Err(PinError::Reserved(pin));
        }
        if self.pins[pin as usize].is_none() {
            return Err(PinError::AlreadyTaken(pin));
        }
        Ok(())
    }

    /// Take a pin by number
    pub fn take(&mut self, pin: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        self.check(pin)?;
        self.pins[pin as usize]
            .take()
            .ok_or(PinError::AlreadyTaken(pin))
    }

    /// Check if a pin is available
    pub fn is_available(&self, pin: u8) -> bool {
        self.check(pin).is_ok()
    }

    /// Return a pin to the bank
    pub fn return_pin(&mut self, pin: u8, peri: Peri<'static, AnyPin>) {
        if (pin as usize) < GPIO_COUNT {
            self.pins[pin as usize] = Some(peri);
        }
    }

    /// Take every pin of a camera interface
    ///
    /// Either all pins are taken or none are.
    pub fn take_dvp(&mut self, assignment: &PinAssignment) -> Result<DvpPins, PinError> {
        let signals = [
            Some(assignment.line_valid()),
            Some(assignment.frame_valid()),
            Some(assignment.pixel_clock()),
            assignment.master_clock(),
        ];
        for pin in assignment.data_pins().chain(signals.into_iter().flatten()) {
            self.check(pin)?;
        }

        let mut data = Vec::new();
        for pin in assignment.data_pins() {
            // Width is at most 8, checked by PinAssignment
            let _ = data.push(self.take(pin)?);
        }
        Ok(DvpPins {
            data,
            line_valid: self.take(assignment.line_valid())?,
            frame_valid: self.take(assignment.frame_valid())?,
            pixel_clock: self.take(assignment.pixel_clock())?,
            master_clock: assignment.master_clock().map(|p| self.take(p)).transpose()?,
        })
    }
}
