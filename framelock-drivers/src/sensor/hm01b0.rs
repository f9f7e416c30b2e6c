//! Himax HM01B0 ultra-low-power monochrome sensor
//!
//! 324x244 8-bit luminance. Serial (1-bit), 4-bit and 8-bit DVP output,
//! selected through `BIT_CONTROL`.

use super::{SensorError, SensorModel};
use framelock_core::config::camera::HM01B0_GEOMETRY;
use framelock_core::config::{DataWidth, FrameGeometry, SensorKind};
use framelock_hal::RegisterBus;

/// HM01B0 register addresses
pub mod reg {
    /// Model ID, high byte (low byte follows)
    pub const MODEL_ID_H: u16 = 0x0000;
    /// Streaming control
    pub const MODE_SELECT: u16 = 0x0100;
    /// Software reset
    pub const SW_RESET: u16 = 0x0103;
    /// Data bus width and bit order
    pub const BIT_CONTROL: u16 = 0x3059;
}

/// `MODE_SELECT` values
pub mod mode {
    /// Standby, no output
    pub const STANDBY: u8 = 0x00;
    /// Continuous streaming
    pub const STREAMING: u8 = 0x01;
}

/// `BIT_CONTROL` values per bus width
pub mod bit_control {
    /// Serial output on D0
    pub const SERIAL: u8 = 0x22;
    /// 4-bit output on D0..D3
    pub const NIBBLE: u8 = 0x42;
    /// 8-bit output on D0..D7
    pub const BYTE: u8 = 0x02;
}

/// Default 7-bit address
pub const DEFAULT_ADDRESS: u8 = 0x24;

/// HM01B0 driver
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hm01b0;

impl SensorModel for Hm01b0 {
    const KIND: SensorKind = SensorKind::Hm01b0;
    const CHIP_ID_REGISTER: u16 = reg::MODEL_ID_H;
    const CHIP_ID: u16 = 0x01B0;

    fn geometry(&self) -> FrameGeometry {
        HM01B0_GEOMETRY
    }

    fn set_bus_width<B: RegisterBus>(
        &self,
        bus: &mut B,
        width: DataWidth,
    ) -> Result<(), SensorError<B::Error>> {
        let value = match width {
            DataWidth::One => bit_control::SERIAL,
            DataWidth::Four => bit_control::NIBBLE,
            DataWidth::Eight => bit_control::BYTE,
        };
        bus.write_u8(reg::BIT_CONTROL, value).map_err(SensorError::Bus)
    }

    fn set_streaming<B: RegisterBus>(
        &self,
        bus: &mut B,
        streaming: bool,
    ) -> Result<(), SensorError<B::Error>> {
        let value = if streaming {
            mode::STREAMING
        } else {
            mode::STANDBY
        };
        bus.write_u8(reg::MODE_SELECT, value).map_err(SensorError::Bus)
    }
}

impl Hm01b0 {
    /// Reset every register to its power-on default
    pub fn reset<B: RegisterBus>(&self, bus: &mut B) -> Result<(), SensorError<B::Error>> {
        bus.write_u8(reg::SW_RESET, 0x00).map_err(SensorError::Bus)
    }
}
