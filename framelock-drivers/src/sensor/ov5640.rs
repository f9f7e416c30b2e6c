//! OmniVision OV5640 5 MP sensor
//!
//! Only the 8-bit DVP output is wired up. Streaming is toggled through the
//! system power-down bit.

use super::{SensorError, SensorModel};
use framelock_core::config::camera::OV5640_QVGA_GEOMETRY;
use framelock_core::config::{DataWidth, FrameGeometry, SensorKind};
use framelock_hal::RegisterBus;

/// OV5640 register addresses
pub mod reg {
    /// System control: software reset and power down
    pub const SYSTEM_CTRL0: u16 = 0x3008;
    /// Chip ID, high byte (low byte follows)
    pub const CHIP_ID_H: u16 = 0x300A;
}

/// `SYSTEM_CTRL0` values
pub mod system_ctrl0 {
    /// Normal operation
    pub const WAKE: u8 = 0x02;
    /// Software power down
    pub const POWER_DOWN: u8 = 0x42;
}

/// Default 7-bit address
pub const DEFAULT_ADDRESS: u8 = 0x3C;

/// OV5640 driver
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ov5640;

impl SensorModel for Ov5640 {
    const KIND: SensorKind = SensorKind::Ov5640;
    const CHIP_ID_REGISTER: u16 = reg::CHIP_ID_H;
    const CHIP_ID: u16 = 0x5640;

    fn geometry(&self) -> FrameGeometry {
        OV5640_QVGA_GEOMETRY
    }

    fn set_bus_width<B: RegisterBus>(
        &self,
        _bus: &mut B,
        width: DataWidth,
    ) -> Result<(), SensorError<B::Error>> {
        match width {
            DataWidth::Eight => Ok(()),
            other => Err(SensorError::UnsupportedWidth(other.pin_count())),
        }
    }

    fn set_streaming<B: RegisterBus>(
        &self,
        bus: &mut B,
        streaming: bool,
    ) -> Result<(), SensorError<B::Error>> {
        let value = if streaming {
            system_ctrl0::WAKE
        } else {
            system_ctrl0::POWER_DOWN
        };
        bus.write_u8(reg::SYSTEM_CTRL0, value).map_err(SensorError::Bus)
    }
}
