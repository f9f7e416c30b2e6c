//! Sensor models
//!
//! Each sensor knows how to identify itself over the register protocol,
//! how to select its data bus width and how to start and stop streaming.
//! Full register tables (exposure, windowing, pixel formats) are left to
//! the sensors' power-on defaults.

pub mod hm01b0;
pub mod ov5640;

pub use hm01b0::Hm01b0;
pub use ov5640::Ov5640;

use framelock_core::config::{DataWidth, FrameGeometry, SensorKind};
use framelock_hal::RegisterBus;

/// Sensor errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError<E> {
    /// Register access failed
    Bus(E),
    /// Chip ID register did not hold the expected value
    WrongChip {
        /// ID the driver was written for
        expected: u16,
        /// ID read back
        found: u16,
    },
    /// Sensor cannot drive a bus of this width
    UnsupportedWidth(u8),
    /// Camera has not been opened
    NotOpen,
}

/// Sensor-specific register operations
pub trait SensorModel {
    /// Which sensor this is
    const KIND: SensorKind;

    /// Register holding the 16-bit chip ID
    const CHIP_ID_REGISTER: u16;

    /// Expected chip ID
    const CHIP_ID: u16;

    /// Frame the sensor produces with its default settings
    fn geometry(&self) -> FrameGeometry;

    /// Read the chip ID and check it
    fn probe<B: RegisterBus>(&self, bus: &mut B) -> Result<(), SensorError<B::Error>> {
        let found = bus.read_u16(Self::CHIP_ID_REGISTER).map_err(SensorError::Bus)?;
        if found != Self::CHIP_ID {
            return Err(SensorError::WrongChip {
                expected: Self::CHIP_ID,
                found,
            });
        }
        Ok(())
    }

    /// Select the parallel data bus width
    fn set_bus_width<B: RegisterBus>(
        &self,
        bus: &mut B,
        width: DataWidth,
    ) -> Result<(), SensorError<B::Error>>;

    /// Start or stop the pixel stream
    fn set_streaming<B: RegisterBus>(
        &self,
        bus: &mut B,
        streaming: bool,
    ) -> Result<(), SensorError<B::Error>>;
}
