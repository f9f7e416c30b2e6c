//! Configuration types
//!
//! Board-agnostic camera configuration. The firmware fills these in from
//! its embedded TOML file; everything here is validated on construction.

pub mod camera;
pub mod pins;

pub use camera::{CameraConfig, FrameGeometry, PixelFormat, SensorKind};
pub use pins::{DataWidth, PinAssignment, MAX_PIN};

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Data bus width not in {1, 4, 8}
    UnsupportedDataWidth(u8),
    /// Pin number does not fit a 5-bit instruction field
    PinOutOfRange(u8),
    /// Two signals share a pin
    PinConflict(u8),
    /// Frame has zero width or height
    EmptyFrame,
}
