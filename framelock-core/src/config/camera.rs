//! Camera configuration
//!
//! Sensor choice, frame geometry and the capture options that follow from
//! them.

use super::pins::PinAssignment;
use super::ConfigError;

/// Default master clock for sensors that take XCLK from the controller
pub const DEFAULT_XCLK_HZ: u32 = 25_000_000;

/// Supported sensors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorKind {
    /// Himax HM01B0, 324x244 monochrome
    Hm01b0,
    /// OmniVision OV5640
    Ov5640,
}

impl SensorKind {
    /// Default 7-bit control bus address
    pub fn default_address(self) -> u8 {
        match self {
            SensorKind::Hm01b0 => 0x24,
            SensorKind::Ov5640 => 0x3C,
        }
    }
}

/// Pixel encoding in the frame buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PixelFormat {
    /// 8-bit luminance
    Gray8,
    /// 16-bit RGB 5:6:5
    Rgb565,
}

impl PixelFormat {
    /// Bytes per pixel
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Gray8 => 1,
            PixelFormat::Rgb565 => 2,
        }
    }
}

/// Frame dimensions and encoding
///
/// The buffer layout is row-major, `width * bytes_per_pixel` bytes per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameGeometry {
    /// Pixels per row
    pub width: u16,
    /// Rows per frame
    pub height: u16,
    /// Pixel encoding
    pub format: PixelFormat,
}

impl FrameGeometry {
    /// Create a frame geometry, rejecting empty frames
    pub const fn new(width: u16, height: u16, format: PixelFormat) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyFrame);
        }
        Ok(Self {
            width,
            height,
            format,
        })
    }

    /// Bytes in one frame
    pub const fn frame_bytes(&self) -> usize {
        let bpp = match self.format {
            PixelFormat::Gray8 => 1,
            PixelFormat::Rgb565 => 2,
        };
        self.width as usize * self.height as usize * bpp
    }

    /// Bytes in one row
    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }
}

/// HM01B0 full frame, 324x244 8-bit
pub const HM01B0_GEOMETRY: FrameGeometry = FrameGeometry {
    width: 324,
    height: 244,
    format: PixelFormat::Gray8,
};

/// OV5640 QVGA RGB565
pub const OV5640_QVGA_GEOMETRY: FrameGeometry = FrameGeometry {
    width: 320,
    height: 240,
    format: PixelFormat::Rgb565,
};

/// Complete camera configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CameraConfig {
    /// Which sensor is fitted
    pub sensor: SensorKind,
    /// Control bus address
    pub i2c_address: u8,
    /// DVP pins
    pub pins: PinAssignment,
    /// Frame size and encoding
    pub geometry: FrameGeometry,
    /// Swap bytes within each 32-bit transfer
    pub byte_swap: bool,
    /// Master clock frequency, used when `pins.master_clock()` is set
    pub xclk_hz: u32,
}

impl CameraConfig {
    /// Defaults for a sensor on the given pins
    ///
    /// The receiver shifts left, so the first byte of every word lands in
    /// its top byte. Swapping restores arrival order in memory.
    pub fn for_sensor(sensor: SensorKind, pins: PinAssignment) -> Self {
        let (geometry, byte_swap) = match sensor {
            SensorKind::Hm01b0 => (HM01B0_GEOMETRY, true),
            SensorKind::Ov5640 => (OV5640_QVGA_GEOMETRY, true),
        };
        Self {
            sensor,
            i2c_address: sensor.default_address(),
            pins,
            geometry,
            byte_swap,
            xclk_hz: DEFAULT_XCLK_HZ,
        }
    }

    /// Bytes in one frame
    pub fn frame_bytes(&self) -> usize {
        self.geometry.frame_bytes()
    }
}

impl Default for CameraConfig {
    /// HM01B0 on a 1-bit bus: D0=GPIO12, VSYNC=GPIO13, HSYNC=GPIO14, PCLK=GPIO15
    fn default() -> Self {
        Self::for_sensor(SensorKind::Hm01b0, PinAssignment::DEFAULT_BOARD)
    }
}
