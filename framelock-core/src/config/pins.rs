//! DVP pin assignment
//!
//! A DVP camera needs a contiguous data bus plus three timing signals:
//!
//! ```text
//!  D[base .. base+width)  ──┐
//!  HSYNC (line valid)     ──┼──► PIO `wait`/`in` instructions
//!  PCLK  (pixel clock)    ──┘
//!  VSYNC (frame valid)    ─────► GPIO edge interrupt
//!  XCLK  (master clock)   ◄───── PWM output (optional)
//! ```

use super::ConfigError;

/// Highest pin number an instruction field can address (5 bits)
pub const MAX_PIN: u8 = 31;

/// Parallel data bus width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataWidth {
    /// Serial 1-bit bus (HM01B0 default)
    One,
    /// 4-bit bus
    Four,
    /// 8-bit bus
    Eight,
}

impl DataWidth {
    /// Convert a data pin count to a bus width
    pub fn from_pin_count(count: u8) -> Result<Self, ConfigError> {
        match count {
            1 => Ok(DataWidth::One),
            4 => Ok(DataWidth::Four),
            8 => Ok(DataWidth::Eight),
            other => Err(ConfigError::UnsupportedDataWidth(other)),
        }
    }

    /// Number of data pins
    pub fn pin_count(self) -> u8 {
        match self {
            DataWidth::One => 1,
            DataWidth::Four => 4,
            DataWidth::Eight => 8,
        }
    }
}

/// Validated, immutable pin assignment for one camera interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinAssignment {
    data_base: u8,
    data_width: DataWidth,
    line_valid: u8,
    frame_valid: u8,
    pixel_clock: u8,
    master_clock: Option<u8>,
}

impl PinAssignment {
    /// Default board wiring: 1-bit bus, D0=12, VSYNC=13, HSYNC=14, PCLK=15
    pub const DEFAULT_BOARD: Self = Self {
        data_base: 12,
        data_width: DataWidth::One,
        line_valid: 14,
        frame_valid: 13,
        pixel_clock: 15,
        master_clock: None,
    };

    /// Validate and build a pin assignment
    ///
    /// # Arguments
    /// * `data_base` - First data pin (D0); data pins are consecutive
    /// * `data_pin_count` - 1, 4 or 8
    /// * `line_valid` - HSYNC / HREF
    /// * `frame_valid` - VSYNC
    /// * `pixel_clock` - PCLK
    /// * `master_clock` - XCLK output, if the board drives the sensor clock
    pub fn new(
        data_base: u8,
        data_pin_count: u8,
        line_valid: u8,
        frame_valid: u8,
        pixel_clock: u8,
        master_clock: Option<u8>,
    ) -> Result<Self, ConfigError> {
        let data_width = DataWidth::from_pin_count(data_pin_count)?;

        let data_last = data_base.saturating_add(data_pin_count - 1);
        if data_last > MAX_PIN {
            return Err(ConfigError::PinOutOfRange(data_last));
        }

        let signals = [Some(line_valid), Some(frame_valid), Some(pixel_clock), master_clock];
        for (i, pin) in signals.iter().enumerate() {
            let Some(pin) = *pin else { continue };
            if pin > MAX_PIN {
                return Err(ConfigError::PinOutOfRange(pin));
            }
            if (data_base..=data_last).contains(&pin) {
                return Err(ConfigError::PinConflict(pin));
            }
            if signals[..i].contains(&Some(pin)) {
                return Err(ConfigError::PinConflict(pin));
            }
        }

        Ok(Self {
            data_base,
            data_width,
            line_valid,
            frame_valid,
            pixel_clock,
            master_clock,
        })
    }

    /// First data pin (D0)
    pub fn data_base(&self) -> u8 {
        self.data_base
    }

    /// Data bus width
    pub fn data_width(&self) -> DataWidth {
        self.data_width
    }

    /// Line valid (HSYNC) pin
    pub fn line_valid(&self) -> u8 {
        self.line_valid
    }

    /// Frame valid (VSYNC) pin
    pub fn frame_valid(&self) -> u8 {
        self.frame_valid
    }

    /// Pixel clock pin
    pub fn pixel_clock(&self) -> u8 {
        self.pixel_clock
    }

    /// Master clock output pin
    pub fn master_clock(&self) -> Option<u8> {
        self.master_clock
    }

    /// Iterate over the data pins, D0 first
    pub fn data_pins(&self) -> impl Iterator<Item = u8> {
        self.data_base..self.data_base + self.data_width.pin_count()
    }
}
