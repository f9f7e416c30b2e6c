//! DVP sampling microprogram
//!
//! The receiver runs a four-instruction PIO loop:
//!
//! ```text
//! .wrap_target
//!     wait 1 gpio HSYNC   ; line valid
//!     wait 1 gpio PCLK    ; rising pixel clock
//!     in   pins, WIDTH    ; sample the data bus
//!     wait 0 gpio PCLK    ; falling pixel clock
//! .wrap
//! ```
//!
//! Shift direction is left with autopush at 32 bits, so every four 8-bit
//! samples (or 32 1-bit samples) become one word in the RX FIFO.
//!
//! Pin numbers and the bus width are not known until runtime, so the
//! program is kept as a template with zeroed fields and patched once before
//! it is loaded. PIO snapshots the program at load time; patching after that
//! has no effect.

use crate::config::PinAssignment;

/// Number of instructions in the sampling loop
pub const PROGRAM_LEN: usize = 4;

/// Unpatched template, every pin field and the bit count set to zero
///
/// `wait` is `001 ddddd p ss iiiii` (index in bits 4:0), `in` is
/// `010 ddddd sss bbbbb` (bit count in bits 4:0, 32 encoded as 0).
#[rustfmt::skip]
pub const TEMPLATE: [u16; PROGRAM_LEN] = [
    0x2080, // wait 1 gpio 0
    0x2080, // wait 1 gpio 0
    0x4000, // in pins, 32
    0x2000, // wait 0 gpio 0
];

/// Instruction executed after the last one
pub const WRAP_TARGET: u8 = 0;

/// Last instruction before wrapping
pub const WRAP_SOURCE: u8 = (PROGRAM_LEN - 1) as u8;

/// Slot holding the line-valid wait
const LINE_VALID_SLOT: usize = 0;
/// Slot holding the pixel-clock high wait
const PCLK_HIGH_SLOT: usize = 1;
/// Slot holding the `in pins` instruction
const DATA_WIDTH_SLOT: usize = 2;
/// Slot holding the pixel-clock low wait
const PCLK_LOW_SLOT: usize = 3;

/// 5-bit field shared by `wait` index and `in` bit count
const FIELD_MASK: u16 = 0x001F;

/// Microprogram patching errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProgramError {
    /// Value does not fit in a 5-bit field
    FieldOverflow(u8),
    /// Bit count of zero is not a valid bus width
    ZeroWidth,
}

/// A patched, ready-to-load sampling program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Microprogram {
    words: [u16; PROGRAM_LEN],
}

impl Microprogram {
    /// Patch the template for a pin assignment
    pub fn for_pins(pins: &PinAssignment) -> Result<Self, ProgramError> {
        let words = patch(
            &TEMPLATE,
            pins.line_valid(),
            pins.pixel_clock(),
            pins.data_width().pin_count(),
        )?;
        Ok(Self { words })
    }

    /// Instruction words in load order
    pub fn words(&self) -> &[u16; PROGRAM_LEN] {
        &self.words
    }

    /// Line-valid pin the program waits on
    pub fn line_valid_pin(&self) -> u8 {
        field(self.words[LINE_VALID_SLOT])
    }

    /// Pixel-clock pins of the high and low waits
    pub fn pixel_clock_pins(&self) -> (u8, u8) {
        (field(self.words[PCLK_HIGH_SLOT]), field(self.words[PCLK_LOW_SLOT]))
    }

    /// Bits sampled per pixel clock
    pub fn data_width(&self) -> u8 {
        match field(self.words[DATA_WIDTH_SLOT]) {
            0 => 32,
            n => n,
        }
    }
}

/// Rewrite the pin and width fields of `template`
///
/// Every value is range-checked before any word is touched. Bits outside
/// the 5-bit fields keep their template values.
pub fn patch(
    template: &[u16; PROGRAM_LEN],
    line_valid: u8,
    pixel_clock: u8,
    data_width: u8,
) -> Result<[u16; PROGRAM_LEN], ProgramError> {
    for value in [line_valid, pixel_clock, data_width] {
        if u16::from(value) > FIELD_MASK {
            return Err(ProgramError::FieldOverflow(value));
        }
    }
    if data_width == 0 {
        return Err(ProgramError::ZeroWidth);
    }

    let mut words = *template;
    words[LINE_VALID_SLOT] = with_field(words[LINE_VALID_SLOT], line_valid);
    words[PCLK_HIGH_SLOT] = with_field(words[PCLK_HIGH_SLOT], pixel_clock);
    words[DATA_WIDTH_SLOT] = with_field(words[DATA_WIDTH_SLOT], data_width);
    words[PCLK_LOW_SLOT] = with_field(words[PCLK_LOW_SLOT], pixel_clock);
    Ok(words)
}

fn with_field(word: u16, value: u8) -> u16 {
    (word & !FIELD_MASK) | u16::from(value)
}

fn field(word: u16) -> u8 {
    (word & FIELD_MASK) as u8
}
