//! Sensor master clock (XCLK) on a PWM slice
//!
//! Sensors without their own oscillator need a continuous clock. A PWM
//! slice at 50% duty cycle is the cheapest source on the RP2040. The pin is
//! only known at runtime, so the slice is programmed through its registers
//! instead of through the typed PWM driver.

use embassy_rp::gpio::{AnyPin, Pin};
use embassy_rp::pac;
use embassy_rp::Peri;
use fixed::types::U12F4;

/// GPIO function select for PWM
const FUNCSEL_PWM: u8 = 4;

/// Largest integer divider plus one, in 1/16 steps
const DIV16_LIMIT: u64 = 256 * 16;

/// Smallest divider, 1.0 in 1/16 steps
const DIV16_MIN: u64 = 16;

/// XCLK errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum XclkError {
    /// Requested zero Hz
    Zero,
    /// Needs a period shorter than two system clocks
    TooFast,
    /// Needs a divider above 255
    TooSlow,
}

/// Divider and wrap value for one frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct XclkSettings {
    div16: u16,
    top: u16,
}

impl XclkSettings {
    /// Work out the slowest-divider settings for `freq_hz`
    pub fn for_frequency(sys_clk_hz: u32, freq_hz: u32) -> Result<Self, XclkError> {
        if freq_hz == 0 {
            return Err(XclkError::Zero);
        }
        let sys16 = u64::from(sys_clk_hz) * 16;
        let freq = u64::from(freq_hz);

        // Smallest divider that keeps the period within a 16-bit counter
        let div16 = sys16.div_ceil(freq * 65_536).max(DIV16_MIN);
        if div16 >= DIV16_LIMIT {
            return Err(XclkError::TooSlow);
        }

        let period = (sys16 + freq * div16 / 2) / (freq * div16);
        if period < 2 {
            return Err(XclkError::TooFast);
        }

        Ok(Self {
            div16: div16 as u16,
            top: (period - 1) as u16,
        })
    }

    /// Clock divider
    pub fn divider(&self) -> U12F4 {
        U12F4::from_bits(self.div16)
    }

    /// Counter wrap value
    pub fn top(&self) -> u16 {
        self.top
    }

    /// Compare value for 50% duty
    pub fn compare(&self) -> u16 {
        ((u32::from(self.top) + 1) / 2) as u16
    }

    /// Frequency these settings actually produce
    pub fn actual_hz(&self, sys_clk_hz: u32) -> u32 {
        let sys16 = u64::from(sys_clk_hz) * 16;
        (sys16 / (u64::from(self.div16) * (u64::from(self.top) + 1))) as u32
    }
}

/// Running master clock
pub struct MasterClock<'d> {
    _pin: Peri<'d, AnyPin>,
    slice: usize,
    settings: XclkSettings,
}

impl<'d> MasterClock<'d> {
    /// Start a 50% duty clock on `pin`
    ///
    /// Both channels of a slice share one counter, so the sibling pin of
    /// the slice cannot carry a different frequency.
    pub fn start(pin: Peri<'d, AnyPin>, sys_clk_hz: u32, freq_hz: u32) -> Result<Self, XclkError> {
        let settings = XclkSettings::for_frequency(sys_clk_hz, freq_hz)?;
        let number = pin.pin() as usize;
        let slice = (number >> 1) & 7;
        let channel_b = number & 1 == 1;

        let regs = pac::PWM.ch(slice);
        regs.csr().write(|w| w.set_en(false));
        regs.div().write(|w| {
            w.set_int((settings.div16 >> 4) as u8);
            w.set_frac((settings.div16 & 0xF) as u8);
        });
        regs.top().write(|w| w.set_top(settings.top));
        regs.cc().modify(|w| {
            if channel_b {
                w.set_b(settings.compare());
            } else {
                w.set_a(settings.compare());
            }
        });
        regs.ctr().write(|w| w.set_ctr(0));

        pac::PADS_BANK0.gpio(number).modify(|w| {
            w.set_od(false);
            w.set_ie(false);
        });
        pac::IO_BANK0
            .gpio(number)
            .ctrl()
            .write(|w| w.set_funcsel(FUNCSEL_PWM));

        regs.csr().write(|w| w.set_en(true));

        Ok(Self {
            _pin: pin,
            slice,
            settings,
        })
    }

    /// Settings in use
    pub fn settings(&self) -> XclkSettings {
        self.settings
    }

    /// Frequency on the pin
    pub fn frequency(&self, sys_clk_hz: u32) -> u32 {
        self.settings.actual_hz(sys_clk_hz)
    }
}

impl Drop for MasterClock<'_> {
    fn drop(&mut self) {
        pac::PWM.ch(self.slice).csr().write(|w| w.set_en(false));
    }
}
