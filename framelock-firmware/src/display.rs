//! Log display surface
//!
//! Boards without a panel still want to see that frames change. This
//! surface reduces each frame to its luminance range and logs it over RTT.

use core::convert::Infallible;

use defmt::*;
use framelock_core::config::{FrameGeometry, PixelFormat};
use framelock_core::traits::DisplaySurface;

/// Luminance summary of one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
pub struct FrameSummary {
    pub mean: u8,
    pub min: u8,
    pub max: u8,
}

impl FrameSummary {
    /// Summarize a frame
    pub fn of(geometry: &FrameGeometry, frame: &[u8]) -> Self {
        let mut sum: u64 = 0;
        let mut count: u64 = 0;
        let mut min = u8::MAX;
        let mut max = u8::MIN;

        let mut visit = |luma: u8| {
            sum += u64::from(luma);
            count += 1;
            min = min.min(luma);
            max = max.max(luma);
        };

        match geometry.format {
            PixelFormat::Gray8 => frame.iter().copied().for_each(&mut visit),
            PixelFormat::Rgb565 => frame
                .chunks_exact(2)
                .map(|px| rgb565_luma(u16::from_be_bytes([px[0], px[1]])))
                .for_each(&mut visit),
        }

        if count == 0 {
            return Self {
                mean: 0,
                min: 0,
                max: 0,
            };
        }
        Self {
            mean: (sum / count) as u8,
            min,
            max,
        }
    }
}

/// BT.601 luma of an RGB 5:6:5 pixel
fn rgb565_luma(px: u16) -> u8 {
    let r = u32::from((px >> 11) & 0x1F) * 255 / 31;
    let g = u32::from((px >> 5) & 0x3F) * 255 / 63;
    let b = u32::from(px & 0x1F) * 255 / 31;
    ((r * 77 + g * 150 + b * 29) >> 8) as u8
}

/// Display surface that logs a summary of every frame
#[derive(Default)]
pub struct LogSurface {
    shown: u32,
}

impl LogSurface {
    /// Frames shown so far
    pub fn shown(&self) -> u32 {
        self.shown
    }
}

impl DisplaySurface for LogSurface {
    type Error = Infallible;

    fn show(&mut self, geometry: &FrameGeometry, frame: &[u8]) -> Result<(), Self::Error> {
        let summary = FrameSummary::of(geometry, frame);
        self.shown = self.shown.wrapping_add(1);
        info!(
            "Frame {} {}x{}: luma mean={} min={} max={}",
            self.shown, geometry.width, geometry.height, summary.mean, summary.min, summary.max
        );
        Ok(())
    }
}
