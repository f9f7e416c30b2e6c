//! Display surface trait

use crate::config::FrameGeometry;

/// A display that accepts whole frames
///
/// Any pixel format conversion happens inside the surface.
pub trait DisplaySurface {
    /// Error type for display operations
    type Error;

    /// Show one frame laid out per `geometry`
    fn show(&mut self, geometry: &FrameGeometry, pixels: &[u8]) -> Result<(), Self::Error>;
}
