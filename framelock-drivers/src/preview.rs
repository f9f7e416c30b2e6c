//! Frame preview
//!
//! Copies the capture buffer into a scratch frame and hands it to a display
//! surface. Torn copies are dropped rather than shown.
//!
//! The buffer is single: the transfer engine writes the next frame over the
//! last one. A copy is one whole frame only if the transfer had reached its
//! full count when the copy started and no resync happened until it ended.

use framelock_core::buffer::FrameBuffer;
use framelock_core::config::FrameGeometry;
use framelock_core::traits::DisplaySurface;

/// Preview errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PreviewError<E> {
    /// The display rejected the frame
    Display(E),
    /// Geometry describes a different frame size than the buffer holds
    GeometryMismatch {
        /// Bytes the geometry needs
        geometry_bytes: usize,
        /// Bytes in the capture buffer
        buffer_bytes: usize,
    },
    /// Scratch buffer cannot hold a frame
    ScratchTooSmall {
        /// Bytes needed
        needed: usize,
        /// Bytes available
        available: usize,
    },
}

/// What happened to one preview attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PreviewOutcome {
    /// Frame handed to the display
    Shown {
        /// Buffer epoch of the frame
        epoch: u32,
    },
    /// The frame was still being written or a resync hit during the copy;
    /// nothing was shown
    SkippedTorn,
}

/// Copy the current frame to `scratch` and show it
///
/// `frame_complete` reports whether the transfer engine has reached its
/// full count for the frame in the buffer, usually
/// [`CaptureSession::transfer_complete`]. It is asked after the snapshot is
/// taken, so a resync between the two shows up as a torn copy.
///
/// [`CaptureSession::transfer_complete`]: framelock_core::session::CaptureSession::transfer_complete
pub fn forward_frame<D, F, const N: usize>(
    display: &mut D,
    geometry: &FrameGeometry,
    buffer: &FrameBuffer<N>,
    scratch: &mut [u8],
    frame_complete: F,
) -> Result<PreviewOutcome, PreviewError<D::Error>>
where
    D: DisplaySurface,
    F: FnOnce() -> bool,
{
    if geometry.frame_bytes() != N {
        return Err(PreviewError::GeometryMismatch {
            geometry_bytes: geometry.frame_bytes(),
            buffer_bytes: N,
        });
    }
    if scratch.len() < N {
        return Err(PreviewError::ScratchTooSmall {
            needed: N,
            available: scratch.len(),
        });
    }

    let snapshot = buffer.snapshot();
    if !frame_complete() {
        return Ok(PreviewOutcome::SkippedTorn);
    }
    let frame = &mut scratch[..N];
    snapshot.copy_to(frame);
    if !snapshot.is_consistent() {
        return Ok(PreviewOutcome::SkippedTorn);
    }

    display.show(geometry, frame).map_err(PreviewError::Display)?;
    Ok(PreviewOutcome::Shown {
        epoch: snapshot.epoch(),
    })
}
