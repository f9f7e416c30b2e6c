//! Preview task
//!
//! Periodically forwards the current frame to the log surface.

use defmt::*;
use embassy_time::{Duration, Ticker};

use framelock_drivers::preview::{forward_frame, PreviewOutcome};

use crate::camera::{with_camera, FRAME_BUFFER, FRAME_BYTES, GEOMETRY};
use crate::display::LogSurface;

/// Preview interval in seconds
pub const PREVIEW_INTERVAL_S: u64 = 2;

#[embassy_executor::task]
pub async fn preview_task(scratch: &'static mut [u8; FRAME_BYTES]) {
    info!("Preview task started");

    let mut surface = LogSurface::default();
    let mut ticker = Ticker::every(Duration::from_secs(PREVIEW_INTERVAL_S));
    let mut torn: u32 = 0;

    loop {
        ticker.next().await;

        let frame_complete =
            || with_camera(|camera| camera.session().transfer_complete()).unwrap_or(false);
        match forward_frame(&mut surface, &GEOMETRY, &FRAME_BUFFER, scratch, frame_complete) {
            Ok(PreviewOutcome::Shown { epoch }) => {
                trace!("Previewed epoch {} ({} shown)", epoch, surface.shown());
            }
            Ok(PreviewOutcome::SkippedTorn) => {
                torn = torn.wrapping_add(1);
                debug!("Preview skipped a frame in flight ({} so far)", torn);
            }
            Err(e) => error!("Preview failed: {:?}", e),
        }
    }
}
