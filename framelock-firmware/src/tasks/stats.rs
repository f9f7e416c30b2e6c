//! Capture statistics task
//!
//! Samples the session's health once per interval and logs frame rate,
//! partial frames and drain problems. Also the only place a wedged sensor
//! or a dead VSYNC line gets reported.

use defmt::*;
use embassy_time::{Duration, Ticker};

use framelock_core::health::{CaptureHealth, HealthStatus};
use framelock_core::state::State;

use crate::camera::with_camera;

/// Statistics interval in seconds
pub const STATS_INTERVAL_S: u64 = 1;

#[embassy_executor::task]
pub async fn stats_task() {
    info!("Stats task started");

    let mut ticker = Ticker::every(Duration::from_secs(STATS_INTERVAL_S));
    let mut last = CaptureHealth::default();
    let mut last_status = HealthStatus::Healthy;

    loop {
        ticker.next().await;

        let Some((health, state)) =
            with_camera(|camera| (*camera.session().health(), camera.session().state()))
        else {
            continue;
        };

        let edges = health.edges().wrapping_sub(last.edges());
        let complete = health.complete_frames().wrapping_sub(last.complete_frames());
        let partial = health.partial_frames().wrapping_sub(last.partial_frames());
        let degraded = health.degraded_drains().wrapping_sub(last.degraded_drains());

        if edges == 0 && state != State::Inactive {
            warn!("No VSYNC edge in {}s (state {:?})", STATS_INTERVAL_S, state);
        }
        if partial > 0 {
            warn!("{} partial frame(s)", partial);
        }
        if degraded > 0 {
            warn!("{} resync(s) hit the drain limit", degraded);
        }

        let status = health.status();
        if status != last_status {
            match status {
                HealthStatus::Healthy => info!("Capture healthy"),
                HealthStatus::Recovering => warn!("Capture recovering"),
                HealthStatus::Wedged => error!(
                    "Sensor wedged: {} edges without a complete frame",
                    health.frames_since_complete()
                ),
            }
            last_status = status;
        }

        trace!(
            "{} fps, {} complete, state {:?}",
            edges / STATS_INTERVAL_S as u32,
            complete,
            state
        );
        last = health;
    }
}
