//! Capture health
//!
//! Tracks how resyncs went so a layer above the interrupt path can spot a
//! sensor that stopped producing full frames. Nothing here is fatal; the
//! capture engine self-heals on every edge whether or not anyone reads this.

/// Partial frames in a row before the sensor is considered wedged
pub const DEFAULT_WEDGE_LIMIT: u32 = 30;

/// How the frame that ended at a resync went
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameCompletion {
    /// First edge after activation, no frame was in flight
    First,
    /// The transfer engine reached its full count
    Complete,
    /// The frame ended early
    Partial {
        /// Transfers that never happened
        remaining: u32,
    },
}

/// Overall capture condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HealthStatus {
    /// The last frame completed
    Healthy,
    /// Recent frames were partial, within the wedge limit
    Recovering,
    /// Too many partial frames in a row
    Wedged,
}

/// Resync statistics for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CaptureHealth {
    edges: u32,
    complete: u32,
    partial: u32,
    degraded_drains: u32,
    frames_since_complete: u32,
    wedge_limit: u32,
}

impl Default for CaptureHealth {
    fn default() -> Self {
        Self::new(DEFAULT_WEDGE_LIMIT)
    }
}

impl CaptureHealth {
    /// Create a tracker that reports `Wedged` after `wedge_limit` partial frames
    pub const fn new(wedge_limit: u32) -> Self {
        Self {
            edges: 0,
            complete: 0,
            partial: 0,
            degraded_drains: 0,
            frames_since_complete: 0,
            wedge_limit,
        }
    }

    /// Record one resync
    pub fn record(&mut self, completion: FrameCompletion, drain_degraded: bool) {
        self.edges = self.edges.wrapping_add(1);
        if drain_degraded {
            self.degraded_drains = self.degraded_drains.wrapping_add(1);
        }

        match completion {
            FrameCompletion::First => {}
            FrameCompletion::Complete => {
                self.complete = self.complete.wrapping_add(1);
                self.frames_since_complete = 0;
            }
            FrameCompletion::Partial { .. } => {
                self.partial = self.partial.wrapping_add(1);
                self.frames_since_complete = self.frames_since_complete.saturating_add(1);
            }
        }
    }

    /// Current condition
    pub fn status(&self) -> HealthStatus {
        if self.frames_since_complete == 0 {
            HealthStatus::Healthy
        } else if self.frames_since_complete <= self.wedge_limit {
            HealthStatus::Recovering
        } else {
            HealthStatus::Wedged
        }
    }

    /// Frame edges seen
    pub fn edges(&self) -> u32 {
        self.edges
    }

    /// Frames that reached the full transfer count
    pub fn complete_frames(&self) -> u32 {
        self.complete
    }

    /// Frames cut short by the next edge
    pub fn partial_frames(&self) -> u32 {
        self.partial
    }

    /// Resyncs whose queue drain hit the poll limit
    pub fn degraded_drains(&self) -> u32 {
        self.degraded_drains
    }

    /// Partial frames since the last complete one
    pub fn frames_since_complete(&self) -> u32 {
        self.frames_since_complete
    }

    /// Clear all counters, keeping the wedge limit
    pub fn reset(&mut self) {
        *self = Self::new(self.wedge_limit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_healthy() {
        let health = CaptureHealth::default();
        assert_eq!(health.status(), HealthStatus::Healthy);
        assert_eq!(health.edges(), 0);
    }

    #[test]
    fn test_first_edge_is_neutral() {
        let mut health = CaptureHealth::default();
        health.record(FrameCompletion::First, false);
        assert_eq!(health.edges(), 1);
        assert_eq!(health.complete_frames(), 0);
        assert_eq!(health.partial_frames(), 0);
        assert_eq!(health.status(), HealthStatus::Healthy);
    }

    #[test]
    fn test_wedge_after_limit() {
        let mut health = CaptureHealth::new(3);
        for _ in 0..3 {
            health.record(FrameCompletion::Partial { remaining: 10 }, false);
            assert_eq!(health.status(), HealthStatus::Recovering);
        }
        health.record(FrameCompletion::Partial { remaining: 10 }, false);
        assert_eq!(health.status(), HealthStatus::Wedged);

        health.record(FrameCompletion::Complete, false);
        assert_eq!(health.status(), HealthStatus::Healthy);
        assert_eq!(health.frames_since_complete(), 0);
    }

    #[test]
    fn test_degraded_drains_counted() {
        let mut health = CaptureHealth::default();
        health.record(FrameCompletion::Complete, true);
        health.record(FrameCompletion::Complete, false);
        assert_eq!(health.degraded_drains(), 1);
        assert_eq!(health.complete_frames(), 2);
    }

    #[test]
    fn test_reset_keeps_limit() {
        let mut health = CaptureHealth::new(1);
        health.record(FrameCompletion::Partial { remaining: 1 }, true);
        health.record(FrameCompletion::Partial { remaining: 1 }, true);
        health.reset();
        assert_eq!(health, CaptureHealth::new(1));
    }
}
