//! State machine definition

use super::events::Event;

/// Capture session states
///
/// ```text
/// Inactive ──Activate──► Armed ──FrameEdge──► Resyncing ──ResyncComplete──► Capturing
///    ▲                                           ▲                             │
///    │                                           └─────────FrameEdge───────────┘
///    └──────────────── Deactivate (from any state) ────────────────────────────
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// No edge handler registered, both engines disabled
    #[default]
    Inactive,
    /// Receiver running, waiting for the first frame edge
    Armed,
    /// Transfer engine filling the frame buffer
    Capturing,
    /// Inside the resync sequence
    Resyncing,
}

impl State {
    /// Check if the session holds its engines running
    pub fn is_active(&self) -> bool {
        !matches!(self, State::Inactive)
    }

    /// Check if a frame edge should start a resync
    pub fn accepts_edges(&self) -> bool {
        matches!(self, State::Armed | State::Capturing)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use State::*;

        match (self, event) {
            (Inactive, Activate) => Armed,

            // The first edge resyncs exactly like every later one
            (Armed, FrameEdge) => Resyncing,
            (Capturing, FrameEdge) => Resyncing,

            (Resyncing, ResyncComplete) => Capturing,

            (_, Deactivate) => Inactive,

            // Default: stay in current state
            _ => self,
        }
    }
}
