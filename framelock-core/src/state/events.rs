//! Events that trigger state transitions

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Receiver enabled and edge handler registered
    Activate,
    /// Frame-valid edge observed, resync started
    FrameEdge,
    /// Transfer engine re-enabled at the buffer base
    ResyncComplete,
    /// Engines disabled and edge handler unregistered
    Deactivate,
}
