//! Frame-boundary edge traits

use crate::session::ResyncOutcome;

/// Gate for the frame-valid edge interrupt
///
/// Registering arms delivery of edges to the session's [`EdgeHandler`];
/// unregistering stops it. Both are idempotent.
pub trait FrameEdge {
    /// Start delivering edges
    fn register(&mut self);

    /// Stop delivering edges
    fn unregister(&mut self);

    /// Whether edges are being delivered
    fn is_registered(&self) -> bool;
}

/// Receiver of frame-boundary edges, invoked from interrupt context
pub trait EdgeHandler {
    /// Handle one frame-boundary edge
    fn on_frame_edge(&mut self) -> ResyncOutcome;
}
