//! Transfer engine trait

use super::EngineError;
use crate::transfer::{TransferPlan, TransferSource};

/// A memory transfer engine draining the receive queue into the frame buffer
///
/// While active it moves one unit per request until the planned count is
/// reached, then idles. It never restarts on its own.
pub trait TransferEngine {
    /// Physical channel number
    fn channel(&self) -> u8;

    /// Program source, destination, count, unit and byte order
    ///
    /// Returns [`EngineError::Busy`] if the engine is active.
    fn arm(
        &mut self,
        source: TransferSource,
        destination: u32,
        plan: &TransferPlan,
    ) -> Result<(), EngineError>;

    /// Start or stop transferring
    ///
    /// Stopping abandons the frame in flight, even one short of its count,
    /// and returns once the engine is idle. Enabling always starts a fresh
    /// transfer of the planned count; it never resumes a stopped one.
    fn set_active(&mut self, active: bool);

    /// Whether the engine is enabled
    fn is_active(&self) -> bool;

    /// Move the write cursor without touching count, request line or unit
    fn set_destination(&mut self, address: u32);

    /// Transfers left in the current frame, zero once a frame completed
    fn remaining(&self) -> u32;
}
