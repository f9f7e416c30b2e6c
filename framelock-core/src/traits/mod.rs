//! Hardware abstraction traits
//!
//! These traits define the interface between the capture logic and the
//! chip-specific engines that sample, move and signal frame data.

pub mod display;
pub mod edge;
pub mod receiver;
pub mod transfer;

pub use display::DisplaySurface;
pub use edge::{EdgeHandler, FrameEdge};
pub use receiver::ReceiverEngine;
pub use transfer::TransferEngine;

/// Errors reported by capture engines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EngineError {
    /// Engine must be disabled before it is reconfigured
    Busy,
    /// No room left in instruction memory
    ProgramSpace,
    /// Data pins handed to the engine do not start at the requested pin
    PinMismatch {
        /// Pin the program expects as D0
        expected: u8,
        /// Pin the engine owns as D0
        actual: u8,
    },
    /// Engine was used before it was configured
    NotConfigured,
}
