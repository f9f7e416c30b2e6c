//! Capture errors

use crate::config::ConfigError;
use crate::program::ProgramError;
use crate::traits::EngineError;

/// Errors raised while building or driving a capture session
///
/// Every variant except `Engine` is raised before any hardware is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CaptureError {
    /// Invalid pin assignment or geometry
    Config(ConfigError),
    /// Microprogram could not be patched
    Program(ProgramError),
    /// Frame has zero bytes
    EmptyFrame,
    /// Frame is not a whole number of transfer units
    FrameNotUnitMultiple {
        /// Requested frame size
        frame_bytes: u32,
        /// Transfer unit size
        unit_bytes: u8,
    },
    /// Frame needs more transfers than the engine can count
    FrameTooLarge,
    /// Frame size does not match the buffer it is captured into
    BufferSizeMismatch {
        /// Buffer capacity
        expected: usize,
        /// Requested frame size
        actual: usize,
    },
    /// Receiver engine already bound to another session
    ReceiverClaimed(u8),
    /// Transfer channel already bound to another session
    ChannelClaimed(u8),
    /// Engine index too large for the claim set
    EngineIndexOutOfRange(u8),
    /// Engine refused an operation
    Engine(EngineError),
}

impl From<ConfigError> for CaptureError {
    fn from(e: ConfigError) -> Self {
        CaptureError::Config(e)
    }
}

impl From<ProgramError> for CaptureError {
    fn from(e: ProgramError) -> Self {
        CaptureError::Program(e)
    }
}

impl From<EngineError> for CaptureError {
    fn from(e: EngineError) -> Self {
        CaptureError::Engine(e)
    }
}
