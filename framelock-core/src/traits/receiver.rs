//! Parallel receiver engine trait

use super::EngineError;
use crate::program::Microprogram;
use crate::transfer::TransferSource;

/// A programmable sampler that gates on line-valid and pixel clock and
/// pushes fixed-width words into a receive queue
///
/// Restarting the engine resets its shift state only. Words already in the
/// queue stay there until they are dequeued.
pub trait ReceiverEngine {
    /// Physical engine index, unique across the chip
    fn engine_index(&self) -> u8;

    /// Load a patched program and bind the data bus starting at `data_base_pin`
    ///
    /// The engine snapshots the program; it must be inactive.
    fn configure(&mut self, program: &Microprogram, data_base_pin: u8) -> Result<(), EngineError>;

    /// Start or stop sampling
    fn set_active(&mut self, active: bool);

    /// Whether sampling is running
    fn is_active(&self) -> bool;

    /// Reset the sampling phase without touching the receive queue
    fn restart(&mut self);

    /// Words waiting in the receive queue
    fn queue_depth(&mut self) -> usize;

    /// Discard one queued word, `None` if the queue is empty
    fn dequeue_one(&mut self) -> Option<u32>;

    /// Queue register address and request line for the transfer engine
    fn transfer_source(&self) -> TransferSource;
}
