//! Engine claims
//!
//! Receiver engines and transfer channels are chip-wide singletons. A
//! session claims both before touching them so two sessions can never bind
//! the same physical engine.

use crate::error::CaptureError;

/// Highest engine index a claim set can track
pub const MAX_ENGINE_INDEX: u8 = 31;

/// Bitmask allocator for receiver engines and transfer channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EngineClaims {
    /// Bitmask of claimed receiver engines
    receivers: u32,
    /// Bitmask of claimed transfer channels
    channels: u32,
}

impl EngineClaims {
    /// Create an empty claim set
    pub const fn new() -> Self {
        Self {
            receivers: 0,
            channels: 0,
        }
    }

    /// Claim a receiver engine and a transfer channel together
    ///
    /// Either both are claimed or neither is.
    pub fn claim(&mut self, receiver: u8, channel: u8) -> Result<(), CaptureError> {
        for index in [receiver, channel] {
            if index > MAX_ENGINE_INDEX {
                return Err(CaptureError::EngineIndexOutOfRange(index));
            }
        }
        if self.receivers & (1 << receiver) != 0 {
            return Err(CaptureError::ReceiverClaimed(receiver));
        }
        if self.channels & (1 << channel) != 0 {
            return Err(CaptureError::ChannelClaimed(channel));
        }
        self.receivers |= 1 << receiver;
        self.channels |= 1 << channel;
        Ok(())
    }

    /// Release a receiver engine and a transfer channel
    pub fn release(&mut self, receiver: u8, channel: u8) {
        if receiver <= MAX_ENGINE_INDEX {
            self.receivers &= !(1 << receiver);
        }
        if channel <= MAX_ENGINE_INDEX {
            self.channels &= !(1 << channel);
        }
    }

    /// Check if a receiver engine is claimed
    pub fn is_receiver_claimed(&self, receiver: u8) -> bool {
        receiver <= MAX_ENGINE_INDEX && self.receivers & (1 << receiver) != 0
    }

    /// Check if a transfer channel is claimed
    pub fn is_channel_claimed(&self, channel: u8) -> bool {
        channel <= MAX_ENGINE_INDEX && self.channels & (1 << channel) != 0
    }
}
