//! Transfer planning
//!
//! The transfer engine drains the receive queue into the frame buffer a
//! fixed number of units per frame. The count must match the frame exactly:
//! one unit short truncates every frame, one unit over writes past the
//! buffer.

use crate::error::CaptureError;

/// Size of one transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferUnit {
    /// 1 byte per transfer
    Byte,
    /// 2 bytes per transfer
    HalfWord,
    /// 4 bytes per transfer
    Word,
}

impl TransferUnit {
    /// Bytes moved per transfer
    pub fn bytes(self) -> usize {
        match self {
            TransferUnit::Byte => 1,
            TransferUnit::HalfWord => 2,
            TransferUnit::Word => 4,
        }
    }

    /// DMA `DATA_SIZE` encoding (0 = byte, 1 = half word, 2 = word)
    pub fn data_size(self) -> u8 {
        match self {
            TransferUnit::Byte => 0,
            TransferUnit::HalfWord => 1,
            TransferUnit::Word => 2,
        }
    }
}

/// The receiver autopushes 32-bit words, so capture always moves words
pub const CAPTURE_UNIT: TransferUnit = TransferUnit::Word;

/// Where the transfer engine reads from and what paces it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransferSource {
    /// Address of the receive queue register
    pub address: u32,
    /// Transfer request line raised while the queue holds data
    pub dreq: u8,
}

/// Transfer request line of a PIO state machine's RX FIFO
///
/// Each PIO block owns eight request lines, TX FIFOs first.
pub fn pio_rx_dreq(block: u8, state_machine: u8) -> u8 {
    (block << 3) + state_machine + 4
}

/// Everything the transfer engine needs for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransferPlan {
    unit: TransferUnit,
    count: u32,
    byte_swap: bool,
}

impl TransferPlan {
    /// Plan the transfer of one frame
    ///
    /// Rejects empty frames and frames that are not a whole number of units.
    pub fn for_frame(
        frame_byte_count: usize,
        unit: TransferUnit,
        byte_swap: bool,
    ) -> Result<Self, CaptureError> {
        if frame_byte_count == 0 {
            return Err(CaptureError::EmptyFrame);
        }
        if frame_byte_count % unit.bytes() != 0 {
            return Err(CaptureError::FrameNotUnitMultiple {
                frame_bytes: frame_byte_count as u32,
                unit_bytes: unit.bytes() as u8,
            });
        }
        let count = u32::try_from(frame_byte_count / unit.bytes())
            .map_err(|_| CaptureError::FrameTooLarge)?;

        Ok(Self {
            unit,
            count,
            byte_swap,
        })
    }

    /// Size of each transfer
    pub fn unit(&self) -> TransferUnit {
        self.unit
    }

    /// Transfers per frame
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Bytes per frame
    pub fn frame_bytes(&self) -> usize {
        self.count as usize * self.unit.bytes()
    }

    /// Swap bytes within each transfer
    pub fn byte_swap(&self) -> bool {
        self.byte_swap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_hm01b0_word_count() {
        let plan = TransferPlan::for_frame(244 * 324, CAPTURE_UNIT, true).unwrap();
        assert_eq!(plan.count(), 19_764);
        assert_eq!(plan.frame_bytes(), 79_056);
        assert!(plan.byte_swap());
    }

    #[test]
    fn test_non_multiple_rejected() {
        assert_eq!(
            TransferPlan::for_frame(79_057, CAPTURE_UNIT, false),
            Err(CaptureError::FrameNotUnitMultiple {
                frame_bytes: 79_057,
                unit_bytes: 4
            })
        );
        assert_eq!(
            TransferPlan::for_frame(0, CAPTURE_UNIT, false),
            Err(CaptureError::EmptyFrame)
        );
    }

    #[test]
    fn test_data_size_encoding() {
        assert_eq!(TransferUnit::Byte.data_size(), 0);
        assert_eq!(TransferUnit::HalfWord.data_size(), 1);
        assert_eq!(TransferUnit::Word.data_size(), 2);
    }

    #[test]
    fn test_pio_rx_dreq() {
        // PIO0 SM0 RX is DREQ 4, PIO1 SM3 RX is DREQ 15
        assert_eq!(pio_rx_dreq(0, 0), 4);
        assert_eq!(pio_rx_dreq(0, 3), 7);
        assert_eq!(pio_rx_dreq(1, 0), 12);
        assert_eq!(pio_rx_dreq(1, 3), 15);
    }

    proptest! {
        #[test]
        fn prop_count_is_exact(words in 1u32..200_000) {
            let bytes = words as usize * 4;
            let plan = TransferPlan::for_frame(bytes, CAPTURE_UNIT, false).unwrap();
            prop_assert_eq!(plan.count(), words);
            prop_assert_eq!(plan.frame_bytes(), bytes);
        }

        #[test]
        fn prop_remainder_rejected(words in 0u32..200_000, extra in 1usize..4) {
            let bytes = words as usize * 4 + extra;
            prop_assert!(TransferPlan::for_frame(bytes, CAPTURE_UNIT, false).is_err());
        }
    }
}
