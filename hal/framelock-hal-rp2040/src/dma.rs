//! Raw DMA channel transfer engine
//!
//! The embassy DMA futures own a transfer for its whole duration and cannot
//! be paused, rearmed and retriggered from a GPIO interrupt, so the channel
//! is driven through its registers directly.
//!
//! Register use:
//! - `READ_ADDR`: PIO RX FIFO, no increment
//! - `WRITE_ADDR`: frame buffer cursor, rewritten on every resync
//! - `TRANS_COUNT`: reload value, copied into the live counter on trigger
//! - `AL1_CTRL`: clear EN without triggering
//! - `CHAN_ABORT`: end the frame in flight
//! - `CTRL_TRIG`: enable and trigger
//!
//! Clearing EN alone only pauses a channel: BUSY stays high and the next
//! trigger resumes the old transfer with its leftover count. Stopping
//! therefore aborts and waits for BUSY to drop, so the trigger on restart
//! always starts a fresh transfer of the planned count.

use embassy_rp::dma::{AnyChannel, Channel};
use embassy_rp::pac;
use embassy_rp::pac::dma::vals::{DataSize, TreqSel};
use embassy_rp::Peri;

use framelock_core::traits::{EngineError, TransferEngine};
use framelock_core::transfer::{TransferPlan, TransferSource, TransferUnit};

/// Control settings captured at arm time
#[derive(Debug, Clone, Copy)]
struct Armed {
    dreq: u8,
    count: u32,
    unit: TransferUnit,
    byte_swap: bool,
}

/// One DMA channel moving PIO RX words into the frame buffer
pub struct DmaTransfer<'d> {
    _channel: Peri<'d, AnyChannel>,
    number: u8,
    armed: Option<Armed>,
}

impl<'d> DmaTransfer<'d> {
    /// Take ownership of a DMA channel
    pub fn new(channel: Peri<'d, impl Channel>) -> Self {
        let channel: Peri<'d, AnyChannel> = channel.into();
        let number = channel.number();
        let this = Self {
            _channel: channel,
            number,
            armed: None,
        };
        this.stop();
        this
    }

    /// Disable and abort the channel, then wait until it is idle
    fn stop(&self) {
        let regs = self.regs();
        // EN must be clear before the abort or the channel may restart
        regs.al1_ctrl().modify(|w| w.set_en(false));
        pac::DMA
            .chan_abort()
            .modify(|m| m.set_chan_abort(1 << self.number));
        while regs.ctrl_trig().read().busy() {}
    }

    fn regs(&self) -> pac::dma::Channel {
        pac::DMA.ch(self.number as usize)
    }
}

fn data_size(unit: TransferUnit) -> DataSize {
    match unit {
        TransferUnit::Byte => DataSize::SIZE_BYTE,
        TransferUnit::HalfWord => DataSize::SIZE_HALFWORD,
        TransferUnit::Word => DataSize::SIZE_WORD,
    }
}

impl<'d> TransferEngine for DmaTransfer<'d> {
    fn channel(&self) -> u8 {
        self.number
    }

    fn arm(
        &mut self,
        source: TransferSource,
        destination: u32,
        plan: &TransferPlan,
    ) -> Result<(), EngineError> {
        if self.is_active() {
            return Err(EngineError::Busy);
        }

        let armed = Armed {
            dreq: source.dreq,
            count: plan.count(),
            unit: plan.unit(),
            byte_swap: plan.byte_swap(),
        };
        let regs = self.regs();
        regs.read_addr().write_value(source.address);
        regs.write_addr().write_value(destination);
        regs.trans_count().write_value(plan.count());
        regs.al1_ctrl().write(|w| {
            w.set_treq_sel(TreqSel::from(armed.dreq));
            w.set_data_size(data_size(armed.unit));
            w.set_incr_read(false);
            w.set_incr_write(true);
            // Chaining to itself disables chaining
            w.set_chain_to(self.number);
            w.set_bswap(armed.byte_swap);
            w.set_en(false);
        });

        self.armed = Some(armed);
        Ok(())
    }

    fn set_active(&mut self, active: bool) {
        if !active {
            self.stop();
            return;
        }

        let Some(armed) = self.armed else {
            return;
        };
        let regs = self.regs();
        regs.trans_count().write_value(armed.count);
        regs.ctrl_trig().write(|w| {
            w.set_treq_sel(TreqSel::from(armed.dreq));
            w.set_data_size(data_size(armed.unit));
            w.set_incr_read(false);
            w.set_incr_write(true);
            w.set_chain_to(self.number);
            w.set_bswap(armed.byte_swap);
            w.set_en(true);
        });
    }

    fn is_active(&self) -> bool {
        self.regs().ctrl_trig().read().en()
    }

    fn set_destination(&mut self, address: u32) {
        self.regs().write_addr().write_value(address);
    }

    fn remaining(&self) -> u32 {
        self.regs().trans_count().read()
    }
}
