//! PIO-based parallel receiver
//!
//! One PIO state machine samples the DVP data bus. The patched sampling
//! loop waits on HSYNC and PCLK by absolute GPIO number, so only the data
//! bus base has to be routed through the state machine's pin config.
//!
//! Shift configuration:
//! - Shift left, so the first sample ends up in the most significant bits
//! - Autopush at 32 bits, one RX FIFO word per 4 bytes (or 32 serial bits)
//! - RX-only FIFO join, 8 words of slack between the sampler and the DMA

use embassy_rp::gpio::Input;
use embassy_rp::pac;
use embassy_rp::peripherals::{PIO0, PIO1};
use embassy_rp::pio::{
    Common, Config, FifoJoin, Instance, LoadedProgram, ShiftConfig, ShiftDirection, StateMachine,
};
use heapless::Vec;

use framelock_core::program::{Microprogram, TEMPLATE};
use framelock_core::traits::{EngineError, ReceiverEngine};
use framelock_core::transfer::{pio_rx_dreq, TransferSource};

/// State machines per PIO block
pub const SM_PER_BLOCK: u8 = 4;

/// RX FIFO depth with the TX FIFO joined in
pub const RX_FIFO_DEPTH: usize = 8;

/// A PIO block identified by its peripheral type
///
/// The block number feeds both the pin control registers and the DMA
/// request number, so it comes from the type rather than from the caller.
pub trait PioBlock: Instance {
    /// Block number, 0 for PIO0 and 1 for PIO1
    const BLOCK: u8;

    /// The block's registers
    fn regs() -> pac::pio::Pio;
}

impl PioBlock for PIO0 {
    const BLOCK: u8 = 0;

    fn regs() -> pac::pio::Pio {
        pac::PIO0
    }
}

impl PioBlock for PIO1 {
    const BLOCK: u8 = 1;

    fn regs() -> pac::pio::Pio {
        pac::PIO1
    }
}

/// PIO state machine sampling a DVP data bus
pub struct PioReceiver<'d, PIO: PioBlock, const SM: usize> {
    common: Common<'d, PIO>,
    sm: StateMachine<'d, PIO, SM>,
    /// Data bus inputs, D0 first; held so nothing else drives them
    data: Vec<Input<'d>, 8>,
    data_base: u8,
    loaded: Option<LoadedProgram<'d, PIO>>,
}

impl<'d, PIO: PioBlock, const SM: usize> PioReceiver<'d, PIO, SM> {
    /// Create an unconfigured receiver
    ///
    /// # Arguments
    /// * `common` - PIO common resources (instruction memory)
    /// * `sm` - State machine to sample with
    /// * `data_base` - GPIO number of D0
    /// * `data` - Data bus inputs, D0 first
    pub fn new(
        common: Common<'d, PIO>,
        mut sm: StateMachine<'d, PIO, SM>,
        data_base: u8,
        data: Vec<Input<'d>, 8>,
    ) -> Self {
        sm.set_enable(false);
        Self {
            common,
            sm,
            data,
            data_base,
            loaded: None,
        }
    }

    /// Number of data bus inputs held
    pub fn data_width(&self) -> usize {
        self.data.len()
    }
}

impl<'d, PIO: PioBlock, const SM: usize> ReceiverEngine for PioReceiver<'d, PIO, SM> {
    fn engine_index(&self) -> u8 {
        PIO::BLOCK * SM_PER_BLOCK + SM as u8
    }

    fn configure(&mut self, program: &Microprogram, data_base_pin: u8) -> Result<(), EngineError> {
        if self.sm.is_enabled() {
            return Err(EngineError::Busy);
        }
        if data_base_pin != self.data_base {
            return Err(EngineError::PinMismatch {
                expected: data_base_pin,
                actual: self.data_base,
            });
        }

        // Assemble for wrap and side-set settings, then drop the patched
        // words in; the assembler output is the unpatched template
        let mut prg = pio::pio_asm!(
            ".wrap_target",
            "wait 1 gpio 0", // HSYNC
            "wait 1 gpio 0", // PCLK high
            "in pins, 32",   // data width
            "wait 0 gpio 0", // PCLK low
            ".wrap"
        );
        debug_assert_eq!(prg.program.code.as_slice(), &TEMPLATE[..]);
        for (slot, word) in prg.program.code.iter_mut().zip(program.words()) {
            *slot = *word;
        }

        if let Some(old) = self.loaded.take() {
            // SAFETY: the state machine is disabled and is the only user
            // of this program
            unsafe { self.common.free_instr(old.used_memory) };
        }
        let loaded = self
            .common
            .try_load_program(&prg.program)
            .map_err(|_| EngineError::ProgramSpace)?;

        let mut cfg = Config::default();
        cfg.use_program(&loaded, &[]);
        cfg.shift_in = ShiftConfig {
            threshold: 32,
            direction: ShiftDirection::Left,
            auto_fill: true,
        };
        cfg.fifo_join = FifoJoin::RxOnly;
        self.sm.set_config(&cfg);

        // IN_BASE is set directly so data pins never leave the GPIO function
        PIO::regs()
            .sm(SM)
            .pinctrl()
            .modify(|w| w.set_in_base(self.data_base));

        self.sm.clear_fifos();
        self.loaded = Some(loaded);
        Ok(())
    }

    fn set_active(&mut self, active: bool) {
        self.sm.set_enable(active);
    }

    fn is_active(&self) -> bool {
        self.sm.is_enabled()
    }

    fn restart(&mut self) {
        self.sm.restart();
        self.sm.clkdiv_restart();
    }

    fn queue_depth(&mut self) -> usize {
        self.sm.rx().level() as usize
    }

    fn dequeue_one(&mut self) -> Option<u32> {
        self.sm.rx().try_pull()
    }

    fn transfer_source(&self) -> TransferSource {
        TransferSource {
            address: PIO::regs().rxf(SM).as_ptr() as u32,
            dreq: pio_rx_dreq(PIO::BLOCK, SM as u8),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_from_peripheral_type() {
        assert_eq!(<PIO0 as PioBlock>::BLOCK, 0);
        assert_eq!(<PIO1 as PioBlock>::BLOCK, 1);
        // PIO1 SM2 RX requests DREQ 14
        assert_eq!(pio_rx_dreq(<PIO1 as PioBlock>::BLOCK, 2), 14);
    }
}
