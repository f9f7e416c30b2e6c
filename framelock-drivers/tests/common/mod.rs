//! Mock engines and register bus shared by the driver tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::vec::Vec;

use framelock_core::claims::EngineClaims;
use framelock_core::config::PinAssignment;
use framelock_core::program::Microprogram;
use framelock_core::session::{CaptureEngines, CaptureSession};
use framelock_core::traits::{EngineError, FrameEdge, ReceiverEngine, TransferEngine};
use framelock_core::transfer::{TransferPlan, TransferSource};
use framelock_core::buffer::FrameBuffer;
use framelock_hal::RegisterBus;

/// Mock hardware state
#[derive(Default)]
pub struct Hw {
    pub queue: usize,
    pub planned: u32,
    pub remaining: u32,
    pub rx_active: bool,
    pub tx_active: bool,
    pub registered: bool,
    pub restarts: usize,
    pub destination_resets: usize,
}

pub type Shared = Rc<RefCell<Hw>>;

pub struct MockRx(pub Shared);
pub struct MockTx(pub Shared);
pub struct MockEdge(pub Shared);

impl ReceiverEngine for MockRx {
    fn engine_index(&self) -> u8 {
        0
    }

    fn configure(&mut self, _program: &Microprogram, _data_base_pin: u8) -> Result<(), EngineError> {
        Ok(())
    }

    fn set_active(&mut self, active: bool) {
        self.0.borrow_mut().rx_active = active;
    }

    fn is_active(&self) -> bool {
        self.0.borrow().rx_active
    }

    fn restart(&mut self) {
        self.0.borrow_mut().restarts += 1;
    }

    fn queue_depth(&mut self) -> usize {
        self.0.borrow().queue
    }

    fn dequeue_one(&mut self) -> Option<u32> {
        let mut hw = self.0.borrow_mut();
        hw.queue = hw.queue.checked_sub(1)?;
        Some(0)
    }

    fn transfer_source(&self) -> TransferSource {
        TransferSource {
            address: 0x5020_0020,
            dreq: 4,
        }
    }
}

impl TransferEngine for MockTx {
    fn channel(&self) -> u8 {
        0
    }

    fn arm(
        &mut self,
        _source: TransferSource,
        _destination: u32,
        plan: &TransferPlan,
    ) -> Result<(), EngineError> {
        self.0.borrow_mut().planned = plan.count();
        Ok(())
    }

    fn set_active(&mut self, active: bool) {
        let mut hw = self.0.borrow_mut();
        if active {
            hw.remaining = hw.planned;
        }
        hw.tx_active = active;
    }

    fn is_active(&self) -> bool {
        self.0.borrow().tx_active
    }

    fn set_destination(&mut self, _address: u32) {
        self.0.borrow_mut().destination_resets += 1;
    }

    fn remaining(&self) -> u32 {
        self.0.borrow().remaining
    }
}

impl FrameEdge for MockEdge {
    fn register(&mut self) {
        self.0.borrow_mut().registered = true;
    }

    fn unregister(&mut self) {
        self.0.borrow_mut().registered = false;
    }

    fn is_registered(&self) -> bool {
        self.0.borrow().registered
    }
}

pub type MockSession<'d, const N: usize> = CaptureSession<'d, MockRx, MockTx, MockEdge, N>;

/// Inactive session on `pins` capturing into `buffer`
pub fn session<'d, const N: usize>(
    hw: &Shared,
    pins: PinAssignment,
    buffer: &'d FrameBuffer<N>,
) -> MockSession<'d, N> {
    let mut claims = EngineClaims::new();
    let engines = CaptureEngines {
        receiver: MockRx(hw.clone()),
        transfer: MockTx(hw.clone()),
        edge: MockEdge(hw.clone()),
    };
    CaptureSession::new(pins, N, true, engines, buffer, &mut claims).unwrap()
}

/// Stand in for the transfer engine writing a whole frame
pub fn fill<const N: usize>(buffer: &FrameBuffer<N>, value: u8) {
    for i in 0..N {
        unsafe { buffer.as_ptr().add(i).write_volatile(value) };
    }
}

/// Register bus backed by a map, recording every write
#[derive(Default)]
pub struct MockRegisters {
    pub registers: BTreeMap<u16, u8>,
    pub writes: Vec<(u16, u8)>,
    pub offline: bool,
}

impl MockRegisters {
    pub fn with_chip_id(register: u16, id: u16) -> Self {
        let mut regs = Self::default();
        let [hi, lo] = id.to_be_bytes();
        regs.registers.insert(register, hi);
        regs.registers.insert(register + 1, lo);
        regs
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offline;

impl RegisterBus for MockRegisters {
    type Error = Offline;

    fn read(&mut self, register: u16, buf: &mut [u8]) -> Result<(), Offline> {
        if self.offline {
            return Err(Offline);
        }
        for (i, b) in buf.iter_mut().enumerate() {
            *b = self
                .registers
                .get(&(register + i as u16))
                .copied()
                .unwrap_or(0);
        }
        Ok(())
    }

    fn write(&mut self, register: u16, data: &[u8]) -> Result<(), Offline> {
        if self.offline {
            return Err(Offline);
        }
        for (i, b) in data.iter().enumerate() {
            let reg = register + i as u16;
            self.registers.insert(reg, *b);
            self.writes.push((reg, *b));
        }
        Ok(())
    }
}
