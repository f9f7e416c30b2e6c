//! Capture session
//!
//! Owns one receiver engine, one transfer engine and the frame-edge gate
//! for a single sensor interface, and runs the resync sequence on every
//! frame-valid edge:
//!
//! ```text
//!  edge ─► 1. transfer off ─► 2. receiver restart ─► 3. drain queue
//!                                                         │
//!          5. transfer on ◄─ 4. destination = buffer base ◄┘
//! ```
//!
//! The receiver's restart resets its shift state but leaves queued words in
//! place. Any word left in the queue shifts the whole next frame by one
//! word, so step 3 runs until the queue is empty or the drain limit is hit.
//!
//! Edges are not queued. `on_frame_edge` takes `&mut self`, so whoever
//! delivers edges must serialize them; an edge that fires while a resync
//! is still running is lost, and the next edge realigns the frame.

use crate::buffer::FrameBuffer;
use crate::claims::EngineClaims;
use crate::config::PinAssignment;
use crate::error::CaptureError;
use crate::health::{CaptureHealth, FrameCompletion};
use crate::program::Microprogram;
use crate::state::{Event, State};
use crate::traits::{EdgeHandler, FrameEdge, ReceiverEngine, TransferEngine};
use crate::transfer::{TransferPlan, CAPTURE_UNIT};

/// Dequeues attempted per resync before the drain is reported as degraded
pub const DRAIN_POLL_LIMIT: usize = 256;

/// The engines a session owns for its lifetime
pub struct CaptureEngines<R, T, E> {
    /// Parallel receiver
    pub receiver: R,
    /// Receive queue to frame buffer transfer
    pub transfer: T,
    /// Frame-valid edge gate
    pub edge: E,
}

/// Result of one frame edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResyncOutcome {
    /// Session was not accepting edges
    Ignored,
    /// Queue drained and transfer restarted at the buffer base
    Resynced {
        /// Stale words discarded
        drained: usize,
        /// How the previous frame ended
        completion: FrameCompletion,
    },
    /// Queue still held words at the drain limit; the rest of the sequence
    /// ran anyway and the next edge realigns
    Degraded {
        /// Words discarded before giving up
        drained: usize,
        /// How the previous frame ended
        completion: FrameCompletion,
    },
}

/// One capture session per physical sensor interface
pub struct CaptureSession<'d, R, T, E, const N: usize> {
    receiver: R,
    transfer: T,
    edge: E,
    pins: PinAssignment,
    program: Microprogram,
    plan: TransferPlan,
    buffer: &'d FrameBuffer<N>,
    state: State,
    health: CaptureHealth,
    drain_limit: usize,
}

impl<'d, R, T, E, const N: usize> CaptureSession<'d, R, T, E, N>
where
    R: ReceiverEngine,
    T: TransferEngine,
    E: FrameEdge,
{
    /// Build a session and configure its engines
    ///
    /// Everything that can be checked without hardware is checked first:
    /// the transfer plan, the buffer size, the microprogram and the engine
    /// claims. Only then is the receiver loaded and the transfer armed. The
    /// session starts `Inactive`.
    pub fn new(
        pins: PinAssignment,
        frame_byte_count: usize,
        byte_swap: bool,
        engines: CaptureEngines<R, T, E>,
        buffer: &'d FrameBuffer<N>,
        claims: &mut EngineClaims,
    ) -> Result<Self, CaptureError> {
        let plan = TransferPlan::for_frame(frame_byte_count, CAPTURE_UNIT, byte_swap)?;
        if frame_byte_count != N {
            return Err(CaptureError::BufferSizeMismatch {
                expected: N,
                actual: frame_byte_count,
            });
        }
        let program = Microprogram::for_pins(&pins)?;

        let CaptureEngines {
            mut receiver,
            mut transfer,
            edge,
        } = engines;
        let receiver_index = receiver.engine_index();
        let channel = transfer.channel();
        claims.claim(receiver_index, channel)?;

        if let Err(e) = Self::configure(&mut receiver, &mut transfer, &pins, &program, &plan, buffer)
        {
            claims.release(receiver_index, channel);
            return Err(e);
        }

        Ok(Self {
            receiver,
            transfer,
            edge,
            pins,
            program,
            plan,
            buffer,
            state: State::Inactive,
            health: CaptureHealth::default(),
            drain_limit: DRAIN_POLL_LIMIT,
        })
    }

    fn configure(
        receiver: &mut R,
        transfer: &mut T,
        pins: &PinAssignment,
        program: &Microprogram,
        plan: &TransferPlan,
        buffer: &FrameBuffer<N>,
    ) -> Result<(), CaptureError> {
        // Neither engine may be reconfigured while running
        transfer.set_active(false);
        receiver.set_active(false);

        receiver.configure(program, pins.data_base())?;
        transfer.arm(receiver.transfer_source(), buffer.base_address(), plan)?;
        Ok(())
    }

    /// Override the per-resync drain limit
    pub fn with_drain_limit(mut self, limit: usize) -> Self {
        self.drain_limit = limit;
        self
    }

    /// Override the health tracker, e.g. to change the wedge limit
    pub fn with_health(mut self, health: CaptureHealth) -> Self {
        self.health = health;
        self
    }

    /// Start sampling and register for frame edges
    ///
    /// Does nothing if the session is already active. The transfer engine
    /// stays off until the first edge resyncs it.
    pub fn activate(&mut self) {
        if self.state.is_active() {
            return;
        }
        self.transfer.set_active(false);
        self.receiver.set_active(true);
        self.edge.register();
        self.state = self.state.transition(Event::Activate);
    }

    /// Stop both engines and unregister from frame edges
    ///
    /// Idempotent.
    pub fn deactivate(&mut self) {
        // No edge may re-enable the transfer engine once it is stopped
        self.edge.unregister();
        self.transfer.set_active(false);
        self.receiver.set_active(false);
        self.state = self.state.transition(Event::Deactivate);
    }

    /// Run the resync sequence for one frame-valid edge
    pub fn on_frame_edge(&mut self) -> ResyncOutcome {
        if !self.state.accepts_edges() {
            return ResyncOutcome::Ignored;
        }
        let previous = self.state;
        self.state = self.state.transition(Event::FrameEdge);
        let remaining = self.transfer.remaining();

        self.transfer.set_active(false);
        self.buffer.begin_resync();
        self.receiver.restart();
        let (drained, degraded) = self.drain_queue();
        self.transfer.set_destination(self.buffer.base_address());
        self.transfer.set_active(true);

        self.state = self.state.transition(Event::ResyncComplete);

        let completion = match (previous, remaining) {
            (State::Armed, _) => FrameCompletion::First,
            (_, 0) => FrameCompletion::Complete,
            (_, remaining) => FrameCompletion::Partial { remaining },
        };
        self.health.record(completion, degraded);

        if degraded {
            ResyncOutcome::Degraded {
                drained,
                completion,
            }
        } else {
            ResyncOutcome::Resynced {
                drained,
                completion,
            }
        }
    }

    /// Discard queued words; returns the count and whether the limit was hit
    fn drain_queue(&mut self) -> (usize, bool) {
        let mut drained = 0;
        while self.receiver.queue_depth() > 0 {
            if drained >= self.drain_limit {
                return (drained, true);
            }
            if self.receiver.dequeue_one().is_none() {
                break;
            }
            drained += 1;
        }
        (drained, false)
    }

    /// Check if the session is capturing or waiting for its first edge
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Current state
    pub fn state(&self) -> State {
        self.state
    }

    /// The capture destination
    pub fn frame_buffer(&self) -> &'d FrameBuffer<N> {
        self.buffer
    }

    /// Loaded microprogram
    pub fn program(&self) -> &Microprogram {
        &self.program
    }

    /// Transfer plan
    pub fn plan(&self) -> &TransferPlan {
        &self.plan
    }

    /// Pin assignment
    pub fn pins(&self) -> &PinAssignment {
        &self.pins
    }

    /// Resync statistics
    pub fn health(&self) -> &CaptureHealth {
        &self.health
    }

    /// Check if the frame in flight has reached its full transfer count
    pub fn transfer_complete(&self) -> bool {
        self.state == State::Capturing && self.transfer.remaining() == 0
    }

    /// Deactivate, release the engine claims and hand the engines back
    pub fn into_parts(mut self, claims: &mut EngineClaims) -> CaptureEngines<R, T, E> {
        self.deactivate();
        claims.release(self.receiver.engine_index(), self.transfer.channel());
        CaptureEngines {
            receiver: self.receiver,
            transfer: self.transfer,
            edge: self.edge,
        }
    }
}

impl<'d, R, T, E, const N: usize> EdgeHandler for CaptureSession<'d, R, T, E, N>
where
    R: ReceiverEngine,
    T: TransferEngine,
    E: FrameEdge,
{
    fn on_frame_edge(&mut self) -> ResyncOutcome {
        CaptureSession::on_frame_edge(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::health::HealthStatus;
    use crate::traits::EngineError;
    use crate::transfer::TransferSource;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::vec::Vec;

    const SOURCE: TransferSource = TransferSource {
        address: 0x5020_0020,
        dreq: 4,
    };

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Op {
        RxConfigure { data_base: u8 },
        RxActive(bool),
        RxRestart,
        RxDequeue,
        TxArm { destination: u32, count: u32, byte_swap: bool, dreq: u8 },
        TxActive(bool),
        TxDestination(u32),
        EdgeRegister,
        EdgeUnregister,
    }

    /// Shared view of the mock hardware
    #[derive(Default)]
    struct Hw {
        log: Vec<Op>,
        queue: usize,
        stuck_queue: bool,
        planned: u32,
        remaining: u32,
        rx_active: bool,
        tx_active: bool,
        registered: bool,
        loaded: Option<Microprogram>,
    }

    type Shared = Rc<RefCell<Hw>>;

    struct MockRx {
        hw: Shared,
        index: u8,
    }

    impl ReceiverEngine for MockRx {
        fn engine_index(&self) -> u8 {
            self.index
        }

        fn configure(&mut self, program: &Microprogram, data_base_pin: u8) -> Result<(), EngineError> {
            let mut hw = self.hw.borrow_mut();
            if hw.rx_active {
                return Err(EngineError::Busy);
            }
            hw.loaded = Some(*program);
            hw.log.push(Op::RxConfigure { data_base: data_base_pin });
            Ok(())
        }

        fn set_active(&mut self, active: bool) {
            let mut hw = self.hw.borrow_mut();
            hw.rx_active = active;
            hw.log.push(Op::RxActive(active));
        }

        fn is_active(&self) -> bool {
            self.hw.borrow().rx_active
        }

        fn restart(&mut self) {
            self.hw.borrow_mut().log.push(Op::RxRestart);
        }

        fn queue_depth(&mut self) -> usize {
            self.hw.borrow().queue
        }

        fn dequeue_one(&mut self) -> Option<u32> {
            let mut hw = self.hw.borrow_mut();
            if hw.queue == 0 {
                return None;
            }
            if !hw.stuck_queue {
                hw.queue -= 1;
            }
            hw.log.push(Op::RxDequeue);
            Some(0xDEAD_BEEF)
        }

        fn transfer_source(&self) -> TransferSource {
            SOURCE
        }
    }

    struct MockTx {
        hw: Shared,
        channel: u8,
    }

    impl TransferEngine for MockTx {
        fn channel(&self) -> u8 {
            self.channel
        }

        fn arm(
            &mut self,
            source: TransferSource,
            destination: u32,
            plan: &TransferPlan,
        ) -> Result<(), EngineError> {
            let mut hw = self.hw.borrow_mut();
            if hw.tx_active {
                return Err(EngineError::Busy);
            }
            hw.planned = plan.count();
            hw.log.push(Op::TxArm {
                destination,
                count: plan.count(),
                byte_swap: plan.byte_swap(),
                dreq: source.dreq,
            });
            Ok(())
        }

        fn set_active(&mut self, active: bool) {
            let mut hw = self.hw.borrow_mut();
            if active {
                // A stopped frame is abandoned, never resumed
                hw.remaining = hw.planned;
            }
            hw.tx_active = active;
            hw.log.push(Op::TxActive(active));
        }

        fn is_active(&self) -> bool {
            self.hw.borrow().tx_active
        }

        fn set_destination(&mut self, address: u32) {
            self.hw.borrow_mut().log.push(Op::TxDestination(address));
        }

        fn remaining(&self) -> u32 {
            self.hw.borrow().remaining
        }
    }

    struct MockEdge {
        hw: Shared,
    }

    impl FrameEdge for MockEdge {
        fn register(&mut self) {
            let mut hw = self.hw.borrow_mut();
            hw.registered = true;
            hw.log.push(Op::EdgeRegister);
        }

        fn unregister(&mut self) {
            let mut hw = self.hw.borrow_mut();
            hw.registered = false;
            hw.log.push(Op::EdgeUnregister);
        }

        fn is_registered(&self) -> bool {
            self.hw.borrow().registered
        }
    }

    fn engines(hw: &Shared, index: u8, channel: u8) -> CaptureEngines<MockRx, MockTx, MockEdge> {
        CaptureEngines {
            receiver: MockRx {
                hw: hw.clone(),
                index,
            },
            transfer: MockTx {
                hw: hw.clone(),
                channel,
            },
            edge: MockEdge { hw: hw.clone() },
        }
    }

    type Session<'d, const N: usize> = CaptureSession<'d, MockRx, MockTx, MockEdge, N>;

    fn session<'a, const N: usize>(hw: &Shared, buffer: &'a FrameBuffer<N>) -> Session<'a, N> {
        let mut claims = EngineClaims::new();
        CaptureSession::new(
            PinAssignment::DEFAULT_BOARD,
            N,
            true,
            engines(hw, 0, 0),
            buffer,
            &mut claims,
        )
        .unwrap()
    }

    /// Log entries after position `from`
    fn ops_since(hw: &Shared, from: usize) -> Vec<Op> {
        hw.borrow().log[from..].to_vec()
    }

    fn expected_resync(base: u32, drained: usize) -> Vec<Op> {
        let mut ops = std::vec![Op::TxActive(false), Op::RxRestart];
        ops.extend(std::iter::repeat(Op::RxDequeue).take(drained));
        ops.push(Op::TxDestination(base));
        ops.push(Op::TxActive(true));
        ops
    }

    #[test]
    fn test_hm01b0_scenario() {
        let hw = Shared::default();
        let buffer: FrameBuffer<79_056> = FrameBuffer::new();
        let pins = PinAssignment::new(12, 1, 14, 13, 15, None).unwrap();
        let mut claims = EngineClaims::new();
        let mut session = CaptureSession::new(
            pins,
            244 * 324,
            true,
            engines(&hw, 0, 0),
            &buffer,
            &mut claims,
        )
        .unwrap();

        assert_eq!(session.plan().count(), 19_764);
        assert_eq!(
            hw.borrow().log.last(),
            Some(&Op::TxArm {
                destination: buffer.base_address(),
                count: 19_764,
                byte_swap: true,
                dreq: 4,
            })
        );
        assert_eq!(session.state(), State::Inactive);

        session.activate();
        assert_eq!(session.state(), State::Armed);

        for drained in [0usize, 3, 7] {
            hw.borrow_mut().queue = drained;
            let mark = hw.borrow().log.len();

            session.on_frame_edge();

            assert_eq!(ops_since(&hw, mark), expected_resync(buffer.base_address(), drained));
            assert_eq!(hw.borrow().queue, 0);
            assert_eq!(session.state(), State::Capturing);
        }
    }

    #[test]
    fn test_n_edges_reset_destination_n_times() {
        for n in 0..12 {
            let hw = Shared::default();
            let buffer: FrameBuffer<64> = FrameBuffer::new();
            let mut session = session(&hw, &buffer);
            session.activate();

            for _ in 0..n {
                hw.borrow_mut().queue = 2;
                session.on_frame_edge();
            }

            let log = hw.borrow().log.clone();
            let resets = log
                .iter()
                .filter(|op| **op == Op::TxDestination(buffer.base_address()))
                .count();
            let restarts = log.iter().filter(|op| **op == Op::RxRestart).count();
            assert_eq!(resets, n);
            assert_eq!(restarts, n);
            assert_eq!(log.iter().filter(|op| **op == Op::RxDequeue).count(), 2 * n);
            assert_eq!(buffer.epoch(), n as u32);
            assert_eq!(session.health().edges(), n as u32);
        }
    }

    #[test]
    fn test_activate_disables_transfer_first() {
        let hw = Shared::default();
        let buffer: FrameBuffer<64> = FrameBuffer::new();
        let mut session = session(&hw, &buffer);
        let mark = hw.borrow().log.len();

        session.activate();
        assert_eq!(
            ops_since(&hw, mark),
            [Op::TxActive(false), Op::RxActive(true), Op::EdgeRegister]
        );

        // Second activation is a no-op
        session.activate();
        assert_eq!(hw.borrow().log.len(), mark + 3);
    }

    #[test]
    fn test_deactivate_is_idempotent() {
        let hw = Shared::default();
        let buffer: FrameBuffer<64> = FrameBuffer::new();
        let mut session = session(&hw, &buffer);
        session.activate();
        session.on_frame_edge();

        session.deactivate();
        let once = (session.state(), hw.borrow().registered, hw.borrow().tx_active, hw.borrow().rx_active);
        session.deactivate();
        let twice = (session.state(), hw.borrow().registered, hw.borrow().tx_active, hw.borrow().rx_active);

        assert_eq!(once, (State::Inactive, false, false, false));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_reactivation_keeps_program() {
        let hw = Shared::default();
        let buffer: FrameBuffer<64> = FrameBuffer::new();
        let mut session = session(&hw, &buffer);

        session.activate();
        let first = *session.program();
        session.deactivate();
        session.activate();
        assert_eq!(*session.program(), first);
        assert_eq!(hw.borrow().loaded, Some(first));

        // A fresh session on the same pins patches the same words
        let hw2 = Shared::default();
        let buffer2: FrameBuffer<64> = FrameBuffer::new();
        let other = self::session(&hw2, &buffer2);
        assert_eq!(other.program().words(), first.words());
    }

    #[test]
    fn test_unsupported_width_touches_nothing() {
        let hw = Shared::default();
        let buffer: FrameBuffer<64> = FrameBuffer::new();
        let mut claims = EngineClaims::new();

        let result = PinAssignment::new(12, 3, 14, 13, 15, None)
            .map_err(CaptureError::from)
            .and_then(|pins| {
                CaptureSession::new(pins, 64, true, engines(&hw, 0, 0), &buffer, &mut claims)
            });

        assert!(matches!(
            result,
            Err(CaptureError::Config(ConfigError::UnsupportedDataWidth(3)))
        ));
        assert!(hw.borrow().log.is_empty());
        assert_eq!(claims, EngineClaims::new());
    }

    #[test]
    fn test_mis_sized_frames_rejected() {
        let hw = Shared::default();
        let buffer: FrameBuffer<64> = FrameBuffer::new();
        let mut claims = EngineClaims::new();

        let result = CaptureSession::new(
            PinAssignment::DEFAULT_BOARD,
            62,
            false,
            engines(&hw, 0, 0),
            &buffer,
            &mut claims,
        );
        assert!(matches!(
            result,
            Err(CaptureError::FrameNotUnitMultiple { frame_bytes: 62, unit_bytes: 4 })
        ));

        let result = CaptureSession::new(
            PinAssignment::DEFAULT_BOARD,
            60,
            false,
            engines(&hw, 0, 0),
            &buffer,
            &mut claims,
        );
        assert!(matches!(
            result,
            Err(CaptureError::BufferSizeMismatch { expected: 64, actual: 60 })
        ));
        assert!(hw.borrow().log.is_empty());
    }

    #[test]
    fn test_large_queue_fully_drained() {
        let hw = Shared::default();
        let buffer: FrameBuffer<64> = FrameBuffer::new();
        let mut session = session(&hw, &buffer);
        session.activate();

        hw.borrow_mut().queue = 200;
        let mark = hw.borrow().log.len();
        let outcome = session.on_frame_edge();

        assert!(matches!(outcome, ResyncOutcome::Resynced { drained: 200, .. }));
        let ops = ops_since(&hw, mark);
        let dequeues = ops.iter().filter(|op| **op == Op::RxDequeue).count();
        assert_eq!(dequeues, 200);
        // Re-enable comes after the last dequeue
        let last_dequeue = ops.iter().rposition(|op| *op == Op::RxDequeue).unwrap();
        let enable = ops.iter().position(|op| *op == Op::TxActive(true)).unwrap();
        assert!(last_dequeue < enable);
        assert_eq!(hw.borrow().queue, 0);
    }

    #[test]
    fn test_stuck_queue_degrades_but_completes() {
        let hw = Shared::default();
        let buffer: FrameBuffer<64> = FrameBuffer::new();
        let mut session = session(&hw, &buffer).with_drain_limit(16);
        session.activate();

        {
            let mut hw = hw.borrow_mut();
            hw.queue = 1;
            hw.stuck_queue = true;
        }
        let mark = hw.borrow().log.len();
        let outcome = session.on_frame_edge();

        assert_eq!(
            outcome,
            ResyncOutcome::Degraded {
                drained: 16,
                completion: FrameCompletion::First
            }
        );
        assert_eq!(ops_since(&hw, mark), expected_resync(buffer.base_address(), 16));
        assert_eq!(session.state(), State::Capturing);
        assert_eq!(session.health().degraded_drains(), 1);
    }

    #[test]
    fn test_completion_tracking() {
        let hw = Shared::default();
        let buffer: FrameBuffer<64> = FrameBuffer::new();
        let mut session = session(&hw, &buffer).with_health(CaptureHealth::new(1));
        session.activate();

        // First edge: nothing in flight yet
        assert!(matches!(
            session.on_frame_edge(),
            ResyncOutcome::Resynced { completion: FrameCompletion::First, .. }
        ));
        assert!(!session.transfer_complete());

        // Transfer ran to its full count before the next edge
        hw.borrow_mut().remaining = 0;
        assert!(session.transfer_complete());
        assert!(matches!(
            session.on_frame_edge(),
            ResyncOutcome::Resynced { completion: FrameCompletion::Complete, .. }
        ));

        // Re-enabling reloaded the count; two short frames in a row exceed
        // a wedge limit of one
        assert!(matches!(
            session.on_frame_edge(),
            ResyncOutcome::Resynced { completion: FrameCompletion::Partial { remaining: 16 }, .. }
        ));
        session.on_frame_edge();
        assert_eq!(session.health().status(), HealthStatus::Wedged);
    }

    #[test]
    fn test_short_frame_restarts_full_count() {
        let hw = Shared::default();
        let buffer: FrameBuffer<64> = FrameBuffer::new();
        let mut session = session(&hw, &buffer);
        session.activate();
        session.on_frame_edge();

        // Edge arrives five words short of the count
        hw.borrow_mut().remaining = 5;
        assert!(matches!(
            session.on_frame_edge(),
            ResyncOutcome::Resynced { completion: FrameCompletion::Partial { remaining: 5 }, .. }
        ));

        // The next frame gets the whole plan, not the leftover
        assert_eq!(session.transfer.remaining(), session.plan().count());
        assert_eq!(session.plan().count(), 16);
        assert!(matches!(
            session.on_frame_edge(),
            ResyncOutcome::Resynced { completion: FrameCompletion::Partial { remaining: 16 }, .. }
        ));
        assert_eq!(session.health().partial_frames(), 2);
    }

    #[test]
    fn test_edges_ignored_while_inactive() {
        let hw = Shared::default();
        let buffer: FrameBuffer<64> = FrameBuffer::new();
        let mut session = session(&hw, &buffer);
        let mark = hw.borrow().log.len();

        assert_eq!(session.on_frame_edge(), ResyncOutcome::Ignored);
        assert_eq!(hw.borrow().log.len(), mark);
        assert_eq!(buffer.epoch(), 0);
    }

    #[test]
    fn test_double_bind_rejected() {
        let hw = Shared::default();
        let buffer: FrameBuffer<64> = FrameBuffer::new();
        let other: FrameBuffer<64> = FrameBuffer::new();
        let mut claims = EngineClaims::new();

        let first = CaptureSession::new(
            PinAssignment::DEFAULT_BOARD,
            64,
            true,
            engines(&hw, 1, 2),
            &buffer,
            &mut claims,
        )
        .unwrap();
        let mark = hw.borrow().log.len();

        let second = CaptureSession::new(
            PinAssignment::DEFAULT_BOARD,
            64,
            true,
            engines(&hw, 1, 3),
            &other,
            &mut claims,
        );
        assert!(matches!(second, Err(CaptureError::ReceiverClaimed(1))));
        assert_eq!(hw.borrow().log.len(), mark);

        // Releasing the first session frees the engines
        let _ = first.into_parts(&mut claims);
        assert!(!claims.is_receiver_claimed(1));
        assert!(!claims.is_channel_claimed(2));
    }

    #[test]
    fn test_session_as_edge_handler() {
        fn deliver<H: EdgeHandler>(handler: &mut H) -> ResyncOutcome {
            handler.on_frame_edge()
        }

        let hw = Shared::default();
        let buffer: FrameBuffer<64> = FrameBuffer::new();
        let mut session = session(&hw, &buffer);
        session.activate();
        assert!(matches!(deliver(&mut session), ResyncOutcome::Resynced { .. }));
    }
}
