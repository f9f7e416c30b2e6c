//! VSYNC edge delivery
//!
//! The frame-valid line is watched by a GPIO edge wait running on a
//! high-priority interrupt executor. The capture session registers and
//! unregisters through [`VsyncGate`]; [`VsyncWaiter`] drops every edge that
//! arrives while the gate is closed.
//!
//! The sensor drives VSYNC high during vertical blanking and low for the
//! frame, so the falling edge marks the start of a frame.

use core::sync::atomic::Ordering;

use embassy_rp::gpio::{AnyPin, Input, Pull};
use embassy_rp::Peri;
use portable_atomic::AtomicBool;

use framelock_core::traits::FrameEdge;

/// Session side of the edge gate
pub struct VsyncGate {
    open: &'static AtomicBool,
}

impl VsyncGate {
    /// Gate backed by `open`, shared with a [`VsyncWaiter`]
    pub fn new(open: &'static AtomicBool) -> Self {
        open.store(false, Ordering::Release);
        Self { open }
    }
}

impl FrameEdge for VsyncGate {
    fn register(&mut self) {
        self.open.store(true, Ordering::Release);
    }

    fn unregister(&mut self) {
        self.open.store(false, Ordering::Release);
    }

    fn is_registered(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }
}

/// Executor side of the edge gate
pub struct VsyncWaiter<'d> {
    pin: Input<'d>,
    open: &'static AtomicBool,
}

impl<'d> VsyncWaiter<'d> {
    /// Watch `pin` for frame starts
    pub fn new(pin: Peri<'d, AnyPin>, open: &'static AtomicBool) -> Self {
        Self {
            pin: Input::new(pin, Pull::None),
            open,
        }
    }

    /// Wait for the next frame start while the gate is open
    pub async fn next_frame(&mut self) {
        loop {
            self.pin.wait_for_falling_edge().await;
            if self.open.load(Ordering::Acquire) {
                return;
            }
        }
    }
}
