//! RP2040 capture engines
//!
//! This crate implements the `framelock-core` engine traits on RP2040
//! peripherals, plus the board glue a camera needs:
//!
//! - PIO state machine as the parallel receiver
//! - Raw DMA channel as the transfer engine
//! - VSYNC edge gate and waiter for the resync executor
//! - XCLK master clock on a PWM slice
//! - Blocking I2C adapter for the register protocol
//! - Pin bank for config-driven pin assignment
//!
//! ```text
//!  D0..Dn, HSYNC, PCLK ─► PIO SM ─► RX FIFO ─► DMA ─► FrameBuffer
//!  VSYNC ─► GPIO IRQ ─► VsyncWaiter ─► CaptureSession::on_frame_edge
//! ```

#![no_std]

pub mod dma;
pub mod i2c;
pub mod pins;
pub mod receiver;
pub mod vsync;
pub mod xclk;

pub use dma::DmaTransfer;
pub use i2c::BlockingI2c;
pub use pins::{DvpPins, PinBank, PinError};
pub use receiver::{PioBlock, PioReceiver};
pub use vsync::{VsyncGate, VsyncWaiter};
pub use xclk::{MasterClock, XclkError, XclkSettings};

/// System clock frequency (RP2040 default)
pub const SYS_CLK_HZ: u32 = 125_000_000;
