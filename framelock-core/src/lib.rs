//! Board-agnostic core logic for continuous DVP capture
//!
//! This crate contains everything about frame capture that does not depend
//! on a specific microcontroller:
//!
//! - Pin assignment and camera configuration types
//! - Sampling microprogram patcher
//! - Transfer planning (word counts, transfer unit, byte swap)
//! - Engine traits (receiver, transfer, frame edge)
//! - Resync state machine and the capture session that drives it
//! - The shared frame buffer and its snapshot view
//! - Engine claims and capture health

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod buffer;
pub mod claims;
pub mod config;
pub mod error;
pub mod health;
pub mod program;
pub mod session;
pub mod state;
pub mod traits;
pub mod transfer;

pub use error::CaptureError;
