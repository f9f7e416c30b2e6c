//! Framelock Hardware Abstraction Layer
//!
//! This crate defines the bus traits the camera drivers talk through. Chip
//! HALs implement them for their I2C peripherals so the same sensor drivers
//! run on any board.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Sensor drivers (framelock-drivers)     │
//! └─────────────────────────────────────────┘
//!                     │ RegisterBus
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  framelock-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │ I2cBus
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  framelock-hal-rp2040                   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`i2c::I2cBus`] - Two-wire control bus (I2C / SCCB)
//! - [`register::RegisterBus`] - Device register protocol with 16-bit addresses

#![no_std]
#![deny(unsafe_code)]

pub mod i2c;
pub mod register;

// Re-export key traits at crate root for convenience
pub use i2c::I2cBus;
pub use register::{I2cRegisters, RegisterBus, RegisterError};
