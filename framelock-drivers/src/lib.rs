//! Camera drivers
//!
//! This crate puts sensors and the capture engine together:
//!
//! - Sensor models (HM01B0, OV5640): chip probing, bus width, streaming
//! - `DvpCamera`: a sensor's register client composed with a capture session
//! - Preview: pushing captured frames to a display surface

#![no_std]
#![deny(unsafe_code)]

pub mod camera;
pub mod preview;
pub mod sensor;

pub use camera::{DvpCamera, FrameRead};
pub use sensor::{Hm01b0, Ov5640, SensorError, SensorModel};
