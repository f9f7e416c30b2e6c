//! Configuration loading and parsing
//!
//! The camera configuration is embedded at build time and parsed at boot.
//! A broken embedded file falls back to the board defaults.

pub mod toml;

pub use toml::{parse_camera_config, ParseError};

use defmt::*;
use framelock_core::config::CameraConfig;

/// Embedded configuration (compiled into firmware)
/// Edit camera.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../../camera.toml");

/// Load the embedded configuration, or the board defaults if it is broken
pub fn load() -> CameraConfig {
    match parse_camera_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            // build.rs rejects most broken files, so this is a parser gap
            error!("Failed to parse embedded config: {:?}", e);
            error!("Using board default configuration");
            CameraConfig::default()
        }
    }
}
