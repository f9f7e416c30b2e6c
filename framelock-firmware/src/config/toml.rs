//! Minimal TOML parser for the camera configuration
//!
//! Handles only the subset `camera.toml` uses; build.rs has already
//! checked the file against the full TOML grammar.
//!
//! Supported features:
//! - Key = value pairs (string, integer, boolean)
//! - Decimal and `0x` hexadecimal integers
//! - [camera], [pins] and [clock] section headers
//! - Comments (# ...)

use framelock_core::config::{CameraConfig, ConfigError, PinAssignment, SensorKind};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown section header
    InvalidSection,
    /// Unknown key in a known section
    UnknownKey,
    /// Value does not parse as the key's type
    InvalidValue,
    /// A required key is missing
    MissingKey(&'static str),
    /// Values parse but do not form a valid camera
    Config(ConfigError),
}

impl From<ConfigError> for ParseError {
    fn from(e: ConfigError) -> Self {
        ParseError::Config(e)
    }
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Camera,
    Pins,
    Clock,
}

/// Values collected before the sensor defaults are known
#[derive(Default)]
struct RawConfig {
    sensor: Option<SensorKind>,
    i2c_address: Option<u8>,
    byte_swap: Option<bool>,
    data_base: Option<u8>,
    data_pins: Option<u8>,
    vsync: Option<u8>,
    hsync: Option<u8>,
    pclk: Option<u8>,
    xclk: Option<u8>,
    xclk_hz: Option<u32>,
}

/// Parse TOML configuration into a camera configuration
pub fn parse_camera_config(input: &str) -> Result<CameraConfig, ParseError> {
    let mut raw = RawConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        if let Some((key, value)) = parse_key_value(line) {
            apply_value(section, key, value, &mut raw)?;
        }
    }

    build(raw)
}

/// Parse a section header like "camera"
fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "camera" => Ok(Section::Camera),
        "pins" => Ok(Section::Pins),
        "clock" => Ok(Section::Clock),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    let value = match value.find('#') {
        // A # inside a string is not a comment
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    raw: &mut RawConfig,
) -> Result<(), ParseError> {
    match (section, key) {
        (Section::Camera, "sensor") => raw.sensor = Some(parse_sensor(value)?),
        (Section::Camera, "i2c_address") => raw.i2c_address = Some(parse_int(value)?),
        (Section::Camera, "byte_swap") => raw.byte_swap = Some(parse_bool(value)?),
        (Section::Pins, "data_base") => raw.data_base = Some(parse_int(value)?),
        (Section::Pins, "data_pins") => raw.data_pins = Some(parse_int(value)?),
        (Section::Pins, "vsync") => raw.vsync = Some(parse_int(value)?),
        (Section::Pins, "hsync") => raw.hsync = Some(parse_int(value)?),
        (Section::Pins, "pclk") => raw.pclk = Some(parse_int(value)?),
        (Section::Pins, "xclk") => raw.xclk = Some(parse_int(value)?),
        (Section::Clock, "xclk_hz") => raw.xclk_hz = Some(parse_int(value)?),
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

fn build(raw: RawConfig) -> Result<CameraConfig, ParseError> {
    let sensor = raw.sensor.ok_or(ParseError::MissingKey("sensor"))?;
    let pins = PinAssignment::new(
        raw.data_base.ok_or(ParseError::MissingKey("data_base"))?,
        raw.data_pins.ok_or(ParseError::MissingKey("data_pins"))?,
        raw.hsync.ok_or(ParseError::MissingKey("hsync"))?,
        raw.vsync.ok_or(ParseError::MissingKey("vsync"))?,
        raw.pclk.ok_or(ParseError::MissingKey("pclk"))?,
        raw.xclk,
    )?;

    let mut config = CameraConfig::for_sensor(sensor, pins);
    if let Some(address) = raw.i2c_address {
        config.i2c_address = address;
    }
    if let Some(byte_swap) = raw.byte_swap {
        config.byte_swap = byte_swap;
    }
    if let Some(hz) = raw.xclk_hz {
        config.xclk_hz = hz;
    }
    Ok(config)
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

fn parse_sensor(value: &str) -> Result<SensorKind, ParseError> {
    match parse_string(value) {
        "hm01b0" => Ok(SensorKind::Hm01b0),
        "ov5640" => Ok(SensorKind::Ov5640),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse a decimal or `0x` hexadecimal integer
fn parse_int<T: TryFrom<u32>>(value: &str) -> Result<T, ParseError> {
    let n = match value.strip_prefix("0x") {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse(),
    }
    .map_err(|_| ParseError::InvalidValue)?;
    T::try_from(n).map_err(|_| ParseError::InvalidValue)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framelock_core::config::DataWidth;

    const BOARD: &str = r#"
# HM01B0 on the default board
[camera]
sensor = "hm01b0"
i2c_address = 0x24
byte_swap = true

[pins]
data_base = 12
data_pins = 1
vsync = 13   # frame valid
hsync = 14
pclk = 15

[clock]
xclk_hz = 25000000
"#;

    #[test]
    fn test_parse_board_config() {
        let config = parse_camera_config(BOARD).unwrap();
        assert_eq!(config, CameraConfig::default());
    }

    #[test]
    fn test_parse_ov5640_with_xclk() {
        let input = r#"
[camera]
sensor = "ov5640"

[pins]
data_base = 8
data_pins = 8
vsync = 22
hsync = 21
pclk = 20
xclk = 19

[clock]
xclk_hz = 0x17D7840
"#;
        let config = parse_camera_config(input).unwrap();
        assert_eq!(config.sensor, SensorKind::Ov5640);
        assert_eq!(config.i2c_address, 0x3C);
        assert_eq!(config.pins.data_width(), DataWidth::Eight);
        assert_eq!(config.pins.master_clock(), Some(19));
        assert_eq!(config.xclk_hz, 25_000_000);
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int::<u8>("0x24"), Ok(0x24));
        assert_eq!(parse_int::<u8>("36"), Ok(36));
        assert_eq!(parse_int::<u8>("300"), Err(ParseError::InvalidValue));
        assert_eq!(parse_int::<u32>("gpio4"), Err(ParseError::InvalidValue));
    }

    #[test]
    fn test_parse_key_value_strips_comment() {
        assert_eq!(parse_key_value("pclk = 15 # pixel clock"), Some(("pclk", "15")));
        assert_eq!(
            parse_key_value("sensor = \"a#b\""),
            Some(("sensor", "\"a#b\""))
        );
        assert_eq!(parse_key_value("pclk ="), None);
    }

    #[test]
    fn test_missing_and_unknown_keys() {
        let missing = "[camera]\nsensor = \"hm01b0\"\n[pins]\ndata_base = 12\n";
        assert_eq!(
            parse_camera_config(missing),
            Err(ParseError::MissingKey("data_pins"))
        );

        let unknown = "[camera]\nlens = 3\n";
        assert_eq!(parse_camera_config(unknown), Err(ParseError::UnknownKey));

        assert_eq!(
            parse_camera_config("[display]\n"),
            Err(ParseError::InvalidSection)
        );
    }

    #[test]
    fn test_invalid_wiring_is_config_error() {
        let input = "[camera]\nsensor = \"hm01b0\"\n[pins]\n\
                     data_base = 12\ndata_pins = 1\nvsync = 13\nhsync = 13\npclk = 15\n";
        assert_eq!(
            parse_camera_config(input),
            Err(ParseError::Config(ConfigError::PinConflict(13)))
        );
    }
}
