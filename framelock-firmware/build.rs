//! Build script for framelock-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates camera.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Highest RP2040 GPIO number
const MAX_GPIO: i64 = 29;

/// GPIO pins wired to the sensor control bus (I2C0 SDA/SCL)
const CONTROL_BUS_PINS: [i64; 2] = [4, 5];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate camera.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=camera.toml");

    let config_path = Path::new("camera.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: camera.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a camera.toml configuration file.         ║\n\
            ║  Please create one in the framelock-firmware directory.          ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read camera.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in camera.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_camera(&config, &mut errors);
    validate_pins(&config, &mut errors);
    validate_clock(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid camera configuration                             ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=camera.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Validate the [camera] section
fn validate_camera(config: &toml::Value, errors: &mut Vec<String>) {
    let camera = match config.get("camera") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push("[camera] must be a table".into());
            return;
        }
        None => {
            errors.push("Missing [camera] section".into());
            return;
        }
    };

    match camera.get("sensor") {
        Some(toml::Value::String(s)) if s == "hm01b0" || s == "ov5640" => {}
        Some(_) => errors.push("[camera] sensor must be 'hm01b0' or 'ov5640'".into()),
        None => errors.push("[camera] missing 'sensor'".into()),
    }

    if let Some(value) = camera.get("i2c_address") {
        match value.as_integer() {
            Some(addr) if (0x08..=0x77).contains(&addr) => {}
            _ => errors.push("[camera] i2c_address must be a 7-bit address".into()),
        }
    }

    if let Some(value) = camera.get("byte_swap") {
        if value.as_bool().is_none() {
            errors.push("[camera] byte_swap must be true or false".into());
        }
    }
}

/// Validate the [pins] section
fn validate_pins(config: &toml::Value, errors: &mut Vec<String>) {
    let pins = match config.get("pins") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push("[pins] must be a table".into());
            return;
        }
        None => {
            errors.push("Missing [pins] section".into());
            return;
        }
    };

    let data_pins = match pins.get("data_pins").and_then(|v| v.as_integer()) {
        Some(n) if [1, 4, 8].contains(&n) => n,
        Some(_) => {
            errors.push("[pins] data_pins must be 1, 4 or 8".into());
            1
        }
        None => {
            errors.push("[pins] missing 'data_pins'".into());
            1
        }
    };

    let mut used: Vec<(i64, String)> = Vec::new();
    let mut check = |name: &str, pin: i64, errors: &mut Vec<String>| {
        if !(0..=MAX_GPIO).contains(&pin) {
            errors.push(format!("[pins] {} = {} is not a GPIO (0-29)", name, pin));
        } else if CONTROL_BUS_PINS.contains(&pin) {
            errors.push(format!("[pins] {} = {} is the I2C0 control bus", name, pin));
        } else if let Some((_, other)) = used.iter().find(|(p, _)| *p == pin) {
            errors.push(format!("[pins] {} and {} share GPIO {}", name, other, pin));
        }
        used.push((pin, name.to_string()));
    };

    match pins.get("data_base").and_then(|v| v.as_integer()) {
        Some(base) => {
            for i in 0..data_pins {
                check(&format!("D{}", i), base + i, errors);
            }
        }
        None => errors.push("[pins] missing 'data_base'".into()),
    }

    for name in ["vsync", "hsync", "pclk"] {
        match pins.get(name).and_then(|v| v.as_integer()) {
            Some(pin) => check(name, pin, errors),
            None => errors.push(format!("[pins] missing '{}'", name)),
        }
    }

    if let Some(value) = pins.get("xclk") {
        match value.as_integer() {
            Some(pin) => check("xclk", pin, errors),
            None => errors.push("[pins] xclk must be a GPIO number".into()),
        }
    }
}

/// Validate the [clock] section
fn validate_clock(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(clock) = config.get("clock") else {
        return;
    };

    if let Some(value) = clock.get("xclk_hz") {
        match value.as_integer() {
            // PWM needs at least two system clocks per period
            Some(hz) if (1..=62_500_000).contains(&hz) => {}
            _ => errors.push("[clock] xclk_hz must be 1-62500000".into()),
        }
    }
}
