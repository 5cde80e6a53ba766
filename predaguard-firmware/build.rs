//! Build script for predaguard-firmware
//!
//! - Sets up linker search paths and scripts for memory.x
//! - Links the TFLM wrapper library when the `tflm` feature is enabled
//! - Validates pipeline.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    link_tflm();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Link the prebuilt TensorFlow Lite Micro wrapper
fn link_tflm() {
    if env::var("CARGO_FEATURE_TFLM").is_err() {
        return;
    }

    println!("cargo:rerun-if-env-changed=TFLM_LIB_DIR");
    let lib_dir = match env::var("TFLM_LIB_DIR") {
        Ok(dir) => dir,
        Err(_) => panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: TFLM_LIB_DIR not set                                     ║\n\
            ║                                                                  ║\n\
            ║  The `tflm` feature links libtflm_wrapper.a. Point TFLM_LIB_DIR  ║\n\
            ║  at the directory containing it, or build without `tflm` to use  ║\n\
            ║  the stub engine.                                                ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        ),
    };

    println!("cargo:rustc-link-search=native={}", lib_dir);
    println!("cargo:rustc-link-lib=static=tflm_wrapper");
}

/// Validate pipeline.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=pipeline.toml");

    let config_path = Path::new("pipeline.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: pipeline.toml not found!                                 ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds a pipeline.toml configuration file.         ║\n\
            ║  Please create one in the predaguard-firmware directory.         ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read pipeline.toml                             ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse and validate TOML syntax
    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in pipeline.toml                     ║\n\
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
    if let Some(root) = config.as_table() {
        check_keys(root, "<root>", &["pipeline", "calibration", "normalization"], &mut errors);
    }
    if let Some(normalization) = config.get("normalization").and_then(|n| n.as_table()) {
        check_keys(normalization, "normalization", &["single", "differential"], &mut errors);
    }
    validate_pipeline(&config, &mut errors);
    validate_calibration(&config, &mut errors);
    validate_normalization(&config, "single", &mut errors);
    validate_normalization(&config, "differential", &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid pipeline configuration                           ║\n\
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

    println!("cargo:warning=pipeline.toml validated successfully");
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

/// Reject keys the firmware parser would reject
fn check_keys(table: &toml::Table, section: &str, allowed: &[&str], errors: &mut Vec<String>) {
    for key in table.keys() {
        if !allowed.contains(&key.as_str()) {
            errors.push(format!("[{}] unknown key '{}'", section, key));
        }
    }
}

fn positive_int(table: &toml::Table, section: &str, key: &str, errors: &mut Vec<String>) {
    match table.get(key) {
        None => {}
        Some(toml::Value::Integer(v)) if *v > 0 => {}
        Some(_) => errors.push(format!("[{}] {} must be a positive integer", section, key)),
    }
}

fn validate_pipeline(config: &toml::Value, errors: &mut Vec<String>) {
    let pipeline = match config.get("pipeline") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push("[pipeline] must be a table".to_string());
            return;
        }
        // Every key has a default
        None => return,
    };

    check_keys(
        pipeline,
        "pipeline",
        &["mode", "cycle_ms", "retry_pause_ms", "stable_threshold"],
        errors,
    );

    if let Some(value) = pipeline.get("mode") {
        match value {
            toml::Value::String(mode) if mode == "single" || mode == "differential" => {}
            _ => errors.push("[pipeline] mode must be 'single' or 'differential'".to_string()),
        }
    }

    positive_int(pipeline, "pipeline", "cycle_ms", errors);
    positive_int(pipeline, "pipeline", "retry_pause_ms", errors);

    if let Some(value) = pipeline.get("stable_threshold") {
        match value {
            toml::Value::Integer(t) if (1..=255).contains(t) => {}
            _ => errors.push("[pipeline] stable_threshold must be 1-255".to_string()),
        }
    }
}

fn validate_calibration(config: &toml::Value, errors: &mut Vec<String>) {
    let calibration = match config.get("calibration") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push("[calibration] must be a table".to_string());
            return;
        }
        None => return,
    };

    check_keys(calibration, "calibration", &["step", "debounce_ms"], errors);

    if let Some(value) = calibration.get("step") {
        match value {
            toml::Value::Integer(s) if *s != 0 && i16::try_from(*s).is_ok() => {}
            _ => errors.push("[calibration] step must be a non-zero 16-bit integer".to_string()),
        }
    }
    positive_int(calibration, "calibration", "debounce_ms", errors);
}

fn validate_normalization(config: &toml::Value, mode: &str, errors: &mut Vec<String>) {
    let section = format!("normalization.{}", mode);
    let table = match config.get("normalization").and_then(|n| n.get(mode)) {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push(format!("[{}] must be a table", section));
            return;
        }
        None => return,
    };

    check_keys(
        table,
        &section,
        &["temperature_mean", "temperature_std", "humidity_mean", "humidity_std"],
        errors,
    );

    for key in ["temperature_mean", "humidity_mean", "temperature_std", "humidity_std"] {
        let value = match table.get(key) {
            Some(toml::Value::Float(f)) => *f,
            Some(toml::Value::Integer(i)) => *i as f64,
            Some(_) => {
                errors.push(format!("[{}] {} must be a number", section, key));
                continue;
            }
            None => continue,
        };

        if !value.is_finite() {
            errors.push(format!("[{}] {} must be finite", section, key));
        } else if key.ends_with("_std") && value <= 0.0 {
            errors.push(format!("[{}] {} must be > 0", section, key));
        }
    }
}
