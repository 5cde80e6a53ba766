//! Minimal TOML reader for the embedded pipeline configuration
//!
//! Handles only the subset `pipeline.toml` uses. Works on borrowed slices
//! of the input, no allocation.
//!
//! Supported:
//! - `[section]` and `[section.subsection]` headers
//! - `key = value` with strings, integers and floats
//! - Comments (`# ...`), full-line and trailing
//!
//! Unknown sections and keys are errors, so a typo cannot silently leave a
//! default in place.

use super::types::{ConfigError, FeatureMode, PipelineConfig};
use crate::features::NormalizationParams;

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Pipeline,
    Calibration,
    NormalizationSingle,
    NormalizationDifferential,
}

/// Parse and validate a configuration, starting from the defaults
///
/// Keys that are absent keep their default value.
pub fn parse_config(input: &str) -> Result<PipelineConfig, ConfigError> {
    let mut config = PipelineConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            let header = strip_comment(line);
            if !header.ends_with(']') || header.len() < 2 {
                return Err(ConfigError::InvalidSection);
            }
            section = parse_section_header(&header[1..header.len() - 1])?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ConfigError::InvalidValue)?;
        apply_value(section, key, value, &mut config)?;
    }

    config.validate()?;
    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ConfigError> {
    match header.trim() {
        "pipeline" => Ok(Section::Pipeline),
        "calibration" => Ok(Section::Calibration),
        "normalization.single" => Ok(Section::NormalizationSingle),
        "normalization.differential" => Ok(Section::NormalizationDifferential),
        _ => Err(ConfigError::InvalidSection),
    }
}

/// Cut a trailing comment, ignoring `#` inside quotes
fn strip_comment(text: &str) -> &str {
    let mut in_string = false;
    for (i, c) in text.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return text[..i].trim(),
            _ => {}
        }
    }
    text.trim()
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = strip_comment(&line[eq_pos + 1..]);

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> Result<&str, ConfigError> {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        Ok(&value[1..value.len() - 1])
    } else {
        Err(ConfigError::InvalidValue)
    }
}

/// Parse an integer value, allowing `_` separators
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ConfigError> {
    let mut digits = [0u8; 24];
    let mut len = 0;
    for b in value.bytes().filter(|&b| b != b'_') {
        *digits.get_mut(len).ok_or(ConfigError::InvalidValue)? = b;
        len += 1;
    }
    core::str::from_utf8(&digits[..len])
        .map_err(|_| ConfigError::InvalidValue)?
        .parse()
        .map_err(|_| ConfigError::InvalidValue)
}

/// Parse a float value; integers are accepted too
fn parse_float(value: &str) -> Result<f32, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue)
}

fn apply_normalization(
    params: &mut NormalizationParams,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    match key {
        "temperature_mean" => params.temperature.mean = parse_float(value)?,
        "temperature_std" => params.temperature.std_dev = parse_float(value)?,
        "humidity_mean" => params.humidity.mean = parse_float(value)?,
        "humidity_std" => params.humidity.std_dev = parse_float(value)?,
        _ => return Err(ConfigError::UnknownKey),
    }
    Ok(())
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut PipelineConfig,
) -> Result<(), ConfigError> {
    match section {
        Section::Pipeline => match key {
            "mode" => {
                config.mode =
                    FeatureMode::from_name(parse_string(value)?).ok_or(ConfigError::InvalidValue)?
            }
            "cycle_ms" => config.cycle_ms = parse_int(value)?,
            "retry_pause_ms" => config.retry_pause_ms = parse_int(value)?,
            "stable_threshold" => config.stable_threshold = parse_int(value)?,
            _ => return Err(ConfigError::UnknownKey),
        },
        Section::Calibration => match key {
            "step" => config.calibration.step = parse_int(value)?,
            "debounce_ms" => config.calibration.window_ms = parse_int(value)?,
            _ => return Err(ConfigError::UnknownKey),
        },
        Section::NormalizationSingle => apply_normalization(&mut config.single, key, value)?,
        Section::NormalizationDifferential => {
            apply_normalization(&mut config.differential, key, value)?
        }
        // No root-level keys
        Section::Root => return Err(ConfigError::UnknownKey),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config_str = r#"
# PredaGuard pipeline
[pipeline]
mode = "differential"   # two sensors
cycle_ms = 750
retry_pause_ms = 2_000
stable_threshold = 4

[calibration]
step = 2
debounce_ms = 150

[normalization.single]
temperature_mean = 47.55531255
temperature_std = 4.63953885
humidity_mean = 37.40246446
humidity_std = 7.42324274

[normalization.differential]
temperature_mean = 15.65084995
temperature_std = 6.99135624
humidity_mean = -38.53349043
humidity_std = 12.27171964
"#;

        let config = parse_config(config_str).unwrap();
        assert_eq!(config.mode, FeatureMode::Differential);
        assert_eq!(config.cycle_ms, 750);
        assert_eq!(config.retry_pause_ms, 2000);
        assert_eq!(config.stable_threshold, 4);
        assert_eq!(config.calibration.step, 2);
        assert_eq!(config.calibration.window_ms, 150);
        assert_eq!(config.single, NormalizationParams::SINGLE);
        assert_eq!(config.differential, NormalizationParams::DIFFERENTIAL);
    }

    #[test]
    fn test_empty_input_gives_defaults() {
        assert_eq!(parse_config(""), Ok(PipelineConfig::default()));
        assert_eq!(parse_config("# only a comment\n\n"), Ok(PipelineConfig::default()));
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config = parse_config("[normalization.single]\nhumidity_std = 8\n").unwrap();
        assert_eq!(config.single.humidity.std_dev, 8.0);
        assert_eq!(config.single.temperature, NormalizationParams::SINGLE.temperature);
    }

    #[test]
    fn test_parse_section_header() {
        assert_eq!(parse_section_header("pipeline"), Ok(Section::Pipeline));
        assert_eq!(
            parse_section_header(" normalization.differential "),
            Ok(Section::NormalizationDifferential)
        );
        assert_eq!(parse_section_header("normalization"), Err(ConfigError::InvalidSection));
        assert_eq!(parse_config("[pipeline\n"), Err(ConfigError::InvalidSection));
        assert_eq!(parse_config("[pipeline] # main\ncycle_ms = 10\n").unwrap().cycle_ms, 10);
    }

    #[test]
    fn test_strip_comment_respects_quotes() {
        assert_eq!(strip_comment("\"a#b\" # note"), "\"a#b\"");
        assert_eq!(strip_comment("42 # note"), "42");
        assert_eq!(strip_comment("42"), "42");
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert_eq!(parse_config("[pipeline]\ncycle = 5\n"), Err(ConfigError::UnknownKey));
        assert_eq!(parse_config("cycle_ms = 5\n"), Err(ConfigError::UnknownKey));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert_eq!(parse_config("[pipeline]\nmode = \"dual\"\n"), Err(ConfigError::InvalidValue));
        assert_eq!(parse_config("[pipeline]\nmode = single\n"), Err(ConfigError::InvalidValue));
        assert_eq!(parse_config("[pipeline]\ncycle_ms = -1\n"), Err(ConfigError::InvalidValue));
        assert_eq!(parse_config("[pipeline]\nstable_threshold = 300\n"), Err(ConfigError::InvalidValue));
        assert_eq!(parse_config("[pipeline]\ncycle_ms\n"), Err(ConfigError::InvalidValue));
        assert_eq!(parse_config("[calibration]\nstep = 1.5\n"), Err(ConfigError::InvalidValue));
    }

    #[test]
    fn test_parsed_config_is_validated() {
        assert_eq!(
            parse_config("[normalization.differential]\ntemperature_std = 0.0\n"),
            Err(ConfigError::InvalidStdDev)
        );
        assert_eq!(
            parse_config("[pipeline]\nstable_threshold = 0\n"),
            Err(ConfigError::InvalidThreshold)
        );
        assert_eq!(parse_config("[pipeline]\ncycle_ms = 0\n"), Err(ConfigError::InvalidPeriod));
        assert_eq!(
            parse_config("[calibration]\ndebounce_ms = 0\n"),
            Err(ConfigError::InvalidPeriod)
        );
        assert_eq!(parse_config("[calibration]\nstep = 0\n"), Err(ConfigError::InvalidStep));
    }

    #[test]
    fn test_pipeline_section_and_mode_optional() {
        let config = parse_config("[pipeline]\ncycle_ms = 750\n").unwrap();
        assert_eq!(config.mode, FeatureMode::Single);
        assert_eq!(config.cycle_ms, 750);

        let config = parse_config("[calibration]\nstep = 2\n").unwrap();
        assert_eq!(config.mode, FeatureMode::Single);
    }

    #[test]
    fn test_negative_step_allowed() {
        // Swaps the button directions
        let config = parse_config("[calibration]\nstep = -5\n").unwrap();
        assert_eq!(config.calibration.step, -5);
    }
}
