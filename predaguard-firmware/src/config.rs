//! Embedded pipeline configuration

use defmt::*;

use predaguard_core::config::{parse_config, PipelineConfig};

/// Embedded configuration (compiled into firmware)
/// Edit pipeline.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../pipeline.toml");

/// Parse the embedded configuration, falling back to built-in defaults
pub fn load_config() -> PipelineConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            // build.rs validates pipeline.toml, so this only happens if the
            // two validators disagree
            error!("Failed to parse embedded config: {}", e);
            error!("Using built-in defaults");
            PipelineConfig::default()
        }
    }
}
