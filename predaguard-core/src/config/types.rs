//! Pipeline configuration types

use crate::calibration::DebounceConfig;
use crate::features::NormalizationParams;
use crate::stability::DEFAULT_THRESHOLD;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Key not recognized in its section
    UnknownKey,
    /// Value could not be parsed for its key
    InvalidValue,
    /// Normalization standard deviation not positive, or a constant not finite
    InvalidStdDev,
    /// Stability threshold is zero
    InvalidThreshold,
    /// Cycle period, retry pause or debounce window is zero
    InvalidPeriod,
    /// Calibration step is zero
    InvalidStep,
}

/// Sensor layout and feature formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FeatureMode {
    /// One sensor, absolute readings, live calibration
    #[default]
    Single,
    /// Two sensors, exhaust minus ambient
    Differential,
}

impl FeatureMode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "single" => Some(FeatureMode::Single),
            "differential" => Some(FeatureMode::Differential),
            _ => None,
        }
    }

    /// Number of sensors the mode reads
    pub const fn sensor_count(&self) -> usize {
        match self {
            FeatureMode::Single => 1,
            FeatureMode::Differential => 2,
        }
    }
}

/// Complete runtime configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PipelineConfig {
    /// Feature extraction strategy
    pub mode: FeatureMode,
    /// Time between cycle starts (ms)
    pub cycle_ms: u32,
    /// Pause after a failed inference (ms)
    pub retry_pause_ms: u32,
    /// Consecutive differing predictions before the display switches
    pub stable_threshold: u8,
    /// Calibration button behavior
    pub calibration: DebounceConfig,
    /// Constants for [`FeatureMode::Single`]
    pub single: NormalizationParams,
    /// Constants for [`FeatureMode::Differential`]
    pub differential: NormalizationParams,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            mode: FeatureMode::Single,
            cycle_ms: 500,
            retry_pause_ms: 1000,
            stable_threshold: DEFAULT_THRESHOLD,
            calibration: DebounceConfig::default(),
            single: NormalizationParams::SINGLE,
            differential: NormalizationParams::DIFFERENTIAL,
        }
    }
}

impl PipelineConfig {
    /// Normalization constants of the selected mode
    pub fn normalization(&self) -> &NormalizationParams {
        match self.mode {
            FeatureMode::Single => &self.single,
            FeatureMode::Differential => &self.differential,
        }
    }

    /// Check the invariants the pipeline relies on
    ///
    /// Both constant sets are checked, not only the active one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.single.is_valid() || !self.differential.is_valid() {
            return Err(ConfigError::InvalidStdDev);
        }
        if self.stable_threshold == 0 {
            return Err(ConfigError::InvalidThreshold);
        }
        if self.cycle_ms == 0 || self.retry_pause_ms == 0 || self.calibration.window_ms == 0 {
            return Err(ConfigError::InvalidPeriod);
        }
        if self.calibration.step == 0 {
            return Err(ConfigError::InvalidStep);
        }
        Ok(())
    }
}
