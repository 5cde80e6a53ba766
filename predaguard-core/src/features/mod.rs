//! Feature extraction
//!
//! Turns one [`SensorSample`] plus the current calibration into the
//! normalized feature vector fed to the model. Two strategies exist:
//!
//! - [`SingleSensor`]: absolute temperature (with calibration offset) and
//!   humidity from one sensor
//! - [`Differential`]: exhaust minus ambient deltas from two sensors
//!
//! The strategy is chosen once at startup from [`FeatureMode`].

pub mod differential;
pub mod normalize;
pub mod single;

pub use differential::Differential;
pub use normalize::{NormalizationParams, ZScore};
pub use single::SingleSensor;

use crate::calibration::CalibrationSnapshot;
use crate::config::{FeatureMode, PipelineConfig};
use crate::traits::SensorSample;
use crate::FEATURE_COUNT;

/// Output of one extraction
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Features {
    /// Pre-normalization inputs (temperature, humidity) after calibration
    /// or differencing
    pub inputs: [f32; FEATURE_COUNT],
    /// Z-scored features in model input order
    pub values: [f32; FEATURE_COUNT],
}

/// Contract shared by both extraction strategies
pub trait FeatureExtractor {
    /// Compute the feature vector for one cycle
    fn extract(&self, sample: &SensorSample, calibration: CalibrationSnapshot) -> Features;

    /// Normalization constants in use
    fn params(&self) -> &NormalizationParams;
}

/// Strategy selected at startup
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FeatureStrategy {
    Single(SingleSensor),
    Differential(Differential),
}

impl FeatureStrategy {
    /// Build the strategy named by the config, with its constants
    pub fn from_config(config: &PipelineConfig) -> Self {
        match config.mode {
            FeatureMode::Single => Self::Single(SingleSensor::new(config.single)),
            FeatureMode::Differential => {
                Self::Differential(Differential::new(config.differential))
            }
        }
    }

    pub fn mode(&self) -> FeatureMode {
        match self {
            Self::Single(_) => FeatureMode::Single,
            Self::Differential(_) => FeatureMode::Differential,
        }
    }
}

impl FeatureExtractor for FeatureStrategy {
    fn extract(&self, sample: &SensorSample, calibration: CalibrationSnapshot) -> Features {
        match self {
            Self::Single(s) => s.extract(sample, calibration),
            Self::Differential(d) => d.extract(sample, calibration),
        }
    }

    fn params(&self) -> &NormalizationParams {
        match self {
            Self::Single(s) => s.params(),
            Self::Differential(d) => d.params(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Reading;

    #[test]
    fn test_strategy_from_config() {
        let mut config = PipelineConfig::default();
        assert_eq!(FeatureStrategy::from_config(&config).mode(), FeatureMode::Single);

        config.mode = FeatureMode::Differential;
        let strategy = FeatureStrategy::from_config(&config);
        assert_eq!(strategy.mode(), FeatureMode::Differential);
        assert_eq!(*strategy.params(), NormalizationParams::DIFFERENTIAL);
    }

    #[test]
    fn test_strategy_dispatch() {
        let config = PipelineConfig::default();
        let strategy = FeatureStrategy::from_config(&config);
        let single = SingleSensor::new(config.single);
        let sample = SensorSample::Single(Reading::new(50.0, 40.0));

        assert_eq!(
            strategy.extract(&sample, CalibrationSnapshot::NEUTRAL),
            single.extract(&sample, CalibrationSnapshot::NEUTRAL)
        );
    }
}
