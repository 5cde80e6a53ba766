//! Differential features
//!
//! ```text
//! f0 = z(t_exhaust - t_ambient)
//! f1 = z(h_exhaust - h_ambient)
//! ```
//!
//! Calibration does not apply in this mode.

use super::{FeatureExtractor, Features, NormalizationParams};
use crate::calibration::CalibrationSnapshot;
use crate::traits::{Reading, SensorSample};

/// Exhaust minus ambient deltas from two sensors
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Differential {
    params: NormalizationParams,
}

impl Differential {
    pub const fn new(params: NormalizationParams) -> Self {
        Self { params }
    }
}

impl Default for Differential {
    fn default() -> Self {
        Self::new(NormalizationParams::DIFFERENTIAL)
    }
}

impl FeatureExtractor for Differential {
    fn extract(&self, sample: &SensorSample, _calibration: CalibrationSnapshot) -> Features {
        let exhaust = sample.primary();
        let ambient = sample.secondary().unwrap_or(Reading::ZERO);

        let delta_t = exhaust.temperature - ambient.temperature;
        let delta_h = exhaust.humidity - ambient.humidity;

        Features {
            inputs: [delta_t, delta_h],
            values: [
                self.params.temperature.apply(delta_t),
                self.params.humidity.apply(delta_h),
            ],
        }
    }

    fn params(&self) -> &NormalizationParams {
        &self.params
    }
}
