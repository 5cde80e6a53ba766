//! Single-sensor features
//!
//! ```text
//! f0 = z(temperature + offset)
//! f1 = z(lock ? humidity_mean : humidity)
//! ```

use super::{FeatureExtractor, Features, NormalizationParams};
use crate::calibration::CalibrationSnapshot;
use crate::traits::SensorSample;

/// Absolute readings from one sensor, with live calibration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SingleSensor {
    params: NormalizationParams,
}

impl SingleSensor {
    pub const fn new(params: NormalizationParams) -> Self {
        Self { params }
    }
}

impl Default for SingleSensor {
    fn default() -> Self {
        Self::new(NormalizationParams::SINGLE)
    }
}

impl FeatureExtractor for SingleSensor {
    fn extract(&self, sample: &SensorSample, calibration: CalibrationSnapshot) -> Features {
        // Dual samples only contribute their first pair here
        let reading = sample.primary();

        let temperature = reading.temperature + calibration.offset() as f32;
        let humidity = if calibration.lock() {
            self.params.humidity.mean
        } else {
            reading.humidity
        };

        Features {
            inputs: [temperature, humidity],
            values: [
                self.params.temperature.apply(temperature),
                self.params.humidity.apply(humidity),
            ],
        }
    }

    fn params(&self) -> &NormalizationParams {
        &self.params
    }
}
