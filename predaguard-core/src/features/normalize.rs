//! Z-score normalization constants

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Training-time statistics of one feature
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ZScore {
    pub mean: f32,
    pub std_dev: f32,
}

impl ZScore {
    pub const fn new(mean: f32, std_dev: f32) -> Self {
        Self { mean, std_dev }
    }

    /// `(value - mean) / std_dev`, unclamped
    #[inline]
    pub fn apply(&self, value: f32) -> f32 {
        (value - self.mean) / self.std_dev
    }

    /// Whether the standard deviation is usable as a divisor
    pub fn is_valid(&self) -> bool {
        self.mean.is_finite() && self.std_dev.is_finite() && self.std_dev > 0.0
    }
}

/// Normalization constants for the two input features
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NormalizationParams {
    pub temperature: ZScore,
    pub humidity: ZScore,
}

impl NormalizationParams {
    /// Absolute readings from one sensor
    #[allow(clippy::excessive_precision)]
    pub const SINGLE: Self = Self {
        temperature: ZScore::new(47.555_312_55, 4.639_538_85),
        humidity: ZScore::new(37.402_464_46, 7.423_242_74),
    };

    /// Exhaust minus ambient readings from two sensors
    #[allow(clippy::excessive_precision)]
    pub const DIFFERENTIAL: Self = Self {
        temperature: ZScore::new(15.650_849_95, 6.991_356_24),
        humidity: ZScore::new(-38.533_490_43, 12.271_719_64),
    };

    pub fn is_valid(&self) -> bool {
        self.temperature.is_valid() && self.humidity.is_valid()
    }
}
