//! Per-cycle orchestration
//!
//! One cycle: extract features, write the input tensor, invoke, read and
//! classify the scores, feed the stability filter. Sensor acquisition and
//! actuation stay with the caller so this module is synchronous and
//! hardware-free.
//!
//! A failed invoke returns early, before the filter is touched, so an
//! engine hiccup never counts toward a display change.

use crate::calibration::CalibrationSnapshot;
use crate::classifier::{classify, ClassificationResult};
use crate::config::PipelineConfig;
use crate::features::{FeatureExtractor, FeatureStrategy, Features};
use crate::quant::TensorBinding;
use crate::stability::StabilityFilter;
use crate::traits::{Indicator, InferenceEngine, InitError, InvokeError, SensorSample};

/// Everything one successful cycle produced, for logging and actuation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleReport {
    pub features: Features,
    pub result: ClassificationResult,
    /// Newly committed indicator, only on the cycle the display changes
    pub commit: Option<Indicator>,
}

/// Sleep inserted after each cycle
///
/// Durations are counted from the end of the cycle, so a slow sensor read
/// delays the next cycle instead of shortening the pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CyclePause {
    /// Pause after a completed cycle (ms)
    pub after_cycle_ms: u32,
    /// Pause after a failed invoke (ms)
    pub after_failure_ms: u32,
}

impl CyclePause {
    pub const fn from_config(config: &PipelineConfig) -> Self {
        Self {
            after_cycle_ms: config.cycle_ms,
            after_failure_ms: config.retry_pause_ms,
        }
    }

    /// Pause to sleep after a cycle with the given outcome
    pub fn after(&self, outcome: &Result<CycleReport, InvokeError>) -> u32 {
        match outcome {
            Ok(_) => self.after_cycle_ms,
            Err(_) => self.after_failure_ms,
        }
    }
}

/// Signal-to-decision pipeline around an inference engine
pub struct Pipeline<E: InferenceEngine> {
    engine: E,
    binding: TensorBinding,
    extractor: FeatureStrategy,
    filter: StabilityFilter,
}

impl<E: InferenceEngine> Pipeline<E> {
    /// Initialize the engine and bind its tensors
    ///
    /// Any error is fatal; the engine is dropped.
    pub fn new(mut engine: E, config: &PipelineConfig) -> Result<Self, InitError> {
        engine.init()?;
        let binding = TensorBinding::bind(&engine)?;

        Ok(Self {
            engine,
            binding,
            extractor: FeatureStrategy::from_config(config),
            filter: StabilityFilter::new(config.stable_threshold),
        })
    }

    /// Run one cycle on an acquired sample
    pub fn run_cycle(
        &mut self,
        sample: &SensorSample,
        calibration: CalibrationSnapshot,
    ) -> Result<CycleReport, InvokeError> {
        let features = self.extractor.extract(sample, calibration);

        self.binding
            .write_features(&features.values, self.engine.input_buffer());
        self.engine.invoke()?;
        let scores = self.binding.read_scores(self.engine.output_buffer());

        let result = classify(scores);
        let commit = self.filter.observe(result.predicted);

        Ok(CycleReport {
            features,
            result,
            commit,
        })
    }

    /// Indicator currently committed by the stability filter
    pub fn committed(&self) -> Option<Indicator> {
        self.filter.committed()
    }

    pub fn filter(&self) -> &StabilityFilter {
        &self.filter
    }

    pub fn binding(&self) -> &TensorBinding {
        &self.binding
    }

    pub fn extractor(&self) -> &FeatureStrategy {
        &self.extractor
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }
}
