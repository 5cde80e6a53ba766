//! Fail-open sensor acquisition
//!
//! Wraps one or two [`HumiditySensor`]s. A failed read never stops the
//! pipeline: the affected pair is replaced with [`Reading::ZERO`] and the
//! sample is still produced.

use predaguard_core::traits::{
    HumiditySensor, Reading, SensorAcquirer, SensorError, SensorSample,
};

/// Primary (exhaust) sensor plus an optional secondary (ambient) sensor
///
/// With a secondary sensor every sample is [`SensorSample::Dual`].
pub struct SensorRig<A, B> {
    primary: A,
    secondary: Option<B>,
    last_errors: [Option<SensorError>; 2],
}

impl<A: HumiditySensor, B: HumiditySensor> SensorRig<A, B> {
    pub fn new(primary: A, secondary: Option<B>) -> Self {
        Self {
            primary,
            secondary,
            last_errors: [None; 2],
        }
    }

    /// Errors of the most recent sample, per sensor
    pub fn last_errors(&self) -> [Option<SensorError>; 2] {
        self.last_errors
    }

    pub fn is_dual(&self) -> bool {
        self.secondary.is_some()
    }
}

async fn read_or_zero<S: HumiditySensor>(sensor: &mut S, error: &mut Option<SensorError>) -> Reading {
    match sensor.measure().await {
        Ok(reading) => {
            *error = None;
            reading
        }
        Err(e) => {
            *error = Some(e);
            Reading::ZERO
        }
    }
}

impl<A: HumiditySensor, B: HumiditySensor> SensorAcquirer for SensorRig<A, B> {
    async fn read_sensors(&mut self) -> SensorSample {
        let [first_err, second_err] = &mut self.last_errors;
        let first = read_or_zero(&mut self.primary, first_err).await;

        match self.secondary.as_mut() {
            Some(sensor) => {
                let second = read_or_zero(sensor, second_err).await;
                SensorSample::Dual(first, second)
            }
            None => {
                *second_err = None;
                SensorSample::Single(first)
            }
        }
    }

    fn last_degraded(&self) -> bool {
        self.last_errors.iter().any(Option::is_some)
    }
}
