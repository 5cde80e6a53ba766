//! Perception loop
//!
//! Every cycle: read the sensors, snapshot the calibration, run the
//! pipeline, log, and forward a commit to the indicator task. The pause
//! between cycles is a fixed sleep, not a period, so slow sensor reads
//! never eat into it.

use defmt::*;
use embassy_rp::i2c::{Async, I2c};
use embassy_rp::peripherals::{I2C0, I2C1};
use embassy_time::{Delay, Timer};

use predaguard_core::pipeline::{CyclePause, CycleReport, Pipeline};
use predaguard_core::traits::{SensorAcquirer, SensorSample};
use predaguard_drivers::sensor::{Aht20, SensorRig};

use crate::channels::{CALIBRATION, INDICATOR_CMD};
use crate::engine::Engine;

/// Exhaust sensor on I2C0, optional ambient sensor on I2C1
pub type Sensors = SensorRig<
    Aht20<I2c<'static, I2C0, Async>, Delay>,
    Aht20<I2c<'static, I2C1, Async>, Delay>,
>;

#[embassy_executor::task]
pub async fn perception_task(
    mut pipeline: Pipeline<Engine>,
    mut sensors: Sensors,
    pause: CyclePause,
) {
    info!("Perception task started: {}", pause);

    loop {
        let sample = sensors.read_sensors().await;
        match sample {
            SensorSample::Single(r) => {
                debug!("T: {} C | RH: {} %", r.temperature, r.humidity);
            }
            SensorSample::Dual(exhaust, ambient) => debug!(
                "Exhaust T: {} C RH: {} % | Ambient T: {} C RH: {} %",
                exhaust.temperature, exhaust.humidity, ambient.temperature, ambient.humidity
            ),
        }
        if sensors.last_degraded() {
            warn!("Sensor read failed, using zero reading: {}", sensors.last_errors());
        }

        let calibration = CALIBRATION.snapshot();

        let outcome = pipeline.run_cycle(&sample, calibration);
        let pause_ms = pause.after(&outcome);

        match outcome {
            Ok(report) => log_and_forward(&report),
            Err(e) => warn!("Inference failed: {}, retrying in {} ms", e, pause_ms),
        }

        Timer::after_millis(pause_ms as u64).await;
    }
}

/// Log one cycle and forward a commit to the indicator task
fn log_and_forward(report: &CycleReport) {
    let [x0, x1] = report.features.inputs;
    let [z0, z1] = report.features.values;
    let result = report.result;
    info!(
        "In: {} / {} | Z: {} / {} | Scores: {} -> {} ({}%)",
        x0,
        x1,
        z0,
        z1,
        result.scores,
        result.predicted.label(),
        result.confidence * 100.0
    );

    if let Some(indicator) = report.commit {
        info!("State committed: {}", indicator.label());
        INDICATOR_CMD.signal(indicator);
    }
}
