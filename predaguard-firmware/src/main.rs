//! PredaGuard - Environmental Perception Firmware
//!
//! Main firmware binary for RP2040-based monitors. Samples one or two
//! AHT20 sensors, classifies the normalized readings with a small model
//! and shows the debounced result on three LEDs.
//!
//! Pin assignments (Raspberry Pi Pico based board):
//! - I2C0 (GPIO0 SDA, GPIO1 SCL): exhaust / only sensor
//! - I2C1 (GPIO2 SDA, GPIO3 SCL): ambient sensor, differential mode only
//! - GPIO12 blue = idle, GPIO11 green = active, GPIO13 red = alert
//! - GPIO5 button A (offset down), GPIO6 button B (offset up)

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{I2C0, I2C1};
use embassy_time::{Delay, Timer};
use {defmt_rtt as _, panic_probe as _};

use predaguard_core::calibration::Button;
use predaguard_core::config::FeatureMode;
use predaguard_core::pipeline::{CyclePause, Pipeline};
use predaguard_core::traits::{Indicator, IndicatorOutput};
use predaguard_drivers::indicator::GpioIndicators;
use predaguard_drivers::sensor::{Aht20, SensorRig};

mod channels;
mod config;
mod engine;
mod tasks;

bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
    I2C1_IRQ => i2c::InterruptHandler<I2C1>;
});

/// Time for the debug probe to attach before the pipeline starts
const STARTUP_DELAY_MS: u64 = 2000;

/// AHT20 bus speed
const I2C_FREQUENCY_HZ: u32 = 400_000;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("PredaGuard firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load_config();
    info!(
        "Pipeline config: mode={}, cycle={}ms, threshold={}, step={}, debounce={}ms",
        config.mode,
        config.cycle_ms,
        config.stable_threshold,
        config.calibration.step,
        config.calibration.window_ms
    );

    // LEDs, indexed by class: [idle, active, alert]
    let mut leds: tasks::Indicators = match GpioIndicators::new_active_high([
        Output::new(p.PIN_12, Level::Low),
        Output::new(p.PIN_11, Level::Low),
        Output::new(p.PIN_13, Level::Low),
    ]) {
        Ok(leds) => leds,
        Err(e) => match e {},
    };

    Timer::after_millis(STARTUP_DELAY_MS).await;

    // Sensors
    let exhaust = Aht20::new(
        I2c::new_async(p.I2C0, p.PIN_1, p.PIN_0, Irqs, i2c_config()),
        Delay,
    );
    let ambient = match config.mode {
        FeatureMode::Differential => Some(Aht20::new(
            I2c::new_async(p.I2C1, p.PIN_3, p.PIN_2, Irqs, i2c_config()),
            Delay,
        )),
        FeatureMode::Single => None,
    };
    let sensors: tasks::Sensors = SensorRig::new(exhaust, ambient);
    info!("I2C initialized ({} sensor(s))", config.mode.sensor_count());

    // Green until the first committed state; halt() turns it off again
    leds.set_indicator(Indicator::BOOT_OK).ok();

    // Inference engine
    let pipeline = match Pipeline::new(engine::Engine::new(), &config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!("Failed to initialize inference engine: {}", e);
            halt(&mut leds);
        }
    };
    info!("Tensor binding: {}", pipeline.binding());
    if let Some(bytes) = pipeline.engine().arena_used_bytes() {
        info!("Tensor arena used: {} bytes", bytes);
    }

    // Calibration buttons (active low, internal pull-ups)
    let button_a = Input::new(p.PIN_5, Pull::Up);
    let button_b = Input::new(p.PIN_6, Pull::Up);

    let pause = CyclePause::from_config(&config);

    // Spawn tasks
    spawner.spawn(tasks::indicator_task(leds)).unwrap();
    spawner
        .spawn(tasks::button_task(button_a, Button::A, config.calibration))
        .unwrap();
    spawner
        .spawn(tasks::button_task(button_b, Button::B, config.calibration))
        .unwrap();
    spawner
        .spawn(tasks::perception_task(pipeline, sensors, pause))
        .unwrap();

    info!("All tasks spawned, PredaGuard running");

    loop {
        Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Sensor bus configuration (both buses)
fn i2c_config() -> i2c::Config {
    let mut config = i2c::Config::default();
    config.frequency = I2C_FREQUENCY_HZ;
    config
}

/// Stop useful operation after a fatal error
///
/// All indicators off, core parked until reset.
fn halt(leds: &mut tasks::Indicators) -> ! {
    leds.clear().ok();
    error!("Halted");
    loop {
        cortex_m::asm::wfi();
    }
}
