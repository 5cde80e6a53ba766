//! Indicator LED task

use defmt::*;
use embassy_rp::gpio::Output;

use predaguard_core::traits::IndicatorOutput;
use predaguard_drivers::indicator::GpioIndicators;

use crate::channels::INDICATOR_CMD;

/// Blue/green/red LED bank on the board
pub type Indicators = GpioIndicators<Output<'static>>;

/// Drive the LEDs whenever the perception task commits a new state
#[embassy_executor::task]
pub async fn indicator_task(mut leds: Indicators) {
    info!("Indicator task started");

    loop {
        let indicator = INDICATOR_CMD.wait().await;
        // RP2040 GPIO writes cannot fail
        leds.set_indicator(indicator).ok();
        debug!("Indicator: {}", indicator.label());
    }
}
