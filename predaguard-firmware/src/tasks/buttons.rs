//! Calibration button tasks
//!
//! One task instance per button. The falling-edge interrupt wakes the task,
//! which timestamps the edge and hands it to the shared debouncer.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::Instant;

use predaguard_core::calibration::{Button, ButtonDebouncer, DebounceConfig, TriggerOutcome};

use crate::channels::CALIBRATION;

#[embassy_executor::task(pool_size = 2)]
pub async fn button_task(mut input: Input<'static>, button: Button, config: DebounceConfig) {
    info!("Button {} task started", button);

    let debouncer = ButtonDebouncer::new(&CALIBRATION, config);

    loop {
        input.wait_for_falling_edge().await;
        // Milliseconds since boot; wraps after ~49.7 days like the debouncer expects
        let now_ms = Instant::now().as_millis() as u32;

        match debouncer.on_edge(button, now_ms) {
            TriggerOutcome::Accepted(snapshot) => {
                if snapshot.lock() {
                    info!(
                        "Offset set to {} C, humidity lock on",
                        snapshot.offset()
                    );
                } else {
                    info!("Offset reset to 0, humidity lock off");
                }
            }
            TriggerOutcome::Rejected { elapsed_ms } => {
                debug!("Button {} bounce ignored ({} ms)", button, elapsed_ms);
            }
        }
    }
}
