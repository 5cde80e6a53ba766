//! Shared state between tasks
//!
//! Defines the statics used for communication between Embassy tasks.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use predaguard_core::calibration::CalibrationState;
use predaguard_core::traits::Indicator;

/// Live calibration (written by the button tasks, read once per cycle)
pub static CALIBRATION: CalibrationState = CalibrationState::new();

/// Indicator to display (updated by the perception task on each commit)
pub static INDICATOR_CMD: Signal<CriticalSectionRawMutex, Indicator> = Signal::new();
