//! Live calibration
//!
//! Two buttons nudge the temperature offset while the pipeline runs. The
//! button handlers run in interrupt context and the perception loop reads
//! the result once per cycle, so all shared fields live in one atomic word.

pub mod debounce;
pub mod state;

pub use debounce::{Button, ButtonDebouncer, DebounceConfig, TriggerOutcome};
pub use state::{CalibrationSnapshot, CalibrationState};
