//! Embassy async tasks
//!
//! Each task runs independently and communicates via the statics in
//! [`crate::channels`].

pub mod buttons;
pub mod indicator;
pub mod perception;

pub use buttons::button_task;
pub use indicator::{indicator_task, Indicators};
pub use perception::{perception_task, Sensors};
