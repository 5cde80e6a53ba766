//! Hardware and engine abstraction traits
//!
//! These traits define the interface between the pipeline logic
//! and the external collaborators it drives.

pub mod engine;
pub mod indicator;
pub mod sensor;

pub use engine::{ElementType, InferenceEngine, InitError, InvokeError, QuantParams, TensorInfo};
pub use indicator::{Indicator, IndicatorOutput};
pub use sensor::{HumiditySensor, Reading, SensorAcquirer, SensorError, SensorSample};
