//! Inference engine binding
//!
//! - `tflm` feature: TensorFlow Lite Micro through its C wrapper
//! - otherwise: a float32 stub so the loop runs end to end during bring-up

#[cfg(not(feature = "tflm"))]
mod stub;
#[cfg(feature = "tflm")]
mod tflm;

#[cfg(not(feature = "tflm"))]
pub use stub::StubEngine as Engine;
#[cfg(feature = "tflm")]
pub use tflm::TflmEngine as Engine;
