//! Board-agnostic signal-to-decision pipeline for the PredaGuard firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Interface traits for the external collaborators (sensors, inference
//!   engine, indicator outputs)
//! - Interrupt-shared calibration state and button debouncing
//! - Feature extraction (single-sensor and differential z-scores)
//! - Affine quantization and tensor binding
//! - Argmax classification
//! - Hysteresis filter for the displayed state
//! - Per-cycle pipeline orchestration
//! - Configuration types and the embedded config parser

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod calibration;
pub mod classifier;
pub mod config;
pub mod features;
pub mod pipeline;
pub mod quant;
pub mod stability;
pub mod traits;

/// Number of input features the classifier expects
pub const FEATURE_COUNT: usize = 2;

/// Number of output classes the classifier produces
pub const NUM_CLASSES: usize = 3;
