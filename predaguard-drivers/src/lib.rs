//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in predaguard-core:
//!
//! - AHT20 temperature/humidity sensor (async I2C)
//! - Fail-open sensor acquisition for one or two sensors
//! - GPIO indicator bank with mutually exclusive lines

#![no_std]
#![deny(unsafe_code)]

pub mod indicator;
pub mod sensor;
