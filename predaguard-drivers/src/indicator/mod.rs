//! Status indicators

pub mod gpio;

pub use gpio::GpioIndicators;
