//! Temperature/humidity sensors

pub mod aht20;
pub mod rig;

pub use aht20::Aht20;
pub use rig::SensorRig;
