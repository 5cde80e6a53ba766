//! Configuration types
//!
//! The firmware embeds `pipeline.toml` at build time and parses it at boot
//! with [`parse_config`].

pub mod parse;
pub mod types;

pub use parse::parse_config;
pub use types::*;
