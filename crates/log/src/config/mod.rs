//! Configuration types, loading and presets
//!
//! This module is organized into:
//! - `base`: the decoded document (`LogConfig`, `Level`, `Encoding`)
//! - `encoder`: key names and rendering strategies
//! - `defaults`: the built-in configuration
//! - `loader`: reading and decoding documents from disk
//! - `presets`: named level presets (development, production)

mod base;
mod defaults;
mod encoder;
mod loader;
mod presets;

pub use base::{Encoding, Level, LogConfig};
pub use defaults::default_config;
pub use encoder::{
    CallerEncoder, DurationEncoder, EncoderConfig, LevelEncoder, Sampling, TimeEncoder,
};
pub use loader::load_config;
pub use presets::Preset;
