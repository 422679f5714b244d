//! # Strata Log
//!
//! Build `tracing` loggers from zap-style JSON configuration documents, with
//! optional size-based file rotation.
//!
//! ## Quick Start
//!
//! ```no_run
//! use strata_log::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let logger = strata_log::load_from_file("log.json")?;
//!     logger.in_scope(|| info!(port = 8080, "server starting"));
//!     logger.sync()?;
//!     Ok(())
//! }
//! ```
//!
//! Rotation writes the first output path through a rolling file:
//!
//! ```no_run
//! use strata_log::{RotationPolicy, load_from_file_with_rotation};
//!
//! let logger = load_from_file_with_rotation("log.json", RotationPolicy::new(50, 5, 14, true))?;
//! logger.info("rotating");
//! # Ok::<(), strata_log::LogError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod builder;
mod config;
mod core;
mod encoder;
mod format;
mod layer;
mod logger;
mod macros;
mod rolling;
mod timer;
mod writer;

use std::path::Path;

// Public API
pub use builder::{LevelHandle, LoggerBuilder, build_direct, build_with_rotation};
pub use config::{
    CallerEncoder, DurationEncoder, EncoderConfig, Encoding, Level, LevelEncoder, LogConfig,
    Preset, Sampling, TimeEncoder, default_config, load_config,
};
pub use crate::core::{LogError, LogResult};
pub use encoder::Encoder;
pub use format::{FixedTimer, format_timestamp, local_offset};
pub use layer::SamplingLayer;
pub use logger::Logger;
pub use rolling::{RollingSink, RotationPolicy};
pub use timer::Timer;
pub use writer::{Sink, SinkSet, SinkWriter};

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Level, LogConfig, LogError, LogResult, Logger, LoggerBuilder, RotationPolicy, debug,
        error, info, load_from_file, load_from_file_with_rotation, resolve_preset, span, timed,
        warn,
    };

    pub use tracing::{Span, field};
}

// Re-export tracing macros
pub use tracing::{debug, error, info, instrument, span, trace, warn};

// ============================================================================
// Initialization Functions
// ============================================================================

/// Build a logger from the configuration document at `path`
pub fn load_from_file(path: impl AsRef<Path>) -> LogResult<Logger> {
    LoggerBuilder::from_config(load_config(path)?).build()
}

/// Build a logger from the document at `path`, writing its first output path
/// through a size-rotated file
pub fn load_from_file_with_rotation(
    path: impl AsRef<Path>,
    policy: RotationPolicy,
) -> LogResult<Logger> {
    LoggerBuilder::from_config(load_config(path)?)
        .rotation(policy)
        .build()
}

/// Build a logger from the built-in configuration at the level named by
/// `env` (`development` is debug, anything else is info)
pub fn resolve_preset(env: &str) -> LogResult<Logger> {
    LoggerBuilder::from_config(Preset::from_name(env).config()).build()
}
