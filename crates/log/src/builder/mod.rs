//! Logger builder implementation
//!
//! This module is organized into:
//! - `reload`: runtime level changes
//!
//! Both build variants end in [`assemble`], which composes
//! `Registry -> level filter -> sampling -> encoder/sinks`.

mod reload;

// Re-export public types
pub use reload::LevelHandle;

// External dependencies
use tracing::Dispatch;
use tracing_subscriber::fmt::format::JsonFields;
use tracing_subscriber::{Registry, layer::SubscriberExt};

// Internal crates
use crate::config::{Encoding, LogConfig};
use crate::core::{LogError, LogResult};
use crate::encoder::Encoder;
use crate::format;
use crate::layer::SamplingLayer;
use crate::logger::Logger;
use crate::rolling::{RollingSink, RotationPolicy};
use crate::writer::{Sink, SinkSet};

/// Logger builder
#[derive(Debug, Clone)]
pub struct LoggerBuilder {
    config: LogConfig,
    rotation: Option<RotationPolicy>,
}

impl LoggerBuilder {
    /// Create builder from config
    #[must_use]
    pub fn from_config(config: LogConfig) -> Self {
        Self {
            config,
            rotation: None,
        }
    }

    /// Write to a size-rotated file instead of the configured outputs
    #[must_use]
    pub fn rotation(mut self, policy: RotationPolicy) -> Self {
        self.rotation = Some(policy);
        self
    }

    /// Configuration the logger will be built from
    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// Build the logger
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - rotation is requested without an output path
    /// - the encoder name is unknown (direct build only)
    /// - an output cannot be opened
    pub fn build(self) -> LogResult<Logger> {
        match self.rotation {
            Some(policy) => build_with_rotation(self.config, &policy),
            None => build_direct(self.config),
        }
    }
}

/// Build from the configured outputs, rejecting unknown encoder names
pub fn build_direct(config: LogConfig) -> LogResult<Logger> {
    let encoding = Encoding::parse(&config.encoding)?;
    let sinks = SinkSet::open_all(&config.output_paths, &config.error_output_paths)?;
    Ok(assemble(&config, encoding, sinks))
}

/// Build onto a size-rotated file at the first output path
pub fn build_with_rotation(config: LogConfig, policy: &RotationPolicy) -> LogResult<Logger> {
    let Some(target) = config.output_paths.first() else {
        return Err(LogError::config("no output file"));
    };
    if config.output_paths.len() > 1 {
        tracing::warn!(
            used = %target,
            ignored = config.output_paths.len() - 1,
            "rotation writes to the first output path only"
        );
    }

    let encoding = Encoding::select(&config.encoding);
    let output = Sink::Rolling(RollingSink::build(target, policy)?);
    let errors = config
        .error_output_paths
        .iter()
        .map(|p| Sink::open(p))
        .collect::<LogResult<Vec<_>>>()?;
    let sinks = SinkSet::new(vec![output], errors);

    tracing::debug!(
        path = %target,
        max_size_mb = policy.size_mb(),
        max_backups = policy.max_backups,
        max_age_days = policy.max_age_days,
        compress = policy.compress,
        "built rotating logger"
    );
    Ok(assemble(&config, encoding, sinks))
}

fn assemble(config: &LogConfig, encoding: Encoding, sinks: SinkSet) -> Logger {
    let offset = format::local_offset();
    tracing::debug!(%offset, "timestamps use a fixed offset");
    let (level_layer, level) = reload::create_level_layer(config.level);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .fmt_fields(JsonFields::new())
        .event_format(Encoder::new(encoding, config))
        .with_writer(sinks.clone());

    let subscriber = Registry::default()
        .with(level_layer)
        .with(SamplingLayer::new(config.sampling))
        .with(fmt_layer);

    Logger::new(
        Dispatch::new(subscriber),
        level,
        sinks,
        config.encoder_config.duration_encoder,
    )
}
