//! Core configuration types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::LevelFilter;

use super::{EncoderConfig, Sampling};
use crate::core::{LogError, LogResult};

/// Logging configuration, decoded from a zap-style JSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogConfig {
    /// Minimum severity that reaches the sinks
    #[serde(default)]
    pub level: Level,

    /// Encoder name (`json` or `console`)
    #[serde(default)]
    pub encoding: String,

    /// Write destinations: `stdout`, `stderr` or a file path.
    ///
    /// With rotation enabled only the first entry is used.
    #[serde(default)]
    pub output_paths: Vec<String>,

    /// Destinations for the logger's own write failures
    #[serde(default)]
    pub error_output_paths: Vec<String>,

    /// Key names and rendering strategies
    #[serde(default)]
    pub encoder_config: EncoderConfig,

    /// Skip stacktrace capture on error events
    #[serde(default)]
    pub disable_stacktrace: bool,

    /// Skip caller (`file:line`) annotation
    #[serde(default)]
    pub disable_caller: bool,

    /// Sampling of repeated records, disabled when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sampling: Option<Sampling>,

    /// Fields added to every record
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub initial_fields: BTreeMap<String, serde_json::Value>,
}

impl LogConfig {
    /// Replace the minimum severity
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set the minimum severity in place
    pub fn set_level(&mut self, level: Level) {
        self.level = level;
    }
}

/// Log severity
///
/// Ordered from least to most severe. `DPanic`, `Panic` and `Fatal` exist so
/// documents written for zap decode cleanly; as a minimum level they silence
/// every `tracing` event, since `tracing` has nothing above `ERROR`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Debug level
    #[serde(alias = "DEBUG")]
    Debug,
    /// Info level
    #[default]
    #[serde(alias = "INFO")]
    Info,
    /// Warn level
    #[serde(alias = "WARN")]
    Warn,
    /// Error level
    #[serde(alias = "ERROR")]
    Error,
    /// Development panic level
    #[serde(alias = "DPANIC")]
    DPanic,
    /// Panic level
    #[serde(alias = "PANIC")]
    Panic,
    /// Fatal level
    #[serde(alias = "FATAL")]
    Fatal,
}

impl Level {
    /// Lowercase name, as written in configuration documents
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::DPanic => "dpanic",
            Self::Panic => "panic",
            Self::Fatal => "fatal",
        }
    }

    /// Filter letting this level and everything more severe through
    pub const fn as_filter(self) -> LevelFilter {
        match self {
            Self::Debug => LevelFilter::DEBUG,
            Self::Info => LevelFilter::INFO,
            Self::Warn => LevelFilter::WARN,
            Self::Error => LevelFilter::ERROR,
            Self::DPanic | Self::Panic | Self::Fatal => LevelFilter::OFF,
        }
    }

    /// Map a `tracing` level onto the configuration scale.
    ///
    /// `TRACE` has no counterpart and renders as debug.
    pub fn from_tracing(level: tracing::Level) -> Self {
        match level {
            tracing::Level::ERROR => Self::Error,
            tracing::Level::WARN => Self::Warn,
            tracing::Level::INFO => Self::Info,
            _ => Self::Debug,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Level {
    type Err = LogError;

    fn from_str(s: &str) -> LogResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" | "" => Ok(Self::Info),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            "dpanic" => Ok(Self::DPanic),
            "panic" => Ok(Self::Panic),
            "fatal" => Ok(Self::Fatal),
            other => Err(LogError::config(format!("unrecognized level: {other:?}"))),
        }
    }
}

/// Record encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Field-tagged JSON, one object per line
    Json,
    /// Human-readable, separator-delimited line
    Console,
}

impl Encoding {
    /// Resolve an encoder name, rejecting anything unknown
    pub fn parse(name: &str) -> LogResult<Self> {
        match name {
            "json" | "structured" => Ok(Self::Json),
            "console" => Ok(Self::Console),
            "" => Err(LogError::build("no encoder name specified")),
            other => Err(LogError::build(format!(
                "no encoder registered for name {other:?}"
            ))),
        }
    }

    /// Resolve an encoder name, treating anything that is not JSON as console
    pub fn select(name: &str) -> Self {
        Self::parse(name).unwrap_or(Self::Console)
    }
}
