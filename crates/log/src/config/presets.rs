//! Configuration presets for common scenarios

use std::str::FromStr;

use super::{Level, LogConfig, default_config};
use crate::core::{LogError, LogResult};

/// Named shorthand selecting a minimum level on top of the built-in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Info level
    Production,
    /// Debug level
    Development,
}

impl Preset {
    /// Resolve a preset name; anything unrecognized, including `""`, is production.
    pub fn from_name(name: &str) -> Self {
        match name {
            "development" => Self::Development,
            "production" => Self::Production,
            other => {
                tracing::debug!(preset = other, "unknown preset, using production");
                Self::Production
            }
        }
    }

    /// Minimum level for this preset
    pub const fn level(self) -> Level {
        match self {
            Self::Production => Level::Info,
            Self::Development => Level::Debug,
        }
    }

    /// Built-in configuration with this preset's level applied
    pub fn config(self) -> LogConfig {
        default_config().with_level(self.level())
    }
}

impl FromStr for Preset {
    type Err = LogError;

    /// Strict variant of [`Preset::from_name`]
    fn from_str(s: &str) -> LogResult<Self> {
        match s {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            other => Err(LogError::config(format!("unknown preset {other:?}"))),
        }
    }
}

impl LogConfig {
    /// Development configuration (debug level)
    #[must_use]
    pub fn development() -> Self {
        Preset::Development.config()
    }

    /// Production configuration (info level)
    #[must_use]
    pub fn production() -> Self {
        Preset::Production.config()
    }
}
