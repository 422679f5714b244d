//! Error handling for strata-log
//!
//! Every fallible operation returns [`LogResult<T>`]. Nothing is retried or
//! recovered internally; the error goes straight back to the caller.

use std::path::PathBuf;

/// Result type for logger assembly
pub type LogResult<T> = Result<T, LogError>;

/// Error type for logger assembly
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// The configuration file could not be read
    #[error("failed to read log configuration '{}': {source}", path.display())]
    Io {
        /// Path that was being read
        path: PathBuf,
        /// Underlying IO failure
        #[source]
        source: std::io::Error,
    },

    /// The configuration document is not valid JSON or does not match the schema
    #[error("failed to decode log configuration: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configuration is well-formed but semantically unusable
    #[error("invalid log configuration: {0}")]
    Config(String),

    /// The logging pipeline rejected the resolved configuration
    #[error("failed to build logger: {0}")]
    Build(String),
}

impl LogError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a build error
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build(message.into())
    }

    /// Create a read error for `path`
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
