//! Reading configuration documents

use std::path::Path;

use super::{LogConfig, TimeEncoder};
use crate::core::{LogError, LogResult};

impl LogConfig {
    /// Decode a JSON document.
    ///
    /// The document is taken as-is; see [`load_config`] for the file loader,
    /// which also pins the time encoder.
    pub fn from_json(document: &str) -> LogResult<Self> {
        Ok(serde_json::from_str(document)?)
    }

    /// Decode a JSON document from raw bytes
    pub fn from_slice(document: &[u8]) -> LogResult<Self> {
        Ok(serde_json::from_slice(document)?)
    }
}

/// Read and decode the configuration document at `path`.
///
/// The document's `timeEncoder` is always replaced with
/// [`TimeEncoder::Fixed`]. Nothing else is defaulted or validated here;
/// cross-field checks happen when the logger is built.
pub fn load_config(path: impl AsRef<Path>) -> LogResult<LogConfig> {
    let path = path.as_ref();
    let raw = std::fs::read(path).map_err(|e| LogError::io(path, e))?;

    let mut config = LogConfig::from_slice(&raw)?;
    config.encoder_config.time_encoder = TimeEncoder::Fixed;

    tracing::debug!(
        path = %path.display(),
        level = %config.level,
        encoding = %config.encoding,
        outputs = config.output_paths.len(),
        "loaded log configuration"
    );
    Ok(config)
}
