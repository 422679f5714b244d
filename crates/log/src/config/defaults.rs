//! Built-in configuration

use std::sync::LazyLock;

use super::{LogConfig, TimeEncoder};

/// Document behind [`default_config`].
const DEFAULT_DOCUMENT: &str = r#"{
    "level": "info",
    "encoding": "console",
    "outputPaths": ["stdout"],
    "errorOutputPaths": ["stderr"],
    "encoderConfig": {
        "messageKey": "message",
        "levelKey": "level",
        "nameKey": "logger",
        "timeKey": "time",
        "callerKey": "caller",
        "stacktraceKey": "stacktrace",
        "timeEncoder": "rfc3339",
        "levelEncoder": "capitalColor",
        "durationEncoder": "second",
        "sampling": {
            "initial": "3",
            "thereafter": "10"
        }
    }
}"#;

// Decoded once; every caller gets its own clone.
static DEFAULT: LazyLock<LogConfig> = LazyLock::new(|| {
    let mut config = LogConfig::from_json(DEFAULT_DOCUMENT)
        .unwrap_or_else(|e| panic!("built-in log configuration is malformed: {e}"));
    config.encoder_config.time_encoder = TimeEncoder::Fixed;
    config
});

/// Built-in configuration: info level, console encoding, stdout/stderr.
pub fn default_config() -> LogConfig {
    DEFAULT.clone()
}

impl Default for LogConfig {
    fn default() -> Self {
        default_config()
    }
}
