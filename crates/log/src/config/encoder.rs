//! Encoder configuration: key names and rendering strategies

use serde::{Deserialize, Deserializer, Serialize};

/// Key names and rendering strategies for encoded records.
///
/// A key left empty drops that element from the output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EncoderConfig {
    /// Key for the event message
    pub message_key: String,
    /// Key for the severity
    pub level_key: String,
    /// Key for the timestamp
    pub time_key: String,
    /// Key for the logger name (the event target)
    pub name_key: String,
    /// Key for the `file:line` caller annotation
    pub caller_key: String,
    /// Key for captured stacktraces
    pub stacktrace_key: String,
    /// Record terminator, `\n` when empty
    pub line_ending: String,
    /// Element separator for the console encoder, `\t` when empty
    pub console_separator: String,
    /// How severities are rendered
    pub level_encoder: LevelEncoder,
    /// How timestamps are rendered
    pub time_encoder: TimeEncoder,
    /// How durations are rendered
    pub duration_encoder: DurationEncoder,
    /// How caller paths are rendered
    pub caller_encoder: CallerEncoder,
    /// Accepted for compatibility with zap documents, which commonly place
    /// sampling here. It has no effect; see [`LogConfig::sampling`].
    ///
    /// [`LogConfig::sampling`]: crate::LogConfig::sampling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampling: Option<Sampling>,
}

impl EncoderConfig {
    /// Record terminator
    pub fn line_ending(&self) -> &str {
        if self.line_ending.is_empty() {
            "\n"
        } else {
            &self.line_ending
        }
    }

    /// Console element separator
    pub fn console_separator(&self) -> &str {
        if self.console_separator.is_empty() {
            "\t"
        } else {
            &self.console_separator
        }
    }
}

/// Severity rendering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LevelEncoder {
    /// `INFO`
    Capital,
    /// `INFO` wrapped in ANSI colors
    CapitalColor,
    /// `info` wrapped in ANSI colors
    Color,
    /// `info`
    #[default]
    #[serde(other)]
    Lowercase,
}

/// Timestamp rendering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeEncoder {
    /// `YYYY-MM-DD HH:MM:SS.mmm`, local time
    #[default]
    Fixed,
    /// RFC 3339, second precision
    Rfc3339,
    /// RFC 3339, nanosecond precision
    Rfc3339Nano,
    /// ISO 8601 with milliseconds
    Iso8601,
    /// Unix milliseconds as a float
    Millis,
    /// Unix nanoseconds as an integer
    Nanos,
    /// Unix seconds as a float
    #[serde(other)]
    Epoch,
}

/// Duration rendering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationEncoder {
    /// Human-readable string, e.g. `1.5s`
    #[serde(rename = "string")]
    Text,
    /// Integer nanoseconds
    Nanos,
    /// Float milliseconds
    Ms,
    /// Float seconds
    #[default]
    #[serde(other)]
    Second,
}

/// Caller path rendering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallerEncoder {
    /// Path as recorded by the compiler
    Full,
    /// Last directory and file name
    #[default]
    #[serde(other)]
    Short,
}

/// Sampling parameters.
///
/// Within each one-second window, the first `initial` events with the same
/// level and message are kept, then every `thereafter`-th one.
/// `thereafter == 0` drops the rest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sampling {
    /// Events kept unconditionally per window
    #[serde(default, deserialize_with = "lenient_u64")]
    pub initial: u64,
    /// Keep one in this many after `initial`
    #[serde(default, deserialize_with = "lenient_u64")]
    pub thereafter: u64,
}

/// Accepts `3` as well as `"3"`.
fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
