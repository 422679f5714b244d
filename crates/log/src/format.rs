//! Format utilities (time, durations)

use std::sync::LazyLock;
use std::time::Duration;

use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;

use crate::config::{DurationEncoder, TimeEncoder};

/// Render `timestamp` as `YYYY-MM-DD HH:MM:SS.mmm`, in its own offset.
///
/// Records pass the current time in [`local_offset`].
pub fn format_timestamp(timestamp: OffsetDateTime) -> String {
    timestamp
        .format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]"
        ))
        .unwrap_or_default()
}

// The local offset can only be read soundly while the process is
// single-threaded on Unix, so it is read once and kept for the process.
static LOCAL_OFFSET: LazyLock<UtcOffset> =
    LazyLock::new(|| UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC));

/// Offset used for every rendered timestamp.
///
/// Fixed on first use: the local offset when it can be determined then,
/// UTC otherwise. Building a logger fixes it, so build before spawning
/// threads to get local time.
pub fn local_offset() -> UtcOffset {
    *LOCAL_OFFSET
}

/// Current time in [`local_offset`].
pub(crate) fn now() -> OffsetDateTime {
    OffsetDateTime::now_utc().to_offset(local_offset())
}

/// Timer that writes the fixed `YYYY-MM-DD HH:MM:SS.mmm` format in
/// [`local_offset`].
///
/// Usable with any `tracing_subscriber::fmt` layer via `with_timer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedTimer;

impl FormatTime for FixedTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        w.write_str(&format_timestamp(now()))
    }
}

impl TimeEncoder {
    /// Render a timestamp with this strategy
    pub fn encode(self, timestamp: OffsetDateTime) -> Value {
        let seconds = timestamp.unix_timestamp();
        let nanos = timestamp.nanosecond();
        match self {
            Self::Fixed => Value::String(format_timestamp(timestamp)),
            Self::Rfc3339 => Value::String(
                timestamp
                    .replace_nanosecond(0)
                    .unwrap_or(timestamp)
                    .format(&Rfc3339)
                    .unwrap_or_default(),
            ),
            Self::Rfc3339Nano => Value::String(timestamp.format(&Rfc3339).unwrap_or_default()),
            Self::Iso8601 => Value::String(
                timestamp
                    .format(format_description!(
                        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3][offset_hour sign:mandatory][offset_minute]"
                    ))
                    .unwrap_or_default(),
            ),
            Self::Millis => float(seconds as f64 * 1e3 + f64::from(nanos) / 1e6),
            Self::Nanos => Value::from(timestamp.unix_timestamp_nanos() as i64),
            Self::Epoch => float(seconds as f64 + f64::from(nanos) / 1e9),
        }
    }
}

impl DurationEncoder {
    /// Render a duration with this strategy
    pub fn encode(self, duration: Duration) -> Value {
        match self {
            Self::Text => Value::String(format!("{duration:?}")),
            Self::Nanos => Value::from(duration.as_nanos() as u64),
            Self::Ms => float(duration.as_nanos() as f64 / 1e6),
            Self::Second => float(duration.as_secs_f64()),
        }
    }
}

fn float(value: f64) -> Value {
    serde_json::Number::from_f64(value).map_or(Value::Null, Value::Number)
}
