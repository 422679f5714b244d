//! Operation timing

use std::panic::Location;
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::logger::{Logger, leveled};

/// Measures one operation and reports it through the logger that started it
#[derive(Debug)]
pub struct Timer<'a> {
    logger: &'a Logger,
    name: &'a str,
    start: Instant,
}

impl<'a> Timer<'a> {
    pub(crate) fn start(logger: &'a Logger, name: &'a str) -> Self {
        Self {
            logger,
            name,
            start: Instant::now(),
        }
    }

    /// Time since the timer started
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Write an info event with the elapsed time, rendered by the
    /// configured duration encoder, and return it. The event is attributed
    /// to the code calling `finish`.
    #[track_caller]
    pub fn finish(self) -> Duration {
        let location = Location::caller();
        let (file, line) = (location.file(), location.line());
        let elapsed = self.elapsed();
        let name = self.name;
        let value = self.logger.durations().encode(elapsed);
        self.logger.in_scope(|| match value {
            Value::Number(n) if n.is_u64() => {
                let nanos = n.as_u64().unwrap_or(0);
                leveled!(info, file, line, timer = name, elapsed = nanos, "timer finished");
            }
            Value::Number(n) => {
                let amount = n.as_f64().unwrap_or(0.0);
                leveled!(info, file, line, timer = name, elapsed = amount, "timer finished");
            }
            other => {
                let text = other.as_str().map_or_else(|| other.to_string(), str::to_string);
                leveled!(info, file, line, timer = name, elapsed = %text, "timer finished");
            }
        });
        elapsed
    }
}
