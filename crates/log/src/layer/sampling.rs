//! Sampling layer
//!
//! Records are grouped by level and message. Within each one-second window
//! the first `initial` records of a group are kept, then every
//! `thereafter`-th one.

use std::collections::HashMap;
use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::config::Sampling;

const TICK: Duration = Duration::from_secs(1);

/// Groups tracked before stale windows are swept
const MAX_GROUPS: usize = 4096;

type GroupKey = (Level, u64);

#[derive(Debug)]
struct Window {
    start: Instant,
    count: u64,
}

/// Layer dropping repeated records according to [`Sampling`]
#[derive(Debug)]
pub struct SamplingLayer {
    sampling: Option<Sampling>,
    windows: Mutex<HashMap<GroupKey, Window>>,
}

impl SamplingLayer {
    /// Create a layer; `None` keeps every record
    pub fn new(sampling: Option<Sampling>) -> Self {
        Self {
            sampling,
            windows: Mutex::new(HashMap::new()),
        }
    }

    fn admit(&self, key: GroupKey, now: Instant) -> bool {
        let Some(sampling) = self.sampling else {
            return true;
        };
        let mut windows = self.windows.lock();
        if windows.len() >= MAX_GROUPS && !windows.contains_key(&key) {
            windows.retain(|_, w| now.duration_since(w.start) < TICK);
        }
        let window = windows.entry(key).or_insert(Window {
            start: now,
            count: 0,
        });
        if now.duration_since(window.start) >= TICK {
            window.start = now;
            window.count = 0;
        }
        window.count += 1;
        keep(sampling, window.count)
    }
}

/// Whether the `n`-th record (1-based) of a window is written
fn keep(sampling: Sampling, n: u64) -> bool {
    if n <= sampling.initial {
        return true;
    }
    sampling.thereafter > 0 && (n - sampling.initial) % sampling.thereafter == 0
}

/// Hashes the `message` field of an event
struct MessageHash(DefaultHasher);

impl Visit for MessageHash {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            value.hash(&mut self.0);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            format!("{value:?}").hash(&mut self.0);
        }
    }
}

fn group_key(event: &Event<'_>) -> GroupKey {
    let mut visitor = MessageHash(DefaultHasher::new());
    event.record(&mut visitor);
    (*event.metadata().level(), visitor.0.finish())
}

impl<S: Subscriber> Layer<S> for SamplingLayer {
    fn event_enabled(&self, event: &Event<'_>, _ctx: Context<'_, S>) -> bool {
        if self.sampling.is_none() {
            return true;
        }
        self.admit(group_key(event), Instant::now())
    }
}
