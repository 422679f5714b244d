//! Assembled logger handle

use std::io;
use std::panic::Location;

use tracing::Dispatch;
use tracing::dispatcher::{self, DefaultGuard};

use crate::builder::LevelHandle;
use crate::config::{DurationEncoder, Level};
use crate::core::{LogError, LogResult};
use crate::timer::Timer;
use crate::writer::SinkSet;

/// Emit an unnamed event carrying an explicit caller location.
macro_rules! leveled {
    (@level trace) => { tracing::Level::TRACE };
    (@level debug) => { tracing::Level::DEBUG };
    (@level info) => { tracing::Level::INFO };
    (@level warn) => { tracing::Level::WARN };
    (@level error) => { tracing::Level::ERROR };
    ($level:ident, $file:expr, $line:expr, $($rest:tt)+) => {
        tracing::event!(target: "", leveled!(@level $level), caller.file = $file, caller.line = $line, $($rest)+)
    };
}
pub(crate) use leveled;

/// Handle to an assembled logging pipeline.
///
/// Events reach the pipeline either through the leveled methods here or,
/// once installed with [`Logger::set_default`], [`Logger::in_scope`] or
/// [`Logger::init_global`], through the ordinary `tracing` macros. Clones
/// share the pipeline; the sinks close when the last clone is dropped.
#[derive(Clone)]
pub struct Logger {
    dispatch: Dispatch,
    level: LevelHandle,
    sinks: SinkSet,
    durations: DurationEncoder,
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level.get())
            .field("sinks", &self.sinks)
            .finish_non_exhaustive()
    }
}

impl Logger {
    pub(crate) fn new(
        dispatch: Dispatch,
        level: LevelHandle,
        sinks: SinkSet,
        durations: DurationEncoder,
    ) -> Self {
        Self {
            dispatch,
            level,
            sinks,
            durations,
        }
    }

    /// Current minimum level
    pub fn level(&self) -> Level {
        self.level.get()
    }

    /// Change the minimum level for every clone of this logger
    pub fn set_level(&self, level: Level) -> LogResult<()> {
        self.level.set(level)
    }

    /// Whether a record at `level` would be written
    pub fn enabled(&self, level: Level) -> bool {
        let min = self.level();
        min.as_filter() != tracing::level_filters::LevelFilter::OFF && level >= min
    }

    /// Underlying dispatcher
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Run `f` with this logger as the thread's default subscriber
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        dispatcher::with_default(&self.dispatch, f)
    }

    /// Make this logger the thread's default subscriber until the guard drops
    #[must_use = "the logger is uninstalled when the guard is dropped"]
    pub fn set_default(&self) -> DefaultGuard {
        dispatcher::set_default(&self.dispatch)
    }

    /// Install this logger as the process-wide subscriber
    ///
    /// # Errors
    /// Returns error if a global subscriber was already set
    pub fn init_global(&self) -> LogResult<()> {
        dispatcher::set_global_default(self.dispatch.clone())
            .map_err(|e| LogError::build(format!("failed to install global logger: {e}")))
    }

    /// Write `message` at `level`.
    ///
    /// The record is attributed to the calling code: its caller annotation
    /// is the call site of this method and it carries no logger name.
    /// Levels above `error` are written as error events.
    #[track_caller]
    pub fn log(&self, level: Level, message: &str) {
        let location = Location::caller();
        let (file, line) = (location.file(), location.line());
        self.in_scope(|| match level {
            Level::Debug => leveled!(debug, file, line, "{message}"),
            Level::Info => leveled!(info, file, line, "{message}"),
            Level::Warn => leveled!(warn, file, line, "{message}"),
            Level::Error => leveled!(error, file, line, "{message}"),
            Level::DPanic | Level::Panic | Level::Fatal => {
                leveled!(error, file, line, severity = level.as_str(), "{message}");
            }
        });
    }

    /// Write `message` at debug level
    #[track_caller]
    pub fn debug(&self, message: &str) {
        self.log(Level::Debug, message);
    }

    /// Write `message` at info level
    #[track_caller]
    pub fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    /// Write `message` at warn level
    #[track_caller]
    pub fn warn(&self, message: &str) {
        self.log(Level::Warn, message);
    }

    /// Write `message` at error level
    #[track_caller]
    pub fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }

    /// Start timing an operation; see [`Timer::finish`]
    pub fn timer<'a>(&'a self, name: &'a str) -> Timer<'a> {
        Timer::start(self, name)
    }

    pub(crate) fn durations(&self) -> DurationEncoder {
        self.durations
    }

    /// Flush every output
    pub fn sync(&self) -> io::Result<()> {
        self.sinks.flush()
    }
}
