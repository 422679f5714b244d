//! Writer implementations
//!
//! Every output path resolves to a [`Sink`]; a [`SinkSet`] fans each encoded
//! record out to all of them and reports failed writes to the error outputs.

// Standard library
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

// External dependencies
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::MakeWriter;

// Internal crates
use crate::core::{LogError, LogResult};
use crate::format;
use crate::rolling::RollingSink;

/// One write destination
pub enum Sink {
    /// Process standard output
    Stdout,
    /// Process standard error
    Stderr,
    /// Append-only file
    File {
        /// Path as configured
        path: PathBuf,
        /// Never-rolling appender owning the file handle
        appender: RollingFileAppender,
    },
    /// Size-rotated file
    Rolling(RollingSink),
}

impl std::fmt::Debug for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdout => f.write_str("Stdout"),
            Self::Stderr => f.write_str("Stderr"),
            Self::File { path, .. } => f.debug_struct("File").field("path", path).finish(),
            Self::Rolling(sink) => f.debug_tuple("Rolling").field(sink).finish(),
        }
    }
}

impl Sink {
    /// Open a destination by name: `stdout`, `stderr` or a file path
    /// (optionally prefixed with `file://`).
    pub fn open(target: &str) -> LogResult<Self> {
        match target {
            "stdout" => Ok(Self::Stdout),
            "stderr" => Ok(Self::Stderr),
            "" => Err(LogError::build("empty output path")),
            path => {
                let path = PathBuf::from(path.strip_prefix("file://").unwrap_or(path));
                let file_name = path
                    .file_name()
                    .ok_or_else(|| {
                        LogError::build(format!(
                            "invalid file path (no filename): '{}'",
                            path.display()
                        ))
                    })?
                    .to_string_lossy()
                    .into_owned();
                let dir = match path.parent() {
                    Some(parent) if !parent.as_os_str().is_empty() => parent,
                    _ => Path::new("."),
                };
                let appender = RollingFileAppender::builder()
                    .rotation(Rotation::NEVER)
                    .filename_prefix(file_name)
                    .build(dir)
                    .map_err(|e| {
                        LogError::build(format!("couldn't open sink '{}': {e}", path.display()))
                    })?;
                Ok(Self::File { path, appender })
            }
        }
    }

    /// Destination name for diagnostics
    pub fn name(&self) -> String {
        match self {
            Self::Stdout => "stdout".to_string(),
            Self::Stderr => "stderr".to_string(),
            Self::File { path, .. } => path.display().to_string(),
            Self::Rolling(sink) => sink.path().display().to_string(),
        }
    }

    /// Write one whole record
    pub fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        match self {
            Self::Stdout => io::stdout().lock().write_all(buf),
            Self::Stderr => io::stderr().lock().write_all(buf),
            Self::File { appender, .. } => appender.make_writer().write_all(buf),
            Self::Rolling(sink) => sink.write_all(buf),
        }
    }

    /// Flush buffered data
    pub fn flush(&self) -> io::Result<()> {
        match self {
            Self::Stdout => io::stdout().lock().flush(),
            Self::Stderr => io::stderr().lock().flush(),
            Self::File { appender, .. } => appender.make_writer().flush(),
            Self::Rolling(sink) => sink.flush(),
        }
    }
}

#[derive(Debug)]
struct Inner {
    outputs: Vec<Sink>,
    errors: Vec<Sink>,
}

/// Shared fan-out over the configured outputs
#[derive(Debug, Clone)]
pub struct SinkSet(Arc<Inner>);

impl SinkSet {
    /// Combine already opened sinks
    pub fn new(outputs: Vec<Sink>, errors: Vec<Sink>) -> Self {
        Self(Arc::new(Inner { outputs, errors }))
    }

    /// Open every named output and error output
    pub fn open_all(outputs: &[String], errors: &[String]) -> LogResult<Self> {
        let outputs = outputs
            .iter()
            .map(|p| Sink::open(p))
            .collect::<LogResult<Vec<_>>>()?;
        let errors = errors
            .iter()
            .map(|p| Sink::open(p))
            .collect::<LogResult<Vec<_>>>()?;
        Ok(Self::new(outputs, errors))
    }

    /// Number of record destinations
    pub fn len(&self) -> usize {
        self.0.outputs.len()
    }

    /// Whether records go nowhere
    pub fn is_empty(&self) -> bool {
        self.0.outputs.is_empty()
    }

    fn write_record(&self, buf: &[u8]) {
        for sink in &self.0.outputs {
            if let Err(err) = sink.write_all(buf) {
                self.report(sink, &err);
            }
        }
    }

    fn report(&self, sink: &Sink, err: &io::Error) {
        let line = format!(
            "{} write error: {} ({err})\n",
            format::format_timestamp(format::now()),
            sink.name()
        );
        for out in &self.0.errors {
            // Nowhere left to report a failing error output.
            let _ = out.write_all(line.as_bytes());
        }
    }

    /// Flush every output, returning the first failure
    pub fn flush(&self) -> io::Result<()> {
        let mut first = None;
        for sink in &self.0.outputs {
            if let Err(err) = sink.flush() {
                self.report(sink, &err);
                first.get_or_insert(err);
            }
        }
        first.map_or(Ok(()), Err)
    }
}

/// Per-record writer handed out to the formatting layer
#[derive(Debug)]
pub struct SinkWriter<'a> {
    sinks: &'a SinkSet,
}

impl Write for SinkWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.sinks.write_record(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sinks.flush()
    }
}

impl<'a> MakeWriter<'a> for SinkSet {
    type Writer = SinkWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        SinkWriter { sinks: self }
    }
}
