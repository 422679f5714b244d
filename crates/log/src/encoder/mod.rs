//! Record encoders
//!
//! One [`Encoder`] type implements `FormatEvent` for both encodings, so the
//! subscriber stack has the same type whichever encoding the configuration
//! selects:
//! - `json`: ordered JSON object per record
//! - `console`: separator-delimited human-readable line
//! - `fields`: event and span field collection

mod console;
mod fields;
mod json;

use std::backtrace::Backtrace;
use std::fmt;

use serde_json::Value;
use tracing::{Event, Metadata, Subscriber};
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;

use crate::config::{CallerEncoder, EncoderConfig, Encoding, Level, LevelEncoder, LogConfig};
use crate::format;
use fields::{FieldList, FieldVisitor};

/// Everything an encoder needs to render one event
#[derive(Debug)]
pub(crate) struct Record<'a> {
    pub(crate) level: Level,
    pub(crate) time: Value,
    pub(crate) logger: &'a str,
    pub(crate) caller: Option<String>,
    pub(crate) message: String,
    pub(crate) fields: FieldList,
    pub(crate) stacktrace: Option<String>,
}

/// Event formatter driven by [`EncoderConfig`]
#[derive(Debug, Clone)]
pub struct Encoder {
    encoding: Encoding,
    config: EncoderConfig,
    caller: bool,
    stacktrace: bool,
    initial_fields: FieldList,
}

impl Encoder {
    /// Create an encoder for `encoding` honoring the caller, stacktrace and
    /// initial-field settings of `config`
    pub fn new(encoding: Encoding, config: &LogConfig) -> Self {
        Self {
            encoding,
            config: config.encoder_config.clone(),
            caller: !config.disable_caller,
            stacktrace: !config.disable_stacktrace,
            initial_fields: config
                .initial_fields
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    /// Selected encoding
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// `file:line` of the record, preferring a location passed explicitly
    /// by the logger's own write methods over the event's callsite.
    fn caller(&self, meta: &Metadata<'_>, visitor: &FieldVisitor) -> Option<String> {
        if !self.caller {
            return None;
        }
        let (file, line) = match visitor.caller_file.as_deref() {
            Some(file) => (file, visitor.caller_line.unwrap_or(0)),
            None => (meta.file()?, u64::from(meta.line().unwrap_or(0))),
        };
        Some(self.render_caller(file, line))
    }

    fn render_caller(&self, file: &str, line: u64) -> String {
        let file = match self.config.caller_encoder {
            CallerEncoder::Full => file,
            CallerEncoder::Short => trim_path(file),
        };
        format!("{file}:{line}")
    }
}

impl<S, N> FormatEvent<S, N> for Encoder
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let caller = self.caller(meta, &visitor);
        let mut fields = self.initial_fields.clone();
        fields::span_fields(ctx, &mut fields);
        fields.append(&mut visitor.fields);

        let stacktrace = (self.stacktrace && *meta.level() == tracing::Level::ERROR)
            .then(|| Backtrace::force_capture().to_string());

        let record = Record {
            level: Level::from_tracing(*meta.level()),
            time: self.config.time_encoder.encode(format::now()),
            logger: meta.target(),
            caller,
            message: visitor.message.unwrap_or_default(),
            fields,
            stacktrace,
        };

        let line = match self.encoding {
            Encoding::Json => json::encode(&self.config, &record),
            Encoding::Console => console::encode(&self.config, &record),
        };
        writer.write_str(&line)
    }
}

/// Render a level with the configured strategy
pub(crate) fn render_level(level: Level, encoder: LevelEncoder) -> String {
    let color = match level {
        Level::Debug => 35,
        Level::Info => 34,
        Level::Warn => 33,
        _ => 31,
    };
    match encoder {
        LevelEncoder::Lowercase => level.as_str().to_string(),
        LevelEncoder::Capital => level.as_str().to_ascii_uppercase(),
        LevelEncoder::Color => format!("\x1b[{color}m{}\x1b[0m", level.as_str()),
        LevelEncoder::CapitalColor => {
            format!("\x1b[{color}m{}\x1b[0m", level.as_str().to_ascii_uppercase())
        }
    }
}

/// Keep the last directory and the file name: `a/b/c/d.rs` -> `c/d.rs`.
fn trim_path(path: &str) -> &str {
    let is_sep = |c: char| c == '/' || c == '\\';
    let Some(last) = path.rfind(is_sep) else {
        return path;
    };
    match path[..last].rfind(is_sep) {
        Some(prev) => &path[prev + 1..],
        None => path,
    }
}
