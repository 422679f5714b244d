//! Field collection for encoders

use std::fmt;

use serde_json::Value;
use tracing::field::{Field, Visit};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::fmt::FormattedFields;
use tracing_subscriber::fmt::format::FormatFields;
use tracing_subscriber::registry::LookupSpan;

/// Ordered key/value pairs of a record
pub(crate) type FieldList = Vec<(String, Value)>;

/// Field carrying the source file of the call that produced the record
pub(crate) const CALLER_FILE: &str = "caller.file";
/// Field carrying the source line of the call that produced the record
pub(crate) const CALLER_LINE: &str = "caller.line";

/// Visitor splitting an event into its message, explicit caller location
/// and remaining fields
#[derive(Debug, Default)]
pub(crate) struct FieldVisitor {
    pub(crate) message: Option<String>,
    pub(crate) caller_file: Option<String>,
    pub(crate) caller_line: Option<u64>,
    pub(crate) fields: FieldList,
}

impl FieldVisitor {
    fn push(&mut self, field: &Field, value: Value) {
        let name = field.name();
        if name == CALLER_FILE {
            self.caller_file = value.as_str().map(str::to_string);
        } else if name == CALLER_LINE {
            self.caller_line = value.as_u64();
        } else if name == "message" {
            self.message = Some(match value {
                Value::String(s) => s,
                other => other.to_string(),
            });
        } else if !name.starts_with("log.") {
            self.fields.push((name.to_string(), value));
        }
    }
}

impl Visit for FieldVisitor {
    fn record_f64(&mut self, field: &Field, value: f64) {
        let value = serde_json::Number::from_f64(value)
            .map_or_else(|| Value::String(value.to_string()), Value::Number);
        self.push(field, value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, Value::Bool(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, Value::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.push(field, Value::String(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, Value::String(format!("{value:?}")));
    }
}

/// Append the fields of every span in the event's scope, root first.
///
/// Spans are recorded by `JsonFields`, so each one holds a JSON object;
/// anything else is skipped.
pub(crate) fn span_fields<S, N>(ctx: &FmtContext<'_, S, N>, out: &mut FieldList)
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    let Some(scope) = ctx.event_scope() else {
        return;
    };
    for span in scope.from_root() {
        let extensions = span.extensions();
        let Some(formatted) = extensions.get::<FormattedFields<N>>() else {
            continue;
        };
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&formatted.fields) {
            out.extend(map);
        }
    }
}
