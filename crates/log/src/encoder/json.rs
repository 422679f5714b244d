//! Structured (JSON) encoder

use serde_json::Value;

use super::{Record, render_level};
use crate::config::EncoderConfig;

/// Incrementally written JSON object that keeps insertion order.
pub(crate) struct JsonObject {
    buf: String,
    empty: bool,
}

impl JsonObject {
    pub(crate) fn new() -> Self {
        Self {
            buf: String::from("{"),
            empty: true,
        }
    }

    /// Append `key: value`; empty keys are skipped.
    pub(crate) fn field(&mut self, key: &str, value: &Value) {
        if key.is_empty() {
            return;
        }
        if !self.empty {
            self.buf.push(',');
        }
        self.empty = false;
        self.buf.push_str(&Value::from(key).to_string());
        self.buf.push(':');
        self.buf.push_str(&value.to_string());
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.empty
    }

    pub(crate) fn finish(mut self) -> String {
        self.buf.push('}');
        self.buf
    }
}

/// Prefix for record fields whose name collides with a configured key
pub(crate) const FIELD_PREFIX: &str = "fields.";

/// Render a record as one JSON object.
///
/// Order: level, time, logger, caller, message, fields, stacktrace. A field
/// named like one of the configured keys is written as `fields.<name>` so
/// the object never repeats a key.
pub(crate) fn encode(config: &EncoderConfig, record: &Record<'_>) -> String {
    let mut object = JsonObject::new();

    object.field(
        &config.level_key,
        &Value::String(render_level(record.level, config.level_encoder)),
    );
    object.field(&config.time_key, &record.time);
    if !record.logger.is_empty() {
        object.field(&config.name_key, &Value::from(record.logger));
    }
    if let Some(caller) = &record.caller {
        object.field(&config.caller_key, &Value::from(caller.as_str()));
    }
    object.field(&config.message_key, &Value::from(record.message.as_str()));
    let reserved = [
        config.level_key.as_str(),
        config.time_key.as_str(),
        config.name_key.as_str(),
        config.caller_key.as_str(),
        config.message_key.as_str(),
        config.stacktrace_key.as_str(),
    ];
    for (key, value) in &record.fields {
        if !key.is_empty() && reserved.contains(&key.as_str()) {
            object.field(&format!("{FIELD_PREFIX}{key}"), value);
        } else {
            object.field(key, value);
        }
    }
    if let Some(stacktrace) = &record.stacktrace {
        object.field(&config.stacktrace_key, &Value::from(stacktrace.as_str()));
    }

    let mut line = object.finish();
    line.push_str(config.line_ending());
    line
}
