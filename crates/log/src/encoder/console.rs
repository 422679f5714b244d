//! Human-readable console encoder

use serde_json::Value;

use super::json::JsonObject;
use super::{Record, render_level};
use crate::config::EncoderConfig;

/// Render a record as a separator-delimited line.
///
/// Elements: time, level, logger, caller, message, then the fields as one
/// JSON object. A stacktrace goes on the following lines.
pub(crate) fn encode(config: &EncoderConfig, record: &Record<'_>) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(6);

    if !config.time_key.is_empty() {
        parts.push(match &record.time {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        });
    }
    if !config.level_key.is_empty() {
        parts.push(render_level(record.level, config.level_encoder));
    }
    if !config.name_key.is_empty() && !record.logger.is_empty() {
        parts.push(record.logger.to_string());
    }
    if let Some(caller) = &record.caller {
        if !config.caller_key.is_empty() {
            parts.push(caller.clone());
        }
    }
    if !config.message_key.is_empty() {
        parts.push(record.message.clone());
    }

    let mut object = JsonObject::new();
    for (key, value) in &record.fields {
        object.field(key, value);
    }
    if !object.is_empty() {
        parts.push(object.finish());
    }

    let mut line = parts.join(config.console_separator());
    if let Some(stacktrace) = &record.stacktrace {
        if !config.stacktrace_key.is_empty() {
            line.push('\n');
            line.push_str(stacktrace.trim_end());
        }
    }
    line.push_str(config.line_ending());
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Level, LevelEncoder};

    fn config() -> EncoderConfig {
        EncoderConfig {
            message_key: "message".into(),
            level_key: "level".into(),
            time_key: "time".into(),
            caller_key: "caller".into(),
            stacktrace_key: "stacktrace".into(),
            level_encoder: LevelEncoder::Capital,
            ..EncoderConfig::default()
        }
    }

    #[test]
    fn test_console_line() {
        let record = Record {
            level: Level::Info,
            time: Value::from("2024-03-05 07:08:09.012"),
            logger: "app",
            caller: Some("src/main.rs:7".to_string()),
            message: "listening".to_string(),
            fields: vec![("port".to_string(), Value::from(8080))],
            stacktrace: None,
        };
        assert_eq!(
            encode(&config(), &record),
            "2024-03-05 07:08:09.012\tINFO\tsrc/main.rs:7\tlistening\t{\"port\":8080}\n"
        );
    }

    #[test]
    fn test_console_stacktrace_and_separator() {
        let config = EncoderConfig {
            console_separator: " | ".into(),
            time_key: String::new(),
            ..config()
        };
        let record = Record {
            level: Level::Error,
            time: Value::Null,
            logger: "",
            caller: None,
            message: "boom".to_string(),
            fields: Vec::new(),
            stacktrace: Some("0: main\n".to_string()),
        };
        assert_eq!(encode(&config, &record), "ERROR | boom\n0: main\n");
    }
}
