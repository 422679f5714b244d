//! Integration tests for strata-log
//!
//! Every test builds its own logger onto its own scratch directory and scopes
//! events to it with `in_scope`, so tests never share a subscriber.

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use strata_log::{
    Level, LogConfig, LogError, LoggerBuilder, RotationPolicy, debug, error, info,
    load_from_file, load_from_file_with_rotation, resolve_preset, warn,
};
use tempfile::TempDir;

/// Write `document` as `log.json` in `dir` and return its path
fn write_config(dir: &TempDir, document: &Value) -> PathBuf {
    let path = dir.path().join("log.json");
    fs::write(&path, document.to_string()).unwrap();
    path
}

/// JSON document writing to `out.log` in `dir`
fn json_document(dir: &TempDir, level: &str) -> Value {
    json!({
        "level": level,
        "encoding": "json",
        "outputPaths": [dir.path().join("out.log")],
        "errorOutputPaths": ["stderr"],
        "encoderConfig": {
            "messageKey": "msg",
            "levelKey": "level",
            "timeKey": "ts",
            "nameKey": "logger",
            "callerKey": "caller",
            "stacktraceKey": "stacktrace",
            "timeEncoder": "epoch"
        }
    })
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

fn read_records(path: &Path) -> Vec<Value> {
    read_lines(path)
        .iter()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn is_fixed_timestamp(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 23
        && bytes[4] == b'-'
        && bytes[10] == b' '
        && bytes[19] == b'.'
        && bytes[20..].iter().all(u8::is_ascii_digit)
}

#[test]
fn test_json_file_logger_writes_ordered_records() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let config = write_config(&dir, &json_document(&dir, "debug"));

    let logger = load_from_file(&config)?;
    logger.in_scope(|| debug!(user = "ada", attempts = 3, "signed in"));
    logger.sync()?;

    let lines = read_lines(&dir.path().join("out.log"));
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("{\"level\":\"debug\",\"ts\":\""), "{}", lines[0]);

    let record: Value = serde_json::from_str(&lines[0])?;
    assert_eq!(record["msg"], "signed in");
    assert_eq!(record["logger"], "integration_tests");
    assert_eq!(record["user"], "ada");
    assert_eq!(record["attempts"], 3);
    assert!(
        record["caller"]
            .as_str()
            .is_some_and(|c| c.starts_with("tests/integration_tests.rs:"))
    );
    // The document asked for epoch seconds; loading pins the fixed format.
    assert!(is_fixed_timestamp(record["ts"].as_str().unwrap_or_default()));
    Ok(())
}

#[test]
fn test_level_filters_events() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let config = write_config(&dir, &json_document(&dir, "warn"));
    let logger = load_from_file(&config)?;

    logger.in_scope(|| {
        debug!("dropped");
        info!("dropped");
        warn!("kept");
    });
    logger.sync()?;

    let records = read_records(&dir.path().join("out.log"));
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["level"], "warn");
    assert!(logger.enabled(Level::Error));
    assert!(!logger.enabled(Level::Info));
    Ok(())
}

#[test]
fn test_set_level_applies_at_runtime() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let config = write_config(&dir, &json_document(&dir, "info"));
    let logger = load_from_file(&config)?;
    let clone = logger.clone();

    logger.debug("before");
    clone.set_level(Level::Debug)?;
    assert_eq!(logger.level(), Level::Debug);
    logger.debug("after");
    logger.set_level(Level::Error)?;
    logger.warn("silenced");
    logger.sync()?;

    let records = read_records(&dir.path().join("out.log"));
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["msg"], "after");
    Ok(())
}

#[test]
fn test_span_and_initial_fields_are_merged() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let mut document = json_document(&dir, "info");
    document["initialFields"] = json!({"service": "billing"});
    let config = write_config(&dir, &document);
    let logger = load_from_file(&config)?;

    logger.in_scope(|| {
        let span = tracing::info_span!("request", request_id = 42);
        let _entered = span.enter();
        info!(status = "ok", "handled");
    });
    logger.sync()?;

    let records = read_records(&dir.path().join("out.log"));
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["service"], "billing");
    assert_eq!(records[0]["request_id"], 42);
    assert_eq!(records[0]["status"], "ok");
    Ok(())
}

#[rstest]
#[case(false, false)]
#[case(true, true)]
fn test_caller_and_stacktrace_switches(
    #[case] disable_caller: bool,
    #[case] disable_stacktrace: bool,
) -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let mut document = json_document(&dir, "info");
    document["disableCaller"] = json!(disable_caller);
    document["disableStacktrace"] = json!(disable_stacktrace);
    let config = write_config(&dir, &document);
    let logger = load_from_file(&config)?;

    logger.in_scope(|| error!("failed"));
    logger.sync()?;

    let records = read_records(&dir.path().join("out.log"));
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("caller").is_some(), !disable_caller);
    assert_eq!(records[0].get("stacktrace").is_some(), !disable_stacktrace);
    Ok(())
}

#[test]
fn test_console_encoding() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let out = dir.path().join("console.log");
    let mut config = LogConfig {
        encoding: "console".to_string(),
        output_paths: vec![out.display().to_string()],
        error_output_paths: vec!["stderr".to_string()],
        disable_caller: true,
        ..LogConfig::default()
    };
    config.encoder_config.level_encoder = strata_log::LevelEncoder::Capital;

    let logger = LoggerBuilder::from_config(config).build()?;
    logger.in_scope(|| info!(port = 8080, "listening"));
    logger.sync()?;

    let lines = read_lines(&out);
    assert_eq!(lines.len(), 1);
    let parts: Vec<&str> = lines[0].split('\t').collect();
    assert_eq!(parts.len(), 5, "{}", lines[0]);
    assert!(is_fixed_timestamp(parts[0]));
    assert_eq!(&parts[1..], ["INFO", "integration_tests", "listening", "{\"port\":8080}"]);
    Ok(())
}

#[test]
fn test_sampling_limits_repeated_events() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let mut document = json_document(&dir, "info");
    document["sampling"] = json!({"initial": 2, "thereafter": 0});
    let config = write_config(&dir, &document);
    let logger = load_from_file(&config)?;

    logger.in_scope(|| {
        for i in 0..10 {
            info!(i, "repeated");
        }
    });
    logger.sync()?;

    assert_eq!(read_records(&dir.path().join("out.log")).len(), 2);
    Ok(())
}

#[test]
fn test_default_config_writes_every_distinct_message() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let out = dir.path().join("default.log");
    let config = LogConfig {
        output_paths: vec![out.display().to_string()],
        ..LogConfig::default()
    };
    let logger = LoggerBuilder::from_config(config).build()?;

    for i in 0..20 {
        logger.info(&format!("distinct message {i}"));
    }
    logger.sync()?;

    let lines = read_lines(&out);
    assert_eq!(lines.len(), 20);
    assert!(lines[19].contains("distinct message 19"));
    Ok(())
}

#[test]
fn test_encoder_config_sampling_is_inert() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let mut document = json_document(&dir, "info");
    document["encoderConfig"]["sampling"] = json!({"initial": 1, "thereafter": 0});
    let config = write_config(&dir, &document);
    let logger = load_from_file(&config)?;

    logger.in_scope(|| {
        for _ in 0..5 {
            info!("repeated");
        }
    });
    logger.sync()?;

    assert_eq!(read_records(&dir.path().join("out.log")).len(), 5);
    Ok(())
}

#[test]
fn test_leveled_methods_report_calling_code() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let config = write_config(&dir, &json_document(&dir, "debug"));
    let logger = load_from_file(&config)?;

    logger.info("from test");
    logger.log(Level::Warn, "also from test");
    logger.sync()?;

    let records = read_records(&dir.path().join("out.log"));
    assert_eq!(records.len(), 2);
    for record in &records {
        let caller = record["caller"].as_str().unwrap_or_default();
        assert!(caller.starts_with("tests/integration_tests.rs:"), "{record}");
        assert!(record.get("logger").is_none(), "{record}");
        assert!(record.get("caller.file").is_none(), "{record}");
    }
    Ok(())
}

#[test]
fn test_timer_reports_elapsed() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let mut document = json_document(&dir, "info");
    document["encoderConfig"]["durationEncoder"] = json!("nanos");
    let config = write_config(&dir, &document);
    let logger = load_from_file(&config)?;

    let value = strata_log::timed!(logger, "compute", { 6 * 7 });
    assert_eq!(value, 42);
    logger.sync()?;

    let records = read_records(&dir.path().join("out.log"));
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["timer"], "compute");
    assert!(records[0]["elapsed"].is_u64());
    assert!(
        records[0]["caller"]
            .as_str()
            .is_some_and(|c| c.starts_with("tests/integration_tests.rs:"))
    );
    Ok(())
}

#[test]
fn test_rotation_with_output_succeeds() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let config = write_config(&dir, &json_document(&dir, "info"));

    let logger = load_from_file_with_rotation(&config, RotationPolicy::new(10, 3, 7, true))?;
    logger.info("rotating");
    logger.sync()?;

    let records = read_records(&dir.path().join("out.log"));
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["msg"], "rotating");
    Ok(())
}

#[test]
fn test_rotating_debug_logger_writes_structured_records() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let out = dir.path().join("app.log");
    let config = write_config(
        &dir,
        &json!({
            "level": "debug",
            "encoding": "json",
            "outputPaths": [out],
            "errorOutputPaths": ["stderr"]
        }),
    );

    let logger = load_from_file_with_rotation(&config, RotationPolicy::new(200, 30, 30, true))?;
    assert_eq!(logger.level(), Level::Debug);
    logger.in_scope(|| debug!(job = "nightly", "started"));
    logger.sync()?;

    let records = read_records(&out);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["job"], "nightly");
    Ok(())
}

#[test]
fn test_rotation_without_output_is_config_error() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let mut document = json_document(&dir, "info");
    document["outputPaths"] = json!([]);
    let config = write_config(&dir, &document);

    let err = load_from_file_with_rotation(&config, RotationPolicy::default()).unwrap_err();
    assert!(matches!(err, LogError::Config(ref m) if m == "no output file"));
    Ok(())
}

#[test]
fn test_rotation_rolls_by_size() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let config = write_config(&dir, &json_document(&dir, "info"));
    let logger = load_from_file_with_rotation(&config, RotationPolicy::new(1, 0, 0, false))?;

    let payload = "x".repeat(1024);
    logger.in_scope(|| {
        for i in 0..2600 {
            info!(i, payload = payload.as_str(), "filler");
        }
    });
    logger.sync()?;

    let files = fs::read_dir(dir.path())?
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().starts_with("out.log"))
        .count();
    assert!(files >= 2, "expected rolled files, found {files}");
    Ok(())
}

#[test]
fn test_load_failures() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("absent.json");
    assert!(matches!(load_from_file(&missing), Err(LogError::Io { .. })));
    assert!(matches!(
        load_from_file_with_rotation(&missing, RotationPolicy::default()),
        Err(LogError::Io { .. })
    ));

    let malformed = dir.path().join("bad.json");
    fs::write(&malformed, "{\"level\": ").unwrap();
    assert!(matches!(load_from_file(&malformed), Err(LogError::Decode(_))));
    assert!(matches!(
        load_from_file_with_rotation(&malformed, RotationPolicy::default()),
        Err(LogError::Decode(_))
    ));
}

#[test]
fn test_unknown_encoding_rejected_without_rotation() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let mut document = json_document(&dir, "info");
    document["encoding"] = json!("xml");
    let config = write_config(&dir, &document);

    assert!(matches!(load_from_file(&config), Err(LogError::Build(_))));
    let logger = load_from_file_with_rotation(&config, RotationPolicy::default())?;
    logger.info("console fallback");
    logger.sync()?;
    let lines = read_lines(&dir.path().join("out.log"));
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("console fallback"));
    assert!(serde_json::from_str::<Value>(&lines[0]).is_err());
    Ok(())
}

#[rstest]
#[case("production", Level::Info)]
#[case("development", Level::Debug)]
#[case("staging", Level::Info)]
#[case("", Level::Info)]
fn test_presets(#[case] env: &str, #[case] level: Level) {
    let logger = resolve_preset(env).unwrap();
    assert_eq!(logger.level(), level);
}
