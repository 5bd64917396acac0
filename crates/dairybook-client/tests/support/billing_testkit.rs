use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use dairybook_client::{ClientResult, SuccessEnvelope};
use serde_json::Value;
use tempfile::{Builder, TempDir};

/// Temp dir holding an empty dairybook home plus room for fixture tables.
pub fn temp_home_in_tmp(prefix: &str) -> std::io::Result<(TempDir, PathBuf)> {
    let dir = Builder::new().prefix(prefix).tempdir_in("/tmp")?;
    let home = dir.path().join("dairybook-home");
    fs::create_dir_all(&home)?;
    Ok((dir, home))
}

pub fn write_fixture(base: &Path, name: &str, body: &str) -> Option<String> {
    let path = base.join(name);
    let written = fs::write(&path, body);
    assert!(written.is_ok());
    written.ok().map(|_| path.display().to_string())
}

pub fn date(value: &str) -> NaiveDate {
    let parsed = NaiveDate::parse_from_str(value, "%Y-%m-%d");
    assert!(parsed.is_ok());
    parsed.unwrap_or_default()
}

/// `data` of a successful envelope, or `Value::Null` after failing the test.
pub fn success_data(result: ClientResult<SuccessEnvelope>) -> Value {
    assert!(result.is_ok(), "command failed: {:?}", result.as_ref().err());
    result.map(|envelope| envelope.data).unwrap_or(Value::Null)
}

pub fn success_notices(result: &ClientResult<SuccessEnvelope>) -> Vec<String> {
    assert!(result.is_ok());
    result
        .as_ref()
        .map(|envelope| envelope.notices.clone())
        .unwrap_or_default()
}

pub fn number(value: &Value) -> f64 {
    let parsed = value.as_f64();
    assert!(parsed.is_some(), "expected a number, got {value}");
    parsed.unwrap_or(f64::NAN)
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

pub fn statuses(days: &Value) -> Vec<String> {
    days.as_array()
        .map(|rows| {
            rows.iter()
                .map(|row| row["status"].as_str().unwrap_or_default().to_string())
                .collect()
        })
        .unwrap_or_default()
}
