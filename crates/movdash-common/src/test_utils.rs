//! Test utilities and shared fixtures for the movdash workspace.
//!
//! Enabled with the `testing` feature so downstream crates can reuse the same
//! record fixtures in their unit and integration tests.

use crate::{MovementRecord, RecordSet, Timestamp};
use chrono::NaiveDate;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize logging for tests once per process; output is captured by the test harness.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(filter)
            .try_init();
    });
}

/// Build a timestamp from its parts.
pub fn mock_timestamp(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Timestamp {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, min, sec))
        .expect("invalid mock timestamp")
}

/// Build a date from its parts.
pub fn mock_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("invalid mock date")
}

/// Parse `YYYY-MM-DDTHH:MM[:SS]` into a timestamp.
pub fn ts(value: &str) -> Timestamp {
    Timestamp::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| Timestamp::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .unwrap_or_else(|_| panic!("invalid fixture timestamp {value}"))
}

/// One record from a fixture timestamp and action.
pub fn record(timestamp: &str, action: &str) -> MovementRecord {
    MovementRecord::new(ts(timestamp), action)
}

/// A record set from `(timestamp, action)` pairs.
pub fn record_set(rows: &[(&str, &str)]) -> RecordSet {
    RecordSet::from_records(rows.iter().map(|(t, a)| record(t, a)).collect())
}

/// The three-record example used throughout the docs:
/// two LOADs on the 5th and 6th of March 2024 and one UNLOAD on the 5th.
pub fn scenario_records() -> RecordSet {
    record_set(&[
        ("2024-03-05T10:00", "LOAD"),
        ("2024-03-05T14:00", "UNLOAD"),
        ("2024-03-06T09:00", "LOAD"),
    ])
}

/// A record set spanning two months, several actions and hours.
pub fn sample_records() -> RecordSet {
    record_set(&[
        ("2024-02-27T08:15", "RECEBIMENTO"),
        ("2024-02-28T16:40", "EXPEDICAO"),
        ("2024-03-01T00:00", "RECEBIMENTO"),
        ("2024-03-01T07:30", "ARMAZENAGEM"),
        ("2024-03-01T07:45", "RECEBIMENTO"),
        ("2024-03-04T13:05", "EXPEDICAO"),
        ("2024-03-04T13:55", "EXPEDICAO"),
        ("2024-03-15T22:10", "INVENTARIO"),
        ("2024-03-31T00:00", "EXPEDICAO"),
        ("2024-03-31T18:20", "RECEBIMENTO"),
    ])
}

/// Create a temporary directory for tests that automatically cleans up.
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Write a movement CSV with `DATA` and `AÇÃO` headers plus any extra columns.
pub fn write_movements_csv(
    dir: &tempfile::TempDir,
    name: &str,
    extra_headers: &[&str],
    rows: &[&[&str]],
) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).expect("Failed to create fixture csv");

    let mut header = vec!["DATA", "AÇÃO"];
    header.extend_from_slice(extra_headers);
    writeln!(file, "{}", header.join(",")).expect("Failed to write fixture header");
    for row in rows {
        writeln!(file, "{}", row.join(",")).expect("Failed to write fixture row");
    }
    path
}
