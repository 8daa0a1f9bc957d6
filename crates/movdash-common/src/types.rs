//! Record types shared across the movdash workspace

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Event time as read from the source table (no timezone attached)
pub type Timestamp = NaiveDateTime;

/// Format of the month bucket key
pub const MONTH_BUCKET_FORMAT: &str = "%Y-%m";

/// Year and zero-padded month joined by a hyphen, e.g. `2024-03`
pub fn month_bucket(timestamp: &Timestamp) -> String {
    timestamp.format(MONTH_BUCKET_FORMAT).to_string()
}

/// One logged logistics event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementRecord {
    pub timestamp: Timestamp,
    pub action: String,
    /// Derived from `timestamp` when the record is built
    pub month_bucket: String,
    /// Values of the passthrough columns, aligned with [`RecordSet::columns`]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<String>,
}

impl MovementRecord {
    pub fn new(timestamp: Timestamp, action: impl Into<String>) -> Self {
        Self {
            month_bucket: month_bucket(&timestamp),
            timestamp,
            action: action.into(),
            extra: Vec::new(),
        }
    }

    pub fn with_extra(mut self, extra: Vec<String>) -> Self {
        self.extra = extra;
        self
    }

    /// Day of month, 1-31
    pub fn day_of_month(&self) -> u32 {
        self.timestamp.day()
    }

    /// Hour of day, 0-23
    pub fn hour_of_day(&self) -> u32 {
        self.timestamp.hour()
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// An immutable, timestamp-ordered collection of movement records.
///
/// Built once per pipeline pass and handed to each stage by reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSet {
    /// Header names of the passthrough columns, in source order
    pub columns: Vec<String>,
    /// Distinct actions in source row order, captured before sorting
    #[serde(default)]
    actions: Vec<String>,
    records: Vec<MovementRecord>,
}

impl RecordSet {
    /// Build a record set, sorting ascending by timestamp.
    ///
    /// The sort is stable: records sharing a timestamp keep their input order.
    pub fn new(columns: Vec<String>, mut records: Vec<MovementRecord>) -> Self {
        let mut seen = HashSet::new();
        let actions = records
            .iter()
            .filter(|r| seen.insert(r.action.as_str()))
            .map(|r| r.action.clone())
            .collect();

        records.sort_by_key(|record| record.timestamp);
        Self {
            columns,
            actions,
            records,
        }
    }

    /// Build a record set with no passthrough columns
    pub fn from_records(records: Vec<MovementRecord>) -> Self {
        Self::new(Vec::new(), records)
    }

    /// Keep the column layout of `self` for an already ordered subset
    pub fn subset(&self, records: Vec<MovementRecord>) -> Self {
        let present: HashSet<&str> = records.iter().map(|r| r.action.as_str()).collect();
        let actions = self
            .actions
            .iter()
            .filter(|a| present.contains(a.as_str()))
            .cloned()
            .collect();

        Self {
            columns: self.columns.clone(),
            actions,
            records,
        }
    }

    /// Distinct actions in the order their first row appeared in the source
    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    pub fn records(&self) -> &[MovementRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MovementRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest timestamp; records are sorted so this is the first one
    pub fn min_timestamp(&self) -> Option<Timestamp> {
        self.records.first().map(|r| r.timestamp)
    }

    pub fn max_timestamp(&self) -> Option<Timestamp> {
        self.records.last().map(|r| r.timestamp)
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a MovementRecord;
    type IntoIter = std::slice::Iter<'a, MovementRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Image format for rendered dashboards and charts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Svg,
    Png,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = crate::MovDashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            other => Err(crate::MovDashError::validation_field(
                format!("unsupported output format '{other}', expected svg or png"),
                "format",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Timestamp {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_month_bucket_is_zero_padded() {
        assert_eq!(month_bucket(&ts("2024-03-05 10:00:00")), "2024-03");
        assert_eq!(month_bucket(&ts("2023-11-30 23:59:59")), "2023-11");
    }

    #[test]
    fn test_record_derived_fields() {
        let record = MovementRecord::new(ts("2024-03-05 14:27:00"), "LOAD");
        assert_eq!(record.month_bucket, "2024-03");
        assert_eq!(record.day_of_month(), 5);
        assert_eq!(record.hour_of_day(), 14);
    }

    #[test]
    fn test_record_set_sorts_stably() {
        let records = vec![
            MovementRecord::new(ts("2024-03-06 09:00:00"), "B"),
            MovementRecord::new(ts("2024-03-05 10:00:00"), "first"),
            MovementRecord::new(ts("2024-03-05 10:00:00"), "second"),
        ];
        let set = RecordSet::from_records(records);

        let actions: Vec<&str> = set.iter().map(|r| r.action.as_str()).collect();
        assert_eq!(actions, vec!["first", "second", "B"]);
        assert_eq!(set.min_timestamp(), Some(ts("2024-03-05 10:00:00")));
        assert_eq!(set.max_timestamp(), Some(ts("2024-03-06 09:00:00")));
    }

    #[test]
    fn test_actions_keep_source_order() {
        let set = RecordSet::from_records(vec![
            MovementRecord::new(ts("2024-03-09 08:00:00"), "UNLOAD"),
            MovementRecord::new(ts("2024-03-05 10:00:00"), "LOAD"),
            MovementRecord::new(ts("2024-03-01 07:00:00"), "UNLOAD"),
            MovementRecord::new(ts("2024-03-02 07:00:00"), "COUNT"),
        ]);

        assert_eq!(set.records()[0].action, "UNLOAD");
        assert_eq!(set.actions(), ["UNLOAD", "LOAD", "COUNT"]);

        let loads: Vec<_> = set.iter().filter(|r| r.action != "UNLOAD").cloned().collect();
        assert_eq!(set.subset(loads).actions(), ["LOAD", "COUNT"]);
    }

    #[test]
    fn test_empty_record_set() {
        let set = RecordSet::default();
        assert!(set.is_empty());
        assert_eq!(set.min_timestamp(), None);
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("svg".parse::<OutputFormat>().unwrap(), OutputFormat::Svg);
        assert_eq!("PNG".parse::<OutputFormat>().unwrap(), OutputFormat::Png);
        assert!("gif".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Png.to_string(), "png");
    }
}
