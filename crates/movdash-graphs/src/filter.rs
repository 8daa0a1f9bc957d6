//! Conjunctive record filtering by month, action set and date bounds.
//!
//! Date bounds are compared against full timestamps as the instant at
//! midnight of the given date, so `end` keeps only events at exactly
//! `end 00:00:00` from that day.

use chrono::{NaiveDate, NaiveTime};
use movdash_common::{MovementRecord, RecordSet, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// One render cycle's selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    /// `YYYY-MM` bucket
    pub month: String,
    /// Accepted action labels; empty selects nothing
    pub actions: BTreeSet<String>,
    /// Inclusive lower bound, at midnight
    pub start: NaiveDate,
    /// Inclusive upper bound, at midnight
    pub end: NaiveDate,
}

impl FilterSelection {
    pub fn new<I, S>(month: impl Into<String>, actions: I, start: NaiveDate, end: NaiveDate) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            month: month.into(),
            actions: actions.into_iter().map(Into::into).collect(),
            start,
            end,
        }
    }

    /// The four predicates this selection stands for
    pub fn predicates(&self) -> [Predicate<'_>; 4] {
        [
            Predicate::Month(&self.month),
            Predicate::Actions(&self.actions),
            Predicate::NotBefore(at_midnight(self.start)),
            Predicate::NotAfter(at_midnight(self.end)),
        ]
    }

    /// One-line description used in dashboard headers and logs
    pub fn summary(&self) -> String {
        let actions = if self.actions.is_empty() {
            "-".to_string()
        } else {
            self.actions.iter().cloned().collect::<Vec<_>>().join(", ")
        };
        format!(
            "Mês: {} | Ações: {} | Período: {} a {}",
            self.month,
            actions,
            self.start.format("%d/%m/%Y"),
            self.end.format("%d/%m/%Y")
        )
    }
}

/// A single filter condition over a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate<'a> {
    Month(&'a str),
    Actions(&'a BTreeSet<String>),
    NotBefore(Timestamp),
    NotAfter(Timestamp),
}

impl Predicate<'_> {
    pub fn matches(&self, record: &MovementRecord) -> bool {
        match self {
            Self::Month(month) => record.month_bucket == *month,
            Self::Actions(actions) => actions.contains(&record.action),
            Self::NotBefore(start) => record.timestamp >= *start,
            Self::NotAfter(end) => record.timestamp <= *end,
        }
    }
}

/// Midnight at the start of `date`
pub fn at_midnight(date: NaiveDate) -> Timestamp {
    date.and_time(NaiveTime::MIN)
}

/// Keep the records matching every predicate, in input order
pub fn apply_predicates(records: &RecordSet, predicates: &[Predicate<'_>]) -> RecordSet {
    let kept = records
        .iter()
        .filter(|record| predicates.iter().all(|p| p.matches(record)))
        .cloned()
        .collect();
    records.subset(kept)
}

/// Apply a selection to a record set
#[instrument(skip_all, fields(month = %selection.month, actions = selection.actions.len()))]
pub fn filter(records: &RecordSet, selection: &FilterSelection) -> RecordSet {
    let filtered = apply_predicates(records, &selection.predicates());
    debug!("Kept {} of {} records", filtered.len(), records.len());
    filtered
}

/// Filter with the selection given as separate values
pub fn filter_records(
    records: &RecordSet,
    month: &str,
    actions: &BTreeSet<String>,
    start: NaiveDate,
    end: NaiveDate,
) -> RecordSet {
    let predicates = [
        Predicate::Month(month),
        Predicate::Actions(actions),
        Predicate::NotBefore(at_midnight(start)),
        Predicate::NotAfter(at_midnight(end)),
    ];
    apply_predicates(records, &predicates)
}
