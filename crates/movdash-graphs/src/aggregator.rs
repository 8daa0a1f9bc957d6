//! Group-and-count aggregation of filtered movement records

use movdash_common::{MovementRecord, RecordSet};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument};

/// One (category, count) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateRow<K> {
    pub category: K,
    pub count: usize,
}

/// Ordered (category, count) pairs; only non-zero counts appear
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AggregateTable<K> {
    rows: Vec<AggregateRow<K>>,
}

impl<K> AggregateTable<K> {
    pub fn new(rows: Vec<AggregateRow<K>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[AggregateRow<K>] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AggregateRow<K>> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> usize {
        self.rows.iter().map(|row| row.count).sum()
    }

    pub fn max_count(&self) -> usize {
        self.rows.iter().map(|row| row.count).max().unwrap_or(0)
    }

    pub fn get(&self, category: &K) -> Option<usize>
    where
        K: PartialEq,
    {
        self.rows
            .iter()
            .find(|row| row.category == *category)
            .map(|row| row.count)
    }

    pub fn categories(&self) -> impl Iterator<Item = &K> {
        self.rows.iter().map(|row| &row.category)
    }
}

impl<K> Default for AggregateTable<K> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<'a, K> IntoIterator for &'a AggregateTable<K> {
    type Item = &'a AggregateRow<K>;
    type IntoIter = std::slice::Iter<'a, AggregateRow<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// A stateless grouping of records into an [`AggregateTable`]
pub trait Aggregator {
    type Key;

    /// Short name used in logs
    fn name(&self) -> &'static str;

    fn aggregate(&self, records: &RecordSet) -> AggregateTable<Self::Key>;
}

/// Count per numeric key, ascending by key
fn count_by_number<F>(records: &RecordSet, key: F) -> AggregateTable<u32>
where
    F: Fn(&MovementRecord) -> u32,
{
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for record in records {
        *counts.entry(key(record)).or_insert(0) += 1;
    }

    AggregateTable::new(
        counts
            .into_iter()
            .map(|(category, count)| AggregateRow { category, count })
            .collect(),
    )
}

/// Counts per action label.
///
/// Rows are ordered by descending count; equal counts keep the order in which
/// the action first appears in the input.
#[derive(Debug, Default, Clone, Copy)]
pub struct ActionCountAggregator;

impl Aggregator for ActionCountAggregator {
    type Key = String;

    fn name(&self) -> &'static str {
        "by_action"
    }

    #[instrument(skip_all, fields(records = records.len()))]
    fn aggregate(&self, records: &RecordSet) -> AggregateTable<String> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut rows: Vec<AggregateRow<String>> = Vec::new();

        for record in records {
            match index.get(record.action.as_str()) {
                Some(&i) => rows[i].count += 1,
                None => {
                    index.insert(record.action.as_str(), rows.len());
                    rows.push(AggregateRow {
                        category: record.action.clone(),
                        count: 1,
                    });
                }
            }
        }

        // sort_by is stable, which keeps first-appearance order among ties
        rows.sort_by(|a, b| b.count.cmp(&a.count));

        debug!("{} produced {} rows", self.name(), rows.len());
        AggregateTable::new(rows)
    }
}

/// Counts per day of month, ascending by day
#[derive(Debug, Default, Clone, Copy)]
pub struct DailyVolumeAggregator;

impl Aggregator for DailyVolumeAggregator {
    type Key = u32;

    fn name(&self) -> &'static str {
        "by_day"
    }

    #[instrument(skip_all, fields(records = records.len()))]
    fn aggregate(&self, records: &RecordSet) -> AggregateTable<u32> {
        let table = count_by_number(records, MovementRecord::day_of_month);
        debug!("{} produced {} rows", self.name(), table.len());
        table
    }
}

/// Counts per hour of day, ascending by hour
#[derive(Debug, Default, Clone, Copy)]
pub struct HourlyVolumeAggregator;

impl Aggregator for HourlyVolumeAggregator {
    type Key = u32;

    fn name(&self) -> &'static str {
        "by_hour"
    }

    #[instrument(skip_all, fields(records = records.len()))]
    fn aggregate(&self, records: &RecordSet) -> AggregateTable<u32> {
        let table = count_by_number(records, MovementRecord::hour_of_day);
        debug!("{} produced {} rows", self.name(), table.len());
        table
    }
}
