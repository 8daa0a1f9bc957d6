//! One load, filter, aggregate pass.
//!
//! [`run`] is pure over an already loaded [`RecordSet`]; [`run_file`] reads the
//! source first. Callers own re-invocation, nothing is cached between passes.

use crate::aggregator::{
    ActionCountAggregator, AggregateTable, Aggregator, DailyVolumeAggregator,
    HourlyVolumeAggregator,
};
use crate::controls::{FilterOptions, SelectionRequest};
use crate::filter::{filter, FilterSelection};
use movdash_common::{load_with, LoadOptions, RecordSet, Result};
use serde::Serialize;
use std::path::Path;
use tracing::{info, instrument};

/// Everything a dashboard render needs from one pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardTables {
    pub selection: FilterSelection,
    /// Records in the source before filtering
    pub loaded_count: usize,
    pub filtered_count: usize,
    pub by_action: AggregateTable<String>,
    pub by_day: AggregateTable<u32>,
    pub by_hour: AggregateTable<u32>,
}

/// Output of [`run_file`]: the option lists plus the tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassOutput {
    pub options: FilterOptions,
    pub tables: DashboardTables,
}

/// Filter `records` with `selection` and build the three tables
pub fn run(records: &RecordSet, selection: &FilterSelection) -> DashboardTables {
    let filtered = filter(records, selection);

    DashboardTables {
        selection: selection.clone(),
        loaded_count: records.len(),
        filtered_count: filtered.len(),
        by_action: ActionCountAggregator.aggregate(&filtered),
        by_day: DailyVolumeAggregator.aggregate(&filtered),
        by_hour: HourlyVolumeAggregator.aggregate(&filtered),
    }
}

/// Load the source at `path`, resolve `request` against its options and run
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn run_file(
    path: impl AsRef<Path>,
    options: &LoadOptions,
    request: &SelectionRequest,
) -> Result<PassOutput> {
    let records = load_with(path.as_ref(), options)?;
    let filter_options = FilterOptions::from_records(&records);
    let selection = filter_options.resolve(request);
    let tables = run(&records, &selection);

    info!(
        "Pass complete: {} of {} records selected ({})",
        tables.filtered_count,
        tables.loaded_count,
        selection.summary()
    );

    Ok(PassOutput {
        options: filter_options,
        tables,
    })
}
