//! Filtering, aggregation and chart rendering for movdash

pub mod action_counts;
pub mod aggregator;
pub mod controls;
pub mod daily_volume;
pub mod dashboard;
pub mod filter;
pub mod hourly_volume;
pub mod pipeline;
pub mod renderer;
pub mod types;

pub use action_counts::ActionCountChart;
pub use aggregator::{
    ActionCountAggregator, AggregateRow, AggregateTable, Aggregator, DailyVolumeAggregator,
    HourlyVolumeAggregator,
};
pub use controls::{FilterOptions, SelectionRequest};
pub use daily_volume::DailyVolumeChart;
pub use dashboard::Dashboard;
pub use filter::{filter, filter_records, FilterSelection, Predicate};
pub use hourly_volume::{HourlyDataPoint, HourlyVolumeChart};
pub use pipeline::{run, run_file, DashboardTables, PassOutput};
pub use renderer::ChartRenderer;
pub use types::*;
