//! Configuration management for movdash

pub mod loader;
pub mod settings;
pub mod validation;

pub use loader::{ConfigError, ConfigLoader};
pub use settings::{ChartLabels, Config, DashboardConfig, GraphConfig, LoggingSettings, SourceConfig};
