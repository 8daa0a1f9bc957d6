//! Structured logging infrastructure for movdash

use crate::{MovDashError, Result};
use serde::{Deserialize, Serialize};
use std::io;
use std::sync::Arc;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan, writer::BoxMakeWriter},
    layer::{Layered, SubscriberExt},
    util::SubscriberInitExt,
    filter::ParseError,
    EnvFilter, Layer, Registry,
};

/// Output layout of log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line, human oriented
    Pretty,
    /// One line per event
    #[default]
    Compact,
    /// Newline-delimited JSON
    Json,
}

/// Configuration for the logging system
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "movdash_graphs=trace")
    pub level: String,
    /// Line layout
    pub format: LogFormat,
    /// Optional file path for log output; stderr otherwise
    pub file_path: Option<String>,
    /// Whether to use colors (ignored for file output)
    pub ansi: bool,
    /// Whether to include span open/close events in the output
    pub include_spans: bool,
    /// Whether to include target module information
    pub include_targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
            file_path: None,
            ansi: true,
            include_spans: false,
            include_targets: true,
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = MovDashError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(MovDashError::validation_field(
                format!("unknown log format '{other}', expected pretty, compact or json"),
                "format",
            )),
        }
    }
}

type FilteredRegistry = Layered<EnvFilter, Registry>;

/// Initialize the tracing subscriber with the given configuration.
///
/// Logs go to stderr so that stdout stays free for command output.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let (env_filter, rejected) = level_filter(&config.level)?;

    let span_events = if config.include_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let (writer, ansi) = match &config.file_path {
        Some(file_path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file_path)?;
            (BoxMakeWriter::new(Arc::new(file)), false)
        }
        None => (BoxMakeWriter::new(io::stderr), config.ansi),
    };

    let layer: Box<dyn Layer<FilteredRegistry> + Send + Sync> = match config.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_span_events(span_events)
            .with_target(config.include_targets)
            .with_writer(writer)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_ansi(ansi)
            .with_span_events(span_events)
            .with_target(config.include_targets)
            .with_writer(writer)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_ansi(ansi)
            .with_span_events(span_events)
            .with_target(config.include_targets)
            .with_writer(writer)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layer)
        .try_init()
        .map_err(|e| MovDashError::config_with_source("Logging already initialized", e))?;

    if let Some(err) = rejected {
        tracing::warn!("invalid log filter '{}': {}, using 'info'", config.level, err);
    }
    Ok(())
}

/// Parse `level` as an env filter, falling back to `info`.
///
/// The parse error is handed back so it can be logged once a subscriber exists.
fn level_filter(level: &str) -> Result<(EnvFilter, Option<ParseError>)> {
    match EnvFilter::try_new(level) {
        Ok(filter) => Ok((filter, None)),
        Err(err) => EnvFilter::try_new("info")
            .map(|filter| (filter, Some(err)))
            .map_err(|e| MovDashError::config_with_source("Invalid log level filter", e)),
    }
}
