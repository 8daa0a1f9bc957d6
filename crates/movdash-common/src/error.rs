//! Error types and utilities for movdash

use thiserror::Error;

/// Result type alias for movdash operations
pub type Result<T> = std::result::Result<T, MovDashError>;

/// Main error type for movdash operations
#[derive(Error, Debug)]
pub enum MovDashError {
    /// The movement source could not be opened, read, or understood as a table
    #[error("Load error: {message}")]
    Load {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A timestamp cell could not be coerced to a date-time
    #[error("Parse error: row {row}, column '{column}': cannot read '{value}' as a date-time")]
    Parse {
        /// 1-based data row, not counting the header row
        row: usize,
        column: String,
        value: String,
    },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Chart rendering errors
    #[error("Graph error: {message}")]
    Graph {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors for user input
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },
}

impl MovDashError {
    /// Create a new load error
    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new load error with source
    pub fn load_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Load {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new timestamp parse error
    pub fn parse(row: usize, column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Parse {
            row,
            column: column.into(),
            value: value.into(),
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new graph error with source
    pub fn graph_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Graph {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: None,
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }
}

// Error conversion implementations for external types

impl From<csv::Error> for MovDashError {
    fn from(err: csv::Error) -> Self {
        Self::load_with_source("Malformed CSV input", err)
    }
}

impl From<calamine::Error> for MovDashError {
    fn from(err: calamine::Error) -> Self {
        Self::load_with_source("Unreadable spreadsheet", err)
    }
}

impl From<serde_yaml::Error> for MovDashError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::config_with_source("YAML parsing error", err)
    }
}

#[cfg(feature = "plotters")]
/// Convert from plotters drawing errors to MovDashError
impl<T> From<plotters::drawing::DrawingAreaErrorKind<T>> for MovDashError
where
    T: std::error::Error + Send + Sync + 'static,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        Self::graph_with_source("Graph rendering failed", err)
    }
}
