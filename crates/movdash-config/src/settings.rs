//! Application configuration structures

use movdash_common::movements::{
    DEFAULT_ACTION_COLUMN, DEFAULT_SOURCE_PATH, DEFAULT_TIMESTAMP_COLUMN,
    DEFAULT_TIMESTAMP_FORMATS,
};
use movdash_common::{LoadOptions, LogFormat, OutputFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    /// Where the movement table lives and how to read it
    #[validate]
    pub source: SourceConfig,

    /// Dashboard titles and axis labels
    #[validate]
    pub dashboard: DashboardConfig,

    /// Graph rendering settings
    #[validate]
    pub graph: GraphConfig,

    /// Logging configuration
    #[validate]
    pub logging: LoggingSettings,
}

/// Movement source configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SourceConfig {
    /// Spreadsheet or CSV file with the movements
    #[validate(custom(
        function = "crate::validation::validate_file_path",
        message = "Source path must be a valid file path"
    ))]
    pub path: String,

    /// Worksheet to read; the first one when unset
    pub sheet: Option<String>,

    /// Header of the date-time column
    #[validate(length(min = 1, message = "Timestamp column cannot be empty"))]
    pub timestamp_column: String,

    /// Header of the activity column
    #[validate(length(min = 1, message = "Action column cannot be empty"))]
    pub action_column: String,

    /// Layouts tried, in order, for timestamps stored as text
    #[validate(length(min = 1, message = "At least one timestamp format is required"))]
    pub timestamp_formats: Vec<String>,
}

/// Labels of one chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ChartLabels {
    #[validate(length(min = 1, message = "Chart title cannot be empty"))]
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

impl ChartLabels {
    pub fn new(title: &str, x_label: &str, y_label: &str) -> Self {
        Self {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
        }
    }
}

/// Dashboard header and per-chart labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DashboardConfig {
    #[validate(length(min = 1, message = "Dashboard title cannot be empty"))]
    pub title: String,

    /// Whether to print the active selection under the title
    pub show_selection_summary: bool,

    #[validate]
    pub action_counts: ChartLabels,

    #[validate]
    pub daily_volume: ChartLabels,

    #[validate]
    pub hourly_volume: ChartLabels,
}

/// Graph rendering configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GraphConfig {
    /// Dashboard width in pixels
    #[validate(range(min = 400, max = 8000, message = "Width must be between 400 and 8000 pixels"))]
    pub width: u32,

    /// Dashboard height in pixels
    #[validate(range(min = 300, max = 8000, message = "Height must be between 300 and 8000 pixels"))]
    pub height: u32,

    /// Background color (hex format)
    #[validate(regex(path = "crate::validation::HEX_COLOR_REGEX", message = "Background color must be valid hex color"))]
    pub background_color: String,

    /// Bar and line color (hex format)
    #[validate(regex(path = "crate::validation::HEX_COLOR_REGEX", message = "Primary color must be valid hex color"))]
    pub primary_color: String,

    /// Grid and accent color (hex format)
    #[validate(regex(path = "crate::validation::HEX_COLOR_REGEX", message = "Secondary color must be valid hex color"))]
    pub secondary_color: String,

    /// Font family for text rendering
    #[validate(length(min = 1, message = "Font family cannot be empty"))]
    pub font_family: String,

    /// Font size for labels
    #[validate(range(min = 8, max = 72, message = "Font size must be between 8 and 72"))]
    pub font_size: u32,

    /// Font size for chart titles
    #[validate(range(min = 8, max = 96, message = "Title font size must be between 8 and 96"))]
    pub title_font_size: u32,

    /// Whether to show grid lines
    pub show_grid: bool,

    /// Image format of the dashboard
    pub format: OutputFormat,

    /// Output file; `dashboard.<format>` when unset
    #[validate(custom(
        function = "crate::validation::validate_file_path",
        message = "Output path must be a valid file path"
    ))]
    pub output: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    #[validate(custom(
        function = "crate::validation::validate_log_level",
        message = "Log level must be one of: trace, debug, info, warn, error"
    ))]
    pub level: String,

    /// Optional log file path
    pub file: Option<String>,

    pub format: LogFormat,

    /// Whether to use colored output (for console logging)
    pub colored: bool,

    /// Whether to log span open/close events
    pub include_spans: bool,
}

impl Config {
    /// Comprehensive validation of the entire configuration
    pub fn validate_all(&self) -> Result<(), validator::ValidationErrors> {
        self.validate()?;
        self.source.validate_formats()?;
        Ok(())
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_SOURCE_PATH.to_string(),
            sheet: None,
            timestamp_column: DEFAULT_TIMESTAMP_COLUMN.to_string(),
            action_column: DEFAULT_ACTION_COLUMN.to_string(),
            timestamp_formats: DEFAULT_TIMESTAMP_FORMATS
                .iter()
                .map(|f| f.to_string())
                .collect(),
        }
    }
}

impl SourceConfig {
    /// Check every timestamp layout is a usable strftime pattern
    pub fn validate_formats(&self) -> Result<(), validator::ValidationErrors> {
        let mut errors = validator::ValidationErrors::new();

        for format in &self.timestamp_formats {
            if let Err(mut err) = crate::validation::validate_timestamp_format(format) {
                err.add_param("value".into(), format);
                errors.add("timestamp_formats", err);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn to_load_options(&self) -> LoadOptions {
        LoadOptions {
            sheet: self.sheet.clone(),
            timestamp_column: self.timestamp_column.clone(),
            action_column: self.action_column.clone(),
            timestamp_formats: self.timestamp_formats.clone(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "Análises de Atividades Logísticas - Relatório de Movimentações".to_string(),
            show_selection_summary: true,
            action_counts: ChartLabels::new(
                "Total de Atividades Realizadas por Tipo",
                "Ação",
                "Quantidade",
            ),
            daily_volume: ChartLabels::new("Volume de Atividades por Dia", "Dia", "Volume"),
            hourly_volume: ChartLabels::new("Atividades Realizadas por Hora", "Hora", "Volume"),
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            width: 1800,
            height: 1100,
            background_color: "#FFFFFF".to_string(),
            primary_color: "#1F77B4".to_string(),
            secondary_color: "#D8D8D8".to_string(),
            font_family: "sans-serif".to_string(),
            font_size: 14,
            title_font_size: 20,
            show_grid: true,
            format: OutputFormat::Svg,
            output: None,
        }
    }
}

impl GraphConfig {
    /// Where the dashboard is written
    pub fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(format!("dashboard.{}", self.format.extension())),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            format: LogFormat::Compact,
            colored: true,
            include_spans: false,
        }
    }
}

impl LoggingSettings {
    pub fn to_logging_config(&self) -> movdash_common::LoggingConfig {
        movdash_common::LoggingConfig {
            level: self.level.clone(),
            format: self.format,
            file_path: self.file.clone(),
            ansi: self.colored,
            include_spans: self.include_spans,
            include_targets: true,
        }
    }
}
