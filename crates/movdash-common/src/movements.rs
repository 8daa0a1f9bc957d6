//! Movement table loader.
//!
//! Reads a spreadsheet or CSV export of logistics movements, coerces the
//! timestamp column, derives month buckets and returns a sorted [`RecordSet`].
//! A single bad timestamp aborts the whole load.

use crate::{MovDashError, MovementRecord, RecordSet, Result, Timestamp};
use calamine::{open_workbook_auto, Data, DataType, Reader};
use chrono::{NaiveDate, NaiveTime, TimeDelta};
use std::fmt;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Source column holding the event date-time
pub const DEFAULT_TIMESTAMP_COLUMN: &str = "DATA";

/// Source column holding the activity label
pub const DEFAULT_ACTION_COLUMN: &str = "AÇÃO";

/// Default input file of the movement base
pub const DEFAULT_SOURCE_PATH: &str = "BASE_MOVIMENTACOES.xlsx";

/// Text layouts tried, in order, for timestamp cells stored as strings.
/// Date-only layouts resolve to midnight.
pub const DEFAULT_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y-%m-%d",
    "%d/%m/%Y",
];

/// Largest spreadsheet serial accepted (9999-12-31)
const MAX_SERIAL_DAY: f64 = 2_958_465.0;

/// How to locate and read the movement columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Worksheet name; the first sheet when unset
    pub sheet: Option<String>,
    pub timestamp_column: String,
    pub action_column: String,
    pub timestamp_formats: Vec<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
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

/// Container format, chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Csv,
    Spreadsheet,
}

impl SourceKind {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Self::Spreadsheet),
            _ => Err(MovDashError::load(format!(
                "unsupported source format for {} (expected .xlsx, .xlsm, .xlsb, .xls, .ods or .csv)",
                path.display()
            ))),
        }
    }
}

/// A single cell, normalized across CSV and spreadsheet sources
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    DateTime(Timestamp),
}

impl Cell {
    fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self::Empty
        } else {
            Self::Text(trimmed.to_string())
        }
    }

    fn from_spreadsheet(data: &Data) -> Self {
        match data {
            Data::Empty => Self::Empty,
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Self::from_text(s),
            Data::Float(f) => Self::Number(*f),
            Data::Int(i) => Self::Number(*i as f64),
            Data::Bool(b) => Self::Text(b.to_string()),
            Data::DateTime(_) => match data.as_datetime() {
                Some(dt) => Self::DateTime(dt),
                None => Self::Text(data.to_string()),
            },
            other => Self::from_text(&other.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Render the cell as a category label
    pub fn as_label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Self::Number(n) => write!(f, "{n}"),
            Self::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// Header row plus data rows, before any column is interpreted
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    fn column_index(&self, name: &str) -> Result<usize> {
        let wanted = name.trim();
        self.headers
            .iter()
            .position(|h| h == wanted)
            .or_else(|| {
                let wanted = wanted.to_lowercase();
                self.headers.iter().position(|h| h.to_lowercase() == wanted)
            })
            .ok_or_else(|| {
                MovDashError::load(format!(
                    "missing required column '{}' (found: {})",
                    wanted,
                    self.headers.join(", ")
                ))
            })
    }
}

/// Load movements from `path` with the default column names
pub fn load(path: impl AsRef<Path>) -> Result<RecordSet> {
    load_with(path, &LoadOptions::default())
}

/// Load movements from `path`.
///
/// The file is fully read and closed before any record is built.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_with(path: impl AsRef<Path>, options: &LoadOptions) -> Result<RecordSet> {
    let path = path.as_ref();
    let kind = SourceKind::from_path(path)?;
    debug!(?kind, "reading movement table");

    let table = match kind {
        SourceKind::Csv => read_csv(path)?,
        SourceKind::Spreadsheet => read_spreadsheet(path, options.sheet.as_deref())?,
    };

    let records = build_records(table, options)?;
    info!(
        records = records.len(),
        passthrough_columns = records.columns.len(),
        "loaded movement records"
    );
    Ok(records)
}

/// Read a CSV file into a raw table; the first line is the header
pub fn read_csv(path: &Path) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| open_error(path, e))?;

    let headers = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(Cell::from_text).collect());
    }

    Ok(RawTable { headers, rows })
}

/// Read one worksheet into a raw table; the first row is the header
pub fn read_spreadsheet(path: &Path, sheet: Option<&str>) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path).map_err(|e| open_error(path, e))?;

    let range = match sheet {
        Some(name) => workbook.worksheet_range(name).map_err(|e| {
            MovDashError::load_with_source(format!("cannot read worksheet '{name}'"), e)
        })?,
        None => workbook
            .worksheet_range_at(0)
            .ok_or_else(|| MovDashError::load(format!("{} has no worksheets", path.display())))??,
    };

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header) => header
            .iter()
            .map(|cell| Cell::from_spreadsheet(cell).as_label())
            .collect(),
        None => return Err(MovDashError::load(format!("{} is empty", path.display()))),
    };
    let rows = rows
        .map(|row| row.iter().map(Cell::from_spreadsheet).collect())
        .collect();

    Ok(RawTable { headers, rows })
}

fn open_error(path: &Path, err: impl std::error::Error + Send + Sync + 'static) -> MovDashError {
    MovDashError::load_with_source(format!("cannot open {}", path.display()), err)
}

/// Interpret a raw table as movement records.
///
/// Rows whose cells are all empty are skipped; any other row must carry a
/// coercible timestamp.
pub fn build_records(table: RawTable, options: &LoadOptions) -> Result<RecordSet> {
    let timestamp_idx = table.column_index(&options.timestamp_column)?;
    let action_idx = table.column_index(&options.action_column)?;

    let passthrough: Vec<usize> = (0..table.headers.len())
        .filter(|&i| i != timestamp_idx && i != action_idx)
        .collect();
    let columns = passthrough.iter().map(|&i| table.headers[i].clone()).collect();

    let empty = Cell::Empty;
    let mut records = Vec::with_capacity(table.rows.len());
    for (row_idx, row) in table.rows.iter().enumerate() {
        if row.iter().all(Cell::is_empty) {
            continue;
        }
        let cell_at = |i: usize| row.get(i).unwrap_or(&empty);

        let raw_timestamp = cell_at(timestamp_idx);
        let timestamp = coerce_timestamp(raw_timestamp, &options.timestamp_formats).ok_or_else(
            || MovDashError::parse(row_idx + 1, &options.timestamp_column, raw_timestamp.to_string()),
        )?;
        let action = cell_at(action_idx).as_label();
        let extra = passthrough.iter().map(|&i| cell_at(i).as_label()).collect();

        records.push(MovementRecord::new(timestamp, action).with_extra(extra));
    }

    Ok(RecordSet::new(columns, records))
}

/// Coerce a cell to a date-time, or `None` when it cannot be read as one
pub fn coerce_timestamp<S: AsRef<str>>(cell: &Cell, formats: &[S]) -> Option<Timestamp> {
    match cell {
        Cell::Empty => None,
        Cell::DateTime(dt) => Some(*dt),
        Cell::Number(serial) => from_serial_day(*serial),
        Cell::Text(text) => parse_timestamp_str(text, formats),
    }
}

/// Parse a timestamp string against `formats`, date-only layouts at midnight
pub fn parse_timestamp_str<S: AsRef<str>>(text: &str, formats: &[S]) -> Option<Timestamp> {
    let text = text.trim();
    formats.iter().find_map(|format| {
        let format = format.as_ref();
        Timestamp::parse_from_str(text, format)
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(text, format)
                    .ok()
                    .map(|d| d.and_time(NaiveTime::MIN))
            })
    })
}

/// Spreadsheet serial day (days since 1899-12-30, fraction = time of day)
pub fn from_serial_day(serial: f64) -> Option<Timestamp> {
    if !serial.is_finite() || !(0.0..=MAX_SERIAL_DAY).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_time(NaiveTime::MIN);
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(TimeDelta::try_milliseconds(millis)?)
}
