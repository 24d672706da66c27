//! Output format abstraction.

use std::io::Write;
use std::path::Path;

use candela_types::{SeriesError, TimeUnit};
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::table::Table;
use crate::{CsvFormatter, JsonFormatter};

/// Output format identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// CSV format.
    #[default]
    Csv,
    /// JSON array format.
    Json,
    /// Newline-delimited JSON format.
    Ndjson,
}

impl OutputFormat {
    /// Returns the file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Ndjson => "ndjson",
        }
    }

    /// Returns all available formats.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Csv, Self::Json, Self::Ndjson]
    }

    /// Infers the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }

    /// Returns a formatter for this format with default settings.
    #[must_use]
    pub const fn formatter(&self) -> AnyFormatter {
        match self {
            Self::Csv => AnyFormatter::Csv(CsvFormatter::new()),
            Self::Json => AnyFormatter::Json(JsonFormatter::new()),
            Self::Ndjson => AnyFormatter::Json(JsonFormatter::ndjson()),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" | "txt" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "ndjson" | "jsonl" => Ok(Self::Ndjson),
            _ => Err(FormatError::UnknownFormat(s.to_string())),
        }
    }
}

/// Errors that can occur while reading or writing.
#[derive(Error, Debug)]
pub enum FormatError {
    /// Unknown format name or extension.
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// A timestamp could not be interpreted.
    #[error("Row {row}: cannot parse time `{value}`")]
    Time {
        /// Zero-based data row.
        row: usize,
        /// The rejected value.
        value: String,
    },

    /// Bars read from the input do not form a valid series.
    #[error(transparent)]
    Series(#[from] SeriesError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// How `time` cells are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeStyle {
    /// The raw integer timestamp.
    #[default]
    Unix,
    /// RFC 3339 in UTC, interpreting the integer in the given unit.
    Rfc3339(TimeUnit),
}

impl TimeStyle {
    /// Renders `time` as text.
    ///
    /// Timestamps outside chrono's range fall back to the raw integer.
    #[must_use]
    pub fn render(&self, time: i64) -> String {
        match self {
            Self::Unix => time.to_string(),
            Self::Rfc3339(TimeUnit::Seconds) => DateTime::<Utc>::from_timestamp(time, 0)
                .map_or_else(
                    || time.to_string(),
                    |t| t.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
                ),
            Self::Rfc3339(TimeUnit::Milliseconds) => DateTime::<Utc>::from_timestamp_millis(time)
                .map_or_else(
                    || time.to_string(),
                    |t| t.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
                ),
        }
    }
}

/// Trait for output formatters.
pub trait Formatter: Send + Sync {
    /// Writes a result table to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write + Send>(&self, table: &Table, writer: W) -> Result<(), FormatError>;

    /// Returns the file extension for this format.
    fn extension(&self) -> &str;
}

/// A formatter chosen at runtime.
#[derive(Debug, Clone)]
pub enum AnyFormatter {
    /// CSV or TSV.
    Csv(CsvFormatter),
    /// JSON array or NDJSON.
    Json(JsonFormatter),
}

impl AnyFormatter {
    /// Sets how `time` cells are rendered.
    #[must_use]
    pub const fn with_time_style(self, style: TimeStyle) -> Self {
        match self {
            Self::Csv(f) => Self::Csv(f.with_time_style(style)),
            Self::Json(f) => Self::Json(f.with_time_style(style)),
        }
    }

    /// Enables pretty printing; ignored by CSV and NDJSON.
    #[must_use]
    pub const fn with_pretty(self, pretty: bool) -> Self {
        match self {
            Self::Csv(f) => Self::Csv(f),
            Self::Json(f) => Self::Json(f.with_pretty(pretty)),
        }
    }
}

impl Formatter for AnyFormatter {
    fn write_table<W: Write + Send>(&self, table: &Table, writer: W) -> Result<(), FormatError> {
        match self {
            Self::Csv(f) => f.write_table(table, writer),
            Self::Json(f) => f.write_table(table, writer),
        }
    }

    fn extension(&self) -> &str {
        match self {
            Self::Csv(f) => f.extension(),
            Self::Json(f) => f.extension(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("jsonl".parse::<OutputFormat>().unwrap(), OutputFormat::Ndjson);
        assert!(matches!(
            "parquet".parse::<OutputFormat>(),
            Err(FormatError::UnknownFormat(_))
        ));
        for format in OutputFormat::all() {
            assert_eq!(format.to_string().parse::<OutputFormat>().unwrap(), *format);
        }
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            OutputFormat::from_path(Path::new("data/btc.ndjson")),
            Some(OutputFormat::Ndjson)
        );
        assert_eq!(OutputFormat::from_path(Path::new("bars")), None);
    }

    #[test]
    fn test_time_style() {
        assert_eq!(TimeStyle::Unix.render(1_705_321_845), "1705321845");
        assert_eq!(
            TimeStyle::Rfc3339(TimeUnit::Seconds).render(1_705_321_845),
            "2024-01-15T12:30:45Z"
        );
        assert_eq!(
            TimeStyle::Rfc3339(TimeUnit::Milliseconds).render(1_705_321_845_250),
            "2024-01-15T12:30:45.250Z"
        );
        assert_eq!(TimeStyle::Rfc3339(TimeUnit::Seconds).render(i64::MAX), i64::MAX.to_string());
    }
}
