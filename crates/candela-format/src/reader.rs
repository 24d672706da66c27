//! OHLCV series readers.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use candela_types::{Bar, Series, TimeUnit};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::formatter::{FormatError, OutputFormat};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTime {
    Integer(i64),
    Float(f64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct RawBar {
    #[serde(alias = "timestamp", alias = "date", alias = "datetime", alias = "t")]
    time: RawTime,
    #[serde(alias = "o")]
    open: f64,
    #[serde(alias = "h")]
    high: f64,
    #[serde(alias = "l")]
    low: f64,
    #[serde(alias = "c")]
    close: f64,
    #[serde(default, alias = "v", alias = "vol")]
    volume: Option<f64>,
}

impl RawBar {
    fn into_bar(self, row: usize, unit: TimeUnit) -> Result<Bar, FormatError> {
        let time = match self.time {
            RawTime::Integer(t) => Some(t),
            RawTime::Float(t) if t.is_finite() => Some(t.trunc() as i64),
            RawTime::Float(_) => None,
            RawTime::Text(ref text) => parse_time(text, unit),
        };
        let Some(time) = time else {
            let value = match self.time {
                RawTime::Text(text) => text,
                RawTime::Float(t) => t.to_string(),
                RawTime::Integer(t) => t.to_string(),
            };
            return Err(FormatError::Time { row, value });
        };
        Ok(Bar::new(
            time,
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume.unwrap_or(0.0),
        ))
    }
}

/// Parses a timestamp given as text.
///
/// Accepts an integer in `unit`, RFC 3339, `YYYY-MM-DD HH:MM:SS` (UTC,
/// with either a space or `T`) and a bare `YYYY-MM-DD` date.
#[must_use]
pub fn parse_time(text: &str, unit: TimeUnit) -> Option<i64> {
    let text = text.trim();
    if let Ok(t) = text.parse::<i64>() {
        return Some(t);
    }
    let utc = if let Ok(t) = DateTime::parse_from_rfc3339(text) {
        t.with_timezone(&Utc)
    } else if let Some(t) = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    {
        t.and_utc()
    } else {
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()?
            .and_hms_opt(0, 0, 0)?
            .and_utc()
    };
    Some(match unit {
        TimeUnit::Seconds => utc.timestamp(),
        TimeUnit::Milliseconds => utc.timestamp_millis(),
    })
}

/// Reads bar series from CSV, JSON arrays or NDJSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct BarReader {
    format: Option<OutputFormat>,
    time_unit: TimeUnit,
}

impl BarReader {
    /// Creates a reader that infers the format from the file extension.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            format: None,
            time_unit: TimeUnit::Seconds,
        }
    }

    /// Forces the input format.
    #[must_use]
    pub const fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Sets the unit textual timestamps are converted to.
    #[must_use]
    pub const fn with_time_unit(mut self, unit: TimeUnit) -> Self {
        self.time_unit = unit;
        self
    }

    /// Reads a series from `reader`, as CSV unless a format was set.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed input or non-increasing timestamps.
    pub fn read<R: Read>(&self, reader: R) -> Result<Series, FormatError> {
        let format = self.format.unwrap_or_default();
        let raw = match format {
            OutputFormat::Csv => read_csv(reader)?,
            OutputFormat::Json => serde_json::from_reader(reader)?,
            OutputFormat::Ndjson => read_ndjson(BufReader::new(reader))?,
        };
        let bars = raw
            .into_iter()
            .enumerate()
            .map(|(row, raw)| raw.into_bar(row, self.time_unit))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(rows = bars.len(), %format, "read series");
        Ok(Series::new(bars)?)
    }

    /// Reads a series from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the format cannot be determined, the file cannot
    /// be opened, or its content is invalid.
    pub fn read_path(&self, path: &Path) -> Result<Series, FormatError> {
        let format = match self.format {
            Some(format) => format,
            None => OutputFormat::from_path(path)
                .ok_or_else(|| FormatError::UnknownFormat(path.display().to_string()))?,
        };
        let file = File::open(path)?;
        self.with_format(format).read(BufReader::new(file))
    }
}

/// Reads a series from a file, inferring the format from its extension.
///
/// # Errors
///
/// See [`BarReader::read_path`].
pub fn read_bars(path: &Path) -> Result<Series, FormatError> {
    BarReader::new().read_path(path)
}

fn read_csv<R: Read>(reader: R) -> Result<Vec<RawBar>, FormatError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers: csv::StringRecord = rdr.headers()?.iter().map(str::to_lowercase).collect();
    rdr.set_headers(headers);
    Ok(rdr.deserialize().collect::<Result<Vec<RawBar>, _>>()?)
}

fn read_ndjson<R: BufRead>(reader: R) -> Result<Vec<RawBar>, FormatError> {
    let mut raw = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        raw.push(serde_json::from_str(&line)?);
    }
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use candela_types::SeriesError;

    #[test]
    fn test_csv_with_mixed_headers() {
        let input = "Date,Open,High,Low,Close,Volume\n\
                     2024-01-15T12:30:45Z,1.0,2.0,0.5,1.5,100\n\
                     2024-01-15 12:31:45,1.5,2.5,1.0,2.0,\n";
        let series = BarReader::new().read(input.as_bytes()).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].time, 1_705_321_845);
        assert_eq!(series[1].time, 1_705_321_905);
        assert_eq!(series[1].volume, 0.0);
    }

    #[test]
    fn test_json_and_ndjson() {
        let json = r#"[{"t": 1, "o": 1, "h": 2, "l": 0.5, "c": 1.5, "v": 10},
                       {"time": "1970-01-01", "open": 1, "high": 1, "low": 1, "close": 1}]"#;
        let err = BarReader::new()
            .with_format(OutputFormat::Json)
            .read(json.as_bytes())
            .unwrap_err();
        assert!(matches!(
            err,
            FormatError::Series(SeriesError::NonIncreasingTime { index: 1, .. })
        ));

        let ndjson = "{\"time\":0,\"open\":1,\"high\":2,\"low\":0,\"close\":1}\n\n\
                      {\"time\":60,\"open\":1,\"high\":2,\"low\":0,\"close\":1.5,\"volume\":3}\n";
        let series = BarReader::new()
            .with_format(OutputFormat::Ndjson)
            .read(ndjson.as_bytes())
            .unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[1].volume, 3.0);
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("1700000000", TimeUnit::Seconds), Some(1_700_000_000));
        assert_eq!(parse_time("1970-01-02", TimeUnit::Seconds), Some(86_400));
        assert_eq!(
            parse_time("1970-01-01T00:00:01.500+00:00", TimeUnit::Milliseconds),
            Some(1_500)
        );
        assert_eq!(parse_time("yesterday", TimeUnit::Seconds), None);
    }

    #[test]
    fn test_bad_time_reports_row() {
        let input = "time,open,high,low,close\n0,1,1,1,1\nnever,1,1,1,1\n";
        let err = BarReader::new().read(input.as_bytes()).unwrap_err();
        assert!(matches!(err, FormatError::Time { row: 1, ref value } if value == "never"));
    }

    #[test]
    fn test_unknown_extension() {
        let err = read_bars(Path::new("bars.parquet")).unwrap_err();
        assert!(matches!(err, FormatError::UnknownFormat(_)));
    }
}
