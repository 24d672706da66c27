//! JSON output format.

use std::io::Write;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::formatter::{FormatError, Formatter, TimeStyle};
use crate::table::{Cell, Table};

/// JSON output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// JSON array (standard JSON).
    #[default]
    Array,
    /// Newline-delimited JSON (NDJSON/JSONL).
    Ndjson,
}

/// JSON formatter. Each row becomes an object keyed by column name, in
/// column order.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter {
    /// Output style.
    style: JsonStyle,
    /// Whether to pretty-print (only for array style).
    pretty: bool,
    time_style: TimeStyle,
}

impl JsonFormatter {
    /// Creates a new JSON formatter with default settings (array style).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            style: JsonStyle::Array,
            pretty: false,
            time_style: TimeStyle::Unix,
        }
    }

    /// Creates a new NDJSON formatter.
    #[must_use]
    pub const fn ndjson() -> Self {
        Self::new().with_style(JsonStyle::Ndjson)
    }

    /// Sets whether to pretty-print output (array style only).
    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Sets the output style.
    #[must_use]
    pub const fn with_style(mut self, style: JsonStyle) -> Self {
        self.style = style;
        self
    }

    /// Sets how `time` cells are rendered.
    #[must_use]
    pub const fn with_time_style(mut self, style: TimeStyle) -> Self {
        self.time_style = style;
        self
    }
}

struct Row<'a> {
    columns: &'a [String],
    cells: &'a [Cell],
    time: TimeStyle,
}

impl Serialize for Row<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, cell) in self.columns.iter().zip(self.cells) {
            map.serialize_entry(name, &cell.to_json(self.time))?;
        }
        map.end()
    }
}

struct Rows<'a> {
    table: &'a Table,
    time: TimeStyle,
}

impl Serialize for Rows<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.table.len()))?;
        for cells in self.table.rows() {
            seq.serialize_element(&Row {
                columns: self.table.columns(),
                cells,
                time: self.time,
            })?;
        }
        seq.end()
    }
}

impl Formatter for JsonFormatter {
    fn write_table<W: Write + Send>(&self, table: &Table, mut writer: W) -> Result<(), FormatError> {
        match self.style {
            JsonStyle::Array => {
                let rows = Rows {
                    table,
                    time: self.time_style,
                };
                if self.pretty {
                    serde_json::to_writer_pretty(&mut writer, &rows)?;
                } else {
                    serde_json::to_writer(&mut writer, &rows)?;
                }
                writeln!(writer)?;
            }
            JsonStyle::Ndjson => {
                for cells in table.rows() {
                    let row = Row {
                        columns: table.columns(),
                        cells,
                        time: self.time_style,
                    };
                    serde_json::to_writer(&mut writer, &row)?;
                    writeln!(writer)?;
                }
            }
        }
        writer.flush()?;
        Ok(())
    }

    fn extension(&self) -> &str {
        match self.style {
            JsonStyle::Array => "json",
            JsonStyle::Ndjson => "ndjson",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candela_types::{Bar, TimeUnit};
    use std::io::Cursor;

    fn table() -> Table {
        let bars = vec![
            Bar::new(1_705_321_845, 1.1, 1.2, 1.0, 1.15, 250.0),
            Bar::new(1_705_321_905, 1.15, 1.3, 1.1, 1.25, 120.0),
        ];
        Table::from_bars(&bars)
    }

    fn render(formatter: JsonFormatter, table: &Table) -> String {
        let mut output = Cursor::new(Vec::new());
        formatter.write_table(table, &mut output).unwrap();
        String::from_utf8(output.into_inner()).unwrap()
    }

    #[test]
    fn test_json_array_keeps_column_order() {
        let result = render(JsonFormatter::new(), &table());
        assert!(result.starts_with(r#"[{"time":1705321845,"open":1.1,"high":1.2,"#));
        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_ndjson() {
        let result = render(JsonFormatter::ndjson(), &table());
        let lines: Vec<_> = result.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('{'));
    }

    #[test]
    fn test_pretty_json() {
        let result = render(JsonFormatter::new().with_pretty(true), &table());
        assert!(result.contains('\n'));
        assert!(result.contains("  ")); // Indentation
    }

    #[test]
    fn test_null_and_time_string() {
        let mut table = Table::new(["time", "value"]);
        table.push(vec![Cell::Time(1_705_321_845_000), Cell::Null]);
        let formatter =
            JsonFormatter::ndjson().with_time_style(TimeStyle::Rfc3339(TimeUnit::Milliseconds));
        assert_eq!(
            render(formatter, &table),
            "{\"time\":\"2024-01-15T12:30:45.000Z\",\"value\":null}\n"
        );
    }
}
