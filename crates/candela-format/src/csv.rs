//! CSV output format.

use std::io::Write;

use crate::formatter::{FormatError, Formatter, TimeStyle};
use crate::table::Table;

/// CSV formatter.
#[derive(Debug, Clone, Copy)]
pub struct CsvFormatter {
    /// Field delimiter (default: comma).
    delimiter: u8,
    /// Whether to include header row.
    include_header: bool,
    time_style: TimeStyle,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvFormatter {
    /// Creates a new CSV formatter with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: b',',
            include_header: true,
            time_style: TimeStyle::Unix,
        }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether to include a header row.
    #[must_use]
    pub const fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Sets how `time` cells are rendered.
    #[must_use]
    pub const fn with_time_style(mut self, style: TimeStyle) -> Self {
        self.time_style = style;
        self
    }

    /// Creates a tab-separated values (TSV) formatter.
    #[must_use]
    pub const fn tsv() -> Self {
        Self::new().with_delimiter(b'\t')
    }
}

impl Formatter for CsvFormatter {
    fn write_table<W: Write + Send>(&self, table: &Table, writer: W) -> Result<(), FormatError> {
        let mut out = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(writer);

        if self.include_header && !table.columns().is_empty() {
            out.write_record(table.columns())?;
        }
        for row in table.rows() {
            out.write_record(row.iter().map(|cell| cell.to_text(self.time_style)))?;
        }
        out.flush()?;
        Ok(())
    }

    fn extension(&self) -> &str {
        if self.delimiter == b'\t' { "tsv" } else { "csv" }
    }
}
