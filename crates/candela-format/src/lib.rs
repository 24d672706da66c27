//! Input and output formats for the candela analytics engine.
//!
//! - [`BarReader`] - Reads OHLCV series from CSV, JSON or NDJSON
//! - [`Table`] - Flat view of bars, indicator outputs and profiles
//! - [`Formatter`] - Writes a table as CSV ([`CsvFormatter`]) or JSON ([`JsonFormatter`])

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/candela/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod csv;
mod formatter;
mod json;
mod reader;
mod table;

pub use crate::csv::CsvFormatter;
pub use formatter::{AnyFormatter, FormatError, Formatter, OutputFormat, TimeStyle};
pub use json::{JsonFormatter, JsonStyle};
pub use reader::{BarReader, parse_time, read_bars};
pub use table::{Cell, Table};
