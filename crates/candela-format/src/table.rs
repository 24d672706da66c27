//! Flat tabular view of analytics results.

use candela_indicators::{IndicatorOutput, Point};
use candela_profile::{Footprint, Profile, TpoProfile};
use candela_types::Bar;
use serde_json::Value;

use crate::formatter::TimeStyle;

/// One table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Bar timestamp, rendered per [`TimeStyle`].
    Time(i64),
    /// Numeric value.
    Number(f64),
    /// Non-negative count.
    Count(usize),
    /// Free text.
    Text(String),
    /// Boolean marker.
    Flag(bool),
    /// No value.
    Null,
}

impl Cell {
    /// Numeric cell, or [`Cell::Null`] for `None`.
    #[must_use]
    pub fn number(value: Option<f64>) -> Self {
        value.map_or(Self::Null, Self::Number)
    }

    /// Renders the cell as CSV text; `Null` is empty.
    #[must_use]
    pub fn to_text(&self, time: TimeStyle) -> String {
        match self {
            Self::Time(t) => time.render(*t),
            Self::Number(v) => v.to_string(),
            Self::Count(n) => n.to_string(),
            Self::Text(s) => s.clone(),
            Self::Flag(b) => b.to_string(),
            Self::Null => String::new(),
        }
    }

    /// Converts the cell to JSON; non-finite numbers become `null`.
    #[must_use]
    pub fn to_json(&self, time: TimeStyle) -> Value {
        match self {
            Self::Time(t) => match time {
                TimeStyle::Unix => Value::from(*t),
                TimeStyle::Rfc3339(_) => Value::from(time.render(*t)),
            },
            Self::Number(v) => Value::from(*v),
            Self::Count(n) => Value::from(*n),
            Self::Text(s) => Value::from(s.as_str()),
            Self::Flag(b) => Value::from(*b),
            Self::Null => Value::Null,
        }
    }
}

/// Named columns over rows of cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Creates an empty table with the given columns.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row. Rows shorter than the header are padded with nulls.
    pub fn push(&mut self, mut row: Vec<Cell>) {
        debug_assert!(row.len() <= self.columns.len());
        row.resize(self.columns.len(), Cell::Null);
        self.rows.push(row);
    }

    /// Column names.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in insertion order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// One row per bar.
    #[must_use]
    pub fn from_bars(bars: &[Bar]) -> Self {
        let mut table = Self::new(["time", "open", "high", "low", "close", "volume"]);
        for bar in bars {
            table.push(vec![
                Cell::Time(bar.time),
                Cell::Number(bar.open),
                Cell::Number(bar.high),
                Cell::Number(bar.low),
                Cell::Number(bar.close),
                Cell::Number(bar.volume),
            ]);
        }
        table
    }

    /// One row per output position; multi-line outputs get one column per line.
    #[must_use]
    pub fn from_indicator(output: &IndicatorOutput) -> Self {
        match output {
            IndicatorOutput::Line(points) => line_table(points),
            IndicatorOutput::Band(bands) => {
                let mut table = Self::new(["time", "upper", "middle", "lower"]);
                for band in bands {
                    table.push(vec![
                        Cell::Time(band.time),
                        Cell::number(band.upper),
                        Cell::number(band.middle),
                        Cell::number(band.lower),
                    ]);
                }
                table
            }
            IndicatorOutput::MultiLine(lines) => {
                let mut table =
                    Self::new(std::iter::once("time").chain(lines.iter().map(|l| l.name)));
                let Some(first) = lines.first() else {
                    return table;
                };
                for (i, point) in first.points.iter().enumerate() {
                    let mut row = vec![Cell::Time(point.time)];
                    row.extend(
                        lines
                            .iter()
                            .map(|l| Cell::number(l.points.get(i).and_then(|p| p.value))),
                    );
                    table.push(row);
                }
                table
            }
            IndicatorOutput::Trend(points) => {
                let mut table = Self::new(["time", "value", "direction"]);
                for point in points {
                    table.push(vec![
                        Cell::Time(point.time),
                        Cell::number(point.value),
                        point
                            .direction
                            .map_or(Cell::Null, |d| Cell::Text(d.as_str().to_string())),
                    ]);
                }
                table
            }
            IndicatorOutput::Patterns(points) => {
                let mut table = Self::new(["time", "patterns"]);
                for point in points {
                    let names: Vec<&str> = point.patterns.iter().map(|p| p.as_str()).collect();
                    let cell = if names.is_empty() {
                        Cell::Null
                    } else {
                        Cell::Text(names.join("|"))
                    };
                    table.push(vec![Cell::Time(point.time), cell]);
                }
                table
            }
        }
    }

    /// One row per price level, flagging the POC and value area.
    #[must_use]
    pub fn from_profile(profile: &Profile) -> Self {
        let mut table = Self::new([
            "price",
            "volume",
            "buy_volume",
            "sell_volume",
            "delta",
            "trade_count",
            "poc",
            "value_area",
        ]);
        for level in &profile.levels {
            table.push(vec![
                Cell::Number(level.price),
                Cell::Number(level.volume),
                Cell::Number(level.buy_volume),
                Cell::Number(level.sell_volume),
                Cell::Number(level.delta()),
                Cell::Count(level.trade_count),
                Cell::Flag(level.price == profile.point_of_control.price),
                Cell::Flag(profile.value_area.contains(level.price)),
            ]);
        }
        table
    }

    /// One row per (bar, price) cell.
    #[must_use]
    pub fn from_footprint(footprint: &Footprint) -> Self {
        let mut table = Self::new(["time", "price", "buy_volume", "sell_volume", "delta", "poc"]);
        for column in &footprint.columns {
            for cell in &column.cells {
                table.push(vec![
                    Cell::Time(column.time),
                    Cell::Number(cell.price),
                    Cell::Number(cell.buy_volume),
                    Cell::Number(cell.sell_volume),
                    Cell::Number(cell.delta()),
                    Cell::Flag(cell.price == column.point_of_control),
                ]);
            }
        }
        table
    }

    /// One row per price level with its letters.
    #[must_use]
    pub fn from_tpo(profile: &TpoProfile) -> Self {
        let mut table = Self::new([
            "price",
            "letters",
            "count",
            "poc",
            "value_area",
            "initial_balance",
        ]);
        let ib = profile.initial_balance;
        for level in &profile.levels {
            table.push(vec![
                Cell::Number(level.price),
                Cell::Text(level.letters.clone()),
                Cell::Count(level.count),
                Cell::Flag(level.price == profile.point_of_control),
                Cell::Flag(profile.value_area.contains(level.price)),
                Cell::Flag(ib.low <= level.price && level.price <= ib.high),
            ]);
        }
        table
    }
}

fn line_table(points: &[Point]) -> Table {
    let mut table = Table::new(["time", "value"]);
    for point in points {
        table.push(vec![Cell::Time(point.time), Cell::number(point.value)]);
    }
    table
}
