//! Series-aligned indicator output shapes.

use candela_types::Bar;
use serde::Serialize;

use crate::CandlePattern;

/// Single indicator value at a bar; `None` marks "no value".
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    /// Time of the source bar.
    pub time: i64,
    /// Indicator value, absent during warm-up.
    pub value: Option<f64>,
}

/// Upper/middle/lower channel at a bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Band {
    /// Time of the source bar.
    pub time: i64,
    /// Upper boundary.
    pub upper: Option<f64>,
    /// Centre line.
    pub middle: Option<f64>,
    /// Lower boundary.
    pub lower: Option<f64>,
}

impl Band {
    /// Returns true when every component is defined.
    #[must_use]
    pub const fn is_defined(&self) -> bool {
        self.upper.is_some() && self.middle.is_some() && self.lower.is_some()
    }
}

/// Direction of a trend-following indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Rising / bullish.
    Up,
    /// Falling / bearish.
    Down,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }

    /// Returns the direction as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

/// Stop level together with the trend it belongs to (SAR, SuperTrend).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    /// Time of the source bar.
    pub time: i64,
    /// Stop / trailing level.
    pub value: Option<f64>,
    /// Trend in force at this bar.
    pub direction: Option<Direction>,
}

/// Candlestick patterns completed at a bar; empty when none matched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternPoint {
    /// Time of the bar completing the pattern.
    pub time: i64,
    /// All patterns whose last bar is this one.
    pub patterns: Vec<CandlePattern>,
}

/// A named component of a multi-line indicator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedLine {
    /// Component name (e.g. `"signal"`).
    pub name: &'static str,
    /// Series-aligned values.
    pub points: Vec<Point>,
}

impl NamedLine {
    /// Creates a named line.
    #[must_use]
    pub const fn new(name: &'static str, points: Vec<Point>) -> Self {
        Self { name, points }
    }
}

/// Output of an indicator computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", content = "data", rename_all = "snake_case")]
pub enum IndicatorOutput {
    /// Single line (SMA, RSI, OBV, ...).
    Line(Vec<Point>),
    /// Channel (Bollinger, Keltner, Donchian).
    Band(Vec<Band>),
    /// Several aligned lines (MACD, Stochastic, ADX, Aroon, Fractals).
    MultiLine(Vec<NamedLine>),
    /// Stop level with trend state (Parabolic SAR, SuperTrend).
    Trend(Vec<TrendPoint>),
    /// Candlestick pattern matches.
    Patterns(Vec<PatternPoint>),
}

impl IndicatorOutput {
    /// Number of aligned output positions.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Line(points) => points.len(),
            Self::Band(bands) => bands.len(),
            Self::MultiLine(lines) => lines.first().map_or(0, |l| l.points.len()),
            Self::Trend(points) => points.len(),
            Self::Patterns(points) => points.len(),
        }
    }

    /// Returns true if there are no output positions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the single line, if this output is one.
    #[must_use]
    pub fn as_line(&self) -> Option<&[Point]> {
        match self {
            Self::Line(points) => Some(points),
            _ => None,
        }
    }

    /// Returns a named component of a multi-line output.
    #[must_use]
    pub fn line(&self, name: &str) -> Option<&[Point]> {
        match self {
            Self::MultiLine(lines) => lines
                .iter()
                .find(|l| l.name == name)
                .map(|l| l.points.as_slice()),
            Self::Line(points) if name == "value" => Some(points),
            _ => None,
        }
    }
}

/// Zips bar times with computed values.
pub(crate) fn points(bars: &[Bar], values: Vec<Option<f64>>) -> Vec<Point> {
    debug_assert_eq!(bars.len(), values.len());
    bars.iter()
        .zip(values)
        .map(|(bar, value)| Point {
            time: bar.time,
            value,
        })
        .collect()
}

/// Zips bar times with channel components.
pub(crate) fn bands(
    bars: &[Bar],
    upper: Vec<Option<f64>>,
    middle: Vec<Option<f64>>,
    lower: Vec<Option<f64>>,
) -> Vec<Band> {
    bars.iter()
        .zip(upper.into_iter().zip(middle).zip(lower))
        .map(|(bar, ((upper, middle), lower))| Band {
            time: bar.time,
            upper,
            middle,
            lower,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiline_len_and_lookup() {
        let bars = [Bar::flat(1, 1.0, 0.0), Bar::flat(2, 1.0, 0.0)];
        let output = IndicatorOutput::MultiLine(vec![
            NamedLine::new("k", points(&bars, vec![None, Some(50.0)])),
            NamedLine::new("d", points(&bars, vec![None, None])),
        ]);
        assert_eq!(output.len(), 2);
        assert_eq!(output.line("k").unwrap()[1].value, Some(50.0));
        assert!(output.line("missing").is_none());
        assert!(output.as_line().is_none());
    }

    #[test]
    fn test_serialized_no_value_is_null() {
        let bars = [Bar::flat(7, 1.0, 0.0)];
        let output = IndicatorOutput::Line(points(&bars, vec![None]));
        let json = serde_json::to_string(&output).unwrap();
        assert_eq!(json, r#"{"shape":"line","data":[{"time":7,"value":null}]}"#);
    }
}
