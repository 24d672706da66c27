//! Ordered OHLCV series.

use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::{Bar, SeriesError};

/// An ordered, read-only sequence of bars with strictly increasing time.
///
/// Derived sequences produced by the bar transforms are plain `Vec<Bar>`s
/// because several output bars may share one source timestamp. Every
/// analytics function therefore accepts `&[Bar]`; a `Series` derefs to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Series {
    bars: Vec<Bar>,
}

impl Series {
    /// Creates a series, verifying strictly increasing timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::NonIncreasingTime`] at the first bar whose time
    /// is not after its predecessor's.
    pub fn new(bars: Vec<Bar>) -> Result<Self, SeriesError> {
        if let Some(index) = bars.windows(2).position(|w| w[1].time <= w[0].time) {
            return Err(SeriesError::NonIncreasingTime {
                index: index + 1,
                previous: bars[index].time,
                current: bars[index + 1].time,
            });
        }
        Ok(Self { bars })
    }

    /// Returns an empty series.
    #[must_use]
    pub const fn empty() -> Self {
        Self { bars: Vec::new() }
    }

    /// Returns the underlying bars.
    #[must_use]
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Consumes the series, returning its bars.
    #[must_use]
    pub fn into_bars(self) -> Vec<Bar> {
        self.bars
    }

    /// Returns the first `len` bars (clamped to the series length).
    #[must_use]
    pub fn prefix(&self, len: usize) -> &[Bar] {
        &self.bars[..len.min(self.bars.len())]
    }

    /// Returns all closing prices.
    #[must_use]
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Returns the summed volume of every bar.
    #[must_use]
    pub fn total_volume(&self) -> f64 {
        self.bars.iter().map(|b| b.volume).sum()
    }

    /// Returns `(min low, max high)`, or `None` for an empty series.
    #[must_use]
    pub fn price_range(&self) -> Option<(f64, f64)> {
        price_range(&self.bars)
    }
}

impl Deref for Series {
    type Target = [Bar];

    fn deref(&self) -> &Self::Target {
        &self.bars
    }
}

impl AsRef<[Bar]> for Series {
    fn as_ref(&self) -> &[Bar] {
        &self.bars
    }
}

impl TryFrom<Vec<Bar>> for Series {
    type Error = SeriesError;

    fn try_from(bars: Vec<Bar>) -> Result<Self, Self::Error> {
        Self::new(bars)
    }
}

impl<'de> Deserialize<'de> for Series {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bars = Vec::<Bar>::deserialize(deserializer)?;
        Self::new(bars).map_err(serde::de::Error::custom)
    }
}

/// Returns `(min low, max high)` over `bars`, or `None` when empty.
///
/// Bars whose low exceeds their high still contribute both extremes, so the
/// result always brackets every price a bar reports.
#[must_use]
pub fn price_range(bars: &[Bar]) -> Option<(f64, f64)> {
    bars.iter().fold(None, |acc, bar| {
        let lo = bar.low.min(bar.high);
        let hi = bar.high.max(bar.low);
        Some(match acc {
            Some((min, max)) => (f64::min(min, lo), f64::max(max, hi)),
            None => (lo, hi),
        })
    })
}
