//! OHLCV bar representation.

use serde::{Deserialize, Serialize};

/// A single OHLCV bar.
///
/// `time` is an integer timestamp whose unit (seconds or milliseconds) is
/// chosen by the caller, see [`TimeUnit`](crate::TimeUnit). The engine does not
/// re-validate the `low <= min(open, close)` / `high >= max(open, close)`
/// envelope; algorithms tolerate bars that violate it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Bar open time.
    pub time: i64,
    /// Opening price.
    pub open: f64,
    /// Highest price during the bar.
    pub high: f64,
    /// Lowest price during the bar.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Traded volume, non-negative.
    #[serde(default)]
    pub volume: f64,
}

impl Bar {
    /// Creates a new bar.
    #[must_use]
    pub const fn new(time: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Creates a flat bar where every price equals `price`.
    #[must_use]
    pub const fn flat(time: i64, price: f64, volume: f64) -> Self {
        Self::new(time, price, price, price, price, volume)
    }

    /// Returns the price range (high - low).
    #[must_use]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Returns the body size (|close - open|).
    #[must_use]
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// Returns the top of the body.
    #[must_use]
    pub fn body_top(&self) -> f64 {
        self.open.max(self.close)
    }

    /// Returns the bottom of the body.
    #[must_use]
    pub fn body_bottom(&self) -> f64 {
        self.open.min(self.close)
    }

    /// Returns the wick above the body.
    #[must_use]
    pub fn upper_shadow(&self) -> f64 {
        self.high - self.body_top()
    }

    /// Returns the wick below the body.
    #[must_use]
    pub fn lower_shadow(&self) -> f64 {
        self.body_bottom() - self.low
    }

    /// Returns true if the bar closed above its open.
    #[must_use]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Returns true if the bar closed below its open.
    #[must_use]
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Returns the median price ((high + low) / 2).
    #[must_use]
    pub fn median_price(&self) -> f64 {
        (self.high + self.low) / 2.0
    }

    /// Returns the typical price ((high + low + close) / 3).
    #[must_use]
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Returns the average of all four prices.
    #[must_use]
    pub fn ohlc4(&self) -> f64 {
        (self.open + self.high + self.low + self.close) / 4.0
    }

    /// Returns the weighted close ((high + low + 2*close) / 4).
    #[must_use]
    pub fn weighted_close(&self) -> f64 {
        (self.high + self.low + 2.0 * self.close) / 4.0
    }

    /// Returns the true range relative to the previous close.
    ///
    /// Without a previous close this is the plain high-low range.
    #[must_use]
    pub fn true_range(&self, prev_close: Option<f64>) -> f64 {
        match prev_close {
            Some(pc) => self
                .range()
                .max((self.high - pc).abs())
                .max((self.low - pc).abs()),
            None => self.range(),
        }
    }
}
