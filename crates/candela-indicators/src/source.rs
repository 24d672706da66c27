//! Price source selection.

use std::str::FromStr;

use candela_types::{Bar, CandelaError};
use serde::{Deserialize, Serialize};

/// Which price of a bar feeds a single-input indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    /// Opening price.
    Open,
    /// High price.
    High,
    /// Low price.
    Low,
    /// Closing price.
    #[default]
    Close,
    /// (High + Low) / 2
    Hl2,
    /// (High + Low + Close) / 3
    Hlc3,
    /// (Open + High + Low + Close) / 4
    Ohlc4,
}

impl PriceSource {
    /// Extracts the price from a bar.
    #[must_use]
    pub fn extract(&self, bar: &Bar) -> f64 {
        match self {
            Self::Open => bar.open,
            Self::High => bar.high,
            Self::Low => bar.low,
            Self::Close => bar.close,
            Self::Hl2 => bar.median_price(),
            Self::Hlc3 => bar.typical_price(),
            Self::Ohlc4 => bar.ohlc4(),
        }
    }

    /// Extracts the price from every bar.
    #[must_use]
    pub fn series(&self, bars: &[Bar]) -> Vec<f64> {
        bars.iter().map(|b| self.extract(b)).collect()
    }

    /// Returns the source as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::High => "high",
            Self::Low => "low",
            Self::Close => "close",
            Self::Hl2 => "hl2",
            Self::Hlc3 => "hlc3",
            Self::Ohlc4 => "ohlc4",
        }
    }
}

impl std::fmt::Display for PriceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PriceSource {
    type Err = CandelaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" | "o" => Ok(Self::Open),
            "high" | "h" => Ok(Self::High),
            "low" | "l" => Ok(Self::Low),
            "close" | "c" => Ok(Self::Close),
            "hl2" | "median" => Ok(Self::Hl2),
            "hlc3" | "typical" => Ok(Self::Hlc3),
            "ohlc4" => Ok(Self::Ohlc4),
            _ => Err(CandelaError::Unknown {
                kind: "price source",
                value: s.to_string(),
            }),
        }
    }
}
