//! Fixed-length periods and timestamp units.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Unit of the integer `time` carried by every [`Bar`](crate::Bar).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// Unix seconds.
    #[default]
    Seconds,
    /// Unix milliseconds.
    Milliseconds,
}

impl TimeUnit {
    /// Number of timestamp ticks in one second.
    #[must_use]
    pub const fn per_second(&self) -> i64 {
        match self {
            Self::Seconds => 1,
            Self::Milliseconds => 1000,
        }
    }
}

impl FromStr for TimeUnit {
    type Err = TimeframeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "s" | "sec" | "secs" | "seconds" => Ok(Self::Seconds),
            "ms" | "millis" | "milliseconds" => Ok(Self::Milliseconds),
            _ => Err(TimeframeParseError(s.to_string())),
        }
    }
}

/// Fixed period length used for TPO letters and VWAP sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Timeframe {
    /// 1 second.
    #[serde(rename = "s1")]
    Second1,
    /// 1 minute.
    #[serde(rename = "m1")]
    Minute1,
    /// 5 minutes.
    #[serde(rename = "m5")]
    Minute5,
    /// 15 minutes.
    #[serde(rename = "m15")]
    Minute15,
    /// 30 minutes.
    #[default]
    #[serde(rename = "m30")]
    Minute30,
    /// 1 hour.
    #[serde(rename = "h1")]
    Hour1,
    /// 4 hours.
    #[serde(rename = "h4")]
    Hour4,
    /// 1 day.
    #[serde(rename = "d1")]
    Day1,
    /// 1 week.
    #[serde(rename = "w1")]
    Week1,
}

impl Timeframe {
    /// Returns the duration in seconds.
    #[must_use]
    pub const fn seconds(&self) -> i64 {
        match self {
            Self::Second1 => 1,
            Self::Minute1 => 60,
            Self::Minute5 => 300,
            Self::Minute15 => 900,
            Self::Minute30 => 1800,
            Self::Hour1 => 3600,
            Self::Hour4 => 14_400,
            Self::Day1 => 86_400,
            Self::Week1 => 604_800,
        }
    }

    /// Returns the duration expressed in the given timestamp unit.
    #[must_use]
    pub const fn length_in(&self, unit: TimeUnit) -> i64 {
        self.seconds() * unit.per_second()
    }

    /// Returns the start of the period containing `time`.
    ///
    /// Periods are aligned to the Unix epoch; negative timestamps round
    /// towards negative infinity.
    #[must_use]
    pub const fn period_start(&self, time: i64, unit: TimeUnit) -> i64 {
        let len = self.length_in(unit);
        time.div_euclid(len) * len
    }

    /// Returns the timeframe as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Second1 => "s1",
            Self::Minute1 => "m1",
            Self::Minute5 => "m5",
            Self::Minute15 => "m15",
            Self::Minute30 => "m30",
            Self::Hour1 => "h1",
            Self::Hour4 => "h4",
            Self::Day1 => "d1",
            Self::Week1 => "w1",
        }
    }

    /// Returns all available timeframes.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Second1,
            Self::Minute1,
            Self::Minute5,
            Self::Minute15,
            Self::Minute30,
            Self::Hour1,
            Self::Hour4,
            Self::Day1,
            Self::Week1,
        ]
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = TimeframeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "s1" | "1s" | "second" | "second1" => Ok(Self::Second1),
            "m1" | "1m" | "minute" | "minute1" => Ok(Self::Minute1),
            "m5" | "5m" | "minute5" => Ok(Self::Minute5),
            "m15" | "15m" | "minute15" => Ok(Self::Minute15),
            "m30" | "30m" | "minute30" => Ok(Self::Minute30),
            "h1" | "1h" | "hour" | "hour1" => Ok(Self::Hour1),
            "h4" | "4h" | "hour4" => Ok(Self::Hour4),
            "d1" | "1d" | "day" | "day1" | "daily" => Ok(Self::Day1),
            "w1" | "1w" | "week" | "weekly" => Ok(Self::Week1),
            _ => Err(TimeframeParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid timeframe or time unit string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeframeParseError(String);

impl std::fmt::Display for TimeframeParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid period '{}', expected one of: s1, m1, m5, m15, m30, h1, h4, d1, w1 (or s, ms for units)",
            self.0
        )
    }
}

impl std::error::Error for TimeframeParseError {}
