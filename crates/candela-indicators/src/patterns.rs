//! Candlestick pattern recognition.
//!
//! Every rule compares the geometry of one to three consecutive bars; no
//! state is carried between positions. Several patterns may complete on the
//! same bar.

use candela_types::Bar;
use serde::Serialize;

use crate::output::{Direction, PatternPoint};

/// Body share of the range at or below which a bar counts as a doji.
const DOJI_BODY_RATIO: f64 = 0.1;
/// Minimum body share of the range for the first star bar.
const STAR_LONG_BODY_RATIO: f64 = 0.5;
/// Maximum body of the star bar relative to the first bar's body.
const STAR_SMALL_BODY_RATIO: f64 = 0.3;

/// A recognized candlestick pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandlePattern {
    /// Open and close nearly equal.
    Doji,
    /// Long lower shadow after a bearish bar.
    Hammer,
    /// Long upper shadow after a bearish bar.
    InvertedHammer,
    /// Long upper shadow after a bullish bar.
    ShootingStar,
    /// Bullish body covering the previous bearish body.
    BullishEngulfing,
    /// Bearish body covering the previous bullish body.
    BearishEngulfing,
    /// Long bearish bar, small star, bullish bar closing into the first body.
    MorningStar,
    /// Long bullish bar, small star, bearish bar closing into the first body.
    EveningStar,
}

impl CandlePattern {
    /// Directional bias of the pattern; `None` for indecision.
    #[must_use]
    pub const fn bias(&self) -> Option<Direction> {
        match self {
            Self::Doji => None,
            Self::Hammer | Self::InvertedHammer | Self::BullishEngulfing | Self::MorningStar => {
                Some(Direction::Up)
            }
            Self::ShootingStar | Self::BearishEngulfing | Self::EveningStar => {
                Some(Direction::Down)
            }
        }
    }

    /// Number of bars the pattern spans.
    #[must_use]
    pub const fn span(&self) -> usize {
        match self {
            Self::Doji => 1,
            Self::Hammer
            | Self::InvertedHammer
            | Self::ShootingStar
            | Self::BullishEngulfing
            | Self::BearishEngulfing => 2,
            Self::MorningStar | Self::EveningStar => 3,
        }
    }

    /// Returns the pattern as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Doji => "doji",
            Self::Hammer => "hammer",
            Self::InvertedHammer => "inverted_hammer",
            Self::ShootingStar => "shooting_star",
            Self::BullishEngulfing => "bullish_engulfing",
            Self::BearishEngulfing => "bearish_engulfing",
            Self::MorningStar => "morning_star",
            Self::EveningStar => "evening_star",
        }
    }
}

impl std::fmt::Display for CandlePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn is_doji(bar: &Bar) -> bool {
    let range = bar.range();
    range > 0.0 && bar.body() <= DOJI_BODY_RATIO * range
}

fn has_hammer_shape(bar: &Bar) -> bool {
    let body = bar.body();
    body > 0.0 && bar.lower_shadow() >= 2.0 * body && bar.upper_shadow() <= body
}

fn has_inverted_shape(bar: &Bar) -> bool {
    let body = bar.body();
    body > 0.0 && bar.upper_shadow() >= 2.0 * body && bar.lower_shadow() <= body
}

fn engulfs(prev: &Bar, bar: &Bar) -> bool {
    bar.body_bottom() <= prev.body_bottom()
        && bar.body_top() >= prev.body_top()
        && bar.body() > prev.body()
}

fn is_long(bar: &Bar) -> bool {
    bar.range() > 0.0 && bar.body() >= STAR_LONG_BODY_RATIO * bar.range()
}

/// Patterns completing at `bars[i]`.
#[must_use]
pub fn patterns_at(bars: &[Bar], i: usize) -> Vec<CandlePattern> {
    let mut found = Vec::new();
    let Some(bar) = bars.get(i) else {
        return found;
    };
    if is_doji(bar) {
        found.push(CandlePattern::Doji);
    }

    let Some(prev) = i.checked_sub(1).map(|p| &bars[p]) else {
        return found;
    };
    if prev.is_bearish() && has_hammer_shape(bar) {
        found.push(CandlePattern::Hammer);
    }
    if has_inverted_shape(bar) {
        if prev.is_bearish() {
            found.push(CandlePattern::InvertedHammer);
        } else if prev.is_bullish() {
            found.push(CandlePattern::ShootingStar);
        }
    }
    if prev.is_bearish() && bar.is_bullish() && engulfs(prev, bar) {
        found.push(CandlePattern::BullishEngulfing);
    }
    if prev.is_bullish() && bar.is_bearish() && engulfs(prev, bar) {
        found.push(CandlePattern::BearishEngulfing);
    }

    let Some(first) = i.checked_sub(2).map(|p| &bars[p]) else {
        return found;
    };
    let star = prev;
    let small_star = star.body() <= STAR_SMALL_BODY_RATIO * first.body();
    let first_mid = (first.open + first.close) / 2.0;
    if is_long(first) && small_star {
        if first.is_bearish()
            && star.body_top() < first.close
            && bar.is_bullish()
            && bar.close > first_mid
        {
            found.push(CandlePattern::MorningStar);
        }
        if first.is_bullish()
            && star.body_bottom() > first.close
            && bar.is_bearish()
            && bar.close < first_mid
        {
            found.push(CandlePattern::EveningStar);
        }
    }
    found
}

/// Scans every bar for completed patterns.
#[must_use]
pub fn candle_patterns(bars: &[Bar]) -> Vec<PatternPoint> {
    (0..bars.len())
        .map(|i| PatternPoint {
            time: bars[i].time,
            patterns: patterns_at(bars, i),
        })
        .collect()
}
