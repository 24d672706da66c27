//! Buy/sell attribution heuristic.
//!
//! Bars carry no trade-side information, so each bar's volume is split by a
//! fixed ratio keyed on its direction. This is an approximation and says
//! nothing about individual trades.

use candela_types::Bar;

/// Buy share of a bar that closed above its open.
pub const BULLISH_BUY_SHARE: f64 = 0.6;

/// Buy share of a bar that closed below its open.
pub const BEARISH_BUY_SHARE: f64 = 0.4;

/// Fraction of `bar`'s volume attributed to buyers.
#[must_use]
pub fn buy_share(bar: &Bar) -> f64 {
    if bar.close > bar.open {
        BULLISH_BUY_SHARE
    } else if bar.close < bar.open {
        BEARISH_BUY_SHARE
    } else {
        0.5
    }
}

/// Splits `volume` traded during `bar` into `(buy, sell)`.
#[must_use]
pub fn split_volume(bar: &Bar, volume: f64) -> (f64, f64) {
    let buy = volume * buy_share(bar);
    (buy, volume - buy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_split_by_direction() {
        let up = Bar::new(0, 10.0, 12.0, 9.0, 11.0, 100.0);
        let down = Bar::new(0, 11.0, 12.0, 9.0, 10.0, 100.0);
        let doji = Bar::new(0, 10.0, 12.0, 9.0, 10.0, 100.0);
        let (buy, sell) = split_volume(&up, 100.0);
        assert_relative_eq!(buy, 60.0);
        assert_relative_eq!(sell, 40.0);
        assert_relative_eq!(split_volume(&down, 100.0).0, 40.0);
        assert_relative_eq!(split_volume(&doji, 10.0).1, 5.0);
    }
}
