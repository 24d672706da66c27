//! Volatility measures and channels.

use candela_types::{Bar, Result, require_non_negative, require_period};

use crate::output::{Band, Point, bands, points};
use crate::smoothing::{ema_values, highest_values, lowest_values, sma_values, std_dev_values, wilder_values};
use crate::PriceSource;

/// True range of every bar; the first bar uses its plain high-low range.
#[must_use]
pub fn true_range_values(bars: &[Bar]) -> Vec<f64> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| bar.true_range(i.checked_sub(1).map(|p| bars[p].close)))
        .collect()
}

/// Wilder-smoothed average true range, first defined at `period - 1`.
#[must_use]
pub fn atr_values(bars: &[Bar], period: usize) -> Vec<Option<f64>> {
    wilder_values(&true_range_values(bars), period)
}

/// Average True Range.
///
/// # Errors
///
/// Returns an error if `period` is zero.
pub fn atr(bars: &[Bar], period: usize) -> Result<Vec<Point>> {
    require_period("period", period)?;
    Ok(points(bars, atr_values(bars, period)))
}

/// Rolling population standard deviation.
///
/// # Errors
///
/// Returns an error if `period` is zero.
pub fn std_dev(bars: &[Bar], period: usize, source: PriceSource) -> Result<Vec<Point>> {
    require_period("period", period)?;
    Ok(points(bars, std_dev_values(&source.series(bars), period)))
}

/// Bollinger Bands: SMA ± `multiplier` standard deviations.
///
/// # Errors
///
/// Returns an error if `period` is zero or `multiplier` is negative.
pub fn bollinger(
    bars: &[Bar],
    period: usize,
    multiplier: f64,
    source: PriceSource,
) -> Result<Vec<Band>> {
    require_period("period", period)?;
    require_non_negative("multiplier", multiplier)?;
    let xs = source.series(bars);
    let middle = sma_values(&xs, period);
    let deviation = std_dev_values(&xs, period);
    let (upper, lower) = offsets(&middle, &deviation, multiplier);
    Ok(bands(bars, upper, middle, lower))
}

/// Keltner Channels: EMA of the typical price ± `multiplier` ATRs.
///
/// # Errors
///
/// Returns an error if either period is zero or `multiplier` is negative.
pub fn keltner(
    bars: &[Bar],
    period: usize,
    atr_period: usize,
    multiplier: f64,
) -> Result<Vec<Band>> {
    require_period("period", period)?;
    require_period("atr_period", atr_period)?;
    require_non_negative("multiplier", multiplier)?;
    let middle = ema_values(&PriceSource::Hlc3.series(bars), period);
    let range = atr_values(bars, atr_period);
    let (upper, lower) = offsets(&middle, &range, multiplier);
    let middle = middle
        .iter()
        .zip(&upper)
        .map(|(m, u)| u.and(*m))
        .collect();
    Ok(bands(bars, upper, middle, lower))
}

/// Donchian Channels: highest high, lowest low and their midpoint.
///
/// # Errors
///
/// Returns an error if `period` is zero.
pub fn donchian(bars: &[Bar], period: usize) -> Result<Vec<Band>> {
    require_period("period", period)?;
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    let upper = highest_values(&highs, period);
    let lower = lowest_values(&lows, period);
    let middle = upper
        .iter()
        .zip(&lower)
        .map(|(u, l)| Some(((*u)? + (*l)?) / 2.0))
        .collect();
    Ok(bands(bars, upper, middle, lower))
}

/// `centre ± multiplier * width`, defined where both inputs are.
fn offsets(
    centre: &[Option<f64>],
    width: &[Option<f64>],
    multiplier: f64,
) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    centre
        .iter()
        .zip(width)
        .map(|(c, w)| match (c, w) {
            (Some(c), Some(w)) => (Some(c + multiplier * w), Some(c - multiplier * w)),
            _ => (None, None),
        })
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn bars() -> Vec<Bar> {
        vec![
            Bar::new(0, 10.0, 12.0, 9.0, 11.0, 100.0),
            Bar::new(1, 11.0, 13.0, 10.0, 12.0, 200.0),
            Bar::new(2, 12.0, 12.0, 8.0, 9.0, 300.0),
            Bar::new(3, 9.0, 10.0, 7.0, 8.0, 150.0),
        ]
    }

    #[test]
    fn test_true_range() {
        assert_eq!(true_range_values(&bars()), vec![3.0, 3.0, 4.0, 3.0]);
    }

    #[test]
    fn test_atr_wilder() {
        let out = atr(&bars(), 2).unwrap();
        assert_eq!(out[0].value, None);
        assert_relative_eq!(out[1].value.unwrap(), 3.0);
        assert_relative_eq!(out[2].value.unwrap(), 3.5);
        assert_relative_eq!(out[3].value.unwrap(), 3.25);
    }

    #[test]
    fn test_bollinger_width() {
        let out = bollinger(&bars(), 2, 2.0, PriceSource::Close).unwrap();
        assert!(!out[0].is_defined());
        let band = out[1];
        assert_relative_eq!(band.middle.unwrap(), 11.5);
        // population sd of [11, 12] is 0.5
        assert_relative_eq!(band.upper.unwrap(), 12.5);
        assert_relative_eq!(band.lower.unwrap(), 10.5);
    }

    #[test]
    fn test_bollinger_rejects_negative_multiplier() {
        assert!(bollinger(&bars(), 2, -1.0, PriceSource::Close).is_err());
    }

    #[test]
    fn test_donchian() {
        let out = donchian(&bars(), 3).unwrap();
        assert!(!out[1].is_defined());
        assert_eq!(out[2].upper, Some(13.0));
        assert_eq!(out[2].lower, Some(8.0));
        assert_eq!(out[2].middle, Some(10.5));
        assert_eq!(out[3].upper, Some(13.0));
        assert_eq!(out[3].lower, Some(7.0));
    }

    #[test]
    fn test_keltner_waits_for_both_inputs() {
        let out = keltner(&bars(), 2, 3, 1.0).unwrap();
        assert!(!out[1].is_defined());
        assert!(out[2].is_defined());
        let band = out[2];
        assert_relative_eq!(
            band.upper.unwrap() - band.middle.unwrap(),
            band.middle.unwrap() - band.lower.unwrap(),
            epsilon = 1e-12
        );
    }
}
