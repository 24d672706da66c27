//! Moving averages.

use candela_types::{Bar, Result, require_period};

use crate::output::{Point, points};
use crate::smoothing::{
    defined_window_map, ema_raw, ema_values, mask_before, sma_values, weighted_mean, window_map,
    wma_values,
};
use crate::PriceSource;

/// Simple moving average.
///
/// # Errors
///
/// Returns an error if `period` is zero.
pub fn sma(bars: &[Bar], period: usize, source: PriceSource) -> Result<Vec<Point>> {
    require_period("period", period)?;
    Ok(points(bars, sma_values(&source.series(bars), period)))
}

/// Exponential moving average seeded with the first price.
///
/// # Errors
///
/// Returns an error if `period` is zero.
pub fn ema(bars: &[Bar], period: usize, source: PriceSource) -> Result<Vec<Point>> {
    require_period("period", period)?;
    Ok(points(bars, ema_values(&source.series(bars), period)))
}

/// Linearly weighted moving average.
///
/// # Errors
///
/// Returns an error if `period` is zero.
pub fn wma(bars: &[Bar], period: usize, source: PriceSource) -> Result<Vec<Point>> {
    require_period("period", period)?;
    Ok(points(bars, wma_values(&source.series(bars), period)))
}

/// Volume-weighted moving average of the close.
///
/// A window with zero total volume falls back to the plain mean of its closes.
///
/// # Errors
///
/// Returns an error if `period` is zero.
pub fn vwma(bars: &[Bar], period: usize) -> Result<Vec<Point>> {
    require_period("period", period)?;
    let values = window_map(bars.len(), period, |w| {
        let window = &bars[w];
        let volume: f64 = window.iter().map(|b| b.volume).sum();
        if volume > 0.0 {
            window.iter().map(|b| b.close * b.volume).sum::<f64>() / volume
        } else {
            window.iter().map(|b| b.close).sum::<f64>() / window.len() as f64
        }
    });
    Ok(points(bars, values))
}

/// Double exponential moving average: `2·EMA − EMA(EMA)`.
///
/// # Errors
///
/// Returns an error if `period` is zero.
pub fn dema(bars: &[Bar], period: usize, source: PriceSource) -> Result<Vec<Point>> {
    require_period("period", period)?;
    let e1 = ema_raw(&source.series(bars), period);
    let e2 = ema_raw(&e1, period);
    let values = e1.iter().zip(&e2).map(|(a, b)| Some(2.0 * a - b)).collect();
    Ok(points(bars, mask_before(values, 2 * (period - 1))))
}

/// Triple exponential moving average: `3·E1 − 3·E2 + E3`.
///
/// Each EMA stage is seeded with the first value of the stage below it, so
/// the combination is reported after three warm-up windows.
///
/// # Errors
///
/// Returns an error if `period` is zero.
pub fn tema(bars: &[Bar], period: usize, source: PriceSource) -> Result<Vec<Point>> {
    require_period("period", period)?;
    let (e1, e2, e3) = triple_ema(&source.series(bars), period);
    let values = (0..e1.len())
        .map(|i| Some(3.0 * e1[i] - 3.0 * e2[i] + e3[i]))
        .collect();
    Ok(points(bars, mask_before(values, 3 * (period - 1))))
}

/// Hull moving average: `WMA(2·WMA(n/2) − WMA(n), √n)`.
///
/// # Errors
///
/// Returns an error if `period` is zero.
pub fn hma(bars: &[Bar], period: usize, source: PriceSource) -> Result<Vec<Point>> {
    require_period("period", period)?;
    let xs = source.series(bars);
    let half = wma_values(&xs, (period / 2).max(1));
    let full = wma_values(&xs, period);
    let diff: Vec<Option<f64>> = half
        .iter()
        .zip(&full)
        .map(|(h, f)| Some(2.0 * (*h)? - (*f)?))
        .collect();
    let root = ((period as f64).sqrt().floor() as usize).max(1);
    Ok(points(bars, defined_window_map(&diff, root, weighted_mean)))
}

/// Three chained EMA stages over `xs`.
pub(crate) fn triple_ema(xs: &[f64], period: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let e1 = ema_raw(xs, period);
    let e2 = ema_raw(&e1, period);
    let e3 = ema_raw(&e2, period);
    (e1, e2, e3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scenario() -> Vec<Bar> {
        vec![
            Bar::new(0, 10.0, 12.0, 9.0, 11.0, 100.0),
            Bar::new(1, 11.0, 13.0, 10.0, 12.0, 200.0),
            Bar::new(2, 12.0, 12.0, 8.0, 9.0, 300.0),
        ]
    }

    fn closes(values: &[f64]) -> Vec<Bar> {
        values
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(i as i64, c, c + 1.0, c - 1.0, c, 100.0))
            .collect()
    }

    #[test]
    fn test_sma_scenario() {
        let out = sma(&scenario(), 2, PriceSource::Close).unwrap();
        let values: Vec<_> = out.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![None, Some(11.5), Some(10.5)]);
        assert_eq!(out[2].time, 2);
    }

    #[test]
    fn test_sma_rejects_zero_period() {
        assert!(sma(&scenario(), 0, PriceSource::Close).is_err());
    }

    #[test]
    fn test_empty_input() {
        assert!(sma(&[], 3, PriceSource::Close).unwrap().is_empty());
        assert!(ema(&[], 3, PriceSource::Close).unwrap().is_empty());
        assert!(tema(&[], 3, PriceSource::Close).unwrap().is_empty());
    }

    #[test]
    fn test_vwma_weights_by_volume() {
        let out = vwma(&scenario(), 2).unwrap();
        // (12*200 + 9*300) / 500
        assert_relative_eq!(out[2].value.unwrap(), 10.2);
    }

    #[test]
    fn test_vwma_zero_volume_falls_back_to_mean() {
        let bars = vec![Bar::flat(0, 4.0, 0.0), Bar::flat(1, 6.0, 0.0)];
        let out = vwma(&bars, 2).unwrap();
        assert_relative_eq!(out[1].value.unwrap(), 5.0);
    }

    #[test]
    fn test_constant_series_averages_are_constant() {
        let bars = closes(&[5.0; 12]);
        for out in [
            ema(&bars, 3, PriceSource::Close).unwrap(),
            dema(&bars, 3, PriceSource::Close).unwrap(),
            tema(&bars, 3, PriceSource::Close).unwrap(),
            hma(&bars, 4, PriceSource::Close).unwrap(),
        ] {
            let last = out.last().unwrap().value.unwrap();
            assert_relative_eq!(last, 5.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_warm_up_lengths() {
        let bars = closes(&(1..=20).map(f64::from).collect::<Vec<_>>());
        let first = |out: Vec<Point>| out.iter().position(|p| p.value.is_some());
        assert_eq!(first(ema(&bars, 5, PriceSource::Close).unwrap()), Some(4));
        assert_eq!(first(dema(&bars, 5, PriceSource::Close).unwrap()), Some(8));
        assert_eq!(first(tema(&bars, 5, PriceSource::Close).unwrap()), Some(12));
        // wma(4) from 3, sqrt(4)=2 more
        assert_eq!(first(hma(&bars, 4, PriceSource::Close).unwrap()), Some(4));
    }

    #[test]
    fn test_tema_tracks_linear_trend_closely() {
        let bars = closes(&(1..=60).map(f64::from).collect::<Vec<_>>());
        let tema_last = tema(&bars, 5, PriceSource::Close).unwrap()[59].value.unwrap();
        let ema_last = ema(&bars, 5, PriceSource::Close).unwrap()[59].value.unwrap();
        assert!((60.0 - tema_last).abs() < (60.0 - ema_last).abs());
    }
}
