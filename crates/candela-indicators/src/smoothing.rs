//! Smoothing and window primitives shared by every indicator.
//!
//! Two families live here:
//!
//! - Window functions (SMA, WMA, extremes, standard deviation). Each output
//!   index depends only on its trailing window, so with the `parallel`
//!   feature they are evaluated with rayon.
//! - Recurrences (EMA, Wilder). These are inherently sequential and always
//!   run as a left fold.

use std::ops::Range;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Evaluates `f` over every full trailing window of `period` elements.
///
/// Index `i` receives `Some(f(i + 1 - period..i + 1))` once a full window is
/// available and `None` before that.
pub(crate) fn window_map<F>(len: usize, period: usize, f: F) -> Vec<Option<f64>>
where
    F: Fn(Range<usize>) -> f64 + Sync + Send,
{
    let eval = |i: usize| (i + 1 >= period).then(|| f(i + 1 - period..i + 1));

    #[cfg(feature = "parallel")]
    {
        (0..len).into_par_iter().map(eval).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        (0..len).map(eval).collect()
    }
}

/// Evaluates `f` over trailing windows whose values are all defined.
pub(crate) fn defined_window_map<F>(values: &[Option<f64>], period: usize, f: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> f64,
{
    let mut out = vec![None; values.len()];
    let mut window = Vec::with_capacity(period);
    for i in (period.max(1) - 1)..values.len() {
        window.clear();
        window.extend(values[i + 1 - period..=i].iter().map_while(|v| *v));
        if window.len() == period {
            out[i] = Some(f(&window));
        }
    }
    out
}

/// Replaces every value before index `start` with `None`.
pub(crate) fn mask_before(mut values: Vec<Option<f64>>, start: usize) -> Vec<Option<f64>> {
    for v in values.iter_mut().take(start) {
        *v = None;
    }
    values
}

/// Arithmetic mean of a slice.
pub(crate) fn mean(xs: &[f64]) -> f64 {
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Linearly weighted mean, most recent element weighted `len`.
pub(crate) fn weighted_mean(xs: &[f64]) -> f64 {
    let n = xs.len() as f64;
    let numerator: f64 = xs
        .iter()
        .enumerate()
        .map(|(j, x)| (j + 1) as f64 * x)
        .sum();
    numerator / (n * (n + 1.0) / 2.0)
}

/// Population standard deviation of a slice.
pub(crate) fn population_std_dev(xs: &[f64]) -> f64 {
    let m = mean(xs);
    let variance = xs.iter().map(|x| (x - m).powi(2)).sum::<f64>() / xs.len() as f64;
    variance.sqrt()
}

/// Simple moving average over a trailing window.
#[must_use]
pub fn sma_values(xs: &[f64], period: usize) -> Vec<Option<f64>> {
    window_map(xs.len(), period, |w| mean(&xs[w]))
}

/// Linearly weighted moving average over a trailing window.
#[must_use]
pub fn wma_values(xs: &[f64], period: usize) -> Vec<Option<f64>> {
    window_map(xs.len(), period, |w| weighted_mean(&xs[w]))
}

/// Rolling population standard deviation.
#[must_use]
pub fn std_dev_values(xs: &[f64], period: usize) -> Vec<Option<f64>> {
    window_map(xs.len(), period, |w| population_std_dev(&xs[w]))
}

/// Rolling maximum.
#[must_use]
pub fn highest_values(xs: &[f64], period: usize) -> Vec<Option<f64>> {
    window_map(xs.len(), period, |w| {
        xs[w].iter().copied().fold(f64::NEG_INFINITY, f64::max)
    })
}

/// Rolling minimum.
#[must_use]
pub fn lowest_values(xs: &[f64], period: usize) -> Vec<Option<f64>> {
    window_map(xs.len(), period, |w| {
        xs[w].iter().copied().fold(f64::INFINITY, f64::min)
    })
}

/// Unmasked EMA recurrence seeded with `ema[0] = x[0]`.
///
/// `ema[i] = (x[i] - ema[i-1]) * k + ema[i-1]` with `k = 2 / (period + 1)`.
#[must_use]
pub fn ema_raw(xs: &[f64], period: usize) -> Vec<f64> {
    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(xs.len());
    let mut prev: Option<f64> = None;
    for &x in xs {
        let next = match prev {
            Some(p) => (x - p) * k + p,
            None => x,
        };
        out.push(next);
        prev = Some(next);
    }
    out
}

/// Exponential moving average, reported from index `period - 1` onwards.
///
/// The recurrence itself runs from the first element; the leading
/// `period - 1` positions are warm-up and carry no value.
#[must_use]
pub fn ema_values(xs: &[f64], period: usize) -> Vec<Option<f64>> {
    mask_before(
        ema_raw(xs, period).into_iter().map(Some).collect(),
        period.saturating_sub(1),
    )
}

/// EMA over a series with a leading undefined stretch.
///
/// The recurrence is seeded at the first defined value and reported once
/// `period` defined values have been seen. Undefined gaps after the seed keep
/// the running average and emit no value.
#[must_use]
pub fn ema_defined(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let k = 2.0 / (period as f64 + 1.0);
    let mut out = vec![None; values.len()];
    let mut prev: Option<f64> = None;
    let mut seen = 0usize;
    for (i, value) in values.iter().enumerate() {
        let Some(x) = *value else { continue };
        let next = match prev {
            Some(p) => (x - p) * k + p,
            None => x,
        };
        prev = Some(next);
        seen += 1;
        if seen >= period {
            out[i] = Some(next);
        }
    }
    out
}

/// Wilder smoothing seeded by the simple average of the first `period` values.
///
/// `avg[i] = (avg[i-1] * (period - 1) + x[i]) / period`, first defined at
/// index `period - 1`.
#[must_use]
pub fn wilder_values(xs: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; xs.len()];
    if period == 0 || xs.len() < period {
        return out;
    }
    let p = period as f64;
    let mut avg = mean(&xs[..period]);
    out[period - 1] = Some(avg);
    for i in period..xs.len() {
        avg = (avg * (p - 1.0) + xs[i]) / p;
        out[i] = Some(avg);
    }
    out
}
