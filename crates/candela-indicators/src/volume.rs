//! Volume-weighted indicators.

use candela_types::{Bar, Result, TimeUnit, Timeframe, require_ordered, require_period};

use crate::output::{Point, points};
use crate::smoothing::{ema_values, mask_before, window_map};

/// On-balance volume, starting at 0 on the first bar.
#[must_use]
pub fn obv(bars: &[Bar]) -> Vec<Point> {
    let mut total = 0.0;
    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            if let Some(prev) = i.checked_sub(1).map(|p| &bars[p]) {
                if bar.close > prev.close {
                    total += bar.volume;
                } else if bar.close < prev.close {
                    total -= bar.volume;
                }
            }
            Some(total)
        })
        .collect();
    points(bars, values)
}

/// Volume-weighted average of the typical price.
///
/// Accumulates from the first bar, or from the start of every `session`
/// period when one is given. Until a session has seen any volume the typical
/// price of the current bar is reported.
#[must_use]
pub fn vwap(bars: &[Bar], session: Option<Timeframe>, unit: TimeUnit) -> Vec<Point> {
    let mut current_session = None;
    let mut price_volume = 0.0;
    let mut volume = 0.0;
    let values = bars
        .iter()
        .map(|bar| {
            let key = session.map(|tf| tf.period_start(bar.time, unit));
            if key != current_session {
                current_session = key;
                price_volume = 0.0;
                volume = 0.0;
            }
            price_volume += bar.typical_price() * bar.volume;
            volume += bar.volume;
            Some(if volume > 0.0 {
                price_volume / volume
            } else {
                bar.typical_price()
            })
        })
        .collect();
    points(bars, values)
}

/// Close location value in `[-1, 1]`; 0 for a bar without range.
fn money_flow_multiplier(bar: &Bar) -> f64 {
    let range = bar.range();
    if range > 0.0 {
        ((bar.close - bar.low) - (bar.high - bar.close)) / range
    } else {
        0.0
    }
}

fn ad_values(bars: &[Bar]) -> Vec<f64> {
    let mut total = 0.0;
    bars.iter()
        .map(|bar| {
            total += money_flow_multiplier(bar) * bar.volume;
            total
        })
        .collect()
}

/// Accumulation/Distribution line.
#[must_use]
pub fn accumulation_distribution(bars: &[Bar]) -> Vec<Point> {
    points(bars, ad_values(bars).into_iter().map(Some).collect())
}

/// Chaikin Money Flow; 0 for a window without volume.
///
/// # Errors
///
/// Returns an error if `period` is zero.
pub fn cmf(bars: &[Bar], period: usize) -> Result<Vec<Point>> {
    require_period("period", period)?;
    let values = window_map(bars.len(), period, |w| {
        let window = &bars[w];
        let volume: f64 = window.iter().map(|b| b.volume).sum();
        if volume > 0.0 {
            window
                .iter()
                .map(|b| money_flow_multiplier(b) * b.volume)
                .sum::<f64>()
                / volume
        } else {
            0.0
        }
    });
    Ok(points(bars, values))
}

/// Chaikin Oscillator: fast EMA minus slow EMA of the A/D line.
///
/// # Errors
///
/// Returns an error if a period is zero or `fast >= slow`.
pub fn chaikin_oscillator(bars: &[Bar], fast: usize, slow: usize) -> Result<Vec<Point>> {
    require_period("fast", fast)?;
    require_period("slow", slow)?;
    require_ordered("fast", fast, slow)?;
    let ad = ad_values(bars);
    let values = ema_values(&ad, fast)
        .into_iter()
        .zip(ema_values(&ad, slow))
        .map(|(f, s)| Some(f? - s?))
        .collect();
    Ok(points(bars, mask_before(values, slow - 1)))
}
