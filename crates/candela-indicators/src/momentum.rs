//! Momentum oscillators.

use candela_types::{Bar, Result, require_ordered, require_period};

use crate::average::triple_ema;
use crate::output::{NamedLine, Point, points};
use crate::smoothing::{
    defined_window_map, ema_defined, ema_raw, highest_values, lowest_values, mask_before, mean,
    wilder_values, window_map,
};
use crate::PriceSource;

/// Constant scaling CCI so ~75% of values fall within ±100.
const CCI_CONSTANT: f64 = 0.015;

/// Relative Strength Index with Wilder smoothing.
///
/// The first value appears at index `period`, once `period` price changes
/// exist. An average loss of zero yields 100.
///
/// # Errors
///
/// Returns an error if `period` is zero.
pub fn rsi(bars: &[Bar], period: usize, source: PriceSource) -> Result<Vec<Point>> {
    require_period("period", period)?;
    Ok(points(bars, rsi_values(&source.series(bars), period)))
}

/// RSI over raw prices; see [`rsi`].
#[must_use]
pub fn rsi_values(xs: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; xs.len()];
    if xs.len() < 2 {
        return out;
    }
    let (gains, losses): (Vec<f64>, Vec<f64>) = xs
        .windows(2)
        .map(|w| {
            let change = w[1] - w[0];
            (change.max(0.0), (-change).max(0.0))
        })
        .unzip();
    let avg_gain = wilder_values(&gains, period);
    let avg_loss = wilder_values(&losses, period);
    for (j, (gain, loss)) in avg_gain.iter().zip(&avg_loss).enumerate() {
        if let (Some(gain), Some(loss)) = (gain, loss) {
            out[j + 1] = Some(relative_strength_index(*gain, *loss));
        }
    }
    out
}

fn relative_strength_index(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
}

/// MACD line (fast EMA − slow EMA), its signal EMA and the histogram.
///
/// # Errors
///
/// Returns an error if a period is zero or `fast >= slow`.
pub fn macd(
    bars: &[Bar],
    fast: usize,
    slow: usize,
    signal: usize,
    source: PriceSource,
) -> Result<Vec<NamedLine>> {
    require_period("fast", fast)?;
    require_period("slow", slow)?;
    require_period("signal", signal)?;
    require_ordered("fast", fast, slow)?;

    let xs = source.series(bars);
    let fast_ema = ema_raw(&xs, fast);
    let slow_ema = ema_raw(&xs, slow);
    let line: Vec<Option<f64>> = mask_before(
        fast_ema
            .iter()
            .zip(&slow_ema)
            .map(|(f, s)| Some(f - s))
            .collect(),
        slow - 1,
    );
    let signal_line = ema_defined(&line, signal);
    let histogram = line
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| Some((*m)? - (*s)?))
        .collect();

    Ok(vec![
        NamedLine::new("macd", points(bars, line)),
        NamedLine::new("signal", points(bars, signal_line)),
        NamedLine::new("histogram", points(bars, histogram)),
    ])
}

/// TRIX: one-bar percent change of a triple-smoothed EMA.
///
/// A zero previous value yields 0.
///
/// # Errors
///
/// Returns an error if `period` is zero.
pub fn trix(bars: &[Bar], period: usize, source: PriceSource) -> Result<Vec<Point>> {
    require_period("period", period)?;
    let (_, _, e3) = triple_ema(&source.series(bars), period);
    let values = (0..e3.len())
        .map(|i| {
            let prev = e3[i.checked_sub(1)?];
            Some(if prev == 0.0 {
                0.0
            } else {
                (e3[i] - prev) / prev * 100.0
            })
        })
        .collect();
    Ok(points(bars, mask_before(values, 3 * (period - 1) + 1)))
}

/// Stochastic oscillator: smoothed %K and its %D signal.
///
/// A window with zero high-low range yields a raw %K of 50.
///
/// # Errors
///
/// Returns an error if any period is zero.
pub fn stochastic(
    bars: &[Bar],
    k_period: usize,
    k_smoothing: usize,
    d_period: usize,
) -> Result<Vec<NamedLine>> {
    require_period("k_period", k_period)?;
    require_period("k_smoothing", k_smoothing)?;
    require_period("d_period", d_period)?;

    let (hh, ll) = channel(bars, k_period);
    let raw_k: Vec<Option<f64>> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let (hh, ll) = (hh[i]?, ll[i]?);
            Some(if hh > ll {
                (bar.close - ll) / (hh - ll) * 100.0
            } else {
                50.0
            })
        })
        .collect();
    let k = defined_window_map(&raw_k, k_smoothing, mean);
    let d = defined_window_map(&k, d_period, mean);

    Ok(vec![
        NamedLine::new("k", points(bars, k)),
        NamedLine::new("d", points(bars, d)),
    ])
}

/// Williams %R in `[-100, 0]`.
///
/// A window with zero high-low range yields -50.
///
/// # Errors
///
/// Returns an error if `period` is zero.
pub fn williams_r(bars: &[Bar], period: usize) -> Result<Vec<Point>> {
    require_period("period", period)?;
    let (hh, ll) = channel(bars, period);
    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let (hh, ll) = (hh[i]?, ll[i]?);
            Some(if hh > ll {
                (hh - bar.close) / (hh - ll) * -100.0
            } else {
                -50.0
            })
        })
        .collect();
    Ok(points(bars, values))
}

/// Commodity Channel Index over the typical price.
///
/// A window with zero mean absolute deviation yields 0.
///
/// # Errors
///
/// Returns an error if `period` is zero.
pub fn cci(bars: &[Bar], period: usize) -> Result<Vec<Point>> {
    require_period("period", period)?;
    let tp = PriceSource::Hlc3.series(bars);
    let values = window_map(tp.len(), period, |w| {
        let window = &tp[w.clone()];
        let average = mean(window);
        let deviation = window.iter().map(|x| (x - average).abs()).sum::<f64>() / period as f64;
        let current = tp[w.end - 1];
        if deviation == 0.0 {
            0.0
        } else {
            (current - average) / (CCI_CONSTANT * deviation)
        }
    });
    Ok(points(bars, values))
}

/// Money Flow Index: a volume-weighted RSI over the typical price.
///
/// Defined from index `period`. A window without negative money flow yields
/// 100.
///
/// # Errors
///
/// Returns an error if `period` is zero.
pub fn mfi(bars: &[Bar], period: usize) -> Result<Vec<Point>> {
    require_period("period", period)?;
    let tp = PriceSource::Hlc3.series(bars);
    // flows[j] belongs to bar j + 1
    let flows: Vec<(f64, f64)> = (1..bars.len())
        .map(|i| {
            let raw = tp[i] * bars[i].volume;
            if tp[i] > tp[i - 1] {
                (raw, 0.0)
            } else if tp[i] < tp[i - 1] {
                (0.0, raw)
            } else {
                (0.0, 0.0)
            }
        })
        .collect();
    let windowed = window_map(flows.len(), period, |w| {
        let (positive, negative) = flows[w]
            .iter()
            .fold((0.0_f64, 0.0_f64), |(p, n), (fp, fnv)| (p + fp, n + fnv));
        if negative == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + positive / negative)
        }
    });
    Ok(points(bars, shift_right(windowed, bars.len())))
}

/// Ultimate Oscillator blending three buying-pressure windows 4:2:1.
///
/// Defined from index `long`. A window with zero true range contributes 0.
///
/// # Errors
///
/// Returns an error if a period is zero or the periods are not increasing.
pub fn ultimate_oscillator(
    bars: &[Bar],
    short: usize,
    medium: usize,
    long: usize,
) -> Result<Vec<Point>> {
    require_period("short", short)?;
    require_period("medium", medium)?;
    require_period("long", long)?;
    require_ordered("short", short, medium)?;
    require_ordered("medium", medium, long)?;

    // pressure[j] belongs to bar j + 1
    let pressure: Vec<(f64, f64)> = (1..bars.len())
        .map(|i| {
            let prev_close = bars[i - 1].close;
            let floor = bars[i].low.min(prev_close);
            let ceiling = bars[i].high.max(prev_close);
            (bars[i].close - floor, ceiling - floor)
        })
        .collect();
    let average = |period: usize| {
        window_map(pressure.len(), period, |w| {
            let (bp, tr) = pressure[w]
                .iter()
                .fold((0.0_f64, 0.0_f64), |(b, t), (pb, pt)| (b + pb, t + pt));
            if tr == 0.0 { 0.0 } else { bp / tr }
        })
    };
    let (a_short, a_medium, a_long) = (average(short), average(medium), average(long));
    let values: Vec<Option<f64>> = (0..pressure.len())
        .map(|j| Some(100.0 * (4.0 * a_short[j]? + 2.0 * a_medium[j]? + a_long[j]?) / 7.0))
        .collect();
    Ok(points(bars, shift_right(values, bars.len())))
}

/// Rate of change in percent over `period` bars. A zero base yields 0.
///
/// # Errors
///
/// Returns an error if `period` is zero.
pub fn roc(bars: &[Bar], period: usize, source: PriceSource) -> Result<Vec<Point>> {
    require_period("period", period)?;
    let xs = source.series(bars);
    let values = (0..xs.len())
        .map(|i| {
            let base = xs[i.checked_sub(period)?];
            Some(if base == 0.0 {
                0.0
            } else {
                (xs[i] - base) / base * 100.0
            })
        })
        .collect();
    Ok(points(bars, values))
}

/// Absolute price change over `period` bars.
///
/// # Errors
///
/// Returns an error if `period` is zero.
pub fn momentum(bars: &[Bar], period: usize, source: PriceSource) -> Result<Vec<Point>> {
    require_period("period", period)?;
    let xs = source.series(bars);
    let values = (0..xs.len())
        .map(|i| Some(xs[i] - xs[i.checked_sub(period)?]))
        .collect();
    Ok(points(bars, values))
}

/// Rolling highest high and lowest low.
fn channel(bars: &[Bar], period: usize) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    (highest_values(&highs, period), lowest_values(&lows, period))
}

/// Realigns a series computed over bar pairs (index j = bar j + 1).
fn shift_right(values: Vec<Option<f64>>, len: usize) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(len);
    if len > 0 {
        out.push(None);
    }
    out.extend(values);
    out
}
