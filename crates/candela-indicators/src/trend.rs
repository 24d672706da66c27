//! Trend and market-structure indicators.

use candela_types::{
    Bar, CandelaError, Result, require_non_negative, require_period, require_positive,
};

use crate::output::{Direction, NamedLine, Point, TrendPoint, points};
use crate::smoothing::wilder_values;
use crate::volatility::atr_values;

/// Average Directional Index with its +DI and −DI components.
///
/// Directional movement starts at the second bar, so the DI lines are first
/// defined at index `period` and ADX, a Wilder average of DX, at
/// `2 * period - 1`. Zero true range yields DI values of 0; a zero DI sum
/// yields DX 0.
///
/// # Errors
///
/// Returns an error if `period` is zero.
pub fn adx(bars: &[Bar], period: usize) -> Result<Vec<NamedLine>> {
    require_period("period", period)?;
    let n = bars.len();
    let mut plus_di = vec![None; n];
    let mut minus_di = vec![None; n];
    let mut adx = vec![None; n];
    if n < 2 {
        return Ok(adx_lines(bars, adx, plus_di, minus_di));
    }

    // movement[j] belongs to bar j + 1
    let mut plus_dm = Vec::with_capacity(n - 1);
    let mut minus_dm = Vec::with_capacity(n - 1);
    let mut tr = Vec::with_capacity(n - 1);
    for w in bars.windows(2) {
        let (prev, bar) = (&w[0], &w[1]);
        let up = bar.high - prev.high;
        let down = prev.low - bar.low;
        plus_dm.push(if up > down && up > 0.0 { up } else { 0.0 });
        minus_dm.push(if down > up && down > 0.0 { down } else { 0.0 });
        tr.push(bar.true_range(Some(prev.close)));
    }

    let tr = wilder_values(&tr, period);
    let plus = wilder_values(&plus_dm, period);
    let minus = wilder_values(&minus_dm, period);
    let mut dx = Vec::new();
    let mut dx_start = None;
    for j in 0..tr.len() {
        let (Some(tr), Some(plus), Some(minus)) = (tr[j], plus[j], minus[j]) else {
            continue;
        };
        let (p, m) = if tr > 0.0 {
            (plus / tr * 100.0, minus / tr * 100.0)
        } else {
            (0.0, 0.0)
        };
        plus_di[j + 1] = Some(p);
        minus_di[j + 1] = Some(m);
        dx_start.get_or_insert(j + 1);
        dx.push(if p + m > 0.0 {
            (p - m).abs() / (p + m) * 100.0
        } else {
            0.0
        });
    }
    if let Some(start) = dx_start {
        for (k, value) in wilder_values(&dx, period).into_iter().enumerate() {
            adx[start + k] = value;
        }
    }
    Ok(adx_lines(bars, adx, plus_di, minus_di))
}

fn adx_lines(
    bars: &[Bar],
    adx: Vec<Option<f64>>,
    plus_di: Vec<Option<f64>>,
    minus_di: Vec<Option<f64>>,
) -> Vec<NamedLine> {
    vec![
        NamedLine::new("adx", points(bars, adx)),
        NamedLine::new("plus_di", points(bars, plus_di)),
        NamedLine::new("minus_di", points(bars, minus_di)),
    ]
}

/// Parabolic SAR parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SarParams {
    /// Initial acceleration factor.
    pub start: f64,
    /// Increment applied on every new extreme point.
    pub increment: f64,
    /// Acceleration factor cap.
    pub maximum: f64,
}

impl Default for SarParams {
    fn default() -> Self {
        Self {
            start: 0.02,
            increment: 0.02,
            maximum: 0.2,
        }
    }
}

/// Parabolic stop-and-reverse.
///
/// The initial trend is up when the second close is not below the first.
/// The first bar carries no value.
///
/// # Errors
///
/// Returns an error if `start` or `maximum` is not positive, `increment` is
/// negative, or `start > maximum`.
pub fn parabolic_sar(bars: &[Bar], params: SarParams) -> Result<Vec<TrendPoint>> {
    let SarParams {
        start,
        increment,
        maximum,
    } = params;
    require_positive("start", start)?;
    require_non_negative("increment", increment)?;
    require_positive("maximum", maximum)?;
    if start > maximum {
        return Err(CandelaError::invalid(
            "start",
            format!("initial acceleration {start} exceeds maximum {maximum}"),
        ));
    }

    let mut out: Vec<TrendPoint> = bars.iter().map(|b| empty_trend(b.time)).collect();
    if bars.len() < 2 {
        return Ok(out);
    }

    let mut direction = if bars[1].close >= bars[0].close {
        Direction::Up
    } else {
        Direction::Down
    };
    let (mut sar, mut extreme) = match direction {
        Direction::Up => (bars[0].low, bars[0].high),
        Direction::Down => (bars[0].high, bars[0].low),
    };
    let mut af = start;

    for i in 1..bars.len() {
        let bar = &bars[i];
        let mut next = sar + af * (extreme - sar);
        let prior = &bars[i.saturating_sub(2)..i];
        match direction {
            Direction::Up => {
                next = prior.iter().map(|b| b.low).fold(next, f64::min);
                if bar.low < next {
                    direction = Direction::Down;
                    next = extreme;
                    extreme = bar.low;
                    af = start;
                } else if bar.high > extreme {
                    extreme = bar.high;
                    af = (af + increment).min(maximum);
                }
            }
            Direction::Down => {
                next = prior.iter().map(|b| b.high).fold(next, f64::max);
                if bar.high > next {
                    direction = Direction::Up;
                    next = extreme;
                    extreme = bar.high;
                    af = start;
                } else if bar.low < extreme {
                    extreme = bar.low;
                    af = (af + increment).min(maximum);
                }
            }
        }
        sar = next;
        out[i] = TrendPoint {
            time: bar.time,
            value: Some(sar),
            direction: Some(direction),
        };
    }
    Ok(out)
}

/// SuperTrend: ATR bands around the median price that ratchet with the trend.
///
/// Defined from the first ATR value at `period - 1`; the trend starts up and
/// flips when the close crosses the active band.
///
/// # Errors
///
/// Returns an error if `period` is zero or `multiplier` is not positive.
pub fn supertrend(bars: &[Bar], period: usize, multiplier: f64) -> Result<Vec<TrendPoint>> {
    require_period("period", period)?;
    require_positive("multiplier", multiplier)?;

    let atr = atr_values(bars, period);
    let mut out: Vec<TrendPoint> = bars.iter().map(|b| empty_trend(b.time)).collect();
    let mut state: Option<(f64, f64, Direction)> = None;

    for (i, bar) in bars.iter().enumerate() {
        let Some(atr) = atr[i] else { continue };
        let mid = bar.median_price();
        let basic_upper = mid + multiplier * atr;
        let basic_lower = mid - multiplier * atr;

        let (upper, lower, direction) = match state {
            None => {
                let direction = if bar.close < basic_lower {
                    Direction::Down
                } else {
                    Direction::Up
                };
                (basic_upper, basic_lower, direction)
            }
            Some((prev_upper, prev_lower, prev_direction)) => {
                let prev_close = bars[i - 1].close;
                let upper = if basic_upper < prev_upper || prev_close > prev_upper {
                    basic_upper
                } else {
                    prev_upper
                };
                let lower = if basic_lower > prev_lower || prev_close < prev_lower {
                    basic_lower
                } else {
                    prev_lower
                };
                let direction = match prev_direction {
                    Direction::Up if bar.close < lower => Direction::Down,
                    Direction::Down if bar.close > upper => Direction::Up,
                    d => d,
                };
                (upper, lower, direction)
            }
        };
        state = Some((upper, lower, direction));
        out[i] = TrendPoint {
            time: bar.time,
            value: Some(match direction {
                Direction::Up => lower,
                Direction::Down => upper,
            }),
            direction: Some(direction),
        };
    }
    Ok(out)
}

/// ZigZag over closes: swing pivots separated by at least `deviation_pct`.
///
/// Confirmed pivots carry the close at that bar, as does the final
/// unconfirmed extreme; every other bar has no value.
///
/// # Errors
///
/// Returns an error if `deviation_pct` is not positive.
pub fn zigzag(bars: &[Bar], deviation_pct: f64) -> Result<Vec<Point>> {
    require_positive("deviation", deviation_pct)?;
    let d = deviation_pct / 100.0;
    let mut values = vec![None; bars.len()];
    let Some(first) = bars.first() else {
        return Ok(Vec::new());
    };

    let mut direction: Option<Direction> = None;
    let (mut high, mut low) = ((0, first.close), (0, first.close));
    let mut extreme = (0, first.close);

    for (i, bar) in bars.iter().enumerate().skip(1) {
        let x = bar.close;
        match direction {
            None => {
                if x >= low.1 * (1.0 + d) {
                    values[low.0] = Some(low.1);
                    direction = Some(Direction::Up);
                    extreme = (i, x);
                } else if x <= high.1 * (1.0 - d) {
                    values[high.0] = Some(high.1);
                    direction = Some(Direction::Down);
                    extreme = (i, x);
                } else {
                    if x > high.1 {
                        high = (i, x);
                    }
                    if x < low.1 {
                        low = (i, x);
                    }
                }
            }
            Some(Direction::Up) => {
                if x > extreme.1 {
                    extreme = (i, x);
                } else if x <= extreme.1 * (1.0 - d) {
                    values[extreme.0] = Some(extreme.1);
                    direction = Some(Direction::Down);
                    extreme = (i, x);
                }
            }
            Some(Direction::Down) => {
                if x < extreme.1 {
                    extreme = (i, x);
                } else if x >= extreme.1 * (1.0 + d) {
                    values[extreme.0] = Some(extreme.1);
                    direction = Some(Direction::Up);
                    extreme = (i, x);
                }
            }
        }
    }
    if direction.is_some() {
        values[extreme.0] = Some(extreme.1);
    }
    Ok(points(bars, values))
}

/// Aroon up, down and oscillator over `period + 1` bars.
///
/// Ties resolve to the most recent extreme.
///
/// # Errors
///
/// Returns an error if `period` is zero.
pub fn aroon(bars: &[Bar], period: usize) -> Result<Vec<NamedLine>> {
    require_period("period", period)?;
    let n = bars.len();
    let mut up = vec![None; n];
    let mut down = vec![None; n];
    let mut oscillator = vec![None; n];
    let p = period as f64;

    for i in period..n {
        let window = &bars[i - period..=i];
        let mut high_at = 0;
        let mut low_at = 0;
        for (k, bar) in window.iter().enumerate() {
            if bar.high >= window[high_at].high {
                high_at = k;
            }
            if bar.low <= window[low_at].low {
                low_at = k;
            }
        }
        let u = (p - (period - high_at) as f64) / p * 100.0;
        let d = (p - (period - low_at) as f64) / p * 100.0;
        up[i] = Some(u);
        down[i] = Some(d);
        oscillator[i] = Some(u - d);
    }

    Ok(vec![
        NamedLine::new("up", points(bars, up)),
        NamedLine::new("down", points(bars, down)),
        NamedLine::new("oscillator", points(bars, oscillator)),
    ])
}

/// Williams fractals: a high (low) strictly above (below) the two bars on
/// each side. The value is the fractal's high or low; the last two bars
/// cannot be confirmed yet.
#[must_use]
pub fn fractals(bars: &[Bar]) -> Vec<NamedLine> {
    let n = bars.len();
    let mut up = vec![None; n];
    let mut down = vec![None; n];
    for i in 2..n.saturating_sub(2) {
        let centre = &bars[i];
        let neighbours = bars[i - 2..i].iter().chain(&bars[i + 1..=i + 2]);
        let (mut is_up, mut is_down) = (true, true);
        for other in neighbours {
            is_up &= centre.high > other.high;
            is_down &= centre.low < other.low;
        }
        if is_up {
            up[i] = Some(centre.high);
        }
        if is_down {
            down[i] = Some(centre.low);
        }
    }
    vec![
        NamedLine::new("up", points(bars, up)),
        NamedLine::new("down", points(bars, down)),
    ]
}

const fn empty_trend(time: i64) -> TrendPoint {
    TrendPoint {
        time,
        value: None,
        direction: None,
    }
}
