//! Kagi lines.

use candela_indicators::Direction;
use candela_types::{Bar, Result, fold, require_percentage, require_positive};
use serde::{Deserialize, Serialize};

/// Price movement needed to start a line in the opposite direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Reversal {
    /// Percentage of the series' mean close.
    Percent {
        /// Percentage in `(0, 100]`.
        percent: f64,
    },
    /// Absolute price amount.
    Fixed {
        /// Reversal amount in price units.
        amount: f64,
    },
}

impl Default for Reversal {
    fn default() -> Self {
        Self::Percent { percent: 4.0 }
    }
}

impl Reversal {
    /// Resolves the reversal amount for `bars`.
    ///
    /// A percentage applies to the mean absolute close, so the amount is
    /// positive unless every close is zero, in which case the series is flat.
    ///
    /// # Errors
    ///
    /// Returns an error for a percentage outside `(0, 100]` or a non-positive
    /// fixed amount.
    pub fn resolve(&self, bars: &[Bar]) -> Result<f64> {
        match *self {
            Self::Percent { percent } => {
                require_percentage("reversal", percent)?;
                let total: f64 = bars.iter().map(|b| b.close.abs()).sum();
                let mean = total / bars.len().max(1) as f64;
                Ok(mean * percent / 100.0)
            }
            Self::Fixed { amount } => require_positive("reversal", amount),
        }
    }
}

/// Yang (thick) lines follow a break above the previous shoulder, yin (thin)
/// lines a break below the previous waist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineWeight {
    /// Thick line.
    Yang,
    /// Thin line.
    Yin,
}

/// One vertical Kagi segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KagiLine {
    /// Time of the bar that started the line.
    pub start_time: i64,
    /// Time of the bar that last extended the line.
    pub end_time: i64,
    /// Price the line starts at.
    pub start: f64,
    /// Price the line currently ends at.
    pub end: f64,
    /// Direction of travel.
    pub direction: Direction,
    /// Weight at the end of the line.
    pub weight: LineWeight,
    /// Volume of the bars assigned to the line.
    pub volume: f64,
}

impl KagiLine {
    /// Returns the line as a plain bar.
    #[must_use]
    pub fn to_bar(&self) -> Bar {
        Bar::new(
            self.start_time,
            self.start,
            self.start.max(self.end),
            self.start.min(self.end),
            self.end,
            self.volume,
        )
    }
}

#[derive(Debug)]
struct State {
    amount: f64,
    line: Option<KagiLine>,
    origin: (i64, f64),
    shoulder: Option<f64>,
    waist: Option<f64>,
    volume: f64,
}

impl State {
    fn reweigh(&self, line: &mut KagiLine) {
        match line.direction {
            Direction::Up if self.shoulder.is_some_and(|s| line.end > s) => {
                line.weight = LineWeight::Yang;
            }
            Direction::Down if self.waist.is_some_and(|w| line.end < w) => {
                line.weight = LineWeight::Yin;
            }
            _ => {}
        }
    }
}

/// Builds Kagi lines from closing prices.
///
/// The first line starts at the first close and takes the direction of the
/// first differing close. A line extends while price moves its way and
/// reverses once price retraces by at least the reversal amount. The last
/// line is emitted as it stands at the end of the series; a series that never
/// moves yields a single flat line at the first close.
///
/// # Errors
///
/// Returns an error if the reversal parameter is invalid.
pub fn kagi(bars: &[Bar], reversal: Reversal) -> Result<Vec<KagiLine>> {
    let amount = reversal.resolve(bars)?;
    let Some(first) = bars.first() else {
        return Ok(Vec::new());
    };

    let init = State {
        amount,
        line: None,
        origin: (first.time, first.close),
        shoulder: None,
        waist: None,
        volume: 0.0,
    };
    let (state, mut lines) = fold(bars, init, |state, bar, out: &mut Vec<KagiLine>| {
        let price = bar.close;
        state.volume += bar.volume;
        let Some(mut line) = state.line.take() else {
            let (time, start) = state.origin;
            if price != start {
                let direction = if price > start {
                    Direction::Up
                } else {
                    Direction::Down
                };
                state.line = Some(KagiLine {
                    start_time: time,
                    end_time: bar.time,
                    start,
                    end: price,
                    direction,
                    weight: match direction {
                        Direction::Up => LineWeight::Yang,
                        Direction::Down => LineWeight::Yin,
                    },
                    volume: std::mem::take(&mut state.volume),
                });
            }
            return;
        };

        let extends = match line.direction {
            Direction::Up => price > line.end,
            Direction::Down => price < line.end,
        };
        let retrace = (line.end - price).abs();
        if extends {
            line.end = price;
            line.end_time = bar.time;
            line.volume += std::mem::take(&mut state.volume);
            state.reweigh(&mut line);
            state.line = Some(line);
        } else if retrace >= state.amount {
            match line.direction {
                Direction::Up => state.shoulder = Some(line.end),
                Direction::Down => state.waist = Some(line.end),
            }
            let mut next = KagiLine {
                start_time: bar.time,
                end_time: bar.time,
                start: line.end,
                end: price,
                direction: line.direction.flip(),
                weight: line.weight,
                volume: std::mem::take(&mut state.volume),
            };
            state.reweigh(&mut next);
            out.push(line);
            state.line = Some(next);
        } else {
            state.line = Some(line);
        }
    });

    let (time, origin) = state.origin;
    let mut last = state.line.unwrap_or(KagiLine {
        start_time: time,
        end_time: time,
        start: origin,
        end: origin,
        direction: Direction::Up,
        weight: LineWeight::Yang,
        volume: 0.0,
    });
    last.volume += state.volume;
    lines.push(last);
    Ok(lines)
}
