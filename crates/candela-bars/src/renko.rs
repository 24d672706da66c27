//! Renko bricks.

use candela_indicators::Direction;
use candela_types::{Bar, CandelaError, Result, fold};
use serde::Serialize;
use tracing::debug;

use crate::BoxSize;

/// One Renko brick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RenkoBrick {
    /// Time of the bar that completed (or, if pending, last touched) the brick.
    pub time: i64,
    /// Brick open price.
    pub open: f64,
    /// Brick close price.
    pub close: f64,
    /// Brick direction.
    pub direction: Direction,
    /// Volume traded while the brick formed.
    pub volume: f64,
    /// False for the in-progress brick flushed at the end of the series.
    pub complete: bool,
}

impl RenkoBrick {
    /// Returns the brick as a plain bar.
    #[must_use]
    pub fn to_bar(&self) -> Bar {
        Bar::new(
            self.time,
            self.open,
            self.open.max(self.close),
            self.open.min(self.close),
            self.close,
            self.volume,
        )
    }
}

/// Result of a Renko transform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenkoChart {
    /// Box height used, `None` when no positive box could be derived.
    pub box_size: Option<f64>,
    /// Completed bricks, each exactly one box tall.
    pub bricks: Vec<RenkoBrick>,
    /// Price movement since the last completed brick, if any.
    pub pending: Option<RenkoBrick>,
}

impl RenkoChart {
    /// Completed bricks followed by the pending brick, as bars.
    #[must_use]
    pub fn to_bars(&self) -> Vec<Bar> {
        self.bricks
            .iter()
            .chain(self.pending.as_ref())
            .map(RenkoBrick::to_bar)
            .collect()
    }
}

/// Most bricks one transform may produce.
pub const MAX_BRICKS: usize = 1_000_000;

/// Smallest box height, relative to the largest absolute close, that still
/// moves a price by a representable step.
const MIN_RELATIVE_BOX: f64 = 1e-12;

/// Brick edges are `anchor + k * box_size`; `last` holds the open and close
/// edge indices of the previous brick.
#[derive(Debug)]
struct State {
    box_size: f64,
    anchor: f64,
    last: Option<(i64, i64, Direction)>,
    volume: f64,
    last_time: i64,
    dangling: bool,
}

impl State {
    fn price(&self, edge: i64) -> f64 {
        self.anchor + edge as f64 * self.box_size
    }

    /// Bricks `price` completes: the starting edge, the brick count and the
    /// direction.
    fn next_bricks(&self, price: f64) -> Option<(i64, i64, Direction)> {
        let offset = (price - self.anchor) / self.box_size;
        let up = |from: i64| {
            let count = (offset - from as f64).floor() as i64;
            (count >= 1).then_some((from, count, Direction::Up))
        };
        let down = |from: i64| {
            let count = (from as f64 - offset).floor() as i64;
            (count >= 1).then_some((from, count, Direction::Down))
        };
        match self.last {
            None => up(0).or_else(|| down(0)),
            Some((open, close, Direction::Up)) => up(close).or_else(|| down(open)),
            Some((open, close, Direction::Down)) => down(close).or_else(|| up(open)),
        }
    }

    fn pending(&self, close: f64) -> Option<RenkoBrick> {
        if !self.dangling {
            return None;
        }
        let open = self
            .last
            .map_or(self.anchor, |(_, edge, _)| self.price(edge));
        Some(RenkoBrick {
            time: self.last_time,
            open,
            close,
            direction: if close >= open {
                Direction::Up
            } else {
                Direction::Down
            },
            volume: self.volume,
            complete: false,
        })
    }
}

/// Rejects a box too small to step through the series' prices, or one that
/// could need more than [`MAX_BRICKS`] bricks.
fn check_box(bars: &[Bar], size: f64) -> Result<()> {
    let magnitude = bars.iter().map(|b| b.close.abs()).fold(0.0, f64::max);
    if size <= magnitude * MIN_RELATIVE_BOX {
        return Err(CandelaError::invalid(
            "box_size",
            format!("{size} is below the price resolution at {magnitude}"),
        ));
    }
    // every brick needs at least one box of close-to-close travel
    let travel: f64 = bars.windows(2).map(|w| (w[1].close - w[0].close).abs()).sum();
    let bound = travel / size;
    if bound > MAX_BRICKS as f64 {
        return Err(CandelaError::invalid(
            "box_size",
            format!("{size} could produce {bound:.0} bricks, more than {MAX_BRICKS}"),
        ));
    }
    Ok(())
}

/// Builds Renko bricks from closing prices.
///
/// Bricks continue one box beyond the previous close; a reversal needs one
/// box beyond the previous brick's open, so it starts from that open. Volume
/// accumulated since the last brick is split evenly across the bricks one bar
/// completes. Movement that never fills a box is returned as
/// [`RenkoChart::pending`].
///
/// # Errors
///
/// Returns an error if the box size is invalid (see [`BoxSize::resolve`]),
/// below the float resolution of the series' prices, or small enough to
/// need more than [`MAX_BRICKS`] bricks.
pub fn renko(bars: &[Bar], box_size: BoxSize) -> Result<RenkoChart> {
    let Some(first) = bars.first() else {
        return Ok(RenkoChart {
            box_size: box_size.resolve(bars)?,
            bricks: Vec::new(),
            pending: None,
        });
    };
    let resolved = box_size.resolve(bars)?;
    let last_close = bars[bars.len() - 1].close;

    let Some(size) = resolved else {
        debug!(bars = bars.len(), "no positive box size, whole series pending");
        let state = State {
            box_size: 0.0,
            anchor: first.close,
            last: None,
            volume: bars.iter().map(|b| b.volume).sum(),
            last_time: bars[bars.len() - 1].time,
            dangling: true,
        };
        return Ok(RenkoChart {
            box_size: None,
            bricks: Vec::new(),
            pending: state.pending(last_close),
        });
    };
    check_box(bars, size)?;

    let init = State {
        box_size: size,
        anchor: first.close,
        last: None,
        volume: 0.0,
        last_time: first.time,
        dangling: false,
    };
    let (state, bricks) = fold(bars, init, |state, bar, out: &mut Vec<RenkoBrick>| {
        state.volume += bar.volume;
        state.last_time = bar.time;
        state.dangling = true;
        let Some((from, count, direction)) = state.next_bricks(bar.close) else {
            return;
        };
        let step = if direction == Direction::Up { 1 } else { -1 };
        let share = state.volume / count as f64;
        for k in 0..count {
            let open = from + k * step;
            out.push(RenkoBrick {
                time: bar.time,
                open: state.price(open),
                close: state.price(open + step),
                direction,
                volume: share,
                complete: true,
            });
        }
        let close = from + count * step;
        state.last = Some((close - step, close, direction));
        state.volume = 0.0;
        state.dangling = state.price(close) != bar.close;
    });

    let pending = state.pending(last_close);
    if bricks.is_empty() {
        debug!(box_size = size, "no brick closed, flushing in-progress brick");
    }
    Ok(RenkoChart {
        box_size: Some(size),
        bricks,
        pending,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn closes(values: &[f64]) -> Vec<Bar> {
        values
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(i as i64, c, c, c, c, 10.0))
            .collect()
    }

    #[test]
    fn test_continuation_and_multi_box_bar() {
        let chart = renko(&closes(&[100.0, 101.0, 103.5]), BoxSize::fixed(1.0)).unwrap();
        let levels: Vec<_> = chart.bricks.iter().map(|b| (b.open, b.close)).collect();
        assert_eq!(levels, vec![(100.0, 101.0), (101.0, 102.0), (102.0, 103.0)]);
        // bar 2 completed two bricks with 10 volume
        assert_relative_eq!(chart.bricks[1].volume, 5.0);
        assert_relative_eq!(chart.bricks[0].volume, 20.0);
        let pending = chart.pending.unwrap();
        assert!(!pending.complete);
        assert_eq!((pending.open, pending.close), (103.0, 103.5));
    }

    #[test]
    fn test_reversal_needs_two_boxes() {
        let chart = renko(&closes(&[100.0, 102.0, 100.5, 99.9]), BoxSize::fixed(1.0)).unwrap();
        let dirs: Vec<_> = chart.bricks.iter().map(|b| b.direction).collect();
        assert_eq!(dirs, vec![Direction::Up, Direction::Up, Direction::Down]);
        let reversal = chart.bricks[2];
        assert_eq!((reversal.open, reversal.close), (101.0, 100.0));
    }

    #[test]
    fn test_every_brick_is_one_box() {
        let chart = renko(
            &closes(&[10.0, 12.7, 9.1, 15.3, 4.2, 4.9]),
            BoxSize::fixed(0.7),
        )
        .unwrap();
        for brick in &chart.bricks {
            assert_relative_eq!((brick.close - brick.open).abs(), 0.7, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_box_never_closes_flushes_single_bar() {
        let chart = renko(&closes(&[100.0, 100.4, 99.8]), BoxSize::fixed(50.0)).unwrap();
        assert!(chart.bricks.is_empty());
        let pending = chart.pending.unwrap();
        assert_eq!((pending.open, pending.close), (100.0, 99.8));
        assert_relative_eq!(pending.volume, 30.0);
        assert_eq!(chart.to_bars().len(), 1);
    }

    #[test]
    fn test_zero_box_rejected_and_flat_series_pending() {
        assert!(renko(&closes(&[1.0, 2.0]), BoxSize::fixed(0.0)).is_err());
        let flat = renko(&closes(&[5.0, 5.0, 5.0]), BoxSize::default()).unwrap();
        assert_eq!(flat.box_size, None);
        assert!(flat.bricks.is_empty());
        assert!(flat.pending.is_some());
    }

    #[test]
    fn test_box_below_price_resolution_rejected() {
        let bars = closes(&[1e16, 1e16 + 4.0]);
        let err = renko(&bars, BoxSize::fixed(1.0)).unwrap_err();
        assert!(err.is_invalid_parameter());
        assert!(err.to_string().contains("box_size"));
    }

    #[test]
    fn test_too_many_bricks_rejected() {
        let err = renko(&closes(&[100.0, 101.0]), BoxSize::fixed(1e-7)).unwrap_err();
        assert!(err.is_invalid_parameter());
        // the same move with a coarser box stays within the limit
        let chart = renko(&closes(&[100.0, 101.0]), BoxSize::fixed(1e-3)).unwrap();
        assert!(chart.bricks.len() <= MAX_BRICKS);
        assert!(chart.bricks.len() >= 999);
    }

    #[test]
    fn test_brick_edges_stay_on_grid() {
        let chart = renko(&closes(&[0.0, 10.0, 4.0]), BoxSize::fixed(0.1)).unwrap();
        for (k, brick) in chart.bricks.iter().take(100).enumerate() {
            assert_relative_eq!(brick.open, k as f64 * 0.1, epsilon = 1e-9);
        }
        let last = chart.bricks.last().unwrap();
        assert_eq!(last.direction, Direction::Down);
        assert_relative_eq!(last.close, 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_empty() {
        let chart = renko(&[], BoxSize::fixed(1.0)).unwrap();
        assert!(chart.bricks.is_empty());
        assert!(chart.pending.is_none());
    }
}
