//! Point & Figure columns.

use candela_types::{Bar, Result, fold, require_period};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::BoxSize;

/// Default number of boxes a reversal must cover.
pub const DEFAULT_REVERSAL: usize = 3;

/// Column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ColumnKind {
    /// Rising column.
    X,
    /// Falling column.
    O,
}

/// Which prices drive the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PnfMethod {
    /// Closing prices only.
    #[default]
    Close,
    /// Highs extend X columns and lows extend O columns.
    HighLow,
}

/// Point & Figure parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PnfParams {
    /// Box height.
    pub box_size: BoxSize,
    /// Boxes needed to start a new column.
    pub reversal: usize,
    /// Price inputs.
    pub method: PnfMethod,
}

impl Default for PnfParams {
    fn default() -> Self {
        Self {
            box_size: BoxSize::default(),
            reversal: DEFAULT_REVERSAL,
            method: PnfMethod::default(),
        }
    }
}

impl PnfParams {
    /// Sets the box size.
    #[must_use]
    pub const fn with_box_size(mut self, box_size: BoxSize) -> Self {
        self.box_size = box_size;
        self
    }

    /// Sets the reversal box count.
    #[must_use]
    pub const fn with_reversal(mut self, reversal: usize) -> Self {
        self.reversal = reversal;
        self
    }

    /// Sets the price method.
    #[must_use]
    pub const fn with_method(mut self, method: PnfMethod) -> Self {
        self.method = method;
        self
    }
}

/// One Point & Figure column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PnfColumn {
    /// X or O.
    pub kind: ColumnKind,
    /// Highest box boundary.
    pub top: f64,
    /// Lowest box boundary.
    pub bottom: f64,
    /// Number of boxes in the column.
    pub boxes: usize,
    /// Time of the bar that opened the column.
    pub start_time: i64,
    /// Time of the bar that last extended the column.
    pub end_time: i64,
    /// Volume assigned to the column.
    pub volume: f64,
}

impl PnfColumn {
    /// Returns the column as a plain bar; X columns open at the bottom.
    #[must_use]
    pub fn to_bar(&self) -> Bar {
        let (open, close) = match self.kind {
            ColumnKind::X => (self.bottom, self.top),
            ColumnKind::O => (self.top, self.bottom),
        };
        Bar::new(self.start_time, open, self.top, self.bottom, close, self.volume)
    }
}

/// Result of a Point & Figure transform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PnfChart {
    /// Box height used, `None` when no positive box could be derived.
    pub box_size: Option<f64>,
    /// Columns in order; the last one is still open.
    pub columns: Vec<PnfColumn>,
}

#[derive(Debug)]
struct State {
    size: f64,
    reversal: f64,
    method: PnfMethod,
    anchor: f64,
    column: Option<PnfColumn>,
    volume: f64,
}

impl State {
    fn boxes(&self, distance: f64) -> usize {
        // tolerate representation error on exact multiples
        (distance / self.size + 1e-9).floor().max(0.0) as usize
    }

    fn step(&mut self, bar: &Bar, out: &mut Vec<PnfColumn>) {
        self.volume += bar.volume;
        let (up_price, down_price) = match self.method {
            PnfMethod::Close => (bar.close, bar.close),
            PnfMethod::HighLow => (bar.high, bar.low),
        };
        let size = self.size;

        let Some(mut column) = self.column.take() else {
            let up = self.boxes(up_price - self.anchor);
            let down = self.boxes(self.anchor - down_price);
            let kind = if up >= 1 && up >= down {
                ColumnKind::X
            } else if down >= 1 {
                ColumnKind::O
            } else {
                return;
            };
            let (top, bottom, boxes) = match kind {
                ColumnKind::X => (self.anchor + up as f64 * size, self.anchor, up),
                ColumnKind::O => (self.anchor, self.anchor - down as f64 * size, down),
            };
            self.column = Some(PnfColumn {
                kind,
                top,
                bottom,
                boxes,
                start_time: bar.time,
                end_time: bar.time,
                volume: std::mem::take(&mut self.volume),
            });
            return;
        };

        match column.kind {
            ColumnKind::X => {
                let extend = self.boxes(up_price - column.top);
                let reverse = self.boxes(column.top - down_price);
                if extend >= 1 {
                    column.top += extend as f64 * size;
                    column.boxes += extend;
                    column.end_time = bar.time;
                    column.volume += std::mem::take(&mut self.volume);
                } else if reverse as f64 >= self.reversal {
                    let next = PnfColumn {
                        kind: ColumnKind::O,
                        top: column.top,
                        bottom: column.top - reverse as f64 * size,
                        boxes: reverse,
                        start_time: bar.time,
                        end_time: bar.time,
                        volume: std::mem::take(&mut self.volume),
                    };
                    out.push(column);
                    column = next;
                }
            }
            ColumnKind::O => {
                let extend = self.boxes(column.bottom - down_price);
                let reverse = self.boxes(up_price - column.bottom);
                if extend >= 1 {
                    column.bottom -= extend as f64 * size;
                    column.boxes += extend;
                    column.end_time = bar.time;
                    column.volume += std::mem::take(&mut self.volume);
                } else if reverse as f64 >= self.reversal {
                    let next = PnfColumn {
                        kind: ColumnKind::X,
                        top: column.bottom + reverse as f64 * size,
                        bottom: column.bottom,
                        boxes: reverse,
                        start_time: bar.time,
                        end_time: bar.time,
                        volume: std::mem::take(&mut self.volume),
                    };
                    out.push(column);
                    column = next;
                }
            }
        }
        self.column = Some(column);
    }
}

/// Builds a Point & Figure chart.
///
/// Boxes sit on a grid anchored at the first close. A column extends by
/// whole boxes and flips only once price retraces `reversal` boxes from its
/// extreme; the new column starts at that extreme. The open
/// column at the end of the series is included, together with any volume
/// that has not moved it yet.
///
/// # Errors
///
/// Returns an error if the box size is invalid or `reversal` is zero.
pub fn point_figure(bars: &[Bar], params: PnfParams) -> Result<PnfChart> {
    require_period("reversal", params.reversal)?;
    let resolved = params.box_size.resolve(bars)?;
    let (Some(first), Some(size)) = (bars.first(), resolved) else {
        debug!(bars = bars.len(), "no box size or no bars, empty point & figure chart");
        return Ok(PnfChart {
            box_size: resolved,
            columns: Vec::new(),
        });
    };

    let init = State {
        size,
        reversal: params.reversal as f64,
        method: params.method,
        anchor: first.close,
        column: None,
        volume: 0.0,
    };
    let (state, mut columns) = fold(bars, init, |state, bar, out| state.step(bar, out));
    if let Some(mut column) = state.column {
        column.volume += state.volume;
        columns.push(column);
    }
    Ok(PnfChart {
        box_size: Some(size),
        columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closes(values: &[f64]) -> Vec<Bar> {
        values
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(i as i64, c, c, c, c, 1.0))
            .collect()
    }

    fn params(reversal: usize) -> PnfParams {
        PnfParams::default()
            .with_box_size(BoxSize::fixed(1.0))
            .with_reversal(reversal)
    }

    #[test]
    fn test_columns_flip_on_reversal() {
        let bars = closes(&[100.0, 101.2, 103.0, 101.5, 99.9, 99.0]);
        let chart = point_figure(&bars, params(3)).unwrap();
        let cols: Vec<_> = chart
            .columns
            .iter()
            .map(|c| (c.kind, c.top, c.bottom, c.boxes))
            .collect();
        assert_eq!(
            cols,
            vec![
                (ColumnKind::X, 103.0, 100.0, 3),
                (ColumnKind::O, 103.0, 99.0, 4),
            ]
        );
    }

    #[test]
    fn test_small_retrace_keeps_column() {
        let bars = closes(&[100.0, 104.0, 102.0, 105.0]);
        let chart = point_figure(&bars, params(3)).unwrap();
        assert_eq!(chart.columns.len(), 1);
        assert_eq!(chart.columns[0].top, 105.0);
        assert_eq!(chart.columns[0].volume, 4.0);
    }

    #[test]
    fn test_high_low_method() {
        let bars = vec![
            Bar::new(0, 100.0, 100.0, 100.0, 100.0, 1.0),
            Bar::new(1, 100.0, 102.5, 99.5, 100.5, 1.0),
        ];
        let chart = point_figure(&bars, params(3).with_method(PnfMethod::HighLow)).unwrap();
        assert_eq!(chart.columns[0].kind, ColumnKind::X);
        assert_eq!(chart.columns[0].top, 102.0);
    }

    #[test]
    fn test_invalid_parameters() {
        let bars = closes(&[1.0, 2.0]);
        assert!(point_figure(&bars, params(0)).is_err());
        let zero = PnfParams::default().with_box_size(BoxSize::fixed(0.0));
        assert!(point_figure(&bars, zero).is_err());
    }

    #[test]
    fn test_to_bar_orientation() {
        let column = PnfColumn {
            kind: ColumnKind::O,
            top: 10.0,
            bottom: 7.0,
            boxes: 3,
            start_time: 1,
            end_time: 2,
            volume: 0.0,
        };
        let bar = column.to_bar();
        assert_eq!((bar.open, bar.close), (10.0, 7.0));
    }
}
