//! Line Break (three-line break) boxes.

use candela_indicators::Direction;
use candela_types::{Bar, Result, fold, require_period};
use serde::Serialize;

/// Default number of lines a reversal must break.
pub const DEFAULT_LINES: usize = 3;

/// One Line Break box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineBreakBox {
    /// Time of the bar that created the box.
    pub time: i64,
    /// Box open price.
    pub open: f64,
    /// Box close price.
    pub close: f64,
    /// Box direction.
    pub direction: Direction,
    /// Volume accumulated since the previous box.
    pub volume: f64,
}

impl LineBreakBox {
    /// Upper edge of the box.
    #[must_use]
    pub fn top(&self) -> f64 {
        self.open.max(self.close)
    }

    /// Lower edge of the box.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.open.min(self.close)
    }

    /// Returns the box as a plain bar.
    #[must_use]
    pub fn to_bar(&self) -> Bar {
        Bar::new(
            self.time,
            self.open,
            self.top(),
            self.bottom(),
            self.close,
            self.volume,
        )
    }
}

/// Builds Line Break boxes from closing prices.
///
/// The first box runs from the first close to the first differing close. A
/// close beyond the last box in its direction appends a continuation box. A
/// reversal box needs a close beyond the extreme of the last `lines` boxes
/// and starts from the last box's open. Other closes emit nothing; their
/// volume carries into the next box, and volume after the last box is
/// dropped with no box to hold it.
///
/// # Errors
///
/// Returns an error if `lines` is zero.
pub fn line_break(bars: &[Bar], lines: usize) -> Result<Vec<LineBreakBox>> {
    require_period("lines", lines)?;
    let Some(first) = bars.first() else {
        return Ok(Vec::new());
    };

    let (_, boxes) = fold(
        bars,
        0.0_f64,
        |volume, bar, out: &mut Vec<LineBreakBox>| {
            *volume += bar.volume;
            let price = bar.close;
            let next = match out.last() {
                None if price > first.close => Some((first.close, Direction::Up)),
                None if price < first.close => Some((first.close, Direction::Down)),
                None => None,
                Some(last) => {
                    let window = &out[out.len().saturating_sub(lines)..];
                    let highest = window.iter().map(LineBreakBox::top).fold(f64::MIN, f64::max);
                    let lowest = window
                        .iter()
                        .map(LineBreakBox::bottom)
                        .fold(f64::MAX, f64::min);
                    match last.direction {
                        Direction::Up if price > last.close => Some((last.close, Direction::Up)),
                        Direction::Up if price < lowest => Some((last.open, Direction::Down)),
                        Direction::Down if price < last.close => {
                            Some((last.close, Direction::Down))
                        }
                        Direction::Down if price > highest => Some((last.open, Direction::Up)),
                        _ => None,
                    }
                }
            };
            if let Some((open, direction)) = next {
                out.push(LineBreakBox {
                    time: bar.time,
                    open,
                    close: price,
                    direction,
                    volume: std::mem::take(volume),
                });
            }
        },
    );
    Ok(boxes)
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

    fn summary(boxes: &[LineBreakBox]) -> Vec<(f64, f64)> {
        boxes.iter().map(|b| (b.open, b.close)).collect()
    }

    #[test]
    fn test_reversal_must_break_three_lines() {
        let bars = closes(&[10.0, 11.0, 12.0, 13.0, 11.5, 9.5]);
        let boxes = line_break(&bars, 3).unwrap();
        // 11.5 is inside the last three boxes, 9.5 breaks their low of 10
        assert_eq!(
            summary(&boxes),
            vec![(10.0, 11.0), (11.0, 12.0), (12.0, 13.0), (12.0, 9.5)]
        );
        assert_eq!(boxes[3].direction, Direction::Down);
        assert_eq!(boxes[3].volume, 2.0);
    }

    #[test]
    fn test_one_line_break_reverses_on_last_box() {
        let bars = closes(&[10.0, 11.0, 12.0, 10.5]);
        let boxes = line_break(&bars, 1).unwrap();
        assert_eq!(summary(&boxes).last(), Some(&(11.0, 10.5)));
    }

    #[test]
    fn test_quiet_series_emits_nothing() {
        assert!(line_break(&closes(&[5.0, 5.0, 5.0]), 3).unwrap().is_empty());
        assert!(line_break(&closes(&[5.0]), 0).is_err());
    }
}
