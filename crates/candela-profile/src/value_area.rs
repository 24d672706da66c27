//! Point of control and value area over per-row weights.
//!
//! The same routine serves volume profiles (weights are volumes) and TPO
//! profiles (weights are period counts).

use serde::Serialize;

/// Default share of the total the value area must cover.
pub const DEFAULT_VALUE_AREA_PCT: f64 = 70.0;

/// Index of the heaviest row; ties go to the lowest row.
#[must_use]
pub fn point_of_control(weights: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &w) in weights.iter().enumerate() {
        if best.is_none_or(|(_, max)| w > max) {
            best = Some((i, w));
        }
    }
    best.map(|(i, _)| i)
}

/// Contiguous rows `start..=end` around the point of control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaSpan {
    /// Lowest row included.
    pub start: usize,
    /// Highest row included.
    pub end: usize,
    /// Sum of the included weights.
    pub covered: f64,
}

/// Grows the value area outward from `poc` until it holds `pct` percent of
/// the total weight.
///
/// Each step adds the heavier neighbouring row. On a tie the side that has
/// already contributed more weight wins, and the upper side wins after that.
/// The result may overshoot the target by one row but never falls short
/// unless every row is already included.
#[must_use]
pub fn expand_value_area(weights: &[f64], poc: usize, pct: f64) -> AreaSpan {
    let total: f64 = weights.iter().sum();
    let target = total * pct / 100.0;
    let (mut start, mut end) = (poc, poc);
    let mut covered = weights.get(poc).copied().unwrap_or(0.0);
    let (mut above, mut below) = (0.0, 0.0);

    while covered < target {
        let up = weights.get(end + 1).copied();
        let down = start.checked_sub(1).and_then(|i| weights.get(i).copied());
        let take_up = match (up, down) {
            (None, None) => break,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (Some(u), Some(d)) if u != d => u > d,
            (Some(_), Some(_)) => above >= below,
        };
        if let (true, Some(u)) = (take_up, up) {
            end += 1;
            above += u;
            covered += u;
        } else if let Some(d) = down {
            start -= 1;
            below += d;
            covered += d;
        }
    }
    AreaSpan {
        start,
        end,
        covered,
    }
}

/// Price bounds of a value area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueArea {
    /// Price of the highest included row.
    pub high: f64,
    /// Price of the lowest included row.
    pub low: f64,
    /// Weight (volume or TPO count) inside the area.
    pub volume: f64,
    /// Share of the total weight actually covered, in percent.
    pub percentage: f64,
}

impl ValueArea {
    /// Converts a row span into prices using `price_of`.
    #[must_use]
    pub fn from_span(span: AreaSpan, total: f64, price_of: impl Fn(usize) -> f64) -> Self {
        Self {
            high: price_of(span.end),
            low: price_of(span.start),
            volume: span.covered,
            percentage: if total > 0.0 {
                span.covered / total * 100.0
            } else {
                0.0
            },
        }
    }

    /// Returns true if `price` lies inside the area.
    #[must_use]
    pub fn contains(&self, price: f64) -> bool {
        (self.low..=self.high).contains(&price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poc_first_maximum() {
        assert_eq!(point_of_control(&[1.0, 5.0, 5.0, 2.0]), Some(1));
        assert_eq!(point_of_control(&[0.0, 0.0]), Some(0));
        assert_eq!(point_of_control(&[]), None);
    }

    #[test]
    fn test_takes_richer_side() {
        // total 20, target 14: poc 8, then 4 below, then 2 above
        let weights = [1.0, 4.0, 8.0, 2.0, 5.0];
        let span = expand_value_area(&weights, 2, 70.0);
        assert_eq!((span.start, span.end), (1, 3));
        assert_eq!(span.covered, 14.0);
    }

    #[test]
    fn test_ties_prefer_heavier_side_then_upper() {
        // first tie: nothing contributed yet, upper wins
        let span = expand_value_area(&[3.0, 10.0, 3.0], 1, 70.0);
        assert_eq!((span.start, span.end), (1, 2));
        // third step ties on 2 vs 2; the lower side already holds 4 against 3
        let weights = [0.0, 2.0, 4.0, 10.0, 3.0, 2.0, 0.0];
        let span = expand_value_area(&weights, 3, 85.0);
        assert_eq!((span.start, span.end), (1, 4));
        assert_eq!(span.covered, 19.0);
    }

    #[test]
    fn test_zero_weight_stays_at_poc() {
        let span = expand_value_area(&[0.0, 0.0, 0.0], 0, 70.0);
        assert_eq!((span.start, span.end, span.covered), (0, 0, 0.0));
        let area = ValueArea::from_span(span, 0.0, |i| i as f64);
        assert_eq!((area.low, area.high, area.percentage), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_full_coverage_terminates() {
        let span = expand_value_area(&[1.0, 2.0, 3.0], 2, 100.0);
        assert_eq!((span.start, span.end), (0, 2));
        assert_eq!(span.covered, 6.0);
    }
}
