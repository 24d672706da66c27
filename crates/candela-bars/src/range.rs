//! Streaming range-bar construction.

use candela_types::{Bar, Result, require_positive};
use tracing::debug;

/// Streaming range-bar builder.
///
/// Merges incoming bars into a working bar until its high-low range reaches
/// the configured size, then emits it and starts over with the next bar.
#[derive(Debug)]
pub struct RangeBarBuilder {
    range: f64,
    current_bar: Option<WorkingBar>,
}

impl RangeBarBuilder {
    /// Creates a builder for the given range.
    ///
    /// # Errors
    ///
    /// Returns an error if `range` is not a positive finite number.
    pub fn new(range: f64) -> Result<Self> {
        Ok(Self {
            range: require_positive("range", range)?,
            current_bar: None,
        })
    }

    /// Returns the configured range.
    #[must_use]
    pub const fn range(&self) -> f64 {
        self.range
    }

    /// Processes a bar, potentially emitting a completed range bar.
    ///
    /// Returns `Some(bar)` when this input brings the working bar's range
    /// to the configured size, `None` otherwise.
    pub fn process(&mut self, bar: &Bar) -> Option<Bar> {
        let mut working = match self.current_bar.take() {
            Some(mut working) => {
                working.update(bar);
                working
            }
            None => WorkingBar::new(bar),
        };

        if working.high - working.low >= self.range {
            Some(working.finish())
        } else {
            self.current_bar = Some(working);
            None
        }
    }

    /// Finishes construction, returning any remaining partial bar.
    #[must_use]
    pub fn finish(self) -> Option<Bar> {
        self.current_bar.map(|b| {
            debug!(sources = b.count, "flushing partial range bar");
            b.finish()
        })
    }
}

/// Range bar under construction.
#[derive(Debug)]
struct WorkingBar {
    time: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
    count: u32,
}

impl WorkingBar {
    /// Starts a working bar from its first input.
    const fn new(bar: &Bar) -> Self {
        Self {
            time: bar.time,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            count: 1,
        }
    }

    /// Merges another input bar.
    fn update(&mut self, bar: &Bar) {
        self.high = self.high.max(bar.high);
        self.low = self.low.min(bar.low);
        self.close = bar.close;
        self.volume += bar.volume;
        self.count += 1;
    }

    /// Finishes building and returns the bar, stamped with its first input's time.
    const fn finish(self) -> Bar {
        Bar::new(
            self.time, self.open, self.high, self.low, self.close, self.volume,
        )
    }
}

/// Merges every bar into one, or `None` for an empty slice.
pub(crate) fn merge_all(bars: &[Bar]) -> Option<Bar> {
    let (first, rest) = bars.split_first()?;
    let mut working = WorkingBar::new(first);
    for bar in rest {
        working.update(bar);
    }
    Some(working.finish())
}

/// Converts a series into range bars, flushing the final partial bar.
///
/// # Errors
///
/// Returns an error if `range` is not positive.
pub fn range_bars(bars: &[Bar], range: f64) -> Result<Vec<Bar>> {
    let mut builder = RangeBarBuilder::new(range)?;
    let mut out: Vec<Bar> = bars.iter().filter_map(|bar| builder.process(bar)).collect();
    out.extend(builder.finish());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(time: i64, low: f64, high: f64) -> Bar {
        Bar::new(time, low, high, low, high, 10.0)
    }

    #[test]
    fn test_accumulates_until_range() {
        let mut builder = RangeBarBuilder::new(2.0).unwrap();
        assert!(builder.process(&bar(0, 10.0, 11.0)).is_none());
        let done = builder.process(&bar(1, 10.5, 12.0)).unwrap();
        assert_eq!(done.time, 0);
        assert_eq!(done.low, 10.0);
        assert_eq!(done.high, 12.0);
        assert_eq!(done.volume, 20.0);
        assert!(builder.finish().is_none());
    }

    #[test]
    fn test_single_wide_bar_closes_immediately() {
        let out = range_bars(&[bar(0, 1.0, 5.0), bar(1, 5.0, 5.5)], 2.0).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].time, 1);
    }

    #[test]
    fn test_range_never_reached_flushes_one_bar() {
        let bars: Vec<Bar> = (0..5).map(|i| bar(i, 10.0, 10.5)).collect();
        let out = range_bars(&bars, 100.0).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].volume, 50.0);
    }

    #[test]
    fn test_merge_all() {
        let bars = [bar(0, 10.0, 11.0), bar(1, 9.0, 10.5)];
        let merged = merge_all(&bars).unwrap();
        assert_eq!((merged.low, merged.high, merged.close), (9.0, 11.0, 10.5));
        assert!(merge_all(&[]).is_none());
    }

    #[test]
    fn test_rejects_zero_range() {
        assert!(RangeBarBuilder::new(0.0).is_err());
        assert!(range_bars(&[], -1.0).is_err());
    }
}
