//! Price buckets shared by volume, footprint and TPO profiles.

use candela_types::{CandelaError, Result, require_period, require_positive};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default number of profile rows.
pub const DEFAULT_ROWS: usize = 24;

/// Largest grid a fixed row size may produce.
pub const MAX_ROWS: usize = 10_000;

/// How the price range is partitioned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowSpec {
    /// Fixed number of equal-height rows spanning the range.
    Count(usize),
    /// Fixed row height starting at the lowest price.
    Size(f64),
}

impl Default for RowSpec {
    fn default() -> Self {
        Self::Count(DEFAULT_ROWS)
    }
}

impl RowSpec {
    /// Checks the row count or height.
    ///
    /// # Errors
    ///
    /// Returns an error for zero rows, more than [`MAX_ROWS`] rows or a
    /// non-positive row size.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Count(rows) if rows > MAX_ROWS => Err(CandelaError::invalid(
                "rows",
                format!("at most {MAX_ROWS} rows, got {rows}"),
            )),
            Self::Count(rows) => require_period("rows", rows).map(|_| ()),
            Self::Size(size) => require_positive("row_size", size).map(|_| ()),
        }
    }
}

/// Equal-height price buckets covering `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceGrid {
    low: f64,
    row_size: f64,
    rows: usize,
}

impl PriceGrid {
    /// Builds the grid for a price range.
    ///
    /// A zero-width range yields a single row of height zero at `low`.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid [`RowSpec`] or a row size that would
    /// need more than [`MAX_ROWS`] rows.
    pub fn new(low: f64, high: f64, spec: RowSpec) -> Result<Self> {
        spec.validate()?;
        let span = high - low;
        if span.is_nan() || span <= 0.0 {
            debug!(low, high, "zero price range, single row");
            return Ok(Self {
                low,
                row_size: 0.0,
                rows: 1,
            });
        }
        let (rows, row_size) = match spec {
            RowSpec::Count(rows) => (rows, span / rows as f64),
            RowSpec::Size(size) => {
                let rows = (span / size - 1e-9).ceil().max(1.0);
                if rows > MAX_ROWS as f64 {
                    return Err(CandelaError::invalid(
                        "row_size",
                        format!("{size} splits the range into {rows} rows, more than {MAX_ROWS}"),
                    ));
                }
                (rows as usize, size)
            }
        };
        Ok(Self {
            low,
            row_size,
            rows,
        })
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Row height; zero for a degenerate range.
    #[must_use]
    pub const fn row_size(&self) -> f64 {
        self.row_size
    }

    /// Representative price of row `index` (its midpoint).
    #[must_use]
    pub fn price(&self, index: usize) -> f64 {
        self.low + (index as f64 + 0.5) * self.row_size
    }

    /// Row containing `price`, clamped to the grid.
    #[must_use]
    pub fn row_of(&self, price: f64) -> usize {
        if self.row_size <= 0.0 {
            return 0;
        }
        let index = ((price - self.low) / self.row_size).floor();
        (index.max(0.0) as usize).min(self.rows - 1)
    }

    /// Splits a `[low, high]` span across the rows it touches.
    ///
    /// Each share is proportional to the row's overlap with the span and the
    /// shares sum to one. A point span lands entirely in its row.
    #[must_use]
    pub fn allocate(&self, low: f64, high: f64) -> Vec<(usize, f64)> {
        let (lo, hi) = (low.min(high), high.max(low));
        let (first, last) = (self.row_of(lo), self.row_of(hi));
        if first == last || hi <= lo {
            return vec![(first, 1.0)];
        }

        let mut shares: Vec<(usize, f64)> = (first..=last)
            .map(|i| {
                let bottom = self.low + i as f64 * self.row_size;
                let top = bottom + self.row_size;
                (i, top.min(hi) - bottom.max(lo))
            })
            .filter(|(_, overlap)| *overlap > 0.0)
            .collect();
        let total: f64 = shares.iter().map(|(_, overlap)| overlap).sum();
        if total <= 0.0 {
            return vec![(first, 1.0)];
        }
        for (_, share) in &mut shares {
            *share /= total;
        }
        shares
    }
}
