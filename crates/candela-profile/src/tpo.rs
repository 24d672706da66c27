//! Time-price-opportunity (market profile) counts.

use candela_types::{Bar, Result, TimeUnit, Timeframe, price_range, require_percentage};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::grid::{PriceGrid, RowSpec};
use crate::value_area::{
    DEFAULT_VALUE_AREA_PCT, ValueArea, expand_value_area, point_of_control,
};

/// Letter of the period at `index`: `A` to `Z`, then `A` again.
#[must_use]
pub fn tpo_letter(index: usize) -> char {
    char::from(b'A' + (index % 26) as u8)
}

/// TPO profile parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TpoParams {
    /// Length of one lettered period.
    pub period: Timeframe,
    /// Row partition.
    pub rows: RowSpec,
    /// Value area share in `(0, 100]`, applied to TPO counts.
    pub value_area_pct: f64,
    /// Unit of bar timestamps.
    pub time_unit: TimeUnit,
}

impl Default for TpoParams {
    fn default() -> Self {
        Self {
            period: Timeframe::Minute30,
            rows: RowSpec::default(),
            value_area_pct: DEFAULT_VALUE_AREA_PCT,
            time_unit: TimeUnit::Seconds,
        }
    }
}

impl TpoParams {
    /// Sets the period length.
    #[must_use]
    pub const fn with_period(mut self, period: Timeframe) -> Self {
        self.period = period;
        self
    }

    /// Sets the row partition.
    #[must_use]
    pub const fn with_rows(mut self, rows: RowSpec) -> Self {
        self.rows = rows;
        self
    }

    /// Sets the value area share.
    #[must_use]
    pub const fn with_value_area_pct(mut self, pct: f64) -> Self {
        self.value_area_pct = pct;
        self
    }

    /// Sets the timestamp unit.
    #[must_use]
    pub const fn with_time_unit(mut self, unit: TimeUnit) -> Self {
        self.time_unit = unit;
        self
    }
}

/// One lettered time period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TpoPeriod {
    /// Period letter.
    pub letter: char,
    /// Aligned start of the period.
    pub start: i64,
    /// Highest high in the period.
    pub high: f64,
    /// Lowest low in the period.
    pub low: f64,
    /// Number of bars in the period.
    pub bars: usize,
}

/// One price row of a TPO profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TpoLevel {
    /// Row midpoint.
    pub price: f64,
    /// Letters of the periods that traded here, in period order.
    pub letters: String,
    /// Indices of those periods.
    pub periods: Vec<usize>,
    /// Number of distinct periods that traded here.
    pub count: usize,
}

/// Range of the opening periods.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InitialBalance {
    /// Highest high of the first two periods.
    pub high: f64,
    /// Lowest low of the first two periods.
    pub low: f64,
}

/// TPO market profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TpoProfile {
    /// Periods in time order.
    pub periods: Vec<TpoPeriod>,
    /// Every row, ascending by price.
    pub levels: Vec<TpoLevel>,
    /// Price of the row with the highest count; ties go to the lowest.
    pub point_of_control: f64,
    /// Value area over TPO counts.
    pub value_area: ValueArea,
    /// Range of the first two periods.
    pub initial_balance: InitialBalance,
    /// Row height.
    pub row_size: f64,
}

/// Builds a TPO profile.
///
/// Bars are grouped into consecutive periods aligned to `params.period`. A
/// row's count is the number of distinct periods with a bar whose range
/// intersects it; volume plays no part. Returns `Ok(None)` for an empty
/// slice.
///
/// # Errors
///
/// Returns an error for an invalid row spec or value area share.
pub fn tpo_profile(bars: &[Bar], params: &TpoParams) -> Result<Option<TpoProfile>> {
    params.rows.validate()?;
    require_percentage("value_area_pct", params.value_area_pct)?;
    let Some((low, high)) = price_range(bars) else {
        return Ok(None);
    };
    let grid = PriceGrid::new(low, high, params.rows)?;

    let mut periods: Vec<TpoPeriod> = Vec::new();
    let mut levels: Vec<TpoLevel> = (0..grid.rows())
        .map(|i| TpoLevel {
            price: grid.price(i),
            letters: String::new(),
            periods: Vec::new(),
            count: 0,
        })
        .collect();

    for bar in bars {
        let start = params.period.period_start(bar.time, params.time_unit);
        let (lo, hi) = (bar.low.min(bar.high), bar.high.max(bar.low));
        match periods.last_mut() {
            Some(period) if period.start == start => {
                period.high = period.high.max(hi);
                period.low = period.low.min(lo);
                period.bars += 1;
            }
            _ => {
                let letter = tpo_letter(periods.len());
                trace!(%letter, start, "new TPO period");
                periods.push(TpoPeriod {
                    letter,
                    start,
                    high: hi,
                    low: lo,
                    bars: 1,
                });
            }
        }

        let index = periods.len() - 1;
        let letter = tpo_letter(index);
        for (row, _) in grid.allocate(lo, hi) {
            let level = &mut levels[row];
            if level.periods.last() != Some(&index) {
                level.periods.push(index);
                level.letters.push(letter);
                level.count += 1;
            }
        }
    }

    let weights: Vec<f64> = levels.iter().map(|l| l.count as f64).collect();
    let poc = point_of_control(&weights).unwrap_or(0);
    let span = expand_value_area(&weights, poc, params.value_area_pct);
    let value_area = ValueArea::from_span(span, weights.iter().sum(), |i| levels[i].price);

    let opening = &periods[..periods.len().min(2)];
    let initial_balance = InitialBalance {
        high: opening.iter().map(|p| p.high).fold(f64::MIN, f64::max),
        low: opening.iter().map(|p| p.low).fold(f64::MAX, f64::min),
    };
    debug!(
        periods = periods.len(),
        rows = levels.len(),
        poc = levels[poc].price,
        "built TPO profile"
    );

    Ok(Some(TpoProfile {
        point_of_control: levels[poc].price,
        periods,
        levels,
        value_area,
        initial_balance,
        row_size: grid.row_size(),
    }))
}
