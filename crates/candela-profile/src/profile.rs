//! Volume profile.

use candela_types::{Bar, Result, price_range, require_percentage};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::grid::{PriceGrid, RowSpec};
use crate::split::split_volume;
use crate::value_area::{
    DEFAULT_VALUE_AREA_PCT, ValueArea, expand_value_area, point_of_control,
};

/// One price row of a volume profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfileLevel {
    /// Row midpoint.
    pub price: f64,
    /// Total volume allocated to the row.
    pub volume: f64,
    /// Buy side of the heuristic split.
    pub buy_volume: f64,
    /// Sell side of the heuristic split.
    pub sell_volume: f64,
    /// Number of bars whose range touched the row.
    pub trade_count: usize,
}

impl ProfileLevel {
    const fn empty(price: f64) -> Self {
        Self {
            price,
            volume: 0.0,
            buy_volume: 0.0,
            sell_volume: 0.0,
            trade_count: 0,
        }
    }

    /// Buy minus sell volume.
    #[must_use]
    pub fn delta(&self) -> f64 {
        self.buy_volume - self.sell_volume
    }
}

/// Price-bucketed volume distribution of a series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    /// Every row, ascending by price.
    pub levels: Vec<ProfileLevel>,
    /// Row with the most volume.
    pub point_of_control: ProfileLevel,
    /// Rows around the point of control holding the requested share.
    pub value_area: ValueArea,
    /// Row height; zero when the series never moved.
    pub row_size: f64,
    /// Volume of every bar.
    pub total_volume: f64,
    /// Buy minus sell volume over the whole profile.
    pub delta: f64,
}

impl Profile {
    /// Rows inside the value area.
    pub fn value_area_levels(&self) -> impl Iterator<Item = &ProfileLevel> + '_ {
        self.levels
            .iter()
            .filter(|level| self.value_area.contains(level.price))
    }
}

/// Volume profile parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileParams {
    /// Row partition.
    pub rows: RowSpec,
    /// Value area share in `(0, 100]`.
    pub value_area_pct: f64,
}

impl Default for ProfileParams {
    fn default() -> Self {
        Self {
            rows: RowSpec::default(),
            value_area_pct: DEFAULT_VALUE_AREA_PCT,
        }
    }
}

impl ProfileParams {
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

    /// Checks every parameter.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid row spec or a value area share outside
    /// `(0, 100]`.
    pub fn validate(&self) -> Result<()> {
        self.rows.validate()?;
        require_percentage("value_area_pct", self.value_area_pct)?;
        Ok(())
    }
}

/// Builds the volume profile of `bars`.
///
/// Each bar's volume is spread over the rows its `[low, high]` range
/// intersects in proportion to the overlap, then split into buy and sell
/// volume by the fixed direction heuristic. Returns `Ok(None)` for an empty
/// slice.
///
/// A series with zero total volume has its point of control on the lowest
/// row and a value area collapsed onto that row's price.
///
/// # Errors
///
/// Returns an error if the parameters are invalid.
pub fn build_profile(bars: &[Bar], params: &ProfileParams) -> Result<Option<Profile>> {
    params.validate()?;
    let Some((low, high)) = price_range(bars) else {
        return Ok(None);
    };
    let grid = PriceGrid::new(low, high, params.rows)?;

    let mut levels: Vec<ProfileLevel> = (0..grid.rows())
        .map(|i| ProfileLevel::empty(grid.price(i)))
        .collect();
    for bar in bars {
        for (row, share) in grid.allocate(bar.low, bar.high) {
            let volume = bar.volume * share;
            let (buy, sell) = split_volume(bar, volume);
            let level = &mut levels[row];
            level.volume += volume;
            level.buy_volume += buy;
            level.sell_volume += sell;
            level.trade_count += 1;
        }
    }

    let weights: Vec<f64> = levels.iter().map(|l| l.volume).collect();
    let total_volume: f64 = bars.iter().map(|b| b.volume).sum();
    let poc = point_of_control(&weights).unwrap_or(0);
    if total_volume <= 0.0 {
        debug!(rows = levels.len(), "zero volume profile, value area collapses to first row");
    }
    let span = expand_value_area(&weights, poc, params.value_area_pct);
    let value_area = ValueArea::from_span(span, weights.iter().sum(), |i| levels[i].price);
    debug!(
        rows = levels.len(),
        poc = levels[poc].price,
        va_low = value_area.low,
        va_high = value_area.high,
        "built volume profile"
    );

    Ok(Some(Profile {
        point_of_control: levels[poc],
        value_area,
        row_size: grid.row_size(),
        total_volume,
        delta: levels.iter().map(ProfileLevel::delta).sum(),
        levels,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scenario() -> Vec<Bar> {
        vec![
            Bar::new(0, 10.0, 12.0, 9.0, 11.0, 100.0),
            Bar::new(1, 11.0, 13.0, 10.0, 12.0, 200.0),
            Bar::new(2, 12.0, 12.0, 8.0, 9.0, 300.0),
        ]
    }

    #[test]
    fn test_scenario_profile() {
        let params = ProfileParams::default().with_rows(RowSpec::Count(5));
        let profile = build_profile(&scenario(), &params).unwrap().unwrap();
        assert_eq!(profile.levels.len(), 5);
        assert_relative_eq!(profile.row_size, 1.0);
        let volumes: Vec<f64> = profile.levels.iter().map(|l| l.volume).collect();
        // a third of 100 on 9..12, a third of 200 on 10..13, a quarter of 300 on 8..12
        let third = 100.0 / 3.0;
        let expected = [75.0, third + 75.0, 175.0, 175.0, 2.0 * third];
        for (got, want) in volumes.iter().zip(expected) {
            assert_relative_eq!(*got, want, epsilon = 1e-9);
        }
        // rows 10..11 and 11..12 tie, the lower one wins
        assert_eq!(profile.point_of_control.price, 10.5);
        assert_eq!((profile.value_area.low, profile.value_area.high), (9.5, 11.5));
        let covered = 175.0 * 2.0 + 75.0 + third;
        assert_relative_eq!(profile.value_area.percentage, covered / 6.0, epsilon = 1e-9);
        // +20 and +40 from the rising bars, -60 from the falling one
        assert_relative_eq!(profile.delta, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_trade_counts_and_split() {
        let params = ProfileParams::default().with_rows(RowSpec::Size(1.0));
        let profile = build_profile(&scenario(), &params).unwrap().unwrap();
        let top = profile.levels.last().unwrap();
        // only the second bar reaches 12..13
        assert_eq!(top.trade_count, 1);
        assert_relative_eq!(top.buy_volume, top.volume * 0.6, epsilon = 1e-9);
        assert_eq!(profile.levels[0].trade_count, 1);
        assert_eq!(profile.levels[1].trade_count, 2);
        assert_eq!(profile.levels[2].trade_count, 3);
    }

    #[test]
    fn test_zero_volume() {
        let bars = vec![
            Bar::new(0, 10.0, 12.0, 9.0, 11.0, 0.0),
            Bar::new(1, 11.0, 13.0, 10.0, 12.0, 0.0),
        ];
        let profile = build_profile(&bars, &ProfileParams::default()).unwrap().unwrap();
        assert_eq!(profile.point_of_control, profile.levels[0]);
        assert_eq!(profile.value_area.low, profile.point_of_control.price);
        assert_eq!(profile.value_area.high, profile.point_of_control.price);
        assert_eq!(profile.total_volume, 0.0);
    }

    #[test]
    fn test_zero_range_single_level() {
        let bars: Vec<Bar> = (0..3).map(|i| Bar::flat(i, 50.0, 10.0)).collect();
        let profile = build_profile(&bars, &ProfileParams::default()).unwrap().unwrap();
        assert_eq!(profile.levels.len(), 1);
        assert_eq!(profile.levels[0].price, 50.0);
        assert_relative_eq!(profile.levels[0].volume, 30.0);
        assert_eq!(profile.row_size, 0.0);
        assert_relative_eq!(profile.value_area.percentage, 100.0);
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        let bars = scenario();
        for params in [
            ProfileParams::default().with_rows(RowSpec::Count(0)),
            ProfileParams::default().with_rows(RowSpec::Size(-1.0)),
            ProfileParams::default().with_value_area_pct(0.0),
            ProfileParams::default().with_value_area_pct(100.5),
        ] {
            assert!(build_profile(&bars, &params).unwrap_err().is_invalid_parameter());
        }
        assert!(build_profile(&[], &ProfileParams::default()).unwrap().is_none());
    }

    #[test]
    fn test_params_serde() {
        let json = r#"{"rows":{"size":0.5},"value_area_pct":68.0}"#;
        let params: ProfileParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.rows, RowSpec::Size(0.5));
        assert_relative_eq!(params.value_area_pct, 68.0);

        let encoded = serde_json::to_string(&ProfileParams::default()).unwrap();
        assert_eq!(encoded, r#"{"rows":{"count":24},"value_area_pct":70.0}"#);
        let decoded: ProfileParams = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, ProfileParams::default());
    }
}
