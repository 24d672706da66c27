//! Footprint: a per-bar profile over a shared price grid.

use candela_types::{Bar, Result, price_range};
use serde::Serialize;

use crate::grid::{PriceGrid, RowSpec};
use crate::split::split_volume;

/// Volume one bar traded at one price row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FootprintCell {
    /// Row midpoint.
    pub price: f64,
    /// Buy side of the heuristic split.
    pub buy_volume: f64,
    /// Sell side of the heuristic split.
    pub sell_volume: f64,
}

impl FootprintCell {
    /// Total volume in the cell.
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.buy_volume + self.sell_volume
    }

    /// Buy minus sell volume.
    #[must_use]
    pub fn delta(&self) -> f64 {
        self.buy_volume - self.sell_volume
    }
}

/// Cells of one input bar, ascending by price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FootprintColumn {
    /// Time of the bar.
    pub time: i64,
    /// Rows the bar's range touched.
    pub cells: Vec<FootprintCell>,
    /// Price of the column's heaviest cell; ties go to the lowest.
    pub point_of_control: f64,
    /// Bar volume.
    pub volume: f64,
    /// Buy minus sell volume.
    pub delta: f64,
}

/// Footprint of a series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Footprint {
    /// Row height shared by every column.
    pub row_size: f64,
    /// One column per input bar.
    pub columns: Vec<FootprintColumn>,
}

/// Builds a footprint with one column per bar.
///
/// All columns share a grid over the whole series' price range, so a price
/// row means the same thing in every column.
///
/// # Errors
///
/// Returns an error for an invalid row spec.
pub fn footprint(bars: &[Bar], rows: RowSpec) -> Result<Footprint> {
    rows.validate()?;
    let Some((low, high)) = price_range(bars) else {
        return Ok(Footprint {
            row_size: 0.0,
            columns: Vec::new(),
        });
    };
    let grid = PriceGrid::new(low, high, rows)?;

    let columns = bars
        .iter()
        .map(|bar| {
            let cells: Vec<FootprintCell> = grid
                .allocate(bar.low, bar.high)
                .into_iter()
                .map(|(row, share)| {
                    let (buy_volume, sell_volume) = split_volume(bar, bar.volume * share);
                    FootprintCell {
                        price: grid.price(row),
                        buy_volume,
                        sell_volume,
                    }
                })
                .collect();
            let point_of_control = cells
                .iter()
                .fold(None::<&FootprintCell>, |best, cell| match best {
                    Some(b) if b.volume() >= cell.volume() => Some(b),
                    _ => Some(cell),
                })
                .map_or(grid.price(grid.row_of(bar.close)), |c| c.price);
            FootprintColumn {
                time: bar.time,
                point_of_control,
                volume: bar.volume,
                delta: cells.iter().map(FootprintCell::delta).sum(),
                cells,
            }
        })
        .collect();

    Ok(Footprint {
        row_size: grid.row_size(),
        columns,
    })
}
