//! Box size selection shared by Renko and Point & Figure.

use candela_indicators::volatility::{atr_values, true_range_values};
use candela_types::{Bar, Result, require_period, require_positive};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How the box height of a brick-based chart is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoxSize {
    /// Explicit price height.
    Fixed {
        /// Box height in price units.
        size: f64,
    },
    /// `multiplier` times the latest Average True Range of the series.
    Atr {
        /// ATR period.
        period: usize,
        /// Scale applied to the ATR.
        multiplier: f64,
    },
}

impl Default for BoxSize {
    fn default() -> Self {
        Self::Atr {
            period: 14,
            multiplier: 0.5,
        }
    }
}

impl BoxSize {
    /// Creates a fixed box size.
    #[must_use]
    pub const fn fixed(size: f64) -> Self {
        Self::Fixed { size }
    }

    /// Resolves the box height for `bars`.
    ///
    /// A fixed size must be positive. A derived size uses the last defined
    /// ATR; when the series is shorter than the ATR period, or the ATR is
    /// zero, the mean true range of all bars stands in. `Ok(None)` means no
    /// positive box could be derived (flat or empty series), so no box can
    /// ever close.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-positive fixed size, a zero ATR period or
    /// a non-positive multiplier.
    pub fn resolve(&self, bars: &[Bar]) -> Result<Option<f64>> {
        match *self {
            Self::Fixed { size } => Ok(Some(require_positive("box_size", size)?)),
            Self::Atr { period, multiplier } => {
                require_period("atr_period", period)?;
                require_positive("multiplier", multiplier)?;
                let latest = atr_values(bars, period)
                    .into_iter()
                    .rev()
                    .flatten()
                    .next()
                    .filter(|atr| *atr > 0.0);
                let atr = latest.or_else(|| {
                    let tr = true_range_values(bars);
                    let mean = tr.iter().sum::<f64>() / tr.len().max(1) as f64;
                    debug!(period, mean, "ATR undefined or zero, using mean true range");
                    (mean > 0.0).then_some(mean)
                });
                let size = atr.map(|atr| atr * multiplier);
                debug!(?size, "derived box size");
                Ok(size)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fixed_must_be_positive() {
        assert_eq!(BoxSize::fixed(2.0).resolve(&[]).unwrap(), Some(2.0));
        assert!(BoxSize::fixed(0.0).resolve(&[]).is_err());
        assert!(BoxSize::fixed(-1.0).resolve(&[]).is_err());
    }

    #[test]
    fn test_atr_derived() {
        let bars: Vec<Bar> = (0..20)
            .map(|i| Bar::new(i, 10.0, 11.0, 9.0, 10.0, 1.0))
            .collect();
        let size = BoxSize::default().resolve(&bars).unwrap().unwrap();
        assert_relative_eq!(size, 1.0);
    }

    #[test]
    fn test_short_series_uses_mean_true_range() {
        let bars = vec![
            Bar::new(0, 10.0, 12.0, 10.0, 11.0, 1.0),
            Bar::new(1, 11.0, 11.0, 10.0, 10.0, 1.0),
        ];
        let size = BoxSize::default().resolve(&bars).unwrap().unwrap();
        // true ranges 2 and 1
        assert_relative_eq!(size, 0.75);
    }

    #[test]
    fn test_flat_series_has_no_box() {
        let bars = vec![Bar::flat(0, 5.0, 1.0), Bar::flat(1, 5.0, 1.0)];
        assert_eq!(BoxSize::default().resolve(&bars).unwrap(), None);
        assert_eq!(BoxSize::default().resolve(&[]).unwrap(), None);
    }
}
