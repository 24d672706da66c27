//! Transform dispatch.

use std::str::FromStr;

use candela_types::{Bar, CandelaError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::kagi::{Reversal, kagi};
use crate::line_break::{DEFAULT_LINES, LineBreakBox, line_break};
use crate::point_figure::{DEFAULT_REVERSAL, PnfMethod, PnfParams, point_figure};
use crate::range::{merge_all, range_bars};
use crate::renko::renko;
use crate::{BoxSize, heikin_ashi};

/// Every bar transform with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransformKind {
    /// Heikin-Ashi candles.
    HeikinAshi,
    /// Renko bricks.
    Renko {
        /// Brick height.
        #[serde(default)]
        box_size: BoxSize,
    },
    /// Kagi lines.
    Kagi {
        /// Reversal amount.
        #[serde(default)]
        reversal: Reversal,
    },
    /// Line Break boxes.
    LineBreak {
        /// Lines a reversal must break.
        lines: usize,
    },
    /// Point & Figure columns.
    #[serde(rename = "pnf")]
    PointFigure {
        /// Box height.
        #[serde(default)]
        box_size: BoxSize,
        /// Boxes needed to reverse.
        reversal: usize,
        /// Price inputs.
        #[serde(default)]
        method: PnfMethod,
    },
    /// Range bars.
    RangeBars {
        /// High-low range that closes a bar.
        range: BoxSize,
    },
}

impl TransformKind {
    /// Identifiers accepted by [`TransformKind::from_name`].
    pub const NAMES: &'static [&'static str] =
        &["heikin_ashi", "renko", "kagi", "line_break", "pnf", "range_bars"];

    /// Looks up a transform by name with its default parameters.
    ///
    /// # Errors
    ///
    /// Returns [`CandelaError::Unknown`] for an unrecognized name.
    pub fn from_name(name: &str) -> Result<Self> {
        let kind = match name.to_lowercase().replace('-', "_").as_str() {
            "heikin_ashi" | "ha" => Self::HeikinAshi,
            "renko" => Self::Renko {
                box_size: BoxSize::default(),
            },
            "kagi" => Self::Kagi {
                reversal: Reversal::default(),
            },
            "line_break" | "three_line_break" => Self::LineBreak {
                lines: DEFAULT_LINES,
            },
            "pnf" | "point_figure" | "point_and_figure" => Self::PointFigure {
                box_size: BoxSize::default(),
                reversal: DEFAULT_REVERSAL,
                method: PnfMethod::Close,
            },
            "range_bars" | "range" => Self::RangeBars {
                range: BoxSize::Atr {
                    period: 14,
                    multiplier: 1.0,
                },
            },
            _ => {
                return Err(CandelaError::Unknown {
                    kind: "transform",
                    value: name.to_string(),
                });
            }
        };
        Ok(kind)
    }

    /// Every transform with default parameters.
    #[must_use]
    pub fn catalog() -> Vec<Self> {
        Self::NAMES
            .iter()
            .filter_map(|name| Self::from_name(name).ok())
            .collect()
    }

    /// Canonical identifier.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::HeikinAshi => "heikin_ashi",
            Self::Renko { .. } => "renko",
            Self::Kagi { .. } => "kagi",
            Self::LineBreak { .. } => "line_break",
            Self::PointFigure { .. } => "pnf",
            Self::RangeBars { .. } => "range_bars",
        }
    }

    /// Replaces the box size (range for range bars); a no-op otherwise.
    #[must_use]
    pub const fn with_box_size(mut self, value: BoxSize) -> Self {
        match &mut self {
            Self::Renko { box_size } | Self::PointFigure { box_size, .. } => *box_size = value,
            Self::RangeBars { range } => *range = value,
            _ => {}
        }
        self
    }

    /// Replaces the Kagi reversal amount; a no-op otherwise.
    #[must_use]
    pub const fn with_reversal(mut self, value: Reversal) -> Self {
        if let Self::Kagi { reversal } = &mut self {
            *reversal = value;
        }
        self
    }

    /// Replaces the Line Break line count or the Point & Figure reversal
    /// box count; a no-op otherwise.
    #[must_use]
    pub const fn with_count(mut self, value: usize) -> Self {
        match &mut self {
            Self::LineBreak { lines } => *lines = value,
            Self::PointFigure { reversal, .. } => *reversal = value,
            _ => {}
        }
        self
    }

    /// Replaces the Point & Figure price method; a no-op otherwise.
    #[must_use]
    pub const fn with_method(mut self, value: PnfMethod) -> Self {
        if let Self::PointFigure { method, .. } = &mut self {
            *method = value;
        }
        self
    }

    /// Applies the transform, returning plain bars.
    ///
    /// Renko includes its pending brick and range bars their partial bar, so
    /// a box that never closes still yields one bar.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is invalid.
    pub fn apply(&self, bars: &[Bar]) -> Result<Vec<Bar>> {
        let out = match *self {
            Self::HeikinAshi => heikin_ashi(bars),
            Self::Renko { box_size } => renko(bars, box_size)?.to_bars(),
            Self::Kagi { reversal } => kagi(bars, reversal)?.iter().map(|l| l.to_bar()).collect(),
            Self::LineBreak { lines } => line_break(bars, lines)?
                .iter()
                .map(LineBreakBox::to_bar)
                .collect(),
            Self::PointFigure {
                box_size,
                reversal,
                method,
            } => {
                let params = PnfParams {
                    box_size,
                    reversal,
                    method,
                };
                point_figure(bars, params)?
                    .columns
                    .iter()
                    .map(|c| c.to_bar())
                    .collect()
            }
            Self::RangeBars { range } => match range.resolve(bars)? {
                Some(size) => range_bars(bars, size)?,
                None => {
                    debug!(bars = bars.len(), "no positive range, merging whole series");
                    merge_all(bars).into_iter().collect()
                }
            },
        };
        debug!(
            transform = self.name(),
            input = bars.len(),
            output = out.len(),
            "applied transform"
        );
        Ok(out)
    }
}

/// Applies `kind` to `bars`; see [`TransformKind::apply`].
///
/// # Errors
///
/// Returns an error if the transform's parameters are invalid.
pub fn transform(bars: &[Bar], kind: &TransformKind) -> Result<Vec<Bar>> {
    kind.apply(bars)
}

impl std::fmt::Display for TransformKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for TransformKind {
    type Err = CandelaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk() -> Vec<Bar> {
        [10.0, 11.0, 13.0, 12.0, 9.0, 8.5, 11.0, 14.0]
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(i as i64, c, c + 0.5, c - 0.5, c, 10.0))
            .collect()
    }

    #[test]
    fn test_every_name_resolves() {
        assert_eq!(TransformKind::catalog().len(), TransformKind::NAMES.len());
        for kind in TransformKind::catalog() {
            assert_eq!(kind.name().parse::<TransformKind>().unwrap(), kind);
        }
        assert!(matches!(
            TransformKind::from_name("equivolume"),
            Err(CandelaError::Unknown {
                kind: "transform",
                ..
            })
        ));
    }

    #[test]
    fn test_empty_input_is_empty_output() {
        for kind in TransformKind::catalog() {
            assert!(transform(&[], &kind).unwrap().is_empty(), "{kind}");
        }
    }

    #[test]
    fn test_builders() {
        let kind = TransformKind::from_name("line-break").unwrap().with_count(2);
        assert_eq!(kind, TransformKind::LineBreak { lines: 2 });
        let kind = TransformKind::from_name("renko")
            .unwrap()
            .with_box_size(BoxSize::fixed(1.0));
        assert_eq!(
            kind,
            TransformKind::Renko {
                box_size: BoxSize::fixed(1.0)
            }
        );
        assert_eq!(TransformKind::HeikinAshi.with_count(9), TransformKind::HeikinAshi);
    }

    #[test]
    fn test_apply_every_kind() {
        let bars = walk();
        for kind in TransformKind::catalog() {
            let out = kind.apply(&bars).unwrap();
            assert!(!out.is_empty(), "{kind}");
            for bar in &out {
                assert!(bar.low <= bar.open.min(bar.close), "{kind}");
                assert!(bar.high >= bar.open.max(bar.close), "{kind}");
            }
        }
    }

    #[test]
    fn test_flat_series_range_bars_merge() {
        let bars: Vec<Bar> = (0..4).map(|i| Bar::flat(i, 5.0, 1.0)).collect();
        let out = transform(&bars, &TransformKind::from_name("range").unwrap()).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].volume, 4.0);
    }

    #[test]
    fn test_serde_tagging() {
        let json = r#"{"kind":"renko","box_size":{"type":"fixed","size":2.0}}"#;
        let kind: TransformKind = serde_json::from_str(json).unwrap();
        assert_eq!(kind, TransformKind::Renko { box_size: BoxSize::fixed(2.0) });
        let json = r#"{"kind":"pnf","reversal":3}"#;
        let kind: TransformKind = serde_json::from_str(json).unwrap();
        assert_eq!(kind, TransformKind::from_name("pnf").unwrap());
    }

    #[test]
    fn test_invalid_parameters_surface() {
        let bars = walk();
        let err = transform(&bars, &TransformKind::LineBreak { lines: 0 }).unwrap_err();
        assert!(err.is_invalid_parameter());
        let err = transform(
            &bars,
            &TransformKind::RangeBars {
                range: BoxSize::fixed(-1.0),
            },
        )
        .unwrap_err();
        assert!(err.is_invalid_parameter());
    }
}
