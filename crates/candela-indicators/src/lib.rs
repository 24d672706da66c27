//! Technical indicator library for the candela analytics engine.
//!
//! Every indicator is a pure function of a bar slice and its parameters and
//! returns one output element per input bar:
//!
//! - [`IndicatorKind`] / [`compute`] - Enum dispatch over the whole catalog
//! - [`IndicatorOutput`] - Line, band, multi-line, trend and pattern shapes
//! - [`average`], [`volatility`], [`momentum`], [`volume`], [`trend`],
//!   [`patterns`] - The individual indicator families
//! - [`smoothing`] - SMA / EMA / Wilder primitives over raw `f64` slices

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/candela/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod average;
mod kind;
pub mod momentum;
mod output;
pub mod patterns;
pub mod smoothing;
mod source;
pub mod trend;
pub mod volatility;
pub mod volume;

pub use kind::{DEFAULT_PERIOD, IndicatorKind, compute};
pub use output::{
    Band, Direction, IndicatorOutput, NamedLine, PatternPoint, Point, TrendPoint,
};
pub use patterns::CandlePattern;
pub use source::PriceSource;
pub use trend::SarParams;
