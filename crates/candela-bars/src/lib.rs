//! Alternate bar constructions for the candela analytics engine.
//!
//! Each transform maps a bar slice to a new, independently owned sequence:
//!
//! - [`TransformKind`] / [`transform`] - Enum dispatch returning plain bars
//! - [`heikin_ashi`] - Averaged candles
//! - [`renko`], [`kagi`], [`line_break`], [`point_figure`] - Price-driven
//!   charts with rich output types
//! - [`RangeBarBuilder`] / [`range_bars`] - Streaming range bars

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/candela/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod box_size;
mod heikin_ashi;
mod kagi;
mod kind;
mod line_break;
mod point_figure;
mod range;
mod renko;

pub use box_size::BoxSize;
pub use heikin_ashi::heikin_ashi;
pub use kagi::{KagiLine, LineWeight, Reversal, kagi};
pub use kind::{TransformKind, transform};
pub use line_break::{DEFAULT_LINES, LineBreakBox, line_break};
pub use point_figure::{
    ColumnKind, DEFAULT_REVERSAL, PnfChart, PnfColumn, PnfMethod, PnfParams, point_figure,
};
pub use range::{RangeBarBuilder, range_bars};
pub use renko::{MAX_BRICKS, RenkoBrick, RenkoChart, renko};
