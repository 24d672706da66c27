//! Core types for the candela market-data analytics engine.
//!
//! This crate provides the fundamental data structures shared by every
//! analytics component:
//!
//! - [`Bar`] - A single OHLCV bar
//! - [`Series`] - An ordered, strictly time-increasing sequence of bars
//! - [`CandelaError`] - Boundary error taxonomy and parameter validation
//! - [`Timeframe`] / [`TimeUnit`] - Period arithmetic over bar timestamps
//! - [`fold`] - Accumulator helper for sequential recurrences

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/candela/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bar;
mod error;
mod fold;
mod params;
mod series;
mod timeframe;

pub use bar::Bar;
pub use error::{CandelaError, Result, SeriesError};
pub use fold::fold;
pub use params::{
    require_non_negative, require_ordered, require_percentage, require_period, require_positive,
};
pub use series::{Series, price_range};
pub use timeframe::{TimeUnit, Timeframe, TimeframeParseError};
