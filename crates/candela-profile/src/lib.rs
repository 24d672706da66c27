//! Volume and market-profile statistics for the candela analytics engine.
//!
//! - [`build_profile`] - Volume profile with point of control and value area
//! - [`footprint`] - Per-bar buy/sell volume over a shared price grid
//! - [`tpo_profile`] - Lettered time-price-opportunity counts
//! - [`expand_value_area`] - The greedy value-area routine all three share
//!
//! Buy and sell volume come from a fixed 60/40 split keyed on bar direction
//! (see [`split`]); they are an approximation, not trade-level attribution.

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/candela/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod footprint;
mod grid;
mod profile;
pub mod split;
mod tpo;
mod value_area;

pub use footprint::{Footprint, FootprintCell, FootprintColumn, footprint};
pub use grid::{DEFAULT_ROWS, MAX_ROWS, PriceGrid, RowSpec};
pub use profile::{Profile, ProfileLevel, ProfileParams, build_profile};
pub use tpo::{InitialBalance, TpoLevel, TpoParams, TpoPeriod, TpoProfile, tpo_letter, tpo_profile};
pub use value_area::{
    AreaSpan, DEFAULT_VALUE_AREA_PCT, ValueArea, expand_value_area, point_of_control,
};
