//! Market-data analytics engine.
//!
//! This is a facade crate that re-exports functionality from the candela
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use candela_lib::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let series = read_bars(std::path::Path::new("btc.csv"))?;
//!
//!     let rsi = IndicatorKind::from_name("rsi")?.compute(&series)?;
//!     let renko = TransformKind::from_name("renko")?.apply(&series)?;
//!     let profile = build_profile(&series, &ProfileParams::default())?;
//!
//!     println!("{} RSI values, {} bricks", rsi.len(), renko.len());
//!     if let Some(profile) = profile {
//!         println!("POC at {}", profile.point_of_control.price);
//!     }
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/candela/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use candela_types::*;

/// Indicator library.
pub mod indicators {
    pub use candela_indicators::*;
}

/// Alternate bar constructions.
#[cfg(feature = "bars")]
pub mod bars {
    pub use candela_bars::*;
}

/// Volume and market profiles.
#[cfg(feature = "profile")]
pub mod profile {
    pub use candela_profile::*;
}

/// Replay controller.
#[cfg(feature = "replay")]
pub mod replay {
    pub use candela_replay::*;
}

/// Series readers and result writers.
#[cfg(feature = "format")]
pub mod format {
    pub use candela_format::*;
}

/// Prelude module for convenient imports.
///
/// ```
/// use candela_lib::prelude::*;
/// ```
pub mod prelude {
    pub use candela_types::{
        Bar, CandelaError, Result, Series, SeriesError, TimeUnit, Timeframe,
    };

    pub use candela_indicators::{IndicatorKind, IndicatorOutput, PriceSource, compute};

    #[cfg(feature = "bars")]
    pub use candela_bars::{BoxSize, TransformKind, transform};

    #[cfg(feature = "profile")]
    pub use candela_profile::{
        Footprint, Profile, ProfileParams, RowSpec, TpoParams, TpoProfile, build_profile,
        footprint, tpo_profile,
    };

    #[cfg(feature = "replay")]
    pub use candela_replay::{PlaybackState, ReplayController};

    #[cfg(feature = "format")]
    pub use candela_format::{
        BarReader, CsvFormatter, FormatError, Formatter, JsonFormatter, OutputFormat, Table,
        read_bars,
    };
}
