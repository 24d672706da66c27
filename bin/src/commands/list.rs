//! List command implementation.
//!
//! Prints the indicator and transform catalogs.

use anyhow::Result;
use candela_lib::bars::TransformKind;
use candela_lib::indicators::IndicatorKind;

/// What to list.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum Catalog {
    Indicators,
    Transforms,
    All,
}

/// List available indicators and transforms.
pub(crate) fn list(catalog: Catalog) -> Result<()> {
    if matches!(catalog, Catalog::Indicators | Catalog::All) {
        let indicators = IndicatorKind::catalog();
        println!("{:<16} {:<8} {:<9} {:<8}", "INDICATOR", "PERIOD", "LOOKBACK", "OVERLAY");
        println!("{}", "-".repeat(44));
        for kind in &indicators {
            println!(
                "{:<16} {:<8} {:<9} {:<8}",
                kind.name(),
                kind.period().map_or_else(|| "-".to_string(), |p| p.to_string()),
                kind.lookback(),
                if kind.is_overlay() { "yes" } else { "no" }
            );
        }
        println!("\nTotal: {} indicators", indicators.len());
    }

    if matches!(catalog, Catalog::All) {
        println!();
    }

    if matches!(catalog, Catalog::Transforms | Catalog::All) {
        println!("{:<16}", "TRANSFORM");
        println!("{}", "-".repeat(16));
        for kind in TransformKind::catalog() {
            println!("{:<16}", kind.name());
        }
    }
    Ok(())
}
