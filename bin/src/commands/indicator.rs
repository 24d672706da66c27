//! Indicator command implementation.
//!
//! Computes one indicator over the input series, optionally after a bar
//! transform.

use crate::commands::transform::{TransformParams, build_transform};
use crate::config::CandelaConfig;
use crate::display::{InputArgs, OutputArgs, load_series, write_table};
use anyhow::{Context, Result};
use candela_lib::format::Table;
use candela_lib::indicators::{IndicatorKind, PriceSource};
use candela_lib::{Bar, TimeUnit, Timeframe};
use clap::Args;
use tracing::info;

/// Indicator parameters; each applies only to the kinds that use it.
#[derive(Args, Debug, Default)]
pub(crate) struct IndicatorParams {
    /// Lookback period
    #[arg(short, long)]
    pub(crate) period: Option<usize>,

    /// Price source: open, high, low, close, hl2, hlc3, ohlc4
    #[arg(long)]
    pub(crate) source: Option<PriceSource>,

    /// Band multiplier (Bollinger, Keltner, SuperTrend) or ZigZag deviation
    #[arg(long)]
    pub(crate) multiplier: Option<f64>,

    /// Reset VWAP at the start of each session of this length
    #[arg(long)]
    pub(crate) session: Option<Timeframe>,

    /// Compute over a bar transform instead of the raw series
    #[arg(long)]
    pub(crate) transform: Option<String>,
}

/// Resolves an indicator name and its overrides.
pub(crate) fn build_indicator(
    name: &str,
    params: &IndicatorParams,
    unit: TimeUnit,
) -> Result<IndicatorKind> {
    let mut kind =
        IndicatorKind::from_name(name).with_context(|| format!("Unknown indicator: {name}"))?;
    if let Some(period) = params.period {
        kind = kind.with_period(period);
    }
    if let Some(source) = params.source {
        kind = kind.with_source(source);
    }
    if let Some(multiplier) = params.multiplier {
        kind = kind.with_multiplier(multiplier);
    }
    if params.session.is_some() {
        kind = kind.with_session(params.session, unit);
    }
    Ok(kind)
}

/// Applies the optional `--transform` to `bars`.
pub(crate) fn prepare_bars(
    bars: &[Bar],
    params: &IndicatorParams,
    transform: &TransformParams,
) -> Result<Vec<Bar>> {
    match &params.transform {
        Some(name) => {
            let kind = build_transform(name, transform)?;
            let out = kind
                .apply(bars)
                .with_context(|| format!("Failed to compute {kind}"))?;
            info!(%kind, bars = out.len(), "transformed before indicator");
            Ok(out)
        }
        None => Ok(bars.to_vec()),
    }
}

/// Run the indicator command.
pub(crate) fn indicator(
    name: &str,
    input: &InputArgs,
    params: &IndicatorParams,
    transform: &TransformParams,
    output: &OutputArgs,
    config: &CandelaConfig,
) -> Result<()> {
    let kind = build_indicator(name, params, config.time_unit)?;
    let series = load_series(input, config.time_unit)?;
    let bars = prepare_bars(&series, params, transform)?;
    let result = kind
        .compute(&bars)
        .with_context(|| format!("Failed to compute {kind}"))?;
    info!(%kind, lookback = kind.lookback(), points = result.len(), "computed indicator");
    write_table(&Table::from_indicator(&result), output, config)
}
