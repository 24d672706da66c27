//! Transform command implementation.
//!
//! Converts the input series into an alternate bar representation.

use crate::config::CandelaConfig;
use crate::display::{InputArgs, OutputArgs, load_series, write_table};
use anyhow::{Context, Result, bail};
use candela_lib::bars::{BoxSize, PnfMethod, Reversal, TransformKind};
use candela_lib::format::Table;
use clap::Args;
use tracing::info;

/// Transform parameters; each applies only to the kinds that use it.
#[derive(Args, Debug, Default)]
pub(crate) struct TransformParams {
    /// Fixed box size (Renko, P&F) or range (range bars)
    #[arg(long, conflicts_with = "atr")]
    pub(crate) box_size: Option<f64>,

    /// Derive the box size from ATR over this period
    #[arg(long)]
    pub(crate) atr: Option<usize>,

    /// Multiplier applied to the ATR box size
    #[arg(long, requires = "atr")]
    pub(crate) atr_multiplier: Option<f64>,

    /// Kagi reversal as a percentage of the mean close
    #[arg(long, conflicts_with = "reversal_amount")]
    pub(crate) reversal_pct: Option<f64>,

    /// Kagi reversal as an absolute price amount
    #[arg(long)]
    pub(crate) reversal_amount: Option<f64>,

    /// Line Break line count or P&F reversal boxes
    #[arg(long)]
    pub(crate) count: Option<usize>,

    /// P&F uses highs and lows instead of closes
    #[arg(long)]
    pub(crate) high_low: bool,
}

/// Resolves a transform name and its overrides.
pub(crate) fn build_transform(name: &str, params: &TransformParams) -> Result<TransformKind> {
    let mut kind =
        TransformKind::from_name(name).with_context(|| format!("Unknown transform: {name}"))?;

    if let Some(size) = params.box_size {
        kind = kind.with_box_size(BoxSize::Fixed { size });
    }
    if let Some(period) = params.atr {
        kind = kind.with_box_size(BoxSize::Atr {
            period,
            multiplier: params.atr_multiplier.unwrap_or(1.0),
        });
    }
    match (params.reversal_pct, params.reversal_amount) {
        (Some(percent), _) => kind = kind.with_reversal(Reversal::Percent { percent }),
        (None, Some(amount)) => kind = kind.with_reversal(Reversal::Fixed { amount }),
        (None, None) => {}
    }
    if let Some(count) = params.count {
        if !matches!(
            kind,
            TransformKind::LineBreak { .. } | TransformKind::PointFigure { .. }
        ) {
            bail!("--count applies to line_break and pnf, not {kind}");
        }
        kind = kind.with_count(count);
    }
    if params.high_low {
        kind = kind.with_method(PnfMethod::HighLow);
    }
    Ok(kind)
}

/// Run the transform command.
pub(crate) fn transform(
    name: &str,
    input: &InputArgs,
    params: &TransformParams,
    output: &OutputArgs,
    config: &CandelaConfig,
) -> Result<()> {
    let kind = build_transform(name, params)?;
    let series = load_series(input, config.time_unit)?;
    let bars = kind
        .apply(&series)
        .with_context(|| format!("Failed to compute {kind}"))?;
    info!(%kind, input = series.len(), output = bars.len(), "transformed series");
    write_table(&Table::from_bars(&bars), output, config)
}
