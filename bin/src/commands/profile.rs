//! Profile, footprint and TPO command implementations.

use crate::config::CandelaConfig;
use crate::display::{InputArgs, OutputArgs, RowArgs, load_series, write_table};
use anyhow::{Context, Result};
use candela_lib::Timeframe;
use candela_lib::format::Table;
use candela_lib::profile::{ProfileParams, TpoParams, build_profile, footprint, tpo_profile};
use tracing::{info, warn};

/// Run the volume profile command.
pub(crate) fn profile(
    input: &InputArgs,
    rows: &RowArgs,
    value_area: Option<f64>,
    output: &OutputArgs,
    config: &CandelaConfig,
) -> Result<()> {
    let params = ProfileParams::default()
        .with_rows(rows.resolve(config.profile.row_spec()))
        .with_value_area_pct(value_area.unwrap_or(config.profile.value_area_pct));
    let series = load_series(input, config.time_unit)?;
    let table = match build_profile(&series, &params).context("Failed to build profile")? {
        Some(profile) => {
            info!(
                poc = profile.point_of_control.price,
                vah = profile.value_area.high,
                val = profile.value_area.low,
                value_area_pct = profile.value_area.percentage,
                "volume profile"
            );
            Table::from_profile(&profile)
        }
        None => {
            warn!("empty series, no profile");
            Table::default()
        }
    };
    write_table(&table, output, config)
}

/// Run the footprint command.
pub(crate) fn footprint_command(
    input: &InputArgs,
    rows: &RowArgs,
    output: &OutputArgs,
    config: &CandelaConfig,
) -> Result<()> {
    let series = load_series(input, config.time_unit)?;
    let fp = footprint(&series, rows.resolve(config.profile.row_spec()))
        .context("Failed to build footprint")?;
    info!(columns = fp.columns.len(), row_size = fp.row_size, "footprint");
    write_table(&Table::from_footprint(&fp), output, config)
}

/// Run the TPO command.
pub(crate) fn tpo(
    input: &InputArgs,
    period: Option<Timeframe>,
    rows: &RowArgs,
    value_area: Option<f64>,
    output: &OutputArgs,
    config: &CandelaConfig,
) -> Result<()> {
    let params = TpoParams::default()
        .with_period(period.unwrap_or(config.tpo.period))
        .with_rows(rows.resolve(config.tpo.row_spec()))
        .with_value_area_pct(value_area.unwrap_or(config.profile.value_area_pct))
        .with_time_unit(config.time_unit);
    let series = load_series(input, config.time_unit)?;
    let table = match tpo_profile(&series, &params).context("Failed to build TPO profile")? {
        Some(profile) => {
            info!(
                periods = profile.periods.len(),
                poc = profile.point_of_control,
                ib_high = profile.initial_balance.high,
                ib_low = profile.initial_balance.low,
                "TPO profile"
            );
            Table::from_tpo(&profile)
        }
        None => {
            warn!("empty series, no TPO profile");
            Table::default()
        }
    };
    write_table(&table, output, config)
}
