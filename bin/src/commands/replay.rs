//! Replay command implementation.
//!
//! Drives a [`ReplayController`] from a tokio interval and recomputes an
//! indicator over the visible prefix on every tick. One row per frame is
//! written once playback ends or is interrupted.

use crate::commands::indicator::{IndicatorParams, build_indicator, prepare_bars};
use crate::commands::transform::TransformParams;
use crate::config::CandelaConfig;
use crate::display::{InputArgs, OutputArgs, load_series, write_table};
use anyhow::{Context, Result};
use candela_lib::Bar;
use candela_lib::format::{Cell, Table};
use candela_lib::indicators::IndicatorKind;
use candela_lib::replay::ReplayController;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Replay options.
#[derive(Debug)]
pub(crate) struct ReplayOptions {
    pub(crate) speed: Option<f64>,
    pub(crate) interval_ms: Option<u64>,
    pub(crate) start: Option<usize>,
}

/// Row for the current prefix: cursor, then the indicator's last position.
fn frame(
    kind: &IndicatorKind,
    visible: &[Bar],
    cursor: usize,
    frames: &mut Option<Table>,
) -> Result<()> {
    let output = kind
        .compute(visible)
        .with_context(|| format!("Failed to compute {kind} at bar {cursor}"))?;
    let snapshot = Table::from_indicator(&output);
    let table = frames.get_or_insert_with(|| {
        Table::new(std::iter::once("cursor").chain(snapshot.columns().iter().map(String::as_str)))
    });
    let mut row = vec![Cell::Count(cursor)];
    if let Some(last) = snapshot.rows().last() {
        row.extend(last.iter().cloned());
    }
    table.push(row);
    Ok(())
}

/// Run the replay command.
#[allow(clippy::too_many_arguments)]
pub(crate) async fn replay(
    name: &str,
    input: &InputArgs,
    params: &IndicatorParams,
    transform: &TransformParams,
    options: &ReplayOptions,
    output: &OutputArgs,
    config: &CandelaConfig,
    quiet: bool,
) -> Result<()> {
    let kind = build_indicator(name, params, config.time_unit)?;
    let series = load_series(input, config.time_unit)?;
    let bars = prepare_bars(&series, params, transform)?;

    let mut controller = ReplayController::new(bars.len())
        .with_interval(Duration::from_millis(
            options.interval_ms.unwrap_or(config.replay.interval_ms),
        ));
    if let Some(start) = options.start {
        controller = controller.with_start(start);
    }
    controller
        .play(options.speed.unwrap_or(config.replay.speed))
        .context("Invalid replay speed")?;

    let period = controller
        .interval()
        .unwrap_or(Duration::from_millis(config.replay.interval_ms))
        .clamp(Duration::from_millis(1), Duration::from_secs(3600));
    info!(%kind, bars = bars.len(), ?period, state = %controller.state(), "replay started");

    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(bars.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} bars {msg}")
                .context("Invalid progress template")?
                .progress_chars("=>-"),
        );
        pb
    };

    let mut frames = None;
    frame(&kind, controller.visible(&bars), controller.cursor(), &mut frames)?;
    progress.set_position(controller.cursor() as u64);

    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if !controller.tick() {
                    break;
                }
                debug!(cursor = controller.cursor(), "replay tick");
                frame(&kind, controller.visible(&bars), controller.cursor(), &mut frames)?;
                progress.set_position(controller.cursor() as u64);
                if !controller.state().is_playing() {
                    break;
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for Ctrl-C")?;
                controller.pause();
                break;
            }
        }
    }

    progress.finish_with_message(format!("{}", controller.state()));
    info!(
        cursor = controller.cursor(),
        state = %controller.state(),
        progress = controller.progress(),
        "replay ended"
    );
    write_table(&frames.unwrap_or_default(), output, config)
}
