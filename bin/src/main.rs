//! candela CLI - market-data analytics over OHLCV series.

use anyhow::Result;
use candela_lib::{TimeUnit, Timeframe};
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod display;

use commands::indicator::IndicatorParams;
use commands::list::Catalog;
use commands::replay::ReplayOptions;
use commands::transform::TransformParams;
use config::CandelaConfig;
use display::{InputArgs, OutputArgs, RowArgs};

#[derive(Parser)]
#[command(name = "candela")]
#[command(about = "Indicators, alternate bars and market profiles for OHLCV series", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file (default: the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Unit of integer timestamps: s or ms
    #[arg(long, global = true)]
    time_unit: Option<TimeUnit>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute an indicator
    Indicator {
        /// Indicator name (see `candela list`)
        kind: String,

        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        params: IndicatorParams,

        #[command(flatten)]
        transform: TransformParams,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Convert bars into an alternate representation
    Transform {
        /// Transform name (see `candela list`)
        kind: String,

        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        params: TransformParams,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Build a volume profile
    Profile {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        rows: RowArgs,

        /// Value area percentage
        #[arg(long)]
        value_area: Option<f64>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Build a per-bar footprint
    Footprint {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        rows: RowArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Build a TPO market profile
    Tpo {
        #[command(flatten)]
        input: InputArgs,

        /// Length of one lettered period (m30, h1, ...)
        #[arg(long)]
        period: Option<Timeframe>,

        #[command(flatten)]
        rows: RowArgs,

        /// Value area percentage
        #[arg(long)]
        value_area: Option<f64>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Replay a series bar by bar, recomputing an indicator each tick
    Replay {
        /// Indicator name (see `candela list`)
        #[arg(default_value = "sma")]
        kind: String,

        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        params: IndicatorParams,

        #[command(flatten)]
        transform: TransformParams,

        /// Playback speed multiplier
        #[arg(long)]
        speed: Option<f64>,

        /// Tick interval at speed 1, in milliseconds
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Bars visible before playback starts
        #[arg(long)]
        start: Option<usize>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List available indicators and transforms
    List {
        /// Which catalog to print
        #[arg(value_enum, default_value = "all")]
        catalog: Catalog,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let mut config = CandelaConfig::load(cli.config.as_deref())?;
    if let Some(unit) = cli.time_unit {
        config.time_unit = unit;
    }

    match command {
        Commands::Indicator {
            kind,
            input,
            params,
            transform,
            output,
        } => commands::indicator::indicator(&kind, &input, &params, &transform, &output, &config),
        Commands::Transform {
            kind,
            input,
            params,
            output,
        } => commands::transform::transform(&kind, &input, &params, &output, &config),
        Commands::Profile {
            input,
            rows,
            value_area,
            output,
        } => commands::profile::profile(&input, &rows, value_area, &output, &config),
        Commands::Footprint {
            input,
            rows,
            output,
        } => commands::profile::footprint_command(&input, &rows, &output, &config),
        Commands::Tpo {
            input,
            period,
            rows,
            value_area,
            output,
        } => commands::profile::tpo(&input, period, &rows, value_area, &output, &config),
        Commands::Replay {
            kind,
            input,
            params,
            transform,
            speed,
            interval_ms,
            start,
            output,
        } => {
            let options = ReplayOptions {
                speed,
                interval_ms,
                start,
            };
            commands::replay::replay(
                &kind, &input, &params, &transform, &options, &output, &config, cli.quiet,
            )
            .await
        }
        Commands::List { catalog } => commands::list::list(catalog),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_indicator_flags() {
        let cli = Cli::try_parse_from([
            "candela", "-vv", "indicator", "rsi", "-i", "btc.csv", "--period", "7", "--format",
            "ndjson",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Some(Commands::Indicator { kind, params, output, .. }) = cli.command else {
            panic!("expected indicator command");
        };
        assert_eq!(kind, "rsi");
        assert_eq!(params.period, Some(7));
        assert_eq!(
            output.format,
            Some(candela_lib::format::OutputFormat::Ndjson)
        );
    }

    #[test]
    fn test_rows_conflict() {
        assert!(
            Cli::try_parse_from([
                "candela", "profile", "-i", "a.csv", "--rows", "10", "--row-size", "0.5"
            ])
            .is_err()
        );
    }
}
