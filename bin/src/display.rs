//! Shared arguments and input/output plumbing for the candela CLI.

use crate::config::CandelaConfig;
use anyhow::{Context, Result};
use candela_lib::format::{AnyFormatter, BarReader, Formatter, OutputFormat, Table, TimeStyle};
use candela_lib::profile::RowSpec;
use candela_lib::{Series, TimeUnit};
use clap::Args;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

/// Where the input series comes from.
#[derive(Args, Debug)]
pub(crate) struct InputArgs {
    /// Input series (.csv, .json or .ndjson)
    #[arg(short, long)]
    pub(crate) input: PathBuf,

    /// Input format (default: from the file extension)
    #[arg(long)]
    pub(crate) input_format: Option<OutputFormat>,
}

/// Where and how results are written.
#[derive(Args, Debug)]
pub(crate) struct OutputArgs {
    /// Output file (default: stdout)
    #[arg(short, long)]
    pub(crate) output: Option<PathBuf>,

    /// Output format: csv, json, ndjson (default: from --output, then config, then csv)
    #[arg(short, long)]
    pub(crate) format: Option<OutputFormat>,

    /// Pretty-print JSON arrays
    #[arg(long)]
    pub(crate) pretty: bool,

    /// Render times as RFC 3339 instead of raw integers
    #[arg(long)]
    pub(crate) rfc3339: bool,
}

/// Price row partition.
#[derive(Args, Debug)]
pub(crate) struct RowArgs {
    /// Number of equal-height price rows
    #[arg(long, conflicts_with = "row_size")]
    pub(crate) rows: Option<usize>,

    /// Fixed price row height
    #[arg(long)]
    pub(crate) row_size: Option<f64>,
}

impl RowArgs {
    /// Flag value if given, else `fallback`.
    pub(crate) fn resolve(&self, fallback: RowSpec) -> RowSpec {
        match (self.rows, self.row_size) {
            (_, Some(size)) => RowSpec::Size(size),
            (Some(count), None) => RowSpec::Count(count),
            (None, None) => fallback,
        }
    }
}

/// Reads the input series.
pub(crate) fn load_series(args: &InputArgs, unit: TimeUnit) -> Result<Series> {
    let mut reader = BarReader::new().with_time_unit(unit);
    if let Some(format) = args.input_format {
        reader = reader.with_format(format);
    }
    let series = reader
        .read_path(&args.input)
        .with_context(|| format!("Failed to read series from '{}'", args.input.display()))?;
    info!(bars = series.len(), input = %args.input.display(), "loaded series");
    Ok(series)
}

/// Picks the formatter from flags, the output extension and the config.
pub(crate) fn formatter(args: &OutputArgs, config: &CandelaConfig) -> Result<AnyFormatter> {
    let format = match args.format {
        Some(format) => format,
        None => match args.output.as_deref().and_then(OutputFormat::from_path) {
            Some(format) => format,
            None => config.output_format()?.unwrap_or_default(),
        },
    };
    let style = if args.rfc3339 {
        TimeStyle::Rfc3339(config.time_unit)
    } else {
        config.time_style()
    };
    Ok(format
        .formatter()
        .with_time_style(style)
        .with_pretty(args.pretty || config.output.pretty))
}

/// Writes a table to `--output` or stdout.
pub(crate) fn write_table(table: &Table, args: &OutputArgs, config: &CandelaConfig) -> Result<()> {
    let formatter = formatter(args, config)?;
    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create '{}'", path.display()))?;
            formatter.write_table(table, BufWriter::new(file))?;
            info!(rows = table.len(), output = %path.display(), "wrote results");
        }
        None => {
            let mut out = BufWriter::new(std::io::stdout());
            formatter.write_table(table, &mut out)?;
            out.flush()?;
        }
    }
    Ok(())
}
