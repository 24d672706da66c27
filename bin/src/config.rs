//! Configuration file handling.
//!
//! Values come from `--config <path>`, else `config.json` in the platform
//! config directory, else built-in defaults. Command-line flags override
//! whatever the file sets.

use anyhow::{Context, Result};
use candela_lib::format::{OutputFormat, TimeStyle};
use candela_lib::profile::{DEFAULT_ROWS, DEFAULT_VALUE_AREA_PCT, RowSpec};
use candela_lib::{TimeUnit, Timeframe};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Volume profile and footprint defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct ProfileSection {
    pub(crate) rows: usize,
    /// Takes precedence over `rows` when set.
    pub(crate) row_size: Option<f64>,
    pub(crate) value_area_pct: f64,
}

impl Default for ProfileSection {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            row_size: None,
            value_area_pct: DEFAULT_VALUE_AREA_PCT,
        }
    }
}

impl ProfileSection {
    pub(crate) fn row_spec(&self) -> RowSpec {
        self.row_size.map_or(RowSpec::Count(self.rows), RowSpec::Size)
    }
}

/// TPO defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct TpoSection {
    pub(crate) period: Timeframe,
    pub(crate) rows: usize,
    pub(crate) row_size: Option<f64>,
}

impl Default for TpoSection {
    fn default() -> Self {
        Self {
            period: Timeframe::Minute30,
            rows: DEFAULT_ROWS,
            row_size: None,
        }
    }
}

impl TpoSection {
    pub(crate) fn row_spec(&self) -> RowSpec {
        self.row_size.map_or(RowSpec::Count(self.rows), RowSpec::Size)
    }
}

/// Replay driver defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct ReplaySection {
    /// Tick interval at speed 1.
    pub(crate) interval_ms: u64,
    pub(crate) speed: f64,
}

impl Default for ReplaySection {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            speed: 1.0,
        }
    }
}

/// Output defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub(crate) struct OutputSection {
    /// `csv`, `json` or `ndjson`; inferred from `--output` when unset.
    pub(crate) format: Option<String>,
    pub(crate) pretty: bool,
    /// Render times as RFC 3339 instead of raw integers.
    pub(crate) rfc3339: bool,
}

/// Root configuration document.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub(crate) struct CandelaConfig {
    pub(crate) time_unit: TimeUnit,
    pub(crate) profile: ProfileSection,
    pub(crate) tpo: TpoSection,
    pub(crate) replay: ReplaySection,
    pub(crate) output: OutputSection,
}

impl CandelaConfig {
    /// Path of the per-user config file, if the platform has one.
    pub(crate) fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "candela").map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Loads `explicit`, else the per-user file if it exists, else defaults.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                debug!("no config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config '{}'", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("Invalid config '{}'", path.display()))?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Output format from the file, if it names one.
    pub(crate) fn output_format(&self) -> Result<Option<OutputFormat>> {
        self.output
            .format
            .as_deref()
            .map(|name| {
                name.parse::<OutputFormat>()
                    .with_context(|| format!("Invalid output.format '{name}' in config"))
            })
            .transpose()
    }

    pub(crate) const fn time_style(&self) -> TimeStyle {
        if self.output.rfc3339 {
            TimeStyle::Rfc3339(self.time_unit)
        } else {
            TimeStyle::Unix
        }
    }
}
