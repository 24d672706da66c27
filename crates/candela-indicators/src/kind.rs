//! Indicator dispatch.
//!
//! [`IndicatorKind`] is a tagged enum carrying each indicator's parameters.
//! A single [`compute`] entry point evaluates any of them over a bar slice,
//! which keeps callers (the CLI, replay, benches) free of per-indicator
//! branching.

use std::str::FromStr;

use candela_types::{Bar, CandelaError, Result, TimeUnit, Timeframe};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::output::IndicatorOutput;
use crate::trend::SarParams;
use crate::{PriceSource, average, momentum, patterns, trend, volatility, volume};

/// Every indicator the library can compute, with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IndicatorKind {
    /// Simple moving average.
    Sma {
        /// Lookback length.
        period: usize,
        /// Input price.
        #[serde(default)]
        source: PriceSource,
    },
    /// Exponential moving average.
    Ema {
        /// Lookback length.
        period: usize,
        /// Input price.
        #[serde(default)]
        source: PriceSource,
    },
    /// Linearly weighted moving average.
    Wma {
        /// Lookback length.
        period: usize,
        /// Input price.
        #[serde(default)]
        source: PriceSource,
    },
    /// Volume-weighted moving average.
    Vwma {
        /// Lookback length.
        period: usize,
    },
    /// Double exponential moving average.
    Dema {
        /// Lookback length.
        period: usize,
        /// Input price.
        #[serde(default)]
        source: PriceSource,
    },
    /// Triple exponential moving average.
    Tema {
        /// Lookback length.
        period: usize,
        /// Input price.
        #[serde(default)]
        source: PriceSource,
    },
    /// Hull moving average.
    Hma {
        /// Lookback length.
        period: usize,
        /// Input price.
        #[serde(default)]
        source: PriceSource,
    },
    /// Rolling population standard deviation.
    #[serde(rename = "stddev")]
    StdDev {
        /// Lookback length.
        period: usize,
        /// Input price.
        #[serde(default)]
        source: PriceSource,
    },
    /// Bollinger Bands around an SMA.
    Bollinger {
        /// Lookback length.
        period: usize,
        /// Band width multiplier.
        multiplier: f64,
        /// Input price.
        #[serde(default)]
        source: PriceSource,
    },
    /// Keltner Channels around an EMA.
    Keltner {
        /// Lookback length.
        period: usize,
        /// ATR lookback.
        atr_period: usize,
        /// Band width multiplier.
        multiplier: f64,
    },
    /// Donchian Channels.
    Donchian {
        /// Lookback length.
        period: usize,
    },
    /// Average True Range.
    Atr {
        /// Lookback length.
        period: usize,
    },
    /// Relative Strength Index.
    Rsi {
        /// Lookback length.
        period: usize,
        /// Input price.
        #[serde(default)]
        source: PriceSource,
    },
    /// MACD line, signal and histogram.
    Macd {
        /// Fast EMA length.
        fast: usize,
        /// Slow EMA length.
        slow: usize,
        /// Signal EMA length.
        signal: usize,
        /// Input price.
        #[serde(default)]
        source: PriceSource,
    },
    /// Rate of change of a triple EMA.
    Trix {
        /// Lookback length.
        period: usize,
        /// Input price.
        #[serde(default)]
        source: PriceSource,
    },
    /// Stochastic oscillator %K and %D.
    Stochastic {
        /// %K lookback.
        k_period: usize,
        /// %K smoothing.
        k_smoothing: usize,
        /// %D smoothing.
        d_period: usize,
    },
    /// Commodity Channel Index.
    Cci {
        /// Lookback length.
        period: usize,
    },
    /// Williams %R.
    WilliamsR {
        /// Lookback length.
        period: usize,
    },
    /// Money Flow Index.
    Mfi {
        /// Lookback length.
        period: usize,
    },
    /// Ultimate Oscillator.
    UltimateOscillator {
        /// Short window.
        short: usize,
        /// Medium window.
        medium: usize,
        /// Long window.
        long: usize,
    },
    /// Rate of change, in percent.
    Roc {
        /// Lookback length.
        period: usize,
        /// Input price.
        #[serde(default)]
        source: PriceSource,
    },
    /// Price difference over a lookback.
    Momentum {
        /// Lookback length.
        period: usize,
        /// Input price.
        #[serde(default)]
        source: PriceSource,
    },
    /// On-balance volume.
    Obv,
    /// Volume-weighted average price.
    Vwap {
        /// Session that resets the running sums; `None` accumulates over the whole series.
        #[serde(default)]
        session: Option<Timeframe>,
        /// Unit of bar timestamps.
        #[serde(default)]
        time_unit: TimeUnit,
    },
    /// Chaikin Money Flow.
    Cmf {
        /// Lookback length.
        period: usize,
    },
    /// Accumulation/Distribution line.
    AccumulationDistribution,
    /// EMA difference of the Accumulation/Distribution line.
    ChaikinOscillator {
        /// Fast EMA length.
        fast: usize,
        /// Slow EMA length.
        slow: usize,
    },
    /// ADX with +DI and -DI.
    Adx {
        /// Lookback length.
        period: usize,
    },
    /// Parabolic stop and reverse.
    ParabolicSar {
        /// Initial acceleration factor.
        start: f64,
        /// Acceleration step per new extreme.
        increment: f64,
        /// Acceleration cap.
        maximum: f64,
    },
    /// ATR-band trend follower.
    #[serde(rename = "supertrend")]
    SuperTrend {
        /// Lookback length.
        period: usize,
        /// Band width multiplier.
        multiplier: f64,
    },
    /// Swing points filtered by a minimum move.
    #[serde(rename = "zigzag")]
    ZigZag {
        /// Minimum reversal, in percent.
        deviation: f64,
    },
    /// Aroon up, down and oscillator.
    Aroon {
        /// Lookback length.
        period: usize,
    },
    /// Five-bar Williams fractals.
    Fractals,
    /// Candlestick pattern detection.
    CandlePatterns,
}

/// Period used when an indicator has no conventional default of its own.
pub const DEFAULT_PERIOD: usize = 14;

impl IndicatorKind {
    /// Identifiers accepted by [`IndicatorKind::from_name`], in catalog order.
    pub const NAMES: &'static [&'static str] = &[
        "sma",
        "ema",
        "wma",
        "vwma",
        "dema",
        "tema",
        "hma",
        "stddev",
        "bollinger",
        "keltner",
        "donchian",
        "atr",
        "rsi",
        "macd",
        "trix",
        "stochastic",
        "cci",
        "williams_r",
        "mfi",
        "ultimate_oscillator",
        "roc",
        "momentum",
        "obv",
        "vwap",
        "cmf",
        "accumulation_distribution",
        "chaikin_oscillator",
        "adx",
        "parabolic_sar",
        "supertrend",
        "zigzag",
        "aroon",
        "fractals",
        "candle_patterns",
    ];

    /// Looks up an indicator by name with its conventional default
    /// parameters.
    ///
    /// # Errors
    ///
    /// Returns [`CandelaError::Unknown`] for an unrecognized name.
    pub fn from_name(name: &str) -> Result<Self> {
        let source = PriceSource::Close;
        let period = DEFAULT_PERIOD;
        let kind = match name.to_lowercase().replace('-', "_").as_str() {
            "sma" => Self::Sma { period, source },
            "ema" => Self::Ema { period, source },
            "wma" => Self::Wma { period, source },
            "vwma" => Self::Vwma { period },
            "dema" => Self::Dema { period, source },
            "tema" => Self::Tema { period, source },
            "hma" | "hull" => Self::Hma { period, source },
            "stddev" | "std_dev" => Self::StdDev { period, source },
            "bollinger" | "bb" => Self::Bollinger {
                period: 20,
                multiplier: 2.0,
                source,
            },
            "keltner" | "kc" => Self::Keltner {
                period: 20,
                atr_period: 10,
                multiplier: 2.0,
            },
            "donchian" | "dc" => Self::Donchian { period: 20 },
            "atr" => Self::Atr { period },
            "rsi" => Self::Rsi { period, source },
            "macd" => Self::Macd {
                fast: 12,
                slow: 26,
                signal: 9,
                source,
            },
            "trix" => Self::Trix { period: 15, source },
            "stochastic" | "stoch" => Self::Stochastic {
                k_period: period,
                k_smoothing: 3,
                d_period: 3,
            },
            "cci" => Self::Cci { period: 20 },
            "williams_r" | "willr" => Self::WilliamsR { period },
            "mfi" => Self::Mfi { period },
            "ultimate_oscillator" | "uo" => Self::UltimateOscillator {
                short: 7,
                medium: 14,
                long: 28,
            },
            "roc" => Self::Roc { period: 12, source },
            "momentum" | "mom" => Self::Momentum { period: 10, source },
            "obv" => Self::Obv,
            "vwap" => Self::Vwap {
                session: None,
                time_unit: TimeUnit::Seconds,
            },
            "cmf" => Self::Cmf { period: 20 },
            "accumulation_distribution" | "ad" => Self::AccumulationDistribution,
            "chaikin_oscillator" | "chaikin" => Self::ChaikinOscillator { fast: 3, slow: 10 },
            "adx" => Self::Adx { period },
            "parabolic_sar" | "psar" | "sar" => {
                let SarParams {
                    start,
                    increment,
                    maximum,
                } = SarParams::default();
                Self::ParabolicSar {
                    start,
                    increment,
                    maximum,
                }
            }
            "supertrend" | "super_trend" => Self::SuperTrend {
                period: 10,
                multiplier: 3.0,
            },
            "zigzag" | "zig_zag" => Self::ZigZag { deviation: 5.0 },
            "aroon" => Self::Aroon { period: 25 },
            "fractals" => Self::Fractals,
            "candle_patterns" | "patterns" => Self::CandlePatterns,
            _ => {
                return Err(CandelaError::Unknown {
                    kind: "indicator",
                    value: name.to_string(),
                });
            }
        };
        Ok(kind)
    }

    /// Every indicator with default parameters.
    #[must_use]
    pub fn catalog() -> Vec<Self> {
        Self::NAMES
            .iter()
            .filter_map(|name| Self::from_name(name).ok())
            .collect()
    }

    /// Canonical identifier.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Sma { .. } => "sma",
            Self::Ema { .. } => "ema",
            Self::Wma { .. } => "wma",
            Self::Vwma { .. } => "vwma",
            Self::Dema { .. } => "dema",
            Self::Tema { .. } => "tema",
            Self::Hma { .. } => "hma",
            Self::StdDev { .. } => "stddev",
            Self::Bollinger { .. } => "bollinger",
            Self::Keltner { .. } => "keltner",
            Self::Donchian { .. } => "donchian",
            Self::Atr { .. } => "atr",
            Self::Rsi { .. } => "rsi",
            Self::Macd { .. } => "macd",
            Self::Trix { .. } => "trix",
            Self::Stochastic { .. } => "stochastic",
            Self::Cci { .. } => "cci",
            Self::WilliamsR { .. } => "williams_r",
            Self::Mfi { .. } => "mfi",
            Self::UltimateOscillator { .. } => "ultimate_oscillator",
            Self::Roc { .. } => "roc",
            Self::Momentum { .. } => "momentum",
            Self::Obv => "obv",
            Self::Vwap { .. } => "vwap",
            Self::Cmf { .. } => "cmf",
            Self::AccumulationDistribution => "accumulation_distribution",
            Self::ChaikinOscillator { .. } => "chaikin_oscillator",
            Self::Adx { .. } => "adx",
            Self::ParabolicSar { .. } => "parabolic_sar",
            Self::SuperTrend { .. } => "supertrend",
            Self::ZigZag { .. } => "zigzag",
            Self::Aroon { .. } => "aroon",
            Self::Fractals => "fractals",
            Self::CandlePatterns => "candle_patterns",
        }
    }

    /// Returns true if the output is drawn on the price pane.
    #[must_use]
    pub const fn is_overlay(&self) -> bool {
        matches!(
            self,
            Self::Sma { .. }
                | Self::Ema { .. }
                | Self::Wma { .. }
                | Self::Vwma { .. }
                | Self::Dema { .. }
                | Self::Tema { .. }
                | Self::Hma { .. }
                | Self::Bollinger { .. }
                | Self::Keltner { .. }
                | Self::Donchian { .. }
                | Self::Vwap { .. }
                | Self::ParabolicSar { .. }
                | Self::SuperTrend { .. }
                | Self::ZigZag { .. }
                | Self::Fractals
                | Self::CandlePatterns
        )
    }

    /// Number of leading positions of the primary output that never carry a
    /// value.
    ///
    /// For multi-line outputs the primary line is the first one (`macd`,
    /// `k`, `adx`, `up`).
    #[must_use]
    pub fn lookback(&self) -> usize {
        match *self {
            Self::Sma { period, .. }
            | Self::Ema { period, .. }
            | Self::Wma { period, .. }
            | Self::Vwma { period }
            | Self::StdDev { period, .. }
            | Self::Bollinger { period, .. }
            | Self::Donchian { period }
            | Self::Atr { period }
            | Self::Cci { period }
            | Self::WilliamsR { period }
            | Self::Cmf { period }
            | Self::SuperTrend { period, .. } => period.saturating_sub(1),
            Self::Dema { period, .. } => 2 * period.saturating_sub(1),
            Self::Tema { period, .. } => 3 * period.saturating_sub(1),
            Self::Trix { period, .. } => 3 * period.saturating_sub(1) + 1,
            Self::Hma { period, .. } => {
                let root = ((period as f64).sqrt().floor() as usize).max(1);
                period.saturating_sub(1) + root - 1
            }
            Self::Keltner {
                period, atr_period, ..
            } => period.max(atr_period).saturating_sub(1),
            Self::Rsi { period, .. }
            | Self::Mfi { period }
            | Self::Roc { period, .. }
            | Self::Momentum { period, .. }
            | Self::Aroon { period } => period,
            Self::Macd { slow, .. } | Self::ChaikinOscillator { slow, .. } => slow.saturating_sub(1),
            Self::Stochastic {
                k_period,
                k_smoothing,
                ..
            } => (k_period + k_smoothing).saturating_sub(2),
            Self::UltimateOscillator { long, .. } => long,
            Self::Adx { period } => (2 * period).saturating_sub(1),
            Self::ParabolicSar { .. } => 1,
            Self::Fractals => 2,
            Self::Obv
            | Self::Vwap { .. }
            | Self::AccumulationDistribution
            | Self::ZigZag { .. }
            | Self::CandlePatterns => 0,
        }
    }

    /// Primary window length, if the indicator has one.
    #[must_use]
    pub const fn period(&self) -> Option<usize> {
        match *self {
            Self::Sma { period, .. }
            | Self::Ema { period, .. }
            | Self::Wma { period, .. }
            | Self::Vwma { period }
            | Self::Dema { period, .. }
            | Self::Tema { period, .. }
            | Self::Hma { period, .. }
            | Self::StdDev { period, .. }
            | Self::Bollinger { period, .. }
            | Self::Keltner { period, .. }
            | Self::Donchian { period }
            | Self::Atr { period }
            | Self::Rsi { period, .. }
            | Self::Trix { period, .. }
            | Self::Cci { period }
            | Self::WilliamsR { period }
            | Self::Mfi { period }
            | Self::Roc { period, .. }
            | Self::Momentum { period, .. }
            | Self::Cmf { period }
            | Self::Adx { period }
            | Self::SuperTrend { period, .. }
            | Self::Aroon { period } => Some(period),
            Self::Stochastic { k_period, .. } => Some(k_period),
            _ => None,
        }
    }

    /// Replaces the primary window length; a no-op for indicators without one.
    #[must_use]
    pub const fn with_period(mut self, value: usize) -> Self {
        match &mut self {
            Self::Sma { period, .. }
            | Self::Ema { period, .. }
            | Self::Wma { period, .. }
            | Self::Vwma { period }
            | Self::Dema { period, .. }
            | Self::Tema { period, .. }
            | Self::Hma { period, .. }
            | Self::StdDev { period, .. }
            | Self::Bollinger { period, .. }
            | Self::Keltner { period, .. }
            | Self::Donchian { period }
            | Self::Atr { period }
            | Self::Rsi { period, .. }
            | Self::Trix { period, .. }
            | Self::Cci { period }
            | Self::WilliamsR { period }
            | Self::Mfi { period }
            | Self::Roc { period, .. }
            | Self::Momentum { period, .. }
            | Self::Cmf { period }
            | Self::Adx { period }
            | Self::SuperTrend { period, .. }
            | Self::Aroon { period } => *period = value,
            Self::Stochastic { k_period, .. } => *k_period = value,
            _ => {}
        }
        self
    }

    /// Replaces the price source; a no-op for indicators with a fixed input.
    #[must_use]
    pub const fn with_source(mut self, value: PriceSource) -> Self {
        match &mut self {
            Self::Sma { source, .. }
            | Self::Ema { source, .. }
            | Self::Wma { source, .. }
            | Self::Dema { source, .. }
            | Self::Tema { source, .. }
            | Self::Hma { source, .. }
            | Self::StdDev { source, .. }
            | Self::Bollinger { source, .. }
            | Self::Rsi { source, .. }
            | Self::Macd { source, .. }
            | Self::Trix { source, .. }
            | Self::Roc { source, .. }
            | Self::Momentum { source, .. } => *source = value,
            _ => {}
        }
        self
    }

    /// Replaces the band multiplier (or ZigZag deviation); a no-op otherwise.
    #[must_use]
    pub const fn with_multiplier(mut self, value: f64) -> Self {
        match &mut self {
            Self::Bollinger { multiplier, .. }
            | Self::Keltner { multiplier, .. }
            | Self::SuperTrend { multiplier, .. } => *multiplier = value,
            Self::ZigZag { deviation } => *deviation = value,
            _ => {}
        }
        self
    }

    /// Anchors VWAP to sessions of the given length; a no-op otherwise.
    #[must_use]
    pub const fn with_session(mut self, value: Option<Timeframe>, unit: TimeUnit) -> Self {
        if let Self::Vwap { session, time_unit } = &mut self {
            *session = value;
            *time_unit = unit;
        }
        self
    }

    /// Computes the indicator over `bars`.
    ///
    /// # Errors
    ///
    /// Returns [`CandelaError::InvalidParameter`] when a parameter is out of
    /// range. A series shorter than the lookback is not an error.
    pub fn compute(&self, bars: &[Bar]) -> Result<IndicatorOutput> {
        use IndicatorOutput::{Band, Line, MultiLine, Patterns, Trend};

        let lookback = self.lookback();
        if bars.len() <= lookback {
            debug!(
                indicator = self.name(),
                bars = bars.len(),
                lookback,
                "series shorter than lookback, output carries no values"
            );
        }

        Ok(match *self {
            Self::Sma { period, source } => Line(average::sma(bars, period, source)?),
            Self::Ema { period, source } => Line(average::ema(bars, period, source)?),
            Self::Wma { period, source } => Line(average::wma(bars, period, source)?),
            Self::Vwma { period } => Line(average::vwma(bars, period)?),
            Self::Dema { period, source } => Line(average::dema(bars, period, source)?),
            Self::Tema { period, source } => Line(average::tema(bars, period, source)?),
            Self::Hma { period, source } => Line(average::hma(bars, period, source)?),
            Self::StdDev { period, source } => Line(volatility::std_dev(bars, period, source)?),
            Self::Bollinger {
                period,
                multiplier,
                source,
            } => Band(volatility::bollinger(bars, period, multiplier, source)?),
            Self::Keltner {
                period,
                atr_period,
                multiplier,
            } => Band(volatility::keltner(bars, period, atr_period, multiplier)?),
            Self::Donchian { period } => Band(volatility::donchian(bars, period)?),
            Self::Atr { period } => Line(volatility::atr(bars, period)?),
            Self::Rsi { period, source } => Line(momentum::rsi(bars, period, source)?),
            Self::Macd {
                fast,
                slow,
                signal,
                source,
            } => MultiLine(momentum::macd(bars, fast, slow, signal, source)?),
            Self::Trix { period, source } => Line(momentum::trix(bars, period, source)?),
            Self::Stochastic {
                k_period,
                k_smoothing,
                d_period,
            } => MultiLine(momentum::stochastic(
                bars,
                k_period,
                k_smoothing,
                d_period,
            )?),
            Self::Cci { period } => Line(momentum::cci(bars, period)?),
            Self::WilliamsR { period } => Line(momentum::williams_r(bars, period)?),
            Self::Mfi { period } => Line(momentum::mfi(bars, period)?),
            Self::UltimateOscillator {
                short,
                medium,
                long,
            } => Line(momentum::ultimate_oscillator(bars, short, medium, long)?),
            Self::Roc { period, source } => Line(momentum::roc(bars, period, source)?),
            Self::Momentum { period, source } => Line(momentum::momentum(bars, period, source)?),
            Self::Obv => Line(volume::obv(bars)),
            Self::Vwap { session, time_unit } => Line(volume::vwap(bars, session, time_unit)),
            Self::Cmf { period } => Line(volume::cmf(bars, period)?),
            Self::AccumulationDistribution => Line(volume::accumulation_distribution(bars)),
            Self::ChaikinOscillator { fast, slow } => {
                Line(volume::chaikin_oscillator(bars, fast, slow)?)
            }
            Self::Adx { period } => MultiLine(trend::adx(bars, period)?),
            Self::ParabolicSar {
                start,
                increment,
                maximum,
            } => Trend(trend::parabolic_sar(
                bars,
                SarParams {
                    start,
                    increment,
                    maximum,
                },
            )?),
            Self::SuperTrend { period, multiplier } => {
                Trend(trend::supertrend(bars, period, multiplier)?)
            }
            Self::ZigZag { deviation } => Line(trend::zigzag(bars, deviation)?),
            Self::Aroon { period } => MultiLine(trend::aroon(bars, period)?),
            Self::Fractals => MultiLine(trend::fractals(bars)),
            Self::CandlePatterns => Patterns(patterns::candle_patterns(bars)),
        })
    }
}

/// Computes `kind` over `bars`; see [`IndicatorKind::compute`].
///
/// # Errors
///
/// Returns an error if the indicator's parameters are invalid.
pub fn compute(kind: &IndicatorKind, bars: &[Bar]) -> Result<IndicatorOutput> {
    kind.compute(bars)
}

impl std::fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for IndicatorKind {
    type Err = CandelaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_name_resolves() {
        assert_eq!(IndicatorKind::catalog().len(), IndicatorKind::NAMES.len());
        for kind in IndicatorKind::catalog() {
            assert_eq!(IndicatorKind::from_name(kind.name()).unwrap(), kind);
        }
    }

    #[test]
    fn test_aliases() {
        assert_eq!(
            "BB".parse::<IndicatorKind>().unwrap().name(),
            "bollinger"
        );
        assert_eq!(
            IndicatorKind::from_name("williams-r").unwrap(),
            IndicatorKind::WilliamsR { period: 14 }
        );
        let err = IndicatorKind::from_name("ichimoku").unwrap_err();
        assert!(matches!(err, CandelaError::Unknown { kind: "indicator", .. }));
    }

    #[test]
    fn test_builders() {
        let kind = IndicatorKind::from_name("sma")
            .unwrap()
            .with_period(5)
            .with_source(PriceSource::High);
        assert_eq!(
            kind,
            IndicatorKind::Sma {
                period: 5,
                source: PriceSource::High
            }
        );
        assert_eq!(IndicatorKind::Obv.with_period(5), IndicatorKind::Obv);
        assert_eq!(kind.lookback(), 4);
    }

    #[test]
    fn test_metadata() {
        assert!(IndicatorKind::from_name("bollinger").unwrap().is_overlay());
        assert!(!IndicatorKind::from_name("rsi").unwrap().is_overlay());
        assert_eq!(IndicatorKind::Adx { period: 14 }.lookback(), 27);
        assert_eq!(IndicatorKind::from_name("macd").unwrap().lookback(), 25);
    }

    #[test]
    fn test_zero_period_is_rejected_at_compute() {
        let bars = [Bar::flat(0, 1.0, 1.0)];
        let err = IndicatorKind::Rsi {
            period: 0,
            source: PriceSource::Close,
        }
        .compute(&bars)
        .unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn test_serde_tagging() {
        let json = r#"{"kind":"bollinger","period":20,"multiplier":2.0}"#;
        let kind: IndicatorKind = serde_json::from_str(json).unwrap();
        assert_eq!(kind, IndicatorKind::from_name("bollinger").unwrap());
    }
}
