//! Property tests over random-walk series.

use approx::assert_relative_eq;
use candela_indicators::{IndicatorKind, IndicatorOutput, PriceSource, average, momentum};
use candela_types::Bar;
use proptest::prelude::*;

/// Builds a random walk from (change, spread, volume) steps.
fn walk(steps: &[(f64, f64, f64)]) -> Vec<Bar> {
    let mut close = 100.0;
    steps
        .iter()
        .enumerate()
        .map(|(i, &(change, spread, volume))| {
            let open = close;
            close = (close + change).max(1.0);
            let high = open.max(close) + spread;
            let low = (open.min(close) - spread).max(0.5);
            Bar::new(i as i64 * 60, open, high, low, close, volume)
        })
        .collect()
}

fn steps() -> impl Strategy<Value = Vec<(f64, f64, f64)>> {
    proptest::collection::vec((-5.0..5.0f64, 0.0..3.0f64, 0.0..1000.0f64), 0..120)
}

/// First line of the output, for lookback checks.
fn primary_defined(output: &IndicatorOutput, i: usize) -> bool {
    match output {
        IndicatorOutput::Line(points) => points[i].value.is_some(),
        IndicatorOutput::Band(bands) => bands[i].is_defined(),
        IndicatorOutput::MultiLine(lines) => lines[0].points[i].value.is_some(),
        IndicatorOutput::Trend(points) => points[i].value.is_some(),
        IndicatorOutput::Patterns(_) => false,
    }
}

proptest! {
    #[test]
    fn rsi_is_bounded(steps in steps(), period in 1usize..30) {
        let bars = walk(&steps);
        let out = momentum::rsi(&bars, period, PriceSource::Close).unwrap();
        prop_assert_eq!(out.len(), bars.len());
        for value in out.iter().filter_map(|p| p.value) {
            prop_assert!((0.0..=100.0).contains(&value), "rsi {} out of range", value);
        }
    }

    #[test]
    fn sma_is_window_mean(steps in steps(), period in 1usize..20) {
        let bars = walk(&steps);
        let out = average::sma(&bars, period, PriceSource::Close).unwrap();
        for (i, point) in out.iter().enumerate() {
            if i + 1 < period {
                prop_assert!(point.value.is_none());
            } else {
                let window = &bars[i + 1 - period..=i];
                let mean = window.iter().map(|b| b.close).sum::<f64>() / period as f64;
                assert_relative_eq!(point.value.unwrap(), mean, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn every_kind_is_series_aligned(steps in steps()) {
        let bars = walk(&steps);
        for kind in IndicatorKind::catalog() {
            let out = kind.compute(&bars).unwrap();
            prop_assert_eq!(out.len(), bars.len(), "{} misaligned", kind);
            for i in 0..kind.lookback().min(bars.len()) {
                prop_assert!(!primary_defined(&out, i), "{} defined inside lookback at {}", kind, i);
            }
        }
    }

    #[test]
    fn oscillators_stay_in_range(steps in steps()) {
        let bars = walk(&steps);
        let bounded = [
            ("stochastic", 0.0, 100.0),
            ("williams_r", -100.0, 0.0),
            ("mfi", 0.0, 100.0),
            ("ultimate_oscillator", 0.0, 100.0),
            ("adx", 0.0, 100.0),
        ];
        for (name, low, high) in bounded {
            let out = IndicatorKind::from_name(name).unwrap().compute(&bars).unwrap();
            let IndicatorOutput::MultiLine(lines) = &out else {
                let points = out.as_line().unwrap();
                for value in points.iter().filter_map(|p| p.value) {
                    prop_assert!(value >= low - 1e-9 && value <= high + 1e-9, "{} = {}", name, value);
                }
                continue;
            };
            for value in lines[0].points.iter().filter_map(|p| p.value) {
                prop_assert!(value >= low - 1e-9 && value <= high + 1e-9, "{} = {}", name, value);
            }
        }
    }
}

#[test]
fn test_transformless_pipeline_on_scenario() {
    let bars = vec![
        Bar::new(0, 10.0, 12.0, 9.0, 11.0, 100.0),
        Bar::new(1, 11.0, 13.0, 10.0, 12.0, 200.0),
        Bar::new(2, 12.0, 12.0, 8.0, 9.0, 300.0),
    ];
    let sma = IndicatorKind::Sma {
        period: 2,
        source: PriceSource::Close,
    }
    .compute(&bars)
    .unwrap();
    let values: Vec<_> = sma.as_line().unwrap().iter().map(|p| p.value).collect();
    assert_eq!(values, vec![None, Some(11.5), Some(10.5)]);

    let rsi = IndicatorKind::Rsi {
        period: 2,
        source: PriceSource::Close,
    }
    .compute(&bars)
    .unwrap();
    assert_relative_eq!(rsi.as_line().unwrap()[2].value.unwrap(), 25.0);
}
