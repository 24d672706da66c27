//! Property tests for the bar transforms and their use as indicator input.

use approx::assert_relative_eq;
use candela_bars::{
    BoxSize, Reversal, TransformKind, heikin_ashi, kagi, range_bars, renko, transform,
};
use candela_indicators::{Direction, IndicatorKind};
use candela_types::Bar;
use proptest::prelude::*;

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
    proptest::collection::vec((-4.0..4.0f64, 0.0..2.0f64, 0.0..500.0f64), 1..150)
}

fn total_volume(bars: &[Bar]) -> f64 {
    bars.iter().map(|b| b.volume).sum()
}

proptest! {
    #[test]
    fn renko_bricks_are_one_box_and_chained(steps in steps(), size in 0.25..5.0f64) {
        let bars = walk(&steps);
        let chart = renko(&bars, BoxSize::fixed(size)).unwrap();
        for brick in &chart.bricks {
            prop_assert!(brick.complete);
            assert_relative_eq!((brick.close - brick.open).abs(), size, epsilon = 1e-6);
            let expected = if brick.close > brick.open { Direction::Up } else { Direction::Down };
            prop_assert_eq!(brick.direction, expected);
        }
        for pair in chart.bricks.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            if next.direction == prev.direction {
                prop_assert_eq!(next.open, prev.close);
            } else {
                prop_assert_eq!(next.open, prev.open);
            }
        }
        let produced = total_volume(&chart.to_bars());
        assert_relative_eq!(produced, total_volume(&bars), epsilon = 1e-6, max_relative = 1e-9);
    }

    #[test]
    fn heikin_ashi_is_deterministic(steps in steps()) {
        let bars = walk(&steps);
        let first = heikin_ashi(&bars);
        let second = heikin_ashi(&bars);
        prop_assert_eq!(first.len(), bars.len());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn kagi_and_range_bars_keep_volume(steps in steps(), amount in 0.5..6.0f64) {
        let bars = walk(&steps);
        let total = total_volume(&bars);
        let lines = kagi(&bars, Reversal::Fixed { amount }).unwrap();
        let kagi_volume: f64 = lines.iter().map(|l| l.volume).sum();
        assert_relative_eq!(kagi_volume, total, epsilon = 1e-6, max_relative = 1e-9);

        let ranged = range_bars(&bars, amount).unwrap();
        assert_relative_eq!(total_volume(&ranged), total, epsilon = 1e-6, max_relative = 1e-9);
        for bar in &ranged[..ranged.len().saturating_sub(1)] {
            prop_assert!(bar.high - bar.low >= amount);
        }
    }

    #[test]
    fn indicators_run_over_transformed_bars(steps in steps()) {
        let bars = walk(&steps);
        for kind in TransformKind::catalog() {
            let derived = transform(&bars, &kind).unwrap();
            for indicator in IndicatorKind::catalog() {
                let output = indicator.compute(&derived).unwrap();
                prop_assert_eq!(output.len(), derived.len(), "{} over {}", indicator, kind);
            }
        }
    }
}

#[test]
fn test_large_box_flushes_single_bar() {
    let bars = walk(&[(0.5, 0.1, 10.0), (-0.3, 0.1, 10.0), (0.2, 0.1, 10.0)]);
    let renko_kind = TransformKind::Renko {
        box_size: BoxSize::fixed(1_000.0),
    };
    let range_kind = TransformKind::RangeBars {
        range: BoxSize::fixed(1_000.0),
    };
    for kind in [renko_kind, range_kind] {
        let out = transform(&bars, &kind).unwrap();
        assert_eq!(out.len(), 1, "{kind}");
        assert_relative_eq!(out[0].volume, 30.0);
    }
}
