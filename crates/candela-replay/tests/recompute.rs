//! Recomputing analytics over the replay prefix.

use approx::assert_relative_eq;
use candela_bars::heikin_ashi;
use candela_indicators::{IndicatorKind, PriceSource};
use candela_replay::{PlaybackState, ReplayController};
use candela_types::Bar;
use proptest::prelude::*;

fn series(n: usize) -> Vec<Bar> {
    (0..n)
        .map(|i| {
            let base = 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.1;
            Bar::new(i as i64 * 60, base, base + 1.0, base - 1.0, base + 0.3, 10.0 + i as f64)
        })
        .collect()
}

#[test]
fn test_playback_recomputes_growing_prefix() {
    let bars = series(40);
    let sma = IndicatorKind::Sma {
        period: 5,
        source: PriceSource::Close,
    };
    let full = sma.compute(&bars).unwrap();
    let full = full.as_line().unwrap();

    let mut replay = ReplayController::new(bars.len());
    replay.play(8.0).unwrap();
    let mut frames = 0;
    while replay.tick() {
        frames += 1;
        let visible = replay.visible(&bars);
        let output = sma.compute(visible).unwrap();
        let line = output.as_line().unwrap();
        assert_eq!(line.len(), visible.len());
        let last = line.last().unwrap();
        let expected = full[visible.len() - 1];
        assert_eq!(last.time, expected.time);
        match (last.value, expected.value) {
            (Some(a), Some(b)) => assert_relative_eq!(a, b, epsilon = 1e-9),
            (a, b) => assert_eq!(a, b),
        }
    }
    assert_eq!(frames, 39);
    assert_eq!(replay.state(), PlaybackState::Paused);
}

#[test]
fn test_seek_back_matches_fresh_computation() {
    let bars = series(30);
    let mut replay = ReplayController::new(bars.len());
    replay.seek(25);
    let late = heikin_ashi(replay.visible(&bars));
    replay.seek(10);
    let early = heikin_ashi(replay.visible(&bars));
    assert_eq!(early.as_slice(), &late[..10]);
}

proptest! {
    #[test]
    fn commands_keep_cursor_in_bounds(len in 0usize..50, commands in proptest::collection::vec(0u8..7, 0..200)) {
        let bars = series(len);
        let mut replay = ReplayController::new(len);
        for command in commands {
            match command {
                0 => { replay.play(2.0).unwrap(); }
                1 => { replay.pause(); }
                2 => replay.stop(),
                3 => { replay.step(); }
                4 => { replay.step_back(); }
                5 => { replay.seek(len / 2 + 1); }
                _ => { replay.tick(); }
            }
            prop_assert!(replay.cursor() <= len);
            prop_assert_eq!(replay.visible(&bars).len(), replay.cursor());
            if replay.state() == PlaybackState::Stopped {
                prop_assert!(replay.interval().is_none());
            }
        }
    }
}
