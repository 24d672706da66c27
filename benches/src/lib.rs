//! Benchmark utilities for candela.

use candela_lib::Bar;

/// Deterministic synthetic series of `len` one-minute bars.
///
/// A drifting sine wave with xorshift noise, so runs are comparable across
/// machines without a random-number dependency.
pub fn synthetic_series(len: usize, seed: u64) -> Vec<Bar> {
    let mut state = seed.max(1);
    let mut noise = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state % 10_000) as f64 / 10_000.0 - 0.5
    };

    let mut close = 100.0;
    (0..len)
        .map(|i| {
            let open = close;
            close = (open + (i as f64 / 50.0).sin() * 0.4 + noise()).max(1.0);
            let high = open.max(close) + noise().abs();
            let low = (open.min(close) - noise().abs()).max(0.5);
            let volume = 1_000.0 + noise() * 800.0;
            Bar::new(i as i64 * 60, open, high, low, close, volume)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_is_deterministic_and_valid() {
        let a = synthetic_series(500, 7);
        assert_eq!(a, synthetic_series(500, 7));
        assert!(a.iter().all(|b| b.low <= b.open.min(b.close) && b.high >= b.open.max(b.close)));
        assert!(a.windows(2).all(|w| w[0].time < w[1].time));
    }
}
