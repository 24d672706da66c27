//! Heikin-Ashi candles.

use candela_types::{Bar, fold};

/// Converts bars into Heikin-Ashi candles.
///
/// `close' = (O+H+L+C)/4`, `open'[0] = (O[0]+C[0])/2` and
/// `open'[i] = (open'[i-1] + close'[i-1])/2`. The recurrence is sequential;
/// time and volume pass through unchanged.
#[must_use]
pub fn heikin_ashi(bars: &[Bar]) -> Vec<Bar> {
    let (_, out) = fold(bars, None::<(f64, f64)>, |prev, bar, out| {
        let close = bar.ohlc4();
        let open = match *prev {
            Some((open, close)) => (open + close) / 2.0,
            None => (bar.open + bar.close) / 2.0,
        };
        out.push(Bar::new(
            bar.time,
            open,
            bar.high.max(open).max(close),
            bar.low.min(open).min(close),
            close,
            bar.volume,
        ));
        *prev = Some((open, close));
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scenario() -> Vec<Bar> {
        vec![
            Bar::new(0, 10.0, 12.0, 9.0, 11.0, 100.0),
            Bar::new(1, 11.0, 13.0, 10.0, 12.0, 200.0),
            Bar::new(2, 12.0, 12.0, 8.0, 9.0, 300.0),
        ]
    }

    #[test]
    fn test_recurrence() {
        let ha = heikin_ashi(&scenario());
        assert_relative_eq!(ha[0].open, 10.5);
        assert_relative_eq!(ha[0].close, 10.5);
        assert_relative_eq!(ha[1].open, 10.5);
        assert_relative_eq!(ha[1].close, 11.5);
        assert_relative_eq!(ha[2].open, 11.0);
        assert_relative_eq!(ha[2].close, 10.25);
        assert_relative_eq!(ha[2].high, 12.0);
        assert_relative_eq!(ha[2].low, 8.0);
        assert_eq!(ha[2].volume, 300.0);
    }

    #[test]
    fn test_envelope_contains_body() {
        for bar in heikin_ashi(&scenario()) {
            assert!(bar.high >= bar.open.max(bar.close));
            assert!(bar.low <= bar.open.min(bar.close));
        }
    }

    #[test]
    fn test_deterministic_and_empty() {
        assert_eq!(heikin_ashi(&scenario()), heikin_ashi(&scenario()));
        assert!(heikin_ashi(&[]).is_empty());
    }
}
