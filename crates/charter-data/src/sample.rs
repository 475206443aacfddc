//! Synthetic candle data for demos and benchmarks.

use chrono::{DateTime, Duration, Utc};

use crate::raw::{RawCandle, RawTimestamp};

/// Generate a gently rising hourly series starting at `start`.
///
/// Each candle opens 0.0001 above the previous one, with a 0.0005 upper wick,
/// a 0.0003 lower wick, a close 0.0002 above the open and a volume of 1000.
pub fn sample_candles(count: usize, start: DateTime<Utc>) -> Vec<RawCandle> {
    let base_price = 1.0500;
    (0..count)
        .map(|i| {
            let timestamp = start + Duration::hours(i as i64);
            let open = round5(base_price + i as f64 * 0.0001);
            RawCandle::new(
                RawTimestamp::Text(timestamp.format("%Y-%m-%dT%H:%M:%S").to_string()),
                open,
                round5(open + 0.0005),
                round5(open - 0.0003),
                round5(open + 0.0002),
                Some(1000.0),
            )
        })
        .collect()
}

fn round5(value: f64) -> f64 {
    (value * 100_000.0).round() / 100_000.0
}
