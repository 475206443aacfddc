//! Validated candle sequence.

use std::ops::Range;

use crate::candle::Candle;

/// An ordered, immutable sequence of candles.
///
/// Produced by the series validator: timestamps strictly increase, prices are
/// finite and non-negative, `high >= low`, and volume is present (zero when
/// the source omitted it). No mutable access is exposed.
#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvSeries {
    candles: Vec<Candle>,
}

impl OhlcvSeries {
    /// Wraps candles that already satisfy the series invariants.
    pub fn from_validated(candles: Vec<Candle>) -> Self {
        Self { candles }
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn first(&self) -> Option<&Candle> {
        self.candles.first()
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// Sum of all candle volumes.
    pub fn total_volume(&self) -> f64 {
        self.candles.iter().map(|c| c.volume).sum()
    }

    /// Index range of the trailing `count` candles (the whole series when shorter).
    pub fn tail_range(&self, count: usize) -> Range<usize> {
        let len = self.candles.len();
        len.saturating_sub(count)..len
    }
}

impl AsRef<[Candle]> for OhlcvSeries {
    fn as_ref(&self) -> &[Candle] {
        &self.candles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn series(len: usize) -> OhlcvSeries {
        let candles = (0..len)
            .map(|i| {
                let ts = Utc.timestamp_opt(i as i64 * 60, 0).unwrap();
                Candle::new(ts, 1.0, 1.0, 1.0, 1.0, 2.0)
            })
            .collect();
        OhlcvSeries::from_validated(candles)
    }

    #[test]
    fn test_tail_range() {
        assert_eq!(series(150).tail_range(100), 50..150);
        assert_eq!(series(30).tail_range(100), 0..30);
        assert_eq!(series(0).tail_range(100), 0..0);
    }

    #[test]
    fn test_total_volume() {
        assert_eq!(series(5).total_volume(), 10.0);
    }
}
