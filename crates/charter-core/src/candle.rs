//! Candle data structures for OHLCV data.

use chrono::{DateTime, Utc};

/// OHLCV candle data structure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// A candle closing at or above its open is drawn in the bullish color.
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }

    /// Upper edge of the candle body.
    pub fn body_top(&self) -> f64 {
        self.open.max(self.close)
    }

    /// Lower edge of the candle body.
    pub fn body_bottom(&self) -> f64 {
        self.open.min(self.close)
    }
}

/// Trait for types that provide OHLCV data.
pub trait OHLCV {
    fn open(&self) -> f64;
    fn high(&self) -> f64;
    fn low(&self) -> f64;
    fn close(&self) -> f64;
    fn volume(&self) -> f64;

    /// (High + Low + Close) / 3
    fn typical_price(&self) -> f64 {
        (self.high() + self.low() + self.close()) / 3.0
    }
}

impl OHLCV for Candle {
    fn open(&self) -> f64 {
        self.open
    }

    fn high(&self) -> f64 {
        self.high
    }

    fn low(&self) -> f64 {
        self.low
    }

    fn close(&self) -> f64 {
        self.close
    }

    fn volume(&self) -> f64 {
        self.volume
    }
}
