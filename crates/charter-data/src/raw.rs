//! Unvalidated candle records as they arrive from a payload or file.

use serde::{Deserialize, Serialize};

/// A timestamp as supplied by the caller: an epoch number or a date string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Epoch(f64),
    Text(String),
}

impl std::fmt::Display for RawTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawTimestamp::Epoch(value) => write!(f, "{value}"),
            RawTimestamp::Text(text) => write!(f, "{text}"),
        }
    }
}

/// One candle before validation. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawCandle {
    pub timestamp: Option<RawTimestamp>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

impl RawCandle {
    /// A fully populated record.
    pub fn new(
        timestamp: RawTimestamp,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: Option<f64>,
    ) -> Self {
        Self {
            timestamp: Some(timestamp),
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close: Some(close),
            volume,
        }
    }
}
