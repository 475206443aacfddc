//! Chart request payload.

use serde::{Deserialize, Serialize};

use charter_core::{SignalData, StrategyParams};

use crate::raw::RawCandle;

/// A chart generation request as received from the transport layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartRequest {
    /// Trading symbol, used only for the chart title.
    pub symbol: String,
    /// OHLCV records in chronological order.
    pub data: Vec<RawCandle>,
    #[serde(default)]
    pub signal_data: Option<SignalData>,
    #[serde(default)]
    pub strategy_params: Option<StrategyParams>,
}

impl ChartRequest {
    pub fn new(symbol: impl Into<String>, data: Vec<RawCandle>) -> Self {
        Self {
            symbol: symbol.into(),
            data,
            signal_data: None,
            strategy_params: None,
        }
    }

    pub fn with_signal(mut self, signal: SignalData) -> Self {
        self.signal_data = Some(signal);
        self
    }

    pub fn with_strategy(mut self, params: StrategyParams) -> Self {
        self.strategy_params = Some(params);
        self
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Strategy parameters, falling back to the documented defaults.
    pub fn strategy(&self) -> StrategyParams {
        self.strategy_or(StrategyParams::default())
    }

    /// Strategy parameters, falling back to `fallback` when the request has none.
    pub fn strategy_or(&self, fallback: StrategyParams) -> StrategyParams {
        self.strategy_params.unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charter_core::SignalType;

    #[test]
    fn test_minimal_request_uses_defaults() {
        let request = ChartRequest::from_json(
            r#"{"symbol": "GBPUSD", "data": [{"timestamp": "2024-01-01T00:00:00", "open": 1.0, "high": 1.1, "low": 0.9, "close": 1.05}]}"#,
        )
        .unwrap();

        assert_eq!(request.symbol, "GBPUSD");
        assert_eq!(request.data.len(), 1);
        assert!(request.signal_data.is_none());
        assert_eq!(request.strategy(), StrategyParams::default());
    }

    #[test]
    fn test_full_request() {
        let request = ChartRequest::from_json(
            r#"{
                "symbol": "EURUSD",
                "data": [],
                "signal_data": {"entry_price": 1.06, "stop_loss": 1.055, "take_profit": 1.07, "signal_type": "long"},
                "strategy_params": {"bb_window": 10, "bb_std": 1.5, "vwap_std": 1.0}
            }"#,
        )
        .unwrap();

        let signal = request.signal_data.unwrap();
        assert_eq!(signal.signal_type, SignalType::Long);
        assert_eq!(signal.take_profit, 1.07);
        assert_eq!(request.strategy().bb_window, 10);
        assert_eq!(request.strategy().vwap_std, 1.0);

        let fallback = StrategyParams {
            bb_window: 5,
            ..Default::default()
        };
        assert_eq!(request.strategy_or(fallback).bb_window, 10);
    }
}
