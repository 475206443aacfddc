//! Trade signal and strategy parameter types carried by a chart request.

use serde::{Deserialize, Serialize};

/// Default Bollinger Bands window.
pub const DEFAULT_BB_WINDOW: usize = 20;
/// Default Bollinger Bands standard deviation multiplier.
pub const DEFAULT_BB_STD: f64 = 2.0;
/// Default VWAP band standard deviation multiplier.
pub const DEFAULT_VWAP_STD: f64 = 2.0;

/// Direction of a proposed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalType {
    #[serde(alias = "Long", alias = "LONG")]
    Long,
    #[serde(alias = "Short", alias = "SHORT")]
    Short,
}

impl SignalType {
    /// Upper-case label used in chart titles.
    pub fn label(&self) -> &'static str {
        match self {
            SignalType::Long => "LONG",
            SignalType::Short => "SHORT",
        }
    }
}

/// A proposed trade: entry, stop loss and take profit levels.
///
/// No ordering between the three prices is enforced; a long signal with its
/// stop above entry is drawn as given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalData {
    pub entry_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub signal_type: SignalType,
}

impl SignalData {
    /// The three price levels in fixed level order.
    pub fn levels(&self) -> [(SignalLevel, f64); 3] {
        [
            (SignalLevel::Entry, self.entry_price),
            (SignalLevel::StopLoss, self.stop_loss),
            (SignalLevel::TakeProfit, self.take_profit),
        ]
    }
}

/// One of the price levels of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SignalLevel {
    Entry,
    StopLoss,
    TakeProfit,
}

impl SignalLevel {
    /// Short label drawn next to the level line.
    pub fn label(&self) -> &'static str {
        match self {
            SignalLevel::Entry => "ENTRY",
            SignalLevel::StopLoss => "SL",
            SignalLevel::TakeProfit => "TP",
        }
    }
}

/// Indicator parameters supplied with a request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyParams {
    /// Bollinger Bands window (number of candles).
    pub bb_window: usize,
    /// Bollinger Bands standard deviation multiplier.
    pub bb_std: f64,
    /// VWAP band standard deviation multiplier.
    pub vwap_std: f64,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            bb_window: DEFAULT_BB_WINDOW,
            bb_std: DEFAULT_BB_STD,
            vwap_std: DEFAULT_VWAP_STD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_type_accepts_case_variants() {
        for raw in ["\"long\"", "\"Long\"", "\"LONG\""] {
            let parsed: SignalType = serde_json::from_str(raw).unwrap();
            assert_eq!(parsed, SignalType::Long);
        }
        let parsed: SignalType = serde_json::from_str("\"SHORT\"").unwrap();
        assert_eq!(parsed, SignalType::Short);
        assert!(serde_json::from_str::<SignalType>("\"flat\"").is_err());
    }

    #[test]
    fn test_strategy_params_partial_defaults() {
        let params: StrategyParams = serde_json::from_str(r#"{"bb_window": 14}"#).unwrap();
        assert_eq!(params.bb_window, 14);
        assert_eq!(params.bb_std, DEFAULT_BB_STD);
        assert_eq!(params.vwap_std, DEFAULT_VWAP_STD);
    }

    #[test]
    fn test_levels_order() {
        let signal = SignalData {
            entry_price: 1.0,
            stop_loss: 0.9,
            take_profit: 1.2,
            signal_type: SignalType::Long,
        };
        let levels: Vec<_> = signal.levels().iter().map(|(l, _)| *l).collect();
        assert_eq!(
            levels,
            vec![SignalLevel::Entry, SignalLevel::StopLoss, SignalLevel::TakeProfit]
        );
    }
}
