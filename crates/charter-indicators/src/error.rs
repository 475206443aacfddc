//! Indicator error types.

use thiserror::Error;

/// Arithmetic failures that are not normalized to an absent value.
///
/// These indicate an upstream contract violation and are treated as internal
/// errors by callers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    #[error("{indicator} produced a non-finite value at candle {index}")]
    NonFinite { indicator: &'static str, index: usize },
    #[error("invalid {indicator} configuration: {reason}")]
    InvalidConfig {
        indicator: &'static str,
        reason: String,
    },
}
