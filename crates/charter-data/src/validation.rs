//! Validation of incoming OHLCV series.

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

use charter_core::{Candle, OhlcvSeries, StrategyParams};

use crate::raw::RawCandle;
use crate::timestamp::parse_timestamp;

/// Field of a candle record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandleField {
    Timestamp,
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl fmt::Display for CandleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CandleField::Timestamp => "timestamp",
            CandleField::Open => "open",
            CandleField::High => "high",
            CandleField::Low => "low",
            CandleField::Close => "close",
            CandleField::Volume => "volume",
        };
        f.write_str(name)
    }
}

/// What is wrong with a candle's prices.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PriceIssue {
    #[error("{0} is not finite")]
    NonFinite(CandleField),
    #[error("{0} is negative")]
    Negative(CandleField),
    #[error("high {high} is below low {low}")]
    HighBelowLow { high: f64, low: f64 },
}

/// Reasons a request's series is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("candle {index} is missing required field `{field}`")]
    MissingField { index: usize, field: CandleField },
    #[error("candle {index} has an unparseable timestamp `{value}`")]
    InvalidTimestamp { index: usize, value: String },
    #[error("timestamps must be strictly increasing: candle {index} at {current} does not follow {previous}")]
    NonMonotonicTime {
        index: usize,
        previous: DateTime<Utc>,
        current: DateTime<Utc>,
    },
    #[error("series has {len} candles but the Bollinger window needs at least {required}")]
    InsufficientData { len: usize, required: usize },
    #[error("candle {index} has an invalid price: {issue}")]
    InvalidPrice { index: usize, issue: PriceIssue },
    #[error("invalid strategy parameter `{name}`: {reason}")]
    InvalidParams { name: &'static str, reason: String },
}

/// Check strategy parameters are usable.
pub fn validate_params(params: &StrategyParams) -> Result<(), ValidationError> {
    if params.bb_window == 0 {
        return Err(ValidationError::InvalidParams {
            name: "bb_window",
            reason: "must be at least 1".to_string(),
        });
    }
    for (name, value) in [("bb_std", params.bb_std), ("vwap_std", params.vwap_std)] {
        if !value.is_finite() || value <= 0.0 {
            return Err(ValidationError::InvalidParams {
                name,
                reason: format!("must be a finite positive number, got {value}"),
            });
        }
    }
    Ok(())
}

/// Validate a candle has usable prices and volume.
pub fn validate_candle(candle: &Candle) -> Result<(), PriceIssue> {
    let prices = [
        (CandleField::Open, candle.open),
        (CandleField::High, candle.high),
        (CandleField::Low, candle.low),
        (CandleField::Close, candle.close),
        (CandleField::Volume, candle.volume),
    ];
    for (field, value) in prices {
        if !value.is_finite() {
            return Err(PriceIssue::NonFinite(field));
        }
        if value < 0.0 {
            return Err(PriceIssue::Negative(field));
        }
    }
    if candle.high < candle.low {
        return Err(PriceIssue::HighBelowLow {
            high: candle.high,
            low: candle.low,
        });
    }
    Ok(())
}

/// Validate raw records into an immutable series.
///
/// The whole series is rejected on the first problem found; nothing is
/// repaired except a missing volume, which becomes zero.
pub fn validate_series(
    raw: &[RawCandle],
    params: &StrategyParams,
) -> Result<OhlcvSeries, ValidationError> {
    validate_params(params)?;

    if raw.len() < params.bb_window {
        return Err(ValidationError::InsufficientData {
            len: raw.len(),
            required: params.bb_window,
        });
    }

    let mut candles: Vec<Candle> = Vec::with_capacity(raw.len());
    for (index, record) in raw.iter().enumerate() {
        let candle = to_candle(index, record)?;
        validate_candle(&candle).map_err(|issue| ValidationError::InvalidPrice { index, issue })?;

        if let Some(previous) = candles.last() {
            if candle.timestamp <= previous.timestamp {
                return Err(ValidationError::NonMonotonicTime {
                    index,
                    previous: previous.timestamp,
                    current: candle.timestamp,
                });
            }
        }
        candles.push(candle);
    }

    log::debug!("Validated series of {} candles", candles.len());
    Ok(OhlcvSeries::from_validated(candles))
}

fn to_candle(index: usize, record: &RawCandle) -> Result<Candle, ValidationError> {
    let missing = |field| ValidationError::MissingField { index, field };

    let raw_ts = record
        .timestamp
        .as_ref()
        .ok_or(missing(CandleField::Timestamp))?;
    let open = record.open.ok_or(missing(CandleField::Open))?;
    let high = record.high.ok_or(missing(CandleField::High))?;
    let low = record.low.ok_or(missing(CandleField::Low))?;
    let close = record.close.ok_or(missing(CandleField::Close))?;

    let timestamp = parse_timestamp(raw_ts).ok_or_else(|| ValidationError::InvalidTimestamp {
        index,
        value: raw_ts.to_string(),
    })?;

    Ok(Candle::new(
        timestamp,
        open,
        high,
        low,
        close,
        record.volume.unwrap_or(0.0),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::RawTimestamp;

    fn record(minute: i64, close: f64) -> RawCandle {
        RawCandle::new(
            RawTimestamp::Epoch((1_700_000_000 + minute * 60) as f64),
            close,
            close + 0.001,
            close - 0.001,
            close,
            Some(1000.0),
        )
    }

    fn records(len: usize) -> Vec<RawCandle> {
        (0..len).map(|i| record(i as i64, 1.05)).collect()
    }

    #[test]
    fn test_validate_candle_valid() {
        let ts = DateTime::from_timestamp(1000, 0).unwrap();
        let candle = Candle::new(ts, 100.0, 105.0, 95.0, 102.0, 1000.0);
        assert!(validate_candle(&candle).is_ok());
    }

    #[test]
    fn test_validate_candle_high_below_low() {
        let ts = DateTime::from_timestamp(1000, 0).unwrap();
        let candle = Candle::new(ts, 100.0, 90.0, 95.0, 102.0, 1000.0);
        assert!(matches!(
            validate_candle(&candle),
            Err(PriceIssue::HighBelowLow { .. })
        ));
    }

    #[test]
    fn test_validate_candle_zero_price_allowed() {
        let ts = DateTime::from_timestamp(1000, 0).unwrap();
        let candle = Candle::new(ts, 0.0, 0.0, 0.0, 0.0, 0.0);
        assert!(validate_candle(&candle).is_ok());
    }

    #[test]
    fn test_exact_window_length_succeeds() {
        let series = validate_series(&records(20), &StrategyParams::default()).unwrap();
        assert_eq!(series.len(), 20);
    }

    #[test]
    fn test_short_series_rejected() {
        let err = validate_series(&records(19), &StrategyParams::default()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InsufficientData {
                len: 19,
                required: 20
            }
        );
    }

    #[test]
    fn test_empty_series_rejected() {
        let params = StrategyParams {
            bb_window: 1,
            ..Default::default()
        };
        assert!(matches!(
            validate_series(&[], &params),
            Err(ValidationError::InsufficientData { len: 0, .. })
        ));
    }

    #[test]
    fn test_missing_field() {
        let mut data = records(20);
        data[4].close = None;
        assert_eq!(
            validate_series(&data, &StrategyParams::default()).unwrap_err(),
            ValidationError::MissingField {
                index: 4,
                field: CandleField::Close
            }
        );

        let mut data = records(20);
        data[0].timestamp = None;
        assert!(matches!(
            validate_series(&data, &StrategyParams::default()),
            Err(ValidationError::MissingField {
                index: 0,
                field: CandleField::Timestamp
            })
        ));
    }

    #[test]
    fn test_missing_volume_coerced_to_zero() {
        let mut data = records(20);
        data[3].volume = None;
        let series = validate_series(&data, &StrategyParams::default()).unwrap();
        assert_eq!(series.candles()[3].volume, 0.0);
        assert_eq!(series.candles()[4].volume, 1000.0);
    }

    #[test]
    fn test_duplicate_timestamp_rejected() {
        let mut data = records(20);
        data[7] = record(6, 1.05);
        assert!(matches!(
            validate_series(&data, &StrategyParams::default()),
            Err(ValidationError::NonMonotonicTime { index: 7, .. })
        ));
    }

    #[test]
    fn test_out_of_order_rejected() {
        let mut data = records(20);
        data.swap(10, 11);
        assert!(matches!(
            validate_series(&data, &StrategyParams::default()),
            Err(ValidationError::NonMonotonicTime { index: 11, .. })
        ));
    }

    #[test]
    fn test_invalid_prices() {
        let mut data = records(20);
        data[2].high = Some(1.0);
        data[2].low = Some(1.1);
        assert!(matches!(
            validate_series(&data, &StrategyParams::default()),
            Err(ValidationError::InvalidPrice {
                index: 2,
                issue: PriceIssue::HighBelowLow { .. }
            })
        ));

        let mut data = records(20);
        data[5].open = Some(f64::INFINITY);
        assert!(matches!(
            validate_series(&data, &StrategyParams::default()),
            Err(ValidationError::InvalidPrice {
                index: 5,
                issue: PriceIssue::NonFinite(CandleField::Open)
            })
        ));

        let mut data = records(20);
        data[6].low = Some(-1.0);
        assert!(matches!(
            validate_series(&data, &StrategyParams::default()),
            Err(ValidationError::InvalidPrice {
                index: 6,
                issue: PriceIssue::Negative(CandleField::Low)
            })
        ));
    }

    #[test]
    fn test_negative_volume_rejected() {
        let mut data = records(20);
        data[1].volume = Some(-10.0);
        assert!(matches!(
            validate_series(&data, &StrategyParams::default()),
            Err(ValidationError::InvalidPrice {
                index: 1,
                issue: PriceIssue::Negative(CandleField::Volume)
            })
        ));
    }

    #[test]
    fn test_unparseable_timestamp() {
        let mut data = records(20);
        data[3].timestamp = Some(RawTimestamp::Text("not a date".to_string()));
        assert_eq!(
            validate_series(&data, &StrategyParams::default()).unwrap_err(),
            ValidationError::InvalidTimestamp {
                index: 3,
                value: "not a date".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_params() {
        let params = StrategyParams {
            bb_window: 0,
            ..Default::default()
        };
        assert!(matches!(
            validate_series(&records(5), &params),
            Err(ValidationError::InvalidParams { name: "bb_window", .. })
        ));

        let params = StrategyParams {
            vwap_std: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            validate_params(&params),
            Err(ValidationError::InvalidParams { name: "vwap_std", .. })
        ));
    }
}
