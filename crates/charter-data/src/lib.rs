//! Data loading and validation for charter.
//!
//! Raw candles arrive from a request payload, a CSV file or a JSON file with
//! every field optional. [`validate_series`] turns them into an immutable
//! [`charter_core::OhlcvSeries`] or rejects the whole request.

pub mod csv;
pub mod raw;
pub mod request;
pub mod sample;
pub mod source;
pub mod timestamp;
pub mod validation;

pub use self::csv::{load_candles_from_csv, parse_candles_csv, CsvLoader};
pub use raw::{RawCandle, RawTimestamp};
pub use request::ChartRequest;
pub use sample::sample_candles;
pub use source::{DataSource, JsonLoader};
pub use timestamp::parse_timestamp;
pub use validation::{
    validate_candle, validate_params, validate_series, CandleField, PriceIssue, ValidationError,
};
