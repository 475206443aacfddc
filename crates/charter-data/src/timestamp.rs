//! Timestamp parsing for raw candle records.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::raw::RawTimestamp;

/// Epoch values above this are milliseconds (13+ digits) rather than seconds.
const MILLIS_THRESHOLD: f64 = 1e12;

/// Naive layouts accepted as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a raw timestamp into a UTC instant.
///
/// Accepts epoch seconds or milliseconds (as numbers or numeric strings),
/// RFC 3339 strings with an offset, naive ISO-8601 date-times (taken as UTC)
/// and bare `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_timestamp(raw: &RawTimestamp) -> Option<DateTime<Utc>> {
    match raw {
        RawTimestamp::Epoch(value) => from_epoch(*value),
        RawTimestamp::Text(text) => parse_text(text.trim()),
    }
}

fn parse_text(text: &str) -> Option<DateTime<Utc>> {
    if text.is_empty() {
        return None;
    }

    // Unix timestamp written as text (e.g. "1325412060.0" in CSV exports)
    if let Ok(value) = text.parse::<f64>() {
        return from_epoch(value);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn from_epoch(value: f64) -> Option<DateTime<Utc>> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    let millis = if value > MILLIS_THRESHOLD {
        value
    } else {
        value * 1000.0
    };
    if millis > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_millis(millis.round() as i64)
}
