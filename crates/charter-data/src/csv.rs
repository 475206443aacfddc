//! CSV data loading implementation.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::raw::{RawCandle, RawTimestamp};
use crate::DataSource;

/// Loads candle records from CSV files.
pub struct CsvLoader {
    path: std::path::PathBuf,
}

impl CsvLoader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl DataSource for CsvLoader {
    fn load(&self) -> anyhow::Result<Vec<RawCandle>> {
        load_candles_from_csv(&self.path)
    }
}

/// Load candle records from a CSV file.
pub fn load_candles_from_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<RawCandle>> {
    let file = std::fs::File::open(path.as_ref())?;
    let candles = parse_candles_csv(file)?;
    log::info!(
        "Loaded {} candle records from {}",
        candles.len(),
        path.as_ref().display()
    );
    Ok(candles)
}

/// Parse candle records from CSV text.
///
/// Columns are located by header name (case-insensitive): a column whose name
/// contains `timestamp` or equals `time`/`date`, then `open`, `high`, `low`,
/// `close` and optionally `volume`. When the header names are not found the
/// positional layout `Timestamp,Open,High,Low,Close,Volume` is assumed.
/// Empty cells become missing fields; validation decides what that means.
/// Rows are kept in file order.
pub fn parse_candles_csv<R: Read>(reader: R) -> anyhow::Result<Vec<RawCandle>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let headers_lower: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();

    let ts_col = headers_lower
        .iter()
        .position(|h| h.contains("timestamp") || h == "time" || h == "date")
        .unwrap_or(0);
    let find = |name: &str, default: usize| {
        headers_lower
            .iter()
            .position(|h| h == name)
            .unwrap_or(default)
    };
    let open_col = find("open", 1);
    let high_col = find("high", 2);
    let low_col = find("low", 3);
    let close_col = find("close", 4);
    let volume_col = headers_lower
        .iter()
        .position(|h| h == "volume")
        .or(if headers.len() > 5 { Some(5) } else { None });

    let mut candles = Vec::new();
    for result in reader.records() {
        let record = result?;
        let number = |col: usize| -> anyhow::Result<Option<f64>> {
            match record.get(col) {
                Some(cell) if !cell.is_empty() => Ok(Some(cell.parse()?)),
                _ => Ok(None),
            }
        };

        let timestamp = record
            .get(ts_col)
            .filter(|cell| !cell.is_empty())
            .map(|cell| RawTimestamp::Text(cell.to_string()));

        candles.push(RawCandle {
            timestamp,
            open: number(open_col)?,
            high: number(high_col)?,
            low: number(low_col)?,
            close: number(close_col)?,
            volume: match volume_col {
                Some(col) => number(col)?,
                None => None,
            },
        });
    }

    if let Some(report) = analyze_data_gaps(&candles) {
        log::debug!(
            "CSV interval {}s, {} gaps, {} missing candles",
            report.expected_interval_secs,
            report.gaps,
            report.missing
        );
    }

    Ok(candles)
}

/// Summary of holes in a candle sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GapReport {
    /// Most common spacing between consecutive candles.
    pub expected_interval_secs: i64,
    /// Number of places where spacing exceeds the expected interval.
    pub gaps: usize,
    /// Candles that would fill those gaps.
    pub missing: i64,
}

/// Analyze data for gaps and missing data points.
///
/// Returns `None` when fewer than two timestamps can be parsed.
pub fn analyze_data_gaps(candles: &[RawCandle]) -> Option<GapReport> {
    let timestamps: Vec<i64> = candles
        .iter()
        .filter_map(|c| c.timestamp.as_ref())
        .filter_map(crate::timestamp::parse_timestamp)
        .map(|ts| ts.timestamp())
        .collect();
    if timestamps.len() < 2 {
        return None;
    }

    let mut intervals: HashMap<i64, usize> = HashMap::new();
    for window in timestamps.windows(2) {
        *intervals.entry(window[1] - window[0]).or_insert(0) += 1;
    }

    // Most common interval; ties resolved towards the smaller spacing
    let expected_interval_secs = intervals
        .iter()
        .filter(|(interval, _)| **interval > 0)
        .max_by_key(|(interval, count)| (**count, std::cmp::Reverse(**interval)))
        .map(|(interval, _)| *interval)?;

    let mut gaps = 0;
    let mut missing = 0;
    for window in timestamps.windows(2) {
        let diff = window[1] - window[0];
        if diff > expected_interval_secs {
            gaps += 1;
            missing += diff / expected_interval_secs - 1;
        }
    }

    Some(GapReport {
        expected_interval_secs,
        gaps,
        missing,
    })
}
