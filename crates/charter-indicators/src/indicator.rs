//! Core indicator traits and types.

use std::ops::Range;

use charter_core::{Candle, TimeSeries};

use crate::error::IndicatorError;

/// Trait for indicator configuration.
pub trait IndicatorConfig: Clone + Default {}

/// Which price to use for indicator calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceSource {
    Open,
    High,
    Low,
    #[default]
    Close,
    /// (High + Low) / 2
    HL2,
    /// (High + Low + Close) / 3
    HLC3,
    /// (Open + High + Low + Close) / 4
    OHLC4,
}

impl PriceSource {
    /// Extract the price from a candle based on this source.
    pub fn extract(&self, candle: &Candle) -> f64 {
        match self {
            PriceSource::Open => candle.open,
            PriceSource::High => candle.high,
            PriceSource::Low => candle.low,
            PriceSource::Close => candle.close,
            PriceSource::HL2 => (candle.high + candle.low) / 2.0,
            PriceSource::HLC3 => (candle.high + candle.low + candle.close) / 3.0,
            PriceSource::OHLC4 => (candle.open + candle.high + candle.low + candle.close) / 4.0,
        }
    }
}

/// One resolved point of a band indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandPoint {
    pub center: f64,
    pub upper: f64,
    pub lower: f64,
}

/// Output of a band indicator: a center line with an upper and lower band.
///
/// The three series are parallel and aligned index-for-index with the
/// candles they were computed from. A position is either present in all
/// three or absent in all three.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bands {
    pub center: TimeSeries<f64>,
    pub upper: TimeSeries<f64>,
    pub lower: TimeSeries<f64>,
}

impl Bands {
    /// Bands with `len` absent positions.
    pub fn absent(len: usize) -> Self {
        Self {
            center: TimeSeries::absent(len),
            upper: TimeSeries::absent(len),
            lower: TimeSeries::absent(len),
        }
    }

    /// Build from per-candle points.
    pub fn from_points(points: Vec<Option<BandPoint>>) -> Self {
        Self {
            center: points.iter().map(|p| p.map(|p| p.center)).collect(),
            upper: points.iter().map(|p| p.map(|p| p.upper)).collect(),
            lower: points.iter().map(|p| p.map(|p| p.lower)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.center.len()
    }

    pub fn is_empty(&self) -> bool {
        self.center.is_empty()
    }

    /// True when no position has a value.
    pub fn is_all_absent(&self) -> bool {
        self.center.is_all_absent()
    }

    pub fn get(&self, index: usize) -> Option<BandPoint> {
        Some(BandPoint {
            center: *self.center.get(index)?,
            upper: *self.upper.get(index)?,
            lower: *self.lower.get(index)?,
        })
    }

    /// Positions `range`, re-indexed from zero. Absent positions stay absent.
    pub fn clip(&self, range: Range<usize>) -> Self {
        Self {
            center: self.center.clip(range.clone()),
            upper: self.upper.clip(range.clone()),
            lower: self.lower.clip(range),
        }
    }
}

/// Trait for technical indicators.
pub trait Indicator {
    /// The configuration type for this indicator.
    type Config: IndicatorConfig;

    /// Create a new indicator with the given configuration.
    fn new(config: Self::Config) -> Self;

    /// Calculate the indicator values for the given candles.
    ///
    /// The output has exactly one position per input candle.
    fn calculate(&self, candles: &[Candle]) -> Result<Bands, IndicatorError>;

    /// Minimum number of periods required before the indicator produces valid output.
    fn min_periods(&self) -> usize;

    /// Whether this indicator should be overlaid on the price chart (true)
    /// or displayed in a separate pane (false).
    fn is_overlay(&self) -> bool {
        true
    }

    /// Human-readable name of the indicator.
    fn name(&self) -> &str;
}
