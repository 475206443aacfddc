//! VWAP (Volume Weighted Average Price) with standard deviation bands.

use charter_core::{Candle, StrategyParams, DEFAULT_VWAP_STD};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::IndicatorError;
use crate::indicator::{BandPoint, Bands, Indicator, IndicatorConfig, PriceSource};

/// Where the cumulative VWAP sums restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VwapAnchor {
    /// Accumulate from the first candle of the series.
    #[default]
    Series,
    /// Restart whenever the UTC calendar date changes.
    Daily,
}

/// VWAP configuration.
#[derive(Debug, Clone)]
pub struct VwapConfig {
    /// Band width in volume-weighted standard deviations (default: 2.0).
    pub num_std: f64,
    pub anchor: VwapAnchor,
    /// Price source for calculation (typical price by default).
    pub price_source: PriceSource,
}

impl Default for VwapConfig {
    fn default() -> Self {
        Self {
            num_std: DEFAULT_VWAP_STD,
            anchor: VwapAnchor::Series,
            price_source: PriceSource::HLC3,
        }
    }
}

impl IndicatorConfig for VwapConfig {}

impl VwapConfig {
    pub fn from_params(params: &StrategyParams, anchor: VwapAnchor) -> Self {
        Self {
            num_std: params.vwap_std,
            anchor,
            ..Default::default()
        }
    }
}

/// Cumulative sums of one anchor session, relative to its first price.
#[derive(Default)]
struct Session {
    day: Option<NaiveDate>,
    shift: f64,
    volume: f64,
    weighted: f64,
    weighted_sq: f64,
}

impl Session {
    fn reset(&mut self, day: NaiveDate, shift: f64) {
        *self = Session {
            day: Some(day),
            shift,
            ..Default::default()
        };
    }
}

/// Volume-weighted average of typical price with bands at `num_std`
/// volume-weighted standard deviations.
pub struct Vwap {
    config: VwapConfig,
}

impl Indicator for Vwap {
    type Config = VwapConfig;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    fn calculate(&self, candles: &[Candle]) -> Result<Bands, IndicatorError> {
        if !self.config.num_std.is_finite() || self.config.num_std < 0.0 {
            return Err(IndicatorError::InvalidConfig {
                indicator: "VWAP",
                reason: format!("num_std {} must be positive", self.config.num_std),
            });
        }

        // No traded volume anywhere: the whole overlay is absent
        if candles.iter().all(|c| c.volume <= 0.0) {
            return Ok(Bands::absent(candles.len()));
        }

        let mut session = Session::default();
        let mut points = Vec::with_capacity(candles.len());

        for (i, candle) in candles.iter().enumerate() {
            let price = self.config.price_source.extract(candle);
            let day = candle.timestamp.date_naive();

            let restart = match self.config.anchor {
                VwapAnchor::Series => session.day.is_none(),
                VwapAnchor::Daily => session.day != Some(day),
            };
            if restart {
                session.reset(day, price);
            }

            let d = price - session.shift;
            session.volume += candle.volume;
            session.weighted += candle.volume * d;
            session.weighted_sq += candle.volume * d * d;

            if session.volume <= 0.0 {
                points.push(None);
                continue;
            }

            let mean_d = session.weighted / session.volume;
            let variance = (session.weighted_sq / session.volume - mean_d * mean_d).max(0.0);
            let vwap = session.shift + mean_d;
            let width = self.config.num_std * variance.sqrt();

            let point = BandPoint {
                center: vwap,
                upper: vwap + width,
                lower: vwap - width,
            };
            if !(point.center.is_finite() && point.upper.is_finite() && point.lower.is_finite()) {
                return Err(IndicatorError::NonFinite {
                    indicator: "VWAP",
                    index: i,
                });
            }
            points.push(Some(point));
        }

        Ok(Bands::from_points(points))
    }

    fn min_periods(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        "VWAP"
    }
}

impl Vwap {
    /// Get the configuration.
    pub fn config(&self) -> &VwapConfig {
        &self.config
    }
}
