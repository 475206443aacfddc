//! Bollinger Bands indicator.

use charter_core::{Candle, StrategyParams, DEFAULT_BB_STD, DEFAULT_BB_WINDOW};

use crate::error::IndicatorError;
use crate::indicator::{BandPoint, Bands, Indicator, IndicatorConfig, PriceSource};

/// Bollinger Bands configuration.
#[derive(Debug, Clone)]
pub struct BollingerConfig {
    /// Rolling window length (default: 20).
    pub window: usize,
    /// Band width in population standard deviations (default: 2.0).
    pub num_std: f64,
    /// Price source for calculation.
    pub price_source: PriceSource,
}

impl Default for BollingerConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_BB_WINDOW,
            num_std: DEFAULT_BB_STD,
            price_source: PriceSource::Close,
        }
    }
}

impl IndicatorConfig for BollingerConfig {}

impl From<&StrategyParams> for BollingerConfig {
    fn from(params: &StrategyParams) -> Self {
        Self {
            window: params.bb_window,
            num_std: params.bb_std,
            ..Default::default()
        }
    }
}

/// Bollinger Bands: rolling mean of closes with bands at `num_std` population
/// standard deviations.
pub struct BollingerBands {
    config: BollingerConfig,
}

impl Indicator for BollingerBands {
    type Config = BollingerConfig;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    fn calculate(&self, candles: &[Candle]) -> Result<Bands, IndicatorError> {
        let window = self.config.window;
        if window == 0 || !self.config.num_std.is_finite() || self.config.num_std < 0.0 {
            return Err(IndicatorError::InvalidConfig {
                indicator: "Bollinger Bands",
                reason: format!(
                    "window {} and num_std {} must be positive",
                    window, self.config.num_std
                ),
            });
        }

        let prices: Vec<f64> = candles
            .iter()
            .map(|c| self.config.price_source.extract(c))
            .collect();

        let mut points: Vec<Option<BandPoint>> = Vec::with_capacity(prices.len());
        for i in 0..prices.len() {
            if i + 1 < window {
                points.push(None);
                continue;
            }

            let (mean, std) = window_stats(&prices[i + 1 - window..=i]);
            let point = BandPoint {
                center: mean,
                upper: mean + self.config.num_std * std,
                lower: mean - self.config.num_std * std,
            };
            if !(point.center.is_finite() && point.upper.is_finite() && point.lower.is_finite()) {
                return Err(IndicatorError::NonFinite {
                    indicator: "Bollinger Bands",
                    index: i,
                });
            }
            points.push(Some(point));
        }

        Ok(Bands::from_points(points))
    }

    fn min_periods(&self) -> usize {
        self.config.window
    }

    fn name(&self) -> &str {
        "Bollinger Bands"
    }
}

impl BollingerBands {
    /// Get the configuration.
    pub fn config(&self) -> &BollingerConfig {
        &self.config
    }
}

/// Mean and population standard deviation of a non-empty window.
///
/// Sums are taken relative to the first value so a constant window yields
/// its value exactly and a deviation of exactly zero.
fn window_stats(values: &[f64]) -> (f64, f64) {
    let shift = values[0];
    let n = values.len() as f64;

    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    for &value in values {
        let d = value - shift;
        sum += d;
        sum_sq += d * d;
    }

    let mean_d = sum / n;
    let variance = (sum_sq / n - mean_d * mean_d).max(0.0);
    (shift + mean_d, variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn make_candles(closes: &[f64]) -> Vec<Candle> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let ts = DateTime::from_timestamp(1_700_000_000 + i as i64 * 3600, 0).unwrap();
                Candle::new(ts, close, close + 0.0005, close - 0.0003, close, 1000.0)
            })
            .collect()
    }

    #[test]
    fn test_constant_series_has_zero_width() {
        let candles = make_candles(&[1.05; 20]);
        let bands = BollingerBands::new(BollingerConfig::default())
            .calculate(&candles)
            .unwrap();

        assert_eq!(bands.len(), 20);
        for i in 0..19 {
            assert_eq!(bands.get(i), None);
        }
        let last = bands.get(19).unwrap();
        assert_eq!(last.center, 1.05);
        assert_eq!(last.upper, 1.05);
        assert_eq!(last.lower, 1.05);
    }

    #[test]
    fn test_exact_window_has_single_point() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let bands = BollingerBands::new(BollingerConfig::default())
            .calculate(&make_candles(&closes))
            .unwrap();
        assert_eq!(bands.center.present_count(), 1);
        assert_eq!(bands.center.first_present_index(), Some(19));
    }

    #[test]
    fn test_center_is_window_mean() {
        let closes: Vec<f64> = (0..60)
            .map(|i| 1.1 + ((i * 7919) % 97) as f64 * 0.0001)
            .collect();
        let bands = BollingerBands::new(BollingerConfig::default())
            .calculate(&make_candles(&closes))
            .unwrap();

        for (i, center) in bands.center.iter() {
            let window = &closes[i + 1 - 20..=i];
            let mean = window.iter().sum::<f64>() / 20.0;
            assert!((center - mean).abs() < 1e-12);

            let point = bands.get(i).unwrap();
            assert!(point.lower <= point.center && point.center <= point.upper);
            assert!(((point.upper - point.center) - (point.center - point.lower)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_population_std() {
        // Population std of [2, 4, 4, 4, 5, 5, 7, 9] is exactly 2
        let candles = make_candles(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        let config = BollingerConfig {
            window: 8,
            num_std: 2.0,
            ..Default::default()
        };
        let point = BollingerBands::new(config)
            .calculate(&candles)
            .unwrap()
            .get(7)
            .unwrap();
        assert!((point.center - 5.0).abs() < 1e-12);
        assert!((point.upper - 9.0).abs() < 1e-12);
        assert!((point.lower - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_window_longer_than_series() {
        let bands = BollingerBands::new(BollingerConfig::default())
            .calculate(&make_candles(&[1.0; 5]))
            .unwrap();
        assert_eq!(bands.len(), 5);
        assert!(bands.is_all_absent());
    }

    #[test]
    fn test_invalid_config() {
        let config = BollingerConfig {
            window: 0,
            ..Default::default()
        };
        assert!(matches!(
            BollingerBands::new(config).calculate(&make_candles(&[1.0])),
            Err(IndicatorError::InvalidConfig { .. })
        ));
    }
}
