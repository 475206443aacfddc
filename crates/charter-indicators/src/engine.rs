//! Indicator engine: computes every overlay a chart needs in one pass.

use charter_core::{OhlcvSeries, StrategyParams};

use crate::bollinger::{BollingerBands, BollingerConfig};
use crate::error::IndicatorError;
use crate::indicator::{Bands, Indicator};
use crate::vwap::{Vwap, VwapAnchor, VwapConfig};

/// Indicator output for one series. Both members span the full series.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSet {
    pub bollinger: Bands,
    pub vwap: Bands,
}

impl IndicatorSet {
    /// False when the series carried no volume and VWAP is absent everywhere.
    pub fn has_vwap(&self) -> bool {
        !self.vwap.is_all_absent()
    }
}

/// Runs the Bollinger and VWAP indicators configured from request parameters.
pub struct IndicatorEngine {
    bollinger: BollingerBands,
    vwap: Vwap,
}

impl IndicatorEngine {
    pub fn new(params: &StrategyParams, anchor: VwapAnchor) -> Self {
        Self {
            bollinger: BollingerBands::new(BollingerConfig::from(params)),
            vwap: Vwap::new(VwapConfig::from_params(params, anchor)),
        }
    }

    pub fn compute(&self, series: &OhlcvSeries) -> Result<IndicatorSet, IndicatorError> {
        let candles = series.candles();
        let bollinger = self.bollinger.calculate(candles)?;
        let vwap = self.vwap.calculate(candles)?;

        log::debug!(
            "Computed {} ({} points) and {} ({} points) over {} candles",
            self.bollinger.name(),
            bollinger.center.present_count(),
            self.vwap.name(),
            vwap.center.present_count(),
            candles.len()
        );

        Ok(IndicatorSet { bollinger, vwap })
    }

    pub fn bollinger(&self) -> &BollingerBands {
        &self.bollinger
    }

    pub fn vwap(&self) -> &Vwap {
        &self.vwap
    }
}
