//! Chart generation service: request in, PNG out.

use chrono::{DateTime, Utc};
use rayon::prelude::*;

use charter_compose::{ChartComposer, ChartSpec, ComposeInput};
use charter_config::Config;
use charter_data::{validate_series, ChartRequest};
use charter_indicators::IndicatorEngine;
use charter_render::{encode_base64, ChartRenderer};

use crate::error::ChartError;
use crate::response::ChartResponse;

/// A rendered chart.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedChart {
    /// PNG file bytes.
    pub png: Vec<u8>,
    pub generated_at: DateTime<Utc>,
}

impl GeneratedChart {
    pub fn to_base64(&self) -> String {
        encode_base64(&self.png)
    }
}

/// Validates requests, computes indicators, composes and renders charts.
///
/// Holds configuration and immutable pipelines only; every request works on
/// its own data, so one service can be shared between threads.
pub struct ChartService {
    config: Config,
    composer: ChartComposer,
    renderer: ChartRenderer,
}

impl ChartService {
    pub fn new(config: Config) -> Result<Self, ChartError> {
        config.validate()?;
        let composer = ChartComposer::new(&config)?;
        Ok(Self {
            config,
            composer,
            renderer: ChartRenderer::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Render `request`, stamping the chart with the current time.
    pub fn generate(&self, request: &ChartRequest) -> Result<GeneratedChart, ChartError> {
        self.generate_at(request, Utc::now())
    }

    /// Render `request` with an explicit generation time. The output depends
    /// only on the request, the configuration and `generated_at`.
    pub fn generate_at(
        &self,
        request: &ChartRequest,
        generated_at: DateTime<Utc>,
    ) -> Result<GeneratedChart, ChartError> {
        log::info!("Generating chart for {}", request.symbol);

        let spec = self.compose_request(request, generated_at)?;
        let png = self.renderer.render_png(&spec)?;

        log::info!(
            "Generated chart for {} ({} bytes)",
            request.symbol,
            png.len()
        );
        Ok(GeneratedChart { png, generated_at })
    }

    /// Validate `request` and build its chart layout without rendering.
    pub fn compose_request(
        &self,
        request: &ChartRequest,
        generated_at: DateTime<Utc>,
    ) -> Result<ChartSpec, ChartError> {
        let params = request.strategy_or(self.config.strategy);
        let series = validate_series(&request.data, &params)?;

        let engine = IndicatorEngine::new(&params, self.config.indicators.vwap_anchor);
        let indicators = engine.compute(&series)?;

        let spec = self.composer.compose(&ComposeInput {
            symbol: &request.symbol,
            series: &series,
            indicators: &indicators,
            signal: request.signal_data.as_ref(),
            generated_at,
        })?;
        Ok(spec)
    }

    /// Render `request` and wrap the outcome in a response envelope.
    pub fn respond(&self, request: &ChartRequest) -> ChartResponse {
        let generated_at = Utc::now();
        match self.generate_at(request, generated_at) {
            Ok(chart) => ChartResponse::success(&chart),
            Err(err) => {
                if err.is_rejection() {
                    log::warn!("Rejected chart request for {}: {}", request.symbol, err);
                } else {
                    log::error!("Error generating chart for {}: {}", request.symbol, err);
                }
                ChartResponse::failure(&err, generated_at)
            }
        }
    }

    /// Render many requests in parallel. Results keep the input order.
    pub fn generate_batch(
        &self,
        requests: &[ChartRequest],
    ) -> Vec<Result<GeneratedChart, ChartError>> {
        let generated_at = Utc::now();
        log::info!("Generating batch of {} charts", requests.len());
        requests
            .par_iter()
            .map(|request| self.generate_at(request, generated_at))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charter_data::sample_candles;
    use chrono::TimeZone;

    fn request(count: usize) -> ChartRequest {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        ChartRequest::new("EURUSD", sample_candles(count, start))
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = Config::default();
        config.style.entry = "blue".to_string();
        assert!(matches!(
            ChartService::new(config),
            Err(ChartError::Config(_))
        ));
    }

    #[test]
    fn test_compose_request_windows_series() {
        let service = ChartService::new(Config::default()).unwrap();
        let at = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let spec = service.compose_request(&request(150), at).unwrap();
        assert_eq!(spec.candles.len(), 100);
        assert_eq!(spec.title, "EURUSD");
    }

    #[test]
    fn test_short_series_is_rejection() {
        let service = ChartService::new(Config::default()).unwrap();
        let err = service.generate(&request(10)).unwrap_err();
        assert!(err.is_rejection());
    }
}
