//! Errors surfaced by chart generation.

use thiserror::Error;

use charter_compose::ComposeError;
use charter_config::ConfigError;
use charter_data::ValidationError;
use charter_indicators::IndicatorError;
use charter_render::RenderError;

/// Message returned to callers for any failure that is not their fault.
pub const GENERIC_FAILURE: &str = "Failed to generate chart";

/// Any failure while turning a request into a chart.
#[derive(Debug, Error)]
pub enum ChartError {
    /// The request itself is unusable. Never retried, never partially drawn.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Indicator(#[from] IndicatorError),
    #[error(transparent)]
    Compose(#[from] ComposeError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ChartError {
    /// True when the request was rejected rather than failing internally.
    pub fn is_rejection(&self) -> bool {
        matches!(self, ChartError::Validation(_))
    }

    /// Message safe to return to the requester.
    ///
    /// Rejections explain what is wrong with the input; internal failures
    /// are reported generically and only logged in full.
    pub fn public_message(&self) -> String {
        if self.is_rejection() {
            self.to_string()
        } else {
            GENERIC_FAILURE.to_string()
        }
    }
}
