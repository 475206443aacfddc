//! JSON response envelope returned to chart requesters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ChartError;
use crate::service::GeneratedChart;

/// Outcome of one chart request.
///
/// `generated_at` serializes as an RFC 3339 timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_base64: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub generated_at: DateTime<Utc>,
}

impl ChartResponse {
    pub fn success(chart: &GeneratedChart) -> Self {
        Self {
            success: true,
            chart_base64: Some(chart.to_base64()),
            error: None,
            generated_at: chart.generated_at,
        }
    }

    /// A failed response carrying only the public part of `error`.
    pub fn failure(error: &ChartError, generated_at: DateTime<Utc>) -> Self {
        Self {
            success: false,
            chart_base64: None,
            error: Some(error.public_message()),
            generated_at,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charter_indicators::IndicatorError;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn test_success_json() {
        let chart = GeneratedChart {
            png: b"chart".to_vec(),
            generated_at: at(),
        };
        let json = ChartResponse::success(&chart).to_json().unwrap();
        assert_eq!(
            json,
            r#"{"success":true,"chart_base64":"Y2hhcnQ=","generated_at":"2024-01-02T03:04:05Z"}"#
        );
    }

    #[test]
    fn test_failure_hides_internal_error() {
        let err = ChartError::from(IndicatorError::NonFinite {
            indicator: "Bollinger Bands",
            index: 0,
        });
        let response = ChartResponse::failure(&err, at());
        assert!(!response.success);
        assert!(response.chart_base64.is_none());
        assert_eq!(response.error.as_deref(), Some("Failed to generate chart"));

        let parsed: ChartResponse = serde_json::from_str(&response.to_json().unwrap()).unwrap();
        assert_eq!(parsed, response);
    }
}
