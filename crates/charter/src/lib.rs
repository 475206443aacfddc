//! Charter: trading signal charts as PNG images.
//!
//! [`ChartService`] ties the pipeline together: a [`ChartRequest`] is
//! validated into a series, indicators are computed over it, the composer
//! lays out a chart and the renderer rasterizes and encodes it.
//!
//! ```no_run
//! use charter::{ChartRequest, ChartService, Config};
//!
//! # fn main() -> anyhow::Result<()> {
//! let service = ChartService::new(Config::load_default())?;
//! let request = ChartRequest::from_json(&std::fs::read_to_string("request.json")?)?;
//! let chart = service.generate(&request)?;
//! std::fs::write("chart.png", &chart.png)?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod response;
pub mod service;

pub use charter_config::Config;
pub use charter_data::ChartRequest;
pub use error::{ChartError, GENERIC_FAILURE};
pub use response::ChartResponse;
pub use service::{ChartService, GeneratedChart};
