//! Indicator framework for the chart overlays.
//!
//! Every indicator produces [`Bands`]: a center line plus an upper and lower
//! band, aligned index-for-index with the input candles. Positions where an
//! indicator is undefined are absent, never zero.

pub mod bollinger;
pub mod engine;
pub mod error;
pub mod indicator;
pub mod vwap;

pub use bollinger::{BollingerBands, BollingerConfig};
pub use engine::{IndicatorEngine, IndicatorSet};
pub use error::IndicatorError;
pub use indicator::{BandPoint, Bands, Indicator, IndicatorConfig, PriceSource};
pub use vwap::{Vwap, VwapAnchor, VwapConfig};
