//! Core types for the charter signal renderer.
//!
//! This crate provides the fundamental data structures shared by every stage
//! of the chart pipeline:
//! - `Candle` - OHLCV candle data
//! - `OhlcvSeries` - A validated, immutable candle sequence
//! - `TimeSeries` - Container for indicator output with explicit absent slots
//! - `SignalData` / `StrategyParams` - Per-request trade and indicator settings
//! - `Rgba` - Pixel color shared by the composer and the renderer

pub mod candle;
pub mod color;
pub mod ohlcv;
pub mod series;
pub mod signal;

pub use candle::{Candle, OHLCV};
pub use color::Rgba;
pub use ohlcv::OhlcvSeries;
pub use series::TimeSeries;
pub use signal::{
    SignalData, SignalLevel, SignalType, StrategyParams, DEFAULT_BB_STD, DEFAULT_BB_WINDOW,
    DEFAULT_VWAP_STD,
};
