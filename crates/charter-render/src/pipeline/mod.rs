//! Render pipeline modules.

pub mod band_fill;
pub mod candle;
pub mod guideline;
pub mod indicator;
pub mod signal;
pub mod traits;

pub use band_fill::BandFillPipeline;
pub use candle::CandlePipeline;
pub use guideline::GuidelinePipeline;
pub use indicator::IndicatorPipeline;
pub use signal::SignalPipeline;
pub use traits::Pipeline;
