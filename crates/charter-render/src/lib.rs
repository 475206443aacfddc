//! Software rendering for charter.
//!
//! Rasterizes a [`ChartSpec`](charter_compose::ChartSpec) into an RGBA
//! buffer and encodes it as PNG. Rendering uses integer alpha blending and a
//! built-in bitmap font, so the same spec always yields the same bytes.

pub mod canvas;
pub mod encode;
pub mod error;
pub mod font;
pub mod pipeline;
pub mod renderer;

pub use canvas::{Canvas, ClipRect};
pub use encode::{encode_base64, encode_png, PNG_SIGNATURE};
pub use error::RenderError;
pub use pipeline::{
    BandFillPipeline, CandlePipeline, GuidelinePipeline, IndicatorPipeline, Pipeline,
    SignalPipeline,
};
pub use renderer::ChartRenderer;
