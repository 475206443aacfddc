//! Chart composition for charter.
//!
//! Turns a validated series, its indicators and an optional trade signal into
//! a [`ChartSpec`]: an immutable, renderer-ready description of the chart.
//! Nothing here touches pixels, so layouts can be tested without rendering.

pub mod camera;
pub mod composer;
pub mod error;
pub mod labels;
pub mod layout;
pub mod scale;
pub mod spec;

pub use camera::Camera;
pub use composer::{clean_symbol, ChartComposer, ComposeInput};
pub use error::ComposeError;
pub use labels::resolve_label_positions;
pub use layout::PlotArea;
pub use scale::{guideline_prices, nice_step, PriceRange};
pub use spec::{
    BandFill, ChartSpec, Layer, LineOverlay, LineStyle, OverlayKind, PriceTick, SignalLine,
    Stroke, TimeTick,
};
