//! Chart renderer coordination.

use charter_compose::ChartSpec;

use crate::canvas::Canvas;
use crate::encode::encode_png;
use crate::error::RenderError;
use crate::pipeline::{
    BandFillPipeline, CandlePipeline, GuidelinePipeline, IndicatorPipeline, Pipeline,
    SignalPipeline,
};

/// Coordinates all rendering pipelines.
///
/// Holds only immutable pipelines, so one renderer can serve concurrent
/// requests; each call rasterizes into its own canvas.
pub struct ChartRenderer {
    pipelines: Vec<Box<dyn Pipeline>>,
}

impl ChartRenderer {
    pub fn new() -> Self {
        let mut pipelines: Vec<Box<dyn Pipeline>> = vec![
            Box::new(GuidelinePipeline),
            Box::new(BandFillPipeline),
            Box::new(IndicatorPipeline),
            Box::new(CandlePipeline),
            Box::new(SignalPipeline),
        ];
        // Stable sort keeps registration order within a layer
        pipelines.sort_by_key(|p| p.layer());
        Self { pipelines }
    }

    /// Rasterize `spec` into a fresh canvas.
    pub fn render(&self, spec: &ChartSpec) -> Result<Canvas, RenderError> {
        if spec.width == 0 || spec.height == 0 {
            return Err(RenderError::InvalidSize {
                width: spec.width,
                height: spec.height,
            });
        }
        if let Some(what) = spec.find_non_finite() {
            log::error!("Refusing to render chart '{}': non-finite {}", spec.title, what);
            return Err(RenderError::NonFinite { what });
        }

        let mut canvas = Canvas::new(spec.width, spec.height, spec.palette.background);
        for pipeline in &self.pipelines {
            pipeline.render(&mut canvas, spec)?;
            log::trace!("Rendered {} layer", pipeline.name());
        }
        Ok(canvas)
    }

    /// Rasterize and encode as PNG.
    pub fn render_png(&self, spec: &ChartSpec) -> Result<Vec<u8>, RenderError> {
        let canvas = self.render(spec)?;
        encode_png(&canvas)
    }

    /// Names of the pipelines in draw order.
    pub fn pipeline_names(&self) -> Vec<&'static str> {
        self.pipelines.iter().map(|p| p.name()).collect()
    }
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self::new()
    }
}
