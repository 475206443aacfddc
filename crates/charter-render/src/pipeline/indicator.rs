//! Indicator line rendering pipeline.

use charter_compose::{ChartSpec, Layer, LineOverlay};

use crate::canvas::{Canvas, ClipRect};
use crate::error::RenderError;
use crate::pipeline::traits::Pipeline;

/// Pipeline for rendering indicator lines (Bollinger and VWAP bands).
pub struct IndicatorPipeline;

impl Pipeline for IndicatorPipeline {
    fn layer(&self) -> Layer {
        Layer::BandLines
    }

    fn name(&self) -> &'static str {
        "indicators"
    }

    fn render(&self, canvas: &mut Canvas, spec: &ChartSpec) -> Result<(), RenderError> {
        canvas.set_clip(Some(ClipRect::from_plot(&spec.camera.plot)));
        for overlay in &spec.overlays {
            for run in present_runs(overlay) {
                let points: Vec<(f64, f64)> = run
                    .into_iter()
                    .map(|(slot, value)| (spec.camera.slot_x(slot), spec.camera.price_y(value)))
                    .collect();
                canvas.stroke_polyline(&points, &overlay.stroke);
            }
        }
        canvas.set_clip(None);
        Ok(())
    }
}

/// Split an overlay into runs of consecutive present slots. Absent values
/// break the line.
fn present_runs(overlay: &LineOverlay) -> Vec<Vec<(usize, f64)>> {
    let mut runs: Vec<Vec<(usize, f64)>> = Vec::new();
    let mut current: Vec<(usize, f64)> = Vec::new();
    for (slot, value) in overlay.values.values().iter().enumerate() {
        match value {
            Some(v) => current.push((slot, *v)),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}
