//! Shaded area between band lines.

use charter_compose::{BandFill, Camera, ChartSpec, Layer};

use crate::canvas::{pixel_coord, Canvas, ClipRect};
use crate::error::RenderError;
use crate::pipeline::traits::Pipeline;

/// Pipeline for filling the area between an upper and lower band.
pub struct BandFillPipeline;

impl Pipeline for BandFillPipeline {
    fn layer(&self) -> Layer {
        Layer::BandFill
    }

    fn name(&self) -> &'static str {
        "band_fill"
    }

    fn render(&self, canvas: &mut Canvas, spec: &ChartSpec) -> Result<(), RenderError> {
        canvas.set_clip(Some(ClipRect::from_plot(&spec.camera.plot)));
        for fill in &spec.band_fills {
            fill_band(canvas, &spec.camera, fill, spec.height);
        }
        canvas.set_clip(None);
        Ok(())
    }
}

fn fill_band(canvas: &mut Canvas, camera: &Camera, fill: &BandFill, height: u32) {
    let point = |slot: usize| -> Option<(f64, f64)> {
        Some((*fill.upper.get(slot)?, *fill.lower.get(slot)?))
    };

    for slot in 0..fill.upper.len().saturating_sub(1) {
        let (Some((u0, l0)), Some((u1, l1))) = (point(slot), point(slot + 1)) else {
            continue;
        };
        let x0 = camera.slot_x(slot);
        let x1 = camera.slot_x(slot + 1);

        // One column at a time so every pixel is blended once
        for px in x0.round() as i32..x1.round() as i32 {
            let t = ((px as f64 + 0.5 - x0) / (x1 - x0)).clamp(0.0, 1.0);
            let upper = u0 + (u1 - u0) * t;
            let lower = l0 + (l1 - l0) * t;
            let top = pixel_coord(camera.price_y(upper.max(lower)), height);
            let bottom = pixel_coord(camera.price_y(upper.min(lower)), height);
            canvas.fill_rect(px, top, px + 1, bottom + 1, fill.color);
        }
    }
}
