//! Background pipeline: grid, axes, tick labels, title and footer.

use charter_compose::{ChartSpec, Layer, LineStyle, Stroke};

use crate::canvas::{Canvas, ClipRect};
use crate::error::RenderError;
use crate::font::{draw_text, text_height, text_width};
use crate::pipeline::traits::Pipeline;

const TITLE_SCALE: i32 = 2;
const LABEL_SCALE: i32 = 1;
/// Length of the tick marks outside the frame.
const TICK_LENGTH: i32 = 4;
/// Gap between the frame and axis labels.
const LABEL_GAP: i32 = 4;
const FOOTER_OPACITY: f32 = 0.6;

/// Pipeline for rendering price guidelines and the chart frame.
pub struct GuidelinePipeline;

impl Pipeline for GuidelinePipeline {
    fn layer(&self) -> Layer {
        Layer::Background
    }

    fn name(&self) -> &'static str {
        "guidelines"
    }

    fn render(&self, canvas: &mut Canvas, spec: &ChartSpec) -> Result<(), RenderError> {
        let plot = spec.camera.plot;
        let palette = &spec.palette;
        let grid = Stroke::new(palette.grid, 1.0, LineStyle::Dashed);

        canvas.set_clip(Some(ClipRect::from_plot(&plot)));
        for tick in &spec.price_ticks {
            canvas.hline(plot.left, plot.right, tick.y, &grid);
        }
        for tick in &spec.time_ticks {
            canvas.stroke_polyline(&[(tick.x, plot.top), (tick.x, plot.bottom)], &grid);
        }
        canvas.set_clip(None);

        let left = plot.left.round() as i32;
        let top = plot.top.round() as i32;
        let right = plot.right.round() as i32;
        let bottom = plot.bottom.round() as i32;

        // Frame
        canvas.fill_rect(left, top, right + 1, top + 1, palette.axis);
        canvas.fill_rect(left, bottom, right + 1, bottom + 1, palette.axis);
        canvas.fill_rect(left, top, left + 1, bottom + 1, palette.axis);
        canvas.fill_rect(right, top, right + 1, bottom + 1, palette.axis);

        // Price axis on the right
        let label_h = text_height(LABEL_SCALE);
        for tick in &spec.price_ticks {
            let y = tick.y.round() as i32;
            canvas.fill_rect(right + 1, y, right + 1 + TICK_LENGTH, y + 1, palette.axis);
            let x = right + 1 + TICK_LENGTH + LABEL_GAP;
            draw_text(canvas, x, y - label_h / 2, &tick.label, LABEL_SCALE, palette.text);
        }

        // Time axis at the bottom
        for tick in &spec.time_ticks {
            let x = tick.x.round() as i32;
            canvas.fill_rect(x, bottom + 1, x + 1, bottom + 1 + TICK_LENGTH, palette.axis);
            let width = text_width(&tick.label, LABEL_SCALE);
            let label_x = (x - width / 2).clamp(0, (spec.width as i32 - width).max(0));
            let label_y = bottom + 1 + TICK_LENGTH + LABEL_GAP;
            draw_text(canvas, label_x, label_y, &tick.label, LABEL_SCALE, palette.text);
        }

        // Title centered above the plot
        let title_w = text_width(&spec.title, TITLE_SCALE);
        let title_x = (spec.width as i32 - title_w) / 2;
        let title_y = (top - text_height(TITLE_SCALE)) / 2;
        draw_text(canvas, title_x, title_y, &spec.title, TITLE_SCALE, palette.text);

        // Footer in the bottom-right corner of the plot
        if let Some(footer) = &spec.footer {
            let x = right - LABEL_GAP - text_width(footer, LABEL_SCALE);
            let y = bottom - LABEL_GAP - label_h;
            let color = palette.text.with_opacity(FOOTER_OPACITY);
            draw_text(canvas, x, y, footer, LABEL_SCALE, color);
        }

        Ok(())
    }
}
