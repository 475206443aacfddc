//! Signal level lines and their labels.

use charter_compose::{ChartSpec, Layer};
use charter_core::Rgba;

use crate::canvas::{Canvas, ClipRect};
use crate::error::RenderError;
use crate::font::{draw_text, text_height, text_width};
use crate::pipeline::traits::Pipeline;

const LABEL_PADDING: i32 = 3;
/// Gap between a label box and the right edge of the plot.
const LABEL_INSET: i32 = 4;

/// Pipeline for rendering entry, stop loss and take profit levels.
pub struct SignalPipeline;

impl Pipeline for SignalPipeline {
    fn layer(&self) -> Layer {
        Layer::Signals
    }

    fn name(&self) -> &'static str {
        "signals"
    }

    fn render(&self, canvas: &mut Canvas, spec: &ChartSpec) -> Result<(), RenderError> {
        let plot = spec.camera.plot;
        canvas.set_clip(Some(ClipRect::from_plot(&plot)));

        for signal in &spec.signals {
            canvas.hline(plot.left, plot.right, signal.y, &signal.stroke);
        }

        // Labels after all lines so no line crosses a label
        let text_h = text_height(1);
        for signal in &spec.signals {
            let width = text_width(&signal.label, 1);
            let x1 = plot.right.round() as i32 - LABEL_INSET;
            let x0 = x1 - width - 2 * LABEL_PADDING;
            let center = signal.label_y.round() as i32;
            let y0 = center - text_h / 2 - LABEL_PADDING;
            let y1 = y0 + text_h + 2 * LABEL_PADDING;

            let box_color = Rgba {
                a: 255,
                ..signal.stroke.color
            };
            canvas.fill_rect(x0, y0, x1, y1, box_color);
            draw_text(
                canvas,
                x0 + LABEL_PADDING,
                center - text_h / 2,
                &signal.label,
                1,
                Rgba::WHITE,
            );
        }

        canvas.set_clip(None);
        Ok(())
    }
}
