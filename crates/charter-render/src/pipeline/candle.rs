//! Candle rendering pipeline.

use charter_compose::{ChartSpec, Layer};

use crate::canvas::{pixel_coord, Canvas, ClipRect};
use crate::error::RenderError;
use crate::pipeline::traits::Pipeline;

/// Wick width as a fraction of the slot width.
const WICK_RATIO: f64 = 0.08;

/// Pipeline for rendering candlestick charts.
pub struct CandlePipeline;

impl Pipeline for CandlePipeline {
    fn layer(&self) -> Layer {
        Layer::Candles
    }

    fn name(&self) -> &'static str {
        "candles"
    }

    fn render(&self, canvas: &mut Canvas, spec: &ChartSpec) -> Result<(), RenderError> {
        let camera = &spec.camera;
        let body_half = camera.body_width() / 2.0;
        let wick_width = (camera.slot_width() * WICK_RATIO).round().max(1.0) as i32;

        let height = spec.height;
        let y_of = |price: f64| pixel_coord(camera.price_y(price), height);

        canvas.set_clip(Some(ClipRect::from_plot(&camera.plot)));
        for (slot, candle) in spec.candles.iter().enumerate() {
            let color = if candle.is_bullish() {
                spec.palette.bullish
            } else {
                spec.palette.bearish
            };
            let x = camera.slot_x(slot);

            let bx0 = (x - body_half).round() as i32;
            let bx1 = ((x + body_half).round() as i32).max(bx0 + 1);
            let by0 = y_of(candle.body_top());
            let by1 = y_of(candle.body_bottom()).max(by0 + 1);
            canvas.fill_rect(bx0, by0, bx1, by1, color);

            // Wicks above and below the body, never overlapping it
            let wx0 = x.round() as i32 - wick_width / 2;
            let wx1 = wx0 + wick_width;
            let high_y = y_of(candle.high);
            let low_y = y_of(candle.low);
            canvas.fill_rect(wx0, high_y, wx1, by0, color);
            canvas.fill_rect(wx0, by1, wx1, low_y + 1, color);
        }
        canvas.set_clip(None);
        Ok(())
    }
}
