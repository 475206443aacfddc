//! Camera mapping chart coordinates onto the plot area.
//!
//! X is measured in candle slots: candle `i` of the visible window occupies
//! slot `i`, so gaps in time do not leave holes. Y is price, increasing
//! upwards.

use crate::layout::PlotArea;
use crate::scale::PriceRange;

/// Fraction of a slot occupied by a candle body.
pub const BODY_WIDTH_RATIO: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub plot: PlotArea,
    /// Number of candle slots across the plot.
    pub slots: usize,
    pub price: PriceRange,
}

impl Camera {
    pub fn new(plot: PlotArea, slots: usize, price: PriceRange) -> Self {
        Self {
            plot,
            slots: slots.max(1),
            price,
        }
    }

    /// Width of one candle slot in pixels.
    pub fn slot_width(&self) -> f64 {
        self.plot.width() / self.slots as f64
    }

    /// Pixel x of the center of slot `slot`.
    pub fn slot_x(&self, slot: usize) -> f64 {
        self.plot.left + (slot as f64 + 0.5) * self.slot_width()
    }

    /// Pixel y of `price`.
    pub fn price_y(&self, price: f64) -> f64 {
        let t = (price - self.price.min) / self.price.span();
        self.plot.bottom - t * self.plot.height()
    }

    /// Price at pixel row `y`.
    pub fn y_price(&self, y: f64) -> f64 {
        let t = (self.plot.bottom - y) / self.plot.height();
        self.price.min + t * self.price.span()
    }

    /// Get visible X range in pixels.
    pub fn visible_x_range(&self) -> (f64, f64) {
        (self.plot.left, self.plot.right)
    }

    /// Get visible Y range in prices.
    pub fn visible_y_range(&self) -> (f64, f64) {
        (self.price.min, self.price.max)
    }

    /// Candle body width in pixels, at least one.
    pub fn body_width(&self) -> f64 {
        (self.slot_width() * BODY_WIDTH_RATIO).max(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(
            PlotArea {
                left: 0.0,
                top: 0.0,
                right: 100.0,
                bottom: 200.0,
            },
            10,
            PriceRange::new(1.0, 2.0),
        )
    }

    #[test]
    fn test_slots() {
        let camera = camera();
        assert_eq!(camera.slot_width(), 10.0);
        assert_eq!(camera.slot_x(0), 5.0);
        assert_eq!(camera.slot_x(9), 95.0);
        assert_eq!(camera.body_width(), 6.0);
    }

    #[test]
    fn test_price_mapping_is_invertible() {
        let camera = camera();
        assert_eq!(camera.price_y(1.0), 200.0);
        assert_eq!(camera.price_y(2.0), 0.0);
        assert_eq!(camera.price_y(1.5), 100.0);
        assert!((camera.y_price(camera.price_y(1.25)) - 1.25).abs() < 1e-12);
    }
}
