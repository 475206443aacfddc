//! Pixel layout of the chart image.

/// Space left of the plot, in pixels.
pub const MARGIN_LEFT: f64 = 20.0;
/// Space right of the plot for the price axis labels.
pub const MARGIN_RIGHT: f64 = 90.0;
/// Space above the plot for the title.
pub const MARGIN_TOP: f64 = 50.0;
/// Space below the plot for the time axis labels.
pub const MARGIN_BOTTOM: f64 = 40.0;

/// The rectangle candles and overlays are drawn into, in image pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PlotArea {
    /// Plot area of an image of the given size with the standard margins.
    pub fn for_image(width: u32, height: u32) -> Self {
        Self {
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            right: (width as f64 - MARGIN_RIGHT).max(MARGIN_LEFT + 1.0),
            bottom: (height as f64 - MARGIN_BOTTOM).max(MARGIN_TOP + 1.0),
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn contains_y(&self, y: f64) -> bool {
        y >= self.top && y <= self.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_image_layout() {
        let plot = PlotArea::for_image(1200, 800);
        assert_eq!(plot.width(), 1090.0);
        assert_eq!(plot.height(), 710.0);
        assert!(plot.contains_y(400.0));
        assert!(!plot.contains_y(10.0));
    }
}
