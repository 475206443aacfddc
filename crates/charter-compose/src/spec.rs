//! The renderer-ready chart description.
//!
//! A [`ChartSpec`] is pure data: everything the renderer needs is resolved
//! here, so two equal specs always rasterize to the same pixels.

use charter_config::Palette;
use charter_core::{Candle, Rgba, SignalLevel, TimeSeries};

use crate::camera::Camera;

/// Draw layers, back to front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    /// Grid, axes, title and footer.
    Background,
    BandFill,
    BandLines,
    Candles,
    Signals,
}

impl Layer {
    pub const ALL: [Layer; 5] = [
        Layer::Background,
        Layer::BandFill,
        Layer::BandLines,
        Layer::Candles,
        Layer::Signals,
    ];
}

/// Dash pattern of a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    DashDot,
}

impl LineStyle {
    /// Alternating on/off run lengths in pixels; empty means solid.
    pub fn pattern(&self) -> &'static [u32] {
        match self {
            LineStyle::Solid => &[],
            LineStyle::Dashed => &[7, 4],
            LineStyle::Dotted => &[2, 3],
            LineStyle::DashDot => &[8, 3, 2, 3],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgba,
    /// Line thickness in pixels.
    pub width: f64,
    pub style: LineStyle,
}

impl Stroke {
    pub fn new(color: Rgba, width: f64, style: LineStyle) -> Self {
        Self {
            color,
            width,
            style,
        }
    }
}

/// Which indicator line an overlay draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    BollingerUpper,
    BollingerMiddle,
    BollingerLower,
    VwapUpper,
    Vwap,
    VwapLower,
}

impl OverlayKind {
    pub fn is_vwap(&self) -> bool {
        matches!(
            self,
            OverlayKind::VwapUpper | OverlayKind::Vwap | OverlayKind::VwapLower
        )
    }
}

/// An indicator line over the visible window, one slot per candle.
#[derive(Debug, Clone, PartialEq)]
pub struct LineOverlay {
    pub kind: OverlayKind,
    pub values: TimeSeries<f64>,
    pub stroke: Stroke,
}

/// Shaded area between two band lines.
#[derive(Debug, Clone, PartialEq)]
pub struct BandFill {
    pub upper: TimeSeries<f64>,
    pub lower: TimeSeries<f64>,
    pub color: Rgba,
}

/// A horizontal signal level with its label.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalLine {
    pub level: SignalLevel,
    pub price: f64,
    /// Pixel row of the line.
    pub y: f64,
    pub stroke: Stroke,
    pub label: String,
    /// Pixel row of the label center after de-collision.
    pub label_y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceTick {
    pub price: f64,
    pub y: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeTick {
    pub slot: usize,
    pub x: f64,
    pub label: String,
}

/// Fully resolved chart layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub width: u32,
    pub height: u32,
    pub camera: Camera,
    pub palette: Palette,
    pub title: String,
    pub footer: Option<String>,
    pub price_ticks: Vec<PriceTick>,
    pub time_ticks: Vec<TimeTick>,
    /// The visible window; slot `i` is `candles[i]`.
    pub candles: Vec<Candle>,
    pub band_fills: Vec<BandFill>,
    pub overlays: Vec<LineOverlay>,
    pub signals: Vec<SignalLine>,
}

impl ChartSpec {
    pub fn has_overlay(&self, kind: OverlayKind) -> bool {
        self.overlays.iter().any(|o| o.kind == kind)
    }

    pub fn has_vwap(&self) -> bool {
        self.overlays.iter().any(|o| o.kind.is_vwap())
    }

    pub fn signal(&self, level: SignalLevel) -> Option<&SignalLine> {
        self.signals.iter().find(|s| s.level == level)
    }

    /// Name of the first non-finite number in the spec, if any.
    pub fn find_non_finite(&self) -> Option<String> {
        let camera = &self.camera;
        if !(camera.price.min.is_finite() && camera.price.max.is_finite()) {
            return Some("price range".to_string());
        }

        for (i, c) in self.candles.iter().enumerate() {
            if ![c.open, c.high, c.low, c.close].iter().all(|v| v.is_finite()) {
                return Some(format!("candle {i}"));
            }
        }
        for overlay in &self.overlays {
            if let Some((i, _)) = overlay.values.iter().find(|(_, v)| !v.is_finite()) {
                return Some(format!("{:?} at slot {i}", overlay.kind));
            }
        }
        for fill in &self.band_fills {
            let bad = fill.upper.iter().chain(fill.lower.iter()).find(|(_, v)| !v.is_finite());
            if let Some((i, _)) = bad {
                return Some(format!("band fill at slot {i}"));
            }
        }
        for signal in &self.signals {
            if !(signal.price.is_finite() && signal.y.is_finite() && signal.label_y.is_finite()) {
                return Some(format!("{} signal", signal.level.label()));
            }
        }
        for tick in &self.price_ticks {
            if !(tick.price.is_finite() && tick.y.is_finite()) {
                return Some("price tick".to_string());
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layers_are_ordered() {
        let mut sorted = Layer::ALL;
        sorted.sort();
        assert_eq!(sorted, Layer::ALL);
        assert!(Layer::Background < Layer::Signals);
    }

    #[test]
    fn test_patterns() {
        assert!(LineStyle::Solid.pattern().is_empty());
        assert_eq!(LineStyle::DashDot.pattern().len(), 4);
    }
}
