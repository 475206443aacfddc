//! RGBA pixel buffer with integer alpha blending.

use charter_compose::{PlotArea, Stroke};
use charter_core::Rgba;

/// Half-open pixel rectangle `[x0, x1) x [y0, y1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipRect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl ClipRect {
    /// Pixels inside the plot area, frame excluded.
    pub fn from_plot(plot: &PlotArea) -> Self {
        Self {
            x0: plot.left.round() as i32 + 1,
            y0: plot.top.round() as i32 + 1,
            x1: plot.right.round() as i32,
            y1: plot.bottom.round() as i32,
        }
    }
}

/// A row-major image. Every drawing call blends each covered pixel exactly
/// once, so translucent strokes have uniform opacity.
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
    clip: Option<ClipRect>,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![background; width as usize * height as usize],
            clip: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// The buffer as tightly packed RGBA8 bytes.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y as usize * self.width as usize + x as usize).copied()
    }

    /// Restrict drawing to `clip`, or to the whole image with `None`.
    pub fn set_clip(&mut self, clip: Option<ClipRect>) {
        self.clip = clip;
    }

    /// Drawable pixels: the image intersected with the clip rect. May be empty.
    fn bounds(&self) -> ClipRect {
        let image = ClipRect {
            x0: 0,
            y0: 0,
            x1: self.width as i32,
            y1: self.height as i32,
        };
        match self.clip {
            Some(c) => ClipRect {
                x0: image.x0.max(c.x0),
                y0: image.y0.max(c.y0),
                x1: image.x1.min(c.x1),
                y1: image.y1.min(c.y1),
            },
            None => image,
        }
    }

    fn visible(&self, x: i32, y: i32) -> bool {
        let b = self.bounds();
        x >= b.x0 && x < b.x1 && y >= b.y0 && y < b.y1
    }

    /// Source-over blend of `color` onto one pixel.
    pub fn blend(&mut self, x: i32, y: i32, color: Rgba) {
        if !self.visible(x, y) {
            return;
        }
        let index = y as usize * self.width as usize + x as usize;
        self.pixels[index] = blend_over(self.pixels[index], color);
    }

    /// Fill the half-open pixel rectangle `[x0, x1) x [y0, y1)`.
    ///
    /// Only the part inside the drawable bounds is visited.
    pub fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba) {
        let b = self.bounds();
        for y in y0.max(b.y0)..y1.min(b.y1) {
            for x in x0.max(b.x0)..x1.min(b.x1) {
                let index = y as usize * self.width as usize + x as usize;
                self.pixels[index] = blend_over(self.pixels[index], color);
            }
        }
    }

    /// Horizontal line centered on row `y` with the stroke's thickness and dashes.
    pub fn hline(&mut self, x0: f64, x1: f64, y: f64, stroke: &Stroke) {
        self.stroke_polyline(&[(x0, y), (x1, y)], stroke);
    }

    /// Stroke a polyline through pixel-space `points`.
    ///
    /// Segments are clipped to the drawable bounds before stepping, so points
    /// far outside the image cost nothing. Coverage is collected in a mask
    /// first and blended once, so joins and overlapping stamps do not darken
    /// translucent lines. Dashes are measured along the unclipped polyline.
    pub fn stroke_polyline(&mut self, points: &[(f64, f64)], stroke: &Stroke) {
        let bounds = self.bounds();
        if points.is_empty() || bounds.x0 >= bounds.x1 || bounds.y0 >= bounds.y1 {
            return;
        }
        let thickness = stroke.width.round().clamp(1.0, MAX_STROKE_WIDTH) as i32;
        let pattern = stroke.style.pattern();
        let scale = thickness as u32;

        let pad = thickness as f64;
        let window = Window {
            x_min: bounds.x0 as f64 - pad,
            y_min: bounds.y0 as f64 - pad,
            x_max: bounds.x1 as f64 + pad,
            y_max: bounds.y1 as f64 + pad,
        };

        let mut pieces: Vec<Piece> = Vec::new();
        if let [(x, y)] = points {
            if window.contains(*x, *y) {
                pieces.push(Piece {
                    from: (*x, *y),
                    to: (*x, *y),
                    start: 0.0,
                    length: 0.0,
                });
            }
        }
        let mut travelled = 0.0;
        for segment in points.windows(2) {
            let (a, b) = (segment[0], segment[1]);
            let (dx, dy) = (b.0 - a.0, b.1 - a.1);
            let length = dx.hypot(dy);
            if !(a.0.is_finite() && a.1.is_finite() && length.is_finite()) {
                continue;
            }
            if let Some((t0, t1)) = window.clip_segment(a, (dx, dy)) {
                pieces.push(Piece {
                    from: (a.0 + t0 * dx, a.1 + t0 * dy),
                    to: (a.0 + t1 * dx, a.1 + t1 * dy),
                    start: travelled + t0 * length,
                    length: (t1 - t0) * length,
                });
            }
            travelled += length;
        }
        if pieces.is_empty() {
            return;
        }

        // Pieces lie within the padded window, so these casts are bounded
        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for piece in &pieces {
            for (x, y) in [piece.from, piece.to] {
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
            }
        }
        let ox = (min_x.floor() as i32 - thickness).max(bounds.x0);
        let oy = (min_y.floor() as i32 - thickness).max(bounds.y0);
        let mask_w = (max_x.ceil() as i32 + thickness + 1).min(bounds.x1) - ox;
        let mask_h = (max_y.ceil() as i32 + thickness + 1).min(bounds.y1) - oy;
        if mask_w <= 0 || mask_h <= 0 {
            return;
        }
        let mut mask = vec![false; mask_w as usize * mask_h as usize];

        let mut stamp = |cx: f64, cy: f64| {
            let sx = cx.round() as i32 - thickness / 2 - ox;
            let sy = cy.round() as i32 - thickness / 2 - oy;
            for dy in 0..thickness {
                for dx in 0..thickness {
                    let (mx, my) = (sx + dx, sy + dy);
                    if mx >= 0 && my >= 0 && mx < mask_w && my < mask_h {
                        mask[(my * mask_w + mx) as usize] = true;
                    }
                }
            }
        };

        for piece in &pieces {
            let (dx, dy) = (piece.to.0 - piece.from.0, piece.to.1 - piece.from.1);
            let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
            for s in 0..=steps {
                let t = s as f64 / steps as f64;
                if dash_on(pattern, scale, piece.start + t * piece.length) {
                    stamp(piece.from.0 + t * dx, piece.from.1 + t * dy);
                }
            }
        }

        for my in 0..mask_h {
            for mx in 0..mask_w {
                if mask[(my * mask_w + mx) as usize] {
                    let index = (oy + my) as usize * self.width as usize + (ox + mx) as usize;
                    self.pixels[index] = blend_over(self.pixels[index], stroke.color);
                }
            }
        }
    }
}

/// Round a pixel coordinate, clamped to one pixel beyond `0..=limit`.
///
/// Overlays may map far outside the plot; clamping keeps later integer
/// arithmetic in range without changing what is visible.
pub fn pixel_coord(value: f64, limit: u32) -> i32 {
    if value.is_nan() {
        return -1;
    }
    value.round().clamp(-1.0, limit as f64 + 1.0) as i32
}

/// Widest stroke drawn, in pixels.
const MAX_STROKE_WIDTH: f64 = 64.0;

/// Part of a polyline segment that survived clipping.
struct Piece {
    from: (f64, f64),
    to: (f64, f64),
    /// Distance along the whole polyline where this piece begins.
    start: f64,
    length: f64,
}

/// Axis-aligned clipping window in pixel space.
struct Window {
    x_min: f64,
    y_min: f64,
    x_max: f64,
    y_max: f64,
}

impl Window {
    fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }

    /// Liang-Barsky: the parameter range `[t0, t1]` of `a + t * d` inside the
    /// window, or `None` when the segment misses it.
    fn clip_segment(&self, a: (f64, f64), d: (f64, f64)) -> Option<(f64, f64)> {
        let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
        let edges = [
            (-d.0, a.0 - self.x_min),
            (d.0, self.x_max - a.0),
            (-d.1, a.1 - self.y_min),
            (d.1, self.y_max - a.1),
        ];
        for (p, q) in edges {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }
        Some((t0, t1))
    }
}

/// Whether distance `dist` along a line falls in an "on" run of `pattern`.
fn dash_on(pattern: &[u32], scale: u32, dist: f64) -> bool {
    let period: u32 = pattern.iter().sum::<u32>() * scale;
    if period == 0 {
        return true;
    }
    let mut offset = dist.max(0.0).round() as u64 % period as u64;
    for (i, run) in pattern.iter().enumerate() {
        let run = (*run * scale) as u64;
        if offset < run {
            return i % 2 == 0;
        }
        offset -= run;
    }
    true
}

fn blend_over(dst: Rgba, src: Rgba) -> Rgba {
    let a = src.a as u32;
    if a == 255 {
        return src;
    }
    if a == 0 {
        return dst;
    }
    let inv = 255 - a;
    let channel = |s: u8, d: u8| ((s as u32 * a + d as u32 * inv + 127) / 255) as u8;
    Rgba {
        r: channel(src.r, dst.r),
        g: channel(src.g, dst.g),
        b: channel(src.b, dst.b),
        a: (a + (dst.a as u32 * inv + 127) / 255) as u8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charter_compose::LineStyle;

    #[test]
    fn test_blend_is_integer_source_over() {
        let out = blend_over(Rgba::WHITE, Rgba::new(0, 0, 0, 128));
        assert_eq!(out, Rgba::rgb(127, 127, 127));
        assert_eq!(blend_over(Rgba::WHITE, Rgba::BLACK), Rgba::BLACK);
        assert_eq!(blend_over(Rgba::WHITE, Rgba::TRANSPARENT), Rgba::WHITE);
    }

    #[test]
    fn test_fill_rect_respects_clip() {
        let mut canvas = Canvas::new(10, 10, Rgba::WHITE);
        canvas.set_clip(Some(ClipRect {
            x0: 2,
            y0: 2,
            x1: 5,
            y1: 5,
        }));
        canvas.fill_rect(0, 0, 10, 10, Rgba::BLACK);

        assert_eq!(canvas.pixel(1, 1), Some(Rgba::WHITE));
        assert_eq!(canvas.pixel(2, 2), Some(Rgba::BLACK));
        assert_eq!(canvas.pixel(4, 4), Some(Rgba::BLACK));
        assert_eq!(canvas.pixel(5, 5), Some(Rgba::WHITE));
        assert_eq!(canvas.pixel(10, 0), None);
    }

    #[test]
    fn test_translucent_line_blends_once() {
        let mut canvas = Canvas::new(40, 10, Rgba::WHITE);
        let stroke = Stroke::new(Rgba::new(0, 0, 0, 128), 3.0, LineStyle::Solid);
        canvas.hline(2.0, 30.0, 5.0, &stroke);

        let grey = Rgba::rgb(127, 127, 127);
        for x in 4..28 {
            for y in 4..7 {
                assert_eq!(canvas.pixel(x, y), Some(grey));
            }
        }
        assert_eq!(canvas.pixel(10, 1), Some(Rgba::WHITE));
    }

    #[test]
    fn test_dashed_line_has_gaps() {
        let mut canvas = Canvas::new(60, 5, Rgba::WHITE);
        let stroke = Stroke::new(Rgba::BLACK, 1.0, LineStyle::Dashed);
        canvas.hline(0.0, 59.0, 2.0, &stroke);

        let row: Vec<bool> = (0..60)
            .map(|x| canvas.pixel(x, 2) == Some(Rgba::BLACK))
            .collect();
        assert!(row[0..7].iter().all(|on| *on));
        assert!(row[7..11].iter().all(|on| !*on));
        assert!(row[11]);
    }

    #[test]
    fn test_far_away_segment_is_clipped() {
        let mut canvas = Canvas::new(50, 40, Rgba::WHITE);
        canvas.set_clip(Some(ClipRect {
            x0: 5,
            y0: 5,
            x1: 45,
            y1: 35,
        }));
        // Enters from billions of rows above and ends inside the clip
        let stroke = Stroke::new(Rgba::BLACK, 2.0, LineStyle::Solid);
        canvas.stroke_polyline(&[(10.0, -3.0e12), (40.0, 20.0)], &stroke);

        assert_eq!(canvas.pixel(40, 20), Some(Rgba::BLACK));
        assert_eq!(canvas.pixel(40, 2), Some(Rgba::WHITE));
        assert_eq!(canvas.pixel(2, 20), Some(Rgba::WHITE));

        // Entirely outside: nothing drawn
        let before = canvas.pixels().to_vec();
        canvas.stroke_polyline(&[(0.0, 1.0e9), (49.0, 2.0e9)], &stroke);
        canvas.stroke_polyline(&[(0.0, f64::MAX), (49.0, -f64::MAX)], &stroke);
        assert_eq!(canvas.pixels(), &before[..]);
    }

    #[test]
    fn test_fill_rect_with_extreme_bounds() {
        let mut canvas = Canvas::new(8, 8, Rgba::WHITE);
        canvas.fill_rect(i32::MIN, -5, i32::MAX, i32::MAX, Rgba::BLACK);
        assert!(canvas.pixels().iter().all(|p| *p == Rgba::BLACK));
    }

    #[test]
    fn test_pixel_coord_clamps() {
        assert_eq!(pixel_coord(3.4, 100), 3);
        assert_eq!(pixel_coord(-7.0e15, 100), -1);
        assert_eq!(pixel_coord(9.0e15, 100), 101);
        assert_eq!(pixel_coord(f64::NAN, 100), -1);
    }

    #[test]
    fn test_bytes_view() {
        let canvas = Canvas::new(2, 1, Rgba::new(1, 2, 3, 4));
        assert_eq!(canvas.as_bytes(), &[1, 2, 3, 4, 1, 2, 3, 4]);
    }
}
