//! Fixed-size raster canvas.
//!
//! Owns the pixel buffer every turtle command ends up mutating. The canvas
//! never validates draw coordinates: strokes and shapes are clipped to the
//! buffer, and degenerate boxes draw nothing.

use crate::raster;
use image::{Rgba, RgbaImage};
use kurbo::{Line, Point, Rect};
use td_core::{BoundingBox, Color, Error, Position};

/// Largest accepted side, in pixels.
pub const MAX_SIDE: i64 = 16_384;

#[derive(Debug, Clone)]
pub struct Canvas {
    pixels: RgbaImage,
    background: Color,
}

impl Canvas {
    /// Create a canvas filled uniformly with `background`.
    pub fn new(width: i64, height: i64, background: Color) -> Result<Self, Error> {
        let invalid = || Error::InvalidDimension { width, height };
        if width <= 0 || height <= 0 || width > MAX_SIDE || height > MAX_SIDE {
            return Err(invalid());
        }
        let w = u32::try_from(width).map_err(|_| invalid())?;
        let h = u32::try_from(height).map_err(|_| invalid())?;

        log::debug!("canvas {w}x{h}, background {background}");
        Ok(Self {
            pixels: RgbaImage::from_pixel(w, h, Rgba(background.to_rgba())),
            background,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Centre pixel, using integer halving.
    pub fn center(&self) -> Position {
        Position::new(i64::from(self.width() / 2), i64::from(self.height() / 2))
    }

    // ─── Primitives ──────────────────────────────────────────────────────

    /// Stroke a straight segment.
    pub fn draw_line(&mut self, from: Point, to: Point, color: Color, width: u32) {
        log::trace!("line {from:?} -> {to:?} {color} w={width}");
        raster::stroke_line(&mut self.pixels, Line::new(from, to), color, width);
    }

    /// Stroke (and optionally fill) the ellipse inscribed in `bounds`.
    pub fn draw_ellipse(&mut self, bounds: Rect, outline: Color, fill: Option<Color>) {
        if is_degenerate(bounds) {
            log::warn!("ellipse with empty bounds {bounds:?} skipped");
            return;
        }
        log::trace!("ellipse {bounds:?} outline={outline} fill={fill:?}");
        raster::ellipse(&mut self.pixels, bounds, outline, fill);
    }

    /// Stroke (and optionally fill) an axis-aligned rectangle.
    pub fn draw_rectangle(&mut self, bounds: Rect, outline: Color, fill: Option<Color>) {
        if is_degenerate(bounds) {
            log::warn!("rectangle with empty bounds {bounds:?} skipped");
            return;
        }
        log::trace!("rectangle {bounds:?} outline={outline} fill={fill:?}");
        raster::rectangle(&mut self.pixels, bounds, outline, fill);
    }

    // ─── Read-out ────────────────────────────────────────────────────────

    /// Current buffer, for presentation or export.
    pub fn read_pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Color at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: i64, y: i64) -> Option<Color> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        self.pixels
            .get_pixel_checked(x, y)
            .map(|p| Color::from_rgba(p.0))
    }

    /// Number of pixels that differ from the background.
    pub fn painted_pixels(&self) -> usize {
        let bg = self.background.to_rgba();
        self.pixels.pixels().filter(|p| p.0 != bg).count()
    }
}

fn is_degenerate(bounds: Rect) -> bool {
    bounds.x1 <= bounds.x0 || bounds.y1 <= bounds.y0
}

/// Pixel position as a geometry point.
pub fn to_point(p: Position) -> Point {
    Point::new(p.x as f64, p.y as f64)
}

/// Bounding box as a geometry rect (corners kept as given, not normalised).
pub fn to_rect(bb: BoundingBox) -> Rect {
    Rect::new(bb.x0 as f64, bb.y0 as f64, bb.x1 as f64, bb.y1 as f64)
}
