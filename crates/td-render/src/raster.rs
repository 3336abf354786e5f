//! Pixel rasterizers for the three canvas primitives.
//!
//! All coordinates are whole pixels; boxes include both corners. Every
//! rasterizer clips to the image up front, so off-canvas or enormous
//! geometry costs nothing and never panics.

use image::{Rgba, RgbaImage};
use kurbo::{Ellipse, Line, ParamCurve, Rect};
use td_core::Color;

/// Write one pixel, ignoring anything outside the image.
fn put(img: &mut RgbaImage, x: i64, y: i64, color: Color) {
    if x < 0 || y < 0 || x >= img.width() as i64 || y >= img.height() as i64 {
        return;
    }
    img.put_pixel(x as u32, y as u32, Rgba(color.to_rgba()));
}

/// Inclusive integer range `[lo, hi]` clamped to `[0, len - 1]`.
fn clamp_span(lo: i64, hi: i64, len: u32) -> Option<(i64, i64)> {
    let lo = lo.max(0);
    let hi = hi.min(len as i64 - 1);
    (lo <= hi).then_some((lo, hi))
}

fn pixel_bounds(img: &RgbaImage) -> Rect {
    Rect::new(
        0.0,
        0.0,
        f64::from(img.width()) - 1.0,
        f64::from(img.height()) - 1.0,
    )
}

// ─── Lines ───────────────────────────────────────────────────────────────

/// Liang–Barsky clip of `line` against `rect`.
pub(crate) fn clip_line(line: Line, rect: Rect) -> Option<Line> {
    let d = line.p1 - line.p0;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    for (p, q) in [
        (-d.x, line.p0.x - rect.x0),
        (d.x, rect.x1 - line.p0.x),
        (-d.y, line.p0.y - rect.y0),
        (d.y, rect.y1 - line.p0.y),
    ] {
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

    if t0 == 0.0 && t1 == 1.0 {
        return Some(line);
    }
    Some(Line::new(line.eval(t0), line.eval(t1)))
}

/// Stroke a segment `width` pixels wide. The width is laid out across the
/// minor axis of the segment; a zero-length segment paints a square dot.
pub(crate) fn stroke_line(img: &mut RgbaImage, line: Line, color: Color, width: u32) {
    let width = i64::from(width.max(1));
    let lo = -(width - 1) / 2;
    let hi = width / 2;
    let (w, h) = img.dimensions();

    let d = line.p1 - line.p0;
    if d.x.abs().max(d.y.abs()).round() == 0.0 {
        let (cx, cy) = (line.p0.x.round() as i64, line.p0.y.round() as i64);
        if let Some((x0, x1)) = clamp_span(cx.saturating_add(lo), cx.saturating_add(hi), w)
            && let Some((y0, y1)) = clamp_span(cy.saturating_add(lo), cy.saturating_add(hi), h)
        {
            for y in y0..=y1 {
                for x in x0..=x1 {
                    put(img, x, y, color);
                }
            }
        }
        return;
    }

    // Only the major axis has to land on the image; the width reaches
    // across the minor one.
    let x_major = d.x.abs() >= d.y.abs();
    let reach = width as f64 + 1.0;
    let window = if x_major {
        pixel_bounds(img).inflate(1.0, reach)
    } else {
        pixel_bounds(img).inflate(reach, 1.0)
    };
    let Some(line) = clip_line(line, window) else {
        log::trace!("line fully clipped");
        return;
    };

    let d = line.p1 - line.p0;
    let steps = d.x.abs().max(d.y.abs()).round() as i64;
    for i in 0..=steps {
        let p = line.eval(i as f64 / steps.max(1) as f64);
        let (cx, cy) = (p.x.round() as i64, p.y.round() as i64);
        if x_major {
            if let Some((y0, y1)) = clamp_span(cy.saturating_add(lo), cy.saturating_add(hi), h) {
                for y in y0..=y1 {
                    put(img, cx, y, color);
                }
            }
        } else if let Some((x0, x1)) =
            clamp_span(cx.saturating_add(lo), cx.saturating_add(hi), w)
        {
            for x in x0..=x1 {
                put(img, x, cy, color);
            }
        }
    }
}

// ─── Rectangles ──────────────────────────────────────────────────────────

/// One-pixel outline on the box edges; fill strictly inside.
pub(crate) fn rectangle(img: &mut RgbaImage, bounds: Rect, outline: Color, fill: Option<Color>) {
    let (x0, y0) = (bounds.x0.round() as i64, bounds.y0.round() as i64);
    let (x1, y1) = (bounds.x1.round() as i64, bounds.y1.round() as i64);
    let (w, h) = img.dimensions();

    if let Some(fill) = fill
        && let Some((fx0, fx1)) = clamp_span(x0 + 1, x1 - 1, w)
        && let Some((fy0, fy1)) = clamp_span(y0 + 1, y1 - 1, h)
    {
        for y in fy0..=fy1 {
            for x in fx0..=fx1 {
                put(img, x, y, fill);
            }
        }
    }

    if let Some((sx0, sx1)) = clamp_span(x0, x1, w) {
        for x in sx0..=sx1 {
            put(img, x, y0, outline);
            put(img, x, y1, outline);
        }
    }
    if let Some((sy0, sy1)) = clamp_span(y0, y1, h) {
        for y in sy0..=sy1 {
            put(img, x0, y, outline);
            put(img, x1, y, outline);
        }
    }
}

// ─── Ellipses ────────────────────────────────────────────────────────────

/// Horizontal (or, swapped, vertical) half-chord of an axis-aligned
/// ellipse at signed distance `d` from its centre along the other axis.
fn half_chord(radius_along: f64, radius_across: f64, d: f64) -> Option<f64> {
    if radius_across <= 0.0 {
        return None;
    }
    let t = 1.0 - (d / radius_across).powi(2);
    (t >= 0.0).then(|| radius_along * t.sqrt())
}

/// Ellipse inscribed in `bounds`: scanline fill, then a gap-free one-pixel
/// outline traced once per row and once per column.
pub(crate) fn ellipse(img: &mut RgbaImage, bounds: Rect, outline: Color, fill: Option<Color>) {
    let shape = Ellipse::from_rect(bounds);
    let center = shape.center();
    let radii = shape.radii();
    let (w, h) = img.dimensions();

    let rows = clamp_span(bounds.y0.ceil() as i64, bounds.y1.floor() as i64, h);
    let cols = clamp_span(bounds.x0.ceil() as i64, bounds.x1.floor() as i64, w);

    let row_span = |y: i64| {
        half_chord(radii.x, radii.y, y as f64 - center.y).map(|hw| {
            (
                (center.x - hw).round() as i64,
                (center.x + hw).round() as i64,
            )
        })
    };
    let col_span = |x: i64| {
        half_chord(radii.y, radii.x, x as f64 - center.x).map(|hh| {
            (
                (center.y - hh).round() as i64,
                (center.y + hh).round() as i64,
            )
        })
    };

    let Some((ry0, ry1)) = rows else {
        return;
    };

    if let Some(fill) = fill {
        for y in ry0..=ry1 {
            if let Some((l, r)) = row_span(y)
                && let Some((l, r)) = clamp_span(l, r, w)
            {
                for x in l..=r {
                    put(img, x, y, fill);
                }
            }
        }
    }

    for y in ry0..=ry1 {
        if let Some((l, r)) = row_span(y) {
            put(img, l, y, outline);
            put(img, r, y, outline);
        }
    }
    if let Some((cx0, cx1)) = cols {
        for x in cx0..=cx1 {
            if let Some((t, b)) = col_span(x) {
                put(img, x, t, outline);
                put(img, x, b, outline);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    fn blank(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(Color::WHITE.to_rgba()))
    }

    fn is(img: &RgbaImage, x: u32, y: u32, color: Color) -> bool {
        img.get_pixel(x, y).0 == color.to_rgba()
    }

    #[test]
    fn clip_keeps_inside_segment_exact() {
        let line = Line::new((1.0, 1.0), (5.0, 5.0));
        let clipped = clip_line(line, Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap();
        assert_eq!(clipped, line);
    }

    #[test]
    fn clip_trims_and_rejects() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let clipped = clip_line(Line::new((-10.0, 5.0), (20.0, 5.0)), rect).unwrap();
        assert_eq!(clipped.p0, Point::new(0.0, 5.0));
        assert_eq!(clipped.p1, Point::new(10.0, 5.0));
        assert!(clip_line(Line::new((-10.0, -5.0), (20.0, -5.0)), rect).is_none());
    }

    #[test]
    fn wide_horizontal_stroke_spans_minor_axis() {
        let mut img = blank(20, 20);
        stroke_line(&mut img, Line::new((2.0, 10.0), (12.0, 10.0)), Color::BLACK, 3);
        for x in 2..=12 {
            for y in 9..=11 {
                assert!(is(&img, x, y, Color::BLACK), "({x},{y}) not painted");
            }
        }
        assert!(is(&img, 13, 10, Color::WHITE));
        assert!(is(&img, 5, 8, Color::WHITE));
        assert!(is(&img, 5, 12, Color::WHITE));
    }

    #[test]
    fn zero_length_line_is_a_dot() {
        let mut img = blank(5, 5);
        stroke_line(&mut img, Line::new((2.0, 2.0), (2.0, 2.0)), Color::BLACK, 1);
        assert!(is(&img, 2, 2, Color::BLACK));
        let painted = img.pixels().filter(|p| p.0 == Color::BLACK.to_rgba()).count();
        assert_eq!(painted, 1);
    }

    #[test]
    fn huge_line_is_clipped_cheaply() {
        let mut img = blank(10, 10);
        stroke_line(
            &mut img,
            Line::new((5.0, -1e15), (5.0, 1e15)),
            Color::BLACK,
            1,
        );
        for y in 0..10 {
            assert!(is(&img, 5, y, Color::BLACK));
        }
    }

    #[test]
    fn enormous_width_is_bounded_by_the_image() {
        let start = std::time::Instant::now();
        let mut img = blank(10, 10);
        stroke_line(&mut img, Line::new((5.0, 5.0), (5.0, 5.0)), Color::BLACK, u32::MAX);
        stroke_line(
            &mut img,
            Line::new((-1e9, 3.0), (1e9, 3.0)),
            Color::rgb(255, 0, 0),
            4_000_000_000,
        );
        assert!(start.elapsed().as_secs() < 2, "took {:?}", start.elapsed());
        assert!(img.pixels().all(|p| p.0 == Color::rgb(255, 0, 0).to_rgba()));
    }

    #[test]
    fn wide_stroke_reaches_image_from_off_canvas() {
        let mut img = blank(10, 10);
        stroke_line(&mut img, Line::new((0.0, -20.0), (9.0, -20.0)), Color::BLACK, 60);
        assert!(img.pixels().all(|p| p.0 == Color::BLACK.to_rgba()));
    }

    #[test]
    fn rectangle_outline_and_fill() {
        let red = Color::rgb(255, 0, 0);
        let mut img = blank(10, 10);
        rectangle(&mut img, Rect::new(2.0, 2.0, 6.0, 5.0), Color::BLACK, Some(red));
        assert!(is(&img, 2, 2, Color::BLACK));
        assert!(is(&img, 6, 5, Color::BLACK));
        assert!(is(&img, 4, 2, Color::BLACK));
        assert!(is(&img, 3, 3, red));
        assert!(is(&img, 5, 4, red));
        assert!(is(&img, 7, 3, Color::WHITE));
    }

    #[test]
    fn ellipse_touches_box_midpoints() {
        let mut img = blank(20, 20);
        ellipse(&mut img, Rect::new(4.0, 2.0, 14.0, 12.0), Color::BLACK, None);
        assert!(is(&img, 9, 2, Color::BLACK));
        assert!(is(&img, 9, 12, Color::BLACK));
        assert!(is(&img, 4, 7, Color::BLACK));
        assert!(is(&img, 14, 7, Color::BLACK));
        // Outline only: centre untouched.
        assert!(is(&img, 9, 7, Color::WHITE));
        // Box corners lie outside the ellipse.
        assert!(is(&img, 4, 2, Color::WHITE));
    }

    #[test]
    fn filled_ellipse_covers_centre() {
        let blue = Color::rgb(0, 0, 255);
        let mut img = blank(20, 20);
        ellipse(&mut img, Rect::new(4.0, 2.0, 14.0, 12.0), Color::BLACK, Some(blue));
        assert!(is(&img, 9, 7, blue));
        assert!(is(&img, 4, 7, Color::BLACK));
    }
}
