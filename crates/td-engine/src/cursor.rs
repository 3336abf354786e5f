//! The turtle: a drawing point with a pen.
//!
//! Movement is always relative. Every directional move funnels through
//! [`Cursor::move_to`], which strokes the travelled segment only while the
//! pen is down and always advances the position. [`Cursor::set_position`]
//! is the one absolute jump and never draws.

use td_core::{
    BoundingBox, Color, Command, Error, Heading, Position, ShapeSize, StrokeOverride,
};
use td_render::{Canvas, to_point, to_rect};

#[derive(Debug, Clone)]
pub struct Cursor {
    canvas: Canvas,
    position: Position,
    pen_down: bool,
    color: Color,
    width: u32,
}

impl Cursor {
    /// Bind a cursor to `canvas`, centred, pen down.
    pub fn new(canvas: Canvas, color: Color, width: u32) -> Self {
        let position = canvas.center();
        log::debug!("cursor at ({}, {}), {color} w={width}", position.x, position.y);
        Self {
            canvas,
            position,
            pen_down: true,
            color,
            width: width.max(1),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_pen_down(&self) -> bool {
        self.pen_down
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn into_canvas(self) -> Canvas {
        self.canvas
    }

    // ─── Movement ────────────────────────────────────────────────────────

    /// Move by `(dx, dy)`, stroking the segment if the pen is down.
    pub fn move_to(&mut self, dx: i64, dy: i64, stroke: StrokeOverride) {
        let from = self.position;
        let to = from + (dx, dy);
        if self.pen_down {
            self.canvas.draw_line(
                to_point(from),
                to_point(to),
                stroke.color.unwrap_or(self.color),
                stroke.width.unwrap_or(self.width),
            );
        }
        self.position = to;
    }

    /// Move along `heading`, with `offset` on the cross axis.
    pub fn travel(&mut self, heading: Heading, distance: i64, offset: i64, stroke: StrokeOverride) {
        let (dx, dy) = heading.delta(distance, offset);
        self.move_to(dx, dy, stroke);
    }

    /// North: towards smaller `y`. `offset` shifts along `x`.
    pub fn forward(&mut self, distance: i64, offset: i64, stroke: StrokeOverride) {
        self.travel(Heading::Forward, distance, offset, stroke);
    }

    pub fn backward(&mut self, distance: i64, offset: i64, stroke: StrokeOverride) {
        self.travel(Heading::Backward, distance, offset, stroke);
    }

    /// Alias of [`Cursor::backward`].
    pub fn down(&mut self, distance: i64, offset: i64, stroke: StrokeOverride) {
        self.backward(distance, offset, stroke);
    }

    /// West: towards smaller `x`. `offset` shifts along `y`.
    pub fn left(&mut self, distance: i64, offset: i64, stroke: StrokeOverride) {
        self.travel(Heading::Left, distance, offset, stroke);
    }

    pub fn right(&mut self, distance: i64, offset: i64, stroke: StrokeOverride) {
        self.travel(Heading::Right, distance, offset, stroke);
    }

    pub fn pen_up(&mut self) {
        self.pen_down = false;
    }

    pub fn pen_down(&mut self) {
        self.pen_down = true;
    }

    /// Absolute jump; never draws, whatever the pen state.
    pub fn set_position(&mut self, x: i64, y: i64) {
        self.position = Position::new(x, y);
    }

    // ─── Shapes ──────────────────────────────────────────────────────────

    /// Circle of `radius` centred on the cursor, or inscribed in the
    /// explicit `coords` box. No-op while the pen is up.
    pub fn circle(&mut self, radius: i64, fill: Option<Color>, coords: &[i64]) -> Result<(), Error> {
        if !self.pen_down {
            return Ok(());
        }
        let bounds = match explicit_box("circle", coords)? {
            Some(bb) => bb,
            None => BoundingBox::centered(self.position, radius, radius),
        };
        self.canvas.draw_ellipse(to_rect(bounds), self.color, fill);
        Ok(())
    }

    /// Rectangle of `size` centred on the cursor, or the explicit `coords`
    /// box. No-op while the pen is up.
    pub fn rectangle(
        &mut self,
        size: Option<ShapeSize>,
        fill: Option<Color>,
        coords: &[i64],
    ) -> Result<(), Error> {
        if !self.pen_down {
            return Ok(());
        }
        let bounds = match (explicit_box("rectangle", coords)?, size) {
            (Some(bb), _) => bb,
            (None, Some(size)) => {
                BoundingBox::centered(self.position, size.width / 2, size.height / 2)
            }
            (None, None) => {
                return Err(Error::InvalidArguments {
                    command: "rectangle",
                    reason: "needs a size or an explicit bounding box".into(),
                });
            }
        };
        self.canvas.draw_rectangle(to_rect(bounds), self.color, fill);
        Ok(())
    }

    /// Apply one decoded command.
    pub fn execute(&mut self, command: &Command) -> Result<(), Error> {
        match command {
            Command::Move {
                heading,
                distance,
                offset,
                stroke,
            } => {
                let (distance, offset, stroke) = (*distance, *offset, *stroke);
                match heading {
                    Heading::Free => self.move_to(distance, offset, stroke),
                    Heading::Forward => self.forward(distance, offset, stroke),
                    Heading::Backward => self.backward(distance, offset, stroke),
                    Heading::Left => self.left(distance, offset, stroke),
                    Heading::Right => self.right(distance, offset, stroke),
                }
            }
            Command::PenUp => self.pen_up(),
            Command::PenDown => self.pen_down(),
            Command::SetPosition { x, y } => self.set_position(*x, *y),
            Command::Circle {
                radius,
                fill,
                coords,
            } => self.circle(*radius, *fill, coords)?,
            Command::Rectangle { size, fill, coords } => self.rectangle(*size, *fill, coords)?,
        }
        Ok(())
    }
}

/// An explicit box must have exactly four coordinates; none means derive
/// the box from the cursor.
fn explicit_box(command: &'static str, coords: &[i64]) -> Result<Option<BoundingBox>, Error> {
    match *coords {
        [] => Ok(None),
        [x0, y0, x1, y1] => Ok(Some(BoundingBox::new(x0, y0, x1, y1))),
        _ => Err(Error::InvalidArguments {
            command,
            reason: format!(
                "bounding box needs exactly 4 coordinates, got {}",
                coords.len()
            ),
        }),
    }
}
