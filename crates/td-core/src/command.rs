//! Command vocabulary and argument decoding.
//!
//! Every running instruction is decoded into a typed [`Command`] before it
//! reaches the cursor. Names resolve through a fixed table into a
//! [`CommandKind`]; each kind validates its own positional argument shape.
//! Decoding never touches drawing state, so a rejected instruction leaves
//! the run exactly as it was.

use crate::color::Color;
use crate::error::{Error, Result};
use crate::model::{Instruction, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

// ─── Vocabulary ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    MoveTo,
    Forward,
    Backward,
    Down,
    Left,
    Right,
    PenUp,
    PenDown,
    SetPosition,
    Circle,
    Rectangle,
}

const COMMANDS: &[(&str, CommandKind)] = &[
    ("move_to", CommandKind::MoveTo),
    ("forward", CommandKind::Forward),
    ("backward", CommandKind::Backward),
    ("down", CommandKind::Down),
    ("left", CommandKind::Left),
    ("right", CommandKind::Right),
    ("pen_up", CommandKind::PenUp),
    ("pen_down", CommandKind::PenDown),
    ("set_position", CommandKind::SetPosition),
    ("circle", CommandKind::Circle),
    ("rectangle", CommandKind::Rectangle),
];

impl CommandKind {
    /// Resolve a command name. Matching is exact.
    pub fn from_name(name: &str) -> Option<Self> {
        COMMANDS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, kind)| *kind)
    }

    pub fn name(self) -> &'static str {
        match self {
            CommandKind::MoveTo => "move_to",
            CommandKind::Forward => "forward",
            CommandKind::Backward => "backward",
            CommandKind::Down => "down",
            CommandKind::Left => "left",
            CommandKind::Right => "right",
            CommandKind::PenUp => "pen_up",
            CommandKind::PenDown => "pen_down",
            CommandKind::SetPosition => "set_position",
            CommandKind::Circle => "circle",
            CommandKind::Rectangle => "rectangle",
        }
    }

    /// All recognised command names, in table order.
    pub fn names() -> impl Iterator<Item = &'static str> {
        COMMANDS.iter().map(|(n, _)| *n)
    }

    /// Maximum positional argument count. Shapes end in a coordinate tail
    /// of any length; the cursor rejects a bad box only while drawing.
    fn max_args(self) -> Option<usize> {
        match self {
            CommandKind::PenUp | CommandKind::PenDown => Some(0),
            CommandKind::SetPosition => Some(2),
            CommandKind::Circle | CommandKind::Rectangle => None,
            _ => Some(4),
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Typed commands ──────────────────────────────────────────────────────

/// Axis-aligned movement direction. `y` grows downward, so "forward"
/// (north) is negative `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Heading {
    /// Raw `(dx, dy)` delta.
    Free,
    Forward,
    Backward,
    Left,
    Right,
}

impl Heading {
    /// Map `(distance, offset)` onto a canvas delta. For `Free` the pair
    /// is already `(dx, dy)`.
    pub fn delta(self, distance: i64, offset: i64) -> (i64, i64) {
        match self {
            Heading::Free => (distance, offset),
            Heading::Forward => (offset, distance.saturating_neg()),
            Heading::Backward => (offset, distance),
            Heading::Left => (distance.saturating_neg(), offset),
            Heading::Right => (distance, offset),
        }
    }
}

/// Optional per-call stroke attributes; `None` falls back to the cursor's
/// defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrokeOverride {
    pub width: Option<u32>,
    pub color: Option<Color>,
}

/// Rectangle size: `10` is a square, `10x100` is width × height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeSize {
    pub width: i64,
    pub height: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Move {
        heading: Heading,
        distance: i64,
        offset: i64,
        stroke: StrokeOverride,
    },
    PenUp,
    PenDown,
    SetPosition {
        x: i64,
        y: i64,
    },
    /// `coords` is the raw bounding-box tail; its length is checked by the
    /// cursor, and only while the pen is down.
    Circle {
        radius: i64,
        fill: Option<Color>,
        coords: Vec<i64>,
    },
    Rectangle {
        size: Option<ShapeSize>,
        fill: Option<Color>,
        coords: Vec<i64>,
    },
}

impl Command {
    /// Resolve and validate an instruction against the vocabulary.
    pub fn decode(instruction: &Instruction) -> Result<Command> {
        let kind =
            CommandKind::from_name(&instruction.name).ok_or_else(|| Error::UnknownCommand {
                name: instruction.name.clone(),
            })?;
        let args = Arguments::new(kind, &instruction.args)?;

        let command = match kind {
            CommandKind::MoveTo
            | CommandKind::Forward
            | CommandKind::Backward
            | CommandKind::Down
            | CommandKind::Left
            | CommandKind::Right => {
                let heading = match kind {
                    CommandKind::Forward => Heading::Forward,
                    CommandKind::Backward | CommandKind::Down => Heading::Backward,
                    CommandKind::Left => Heading::Left,
                    CommandKind::Right => Heading::Right,
                    _ => Heading::Free,
                };
                Command::Move {
                    heading,
                    distance: args.opt_int(0)?.unwrap_or(0),
                    offset: args.opt_int(1)?.unwrap_or(0),
                    stroke: StrokeOverride {
                        width: args.opt_width(2)?,
                        color: args.opt_color(3)?,
                    },
                }
            }
            CommandKind::PenUp => Command::PenUp,
            CommandKind::PenDown => Command::PenDown,
            CommandKind::SetPosition => Command::SetPosition {
                x: args.req_int(0, "x")?,
                y: args.req_int(1, "y")?,
            },
            CommandKind::Circle => Command::Circle {
                radius: args.opt_int(0)?.unwrap_or(0),
                fill: args.opt_color(1)?,
                coords: args.coord_tail(2)?,
            },
            CommandKind::Rectangle => Command::Rectangle {
                size: args.opt_size(0)?,
                fill: args.opt_color(1)?,
                coords: args.coord_tail(2)?,
            },
        };
        Ok(command)
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Move { heading, .. } => match heading {
                Heading::Free => CommandKind::MoveTo,
                Heading::Forward => CommandKind::Forward,
                Heading::Backward => CommandKind::Backward,
                Heading::Left => CommandKind::Left,
                Heading::Right => CommandKind::Right,
            },
            Command::PenUp => CommandKind::PenUp,
            Command::PenDown => CommandKind::PenDown,
            Command::SetPosition { .. } => CommandKind::SetPosition,
            Command::Circle { .. } => CommandKind::Circle,
            Command::Rectangle { .. } => CommandKind::Rectangle,
        }
    }
}

// ─── Setup lines ─────────────────────────────────────────────────────────

/// First program line: `*:<width>,<height>,<background>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSetup {
    pub width: i64,
    pub height: i64,
    pub background: Color,
}

impl CanvasSetup {
    /// The instruction name is ignored; only the arguments matter.
    pub fn decode(instruction: &Instruction) -> Result<Self> {
        let args = Arguments::exact("canvas setup", &instruction.args, 3)?;
        Ok(Self {
            width: args.req_int(0, "width")?,
            height: args.req_int(1, "height")?,
            background: args.req_color(2, "background")?,
        })
    }
}

/// Second program line: `*:<color>,<width>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorSetup {
    pub color: Color,
    pub width: u32,
}

impl CursorSetup {
    pub fn decode(instruction: &Instruction) -> Result<Self> {
        let args = Arguments::exact("cursor setup", &instruction.args, 2)?;
        let color = args.req_color(0, "color")?;
        let width = args.req_int(1, "width")?;
        Ok(Self {
            color,
            width: args.positive_width(width)?,
        })
    }
}

// ─── Argument access ─────────────────────────────────────────────────────

/// Positional view over an instruction's arguments, tied to the command
/// name for error messages.
struct Arguments<'a> {
    command: &'a str,
    values: &'a [Value],
}

impl<'a> Arguments<'a> {
    fn new(kind: CommandKind, values: &'a [Value]) -> Result<Self> {
        if let Some(max) = kind.max_args()
            && values.len() > max
        {
            return Err(Error::mismatch(
                kind.name(),
                format!("takes at most {max} arguments, got {}", values.len()),
            ));
        }
        Ok(Self {
            command: kind.name(),
            values,
        })
    }

    fn exact(command: &'a str, values: &'a [Value], count: usize) -> Result<Self> {
        if values.len() != count {
            return Err(Error::mismatch(
                command,
                format!("expects exactly {count} arguments, got {}", values.len()),
            ));
        }
        Ok(Self { command, values })
    }

    /// Argument at `idx`, or `None` when absent or omitted.
    fn get(&self, idx: usize) -> Option<&'a Value> {
        self.values.get(idx).filter(|v| !v.is_omitted())
    }

    fn expected(&self, idx: usize, what: &str, found: &Value) -> Error {
        Error::mismatch(
            self.command,
            format!(
                "argument {} must be {what}, got {} `{found}`",
                idx + 1,
                found.type_name()
            ),
        )
    }

    fn opt_int(&self, idx: usize) -> Result<Option<i64>> {
        match self.get(idx) {
            None => Ok(None),
            Some(Value::Int(n)) => Ok(Some(*n)),
            Some(other) => Err(self.expected(idx, "an integer", other)),
        }
    }

    fn req_int(&self, idx: usize, name: &str) -> Result<i64> {
        self.opt_int(idx)?.ok_or_else(|| {
            Error::mismatch(self.command, format!("missing required argument `{name}`"))
        })
    }

    fn positive_width(&self, width: i64) -> Result<u32> {
        u32::try_from(width)
            .ok()
            .filter(|w| *w > 0)
            .ok_or_else(|| {
                Error::mismatch(self.command, format!("width must be positive, got {width}"))
            })
    }

    fn opt_width(&self, idx: usize) -> Result<Option<u32>> {
        self.opt_int(idx)?
            .map(|w| self.positive_width(w))
            .transpose()
    }

    fn opt_color(&self, idx: usize) -> Result<Option<Color>> {
        match self.get(idx) {
            None => Ok(None),
            Some(Value::Text(token)) => Color::parse(token)
                .map(Some)
                .ok_or_else(|| Error::UnknownColor {
                    token: token.clone(),
                }),
            Some(other) => Err(self.expected(idx, "a color", other)),
        }
    }

    fn req_color(&self, idx: usize, name: &str) -> Result<Color> {
        self.opt_color(idx)?.ok_or_else(|| {
            Error::mismatch(self.command, format!("missing required argument `{name}`"))
        })
    }

    /// Integer `n` (square) or `WxH` text.
    fn opt_size(&self, idx: usize) -> Result<Option<ShapeSize>> {
        let Some(value) = self.get(idx) else {
            return Ok(None);
        };
        match value {
            Value::Int(n) => Ok(Some(ShapeSize {
                width: *n,
                height: *n,
            })),
            Value::Text(token) => parse_size_pair(token)
                .map(Some)
                .ok_or_else(|| self.expected(idx, "a size (`N` or `WxH`)", value)),
            Value::Null => Err(self.expected(idx, "a size", value)),
        }
    }

    /// Integer coordinates from `start` to the end; omitted tokens skipped.
    fn coord_tail(&self, start: usize) -> Result<Vec<i64>> {
        let mut coords = Vec::new();
        for (offset, value) in self.values.iter().skip(start).enumerate() {
            match value {
                v if v.is_omitted() => {}
                Value::Int(n) => coords.push(*n),
                other => return Err(self.expected(start + offset, "a coordinate", other)),
            }
        }
        Ok(coords)
    }
}

fn parse_size_pair(token: &str) -> Option<ShapeSize> {
    let (w, h) = token.split_once(['x', 'X'])?;
    Some(ShapeSize {
        width: w.trim().parse().ok()?,
        height: h.trim().parse().ok()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_line;
    use pretty_assertions::assert_eq;

    fn decode(line: &str) -> Result<Command> {
        Command::decode(&parse_line(line).expect("parse failed"))
    }

    #[test]
    fn name_table_roundtrips() {
        for name in CommandKind::names() {
            let kind = CommandKind::from_name(name).expect("listed name resolves");
            assert_eq!(kind.name(), name);
        }
        assert_eq!(CommandKind::names().count(), 11);
        assert_eq!(CommandKind::from_name("Forward"), None);
        assert_eq!(CommandKind::from_name("__init__"), None);
    }

    #[test]
    fn forward_is_negative_y() {
        assert_eq!(Heading::Forward.delta(100, 0), (0, -100));
        assert_eq!(Heading::Backward.delta(100, 5), (5, 100));
        assert_eq!(Heading::Left.delta(200, 0), (-200, 0));
        assert_eq!(Heading::Right.delta(100, -3), (100, -3));
        assert_eq!(Heading::Free.delta(7, 9), (7, 9));
    }

    #[test]
    fn decode_move_with_width_override() {
        assert_eq!(
            decode("right:100,,3").unwrap(),
            Command::Move {
                heading: Heading::Right,
                distance: 100,
                offset: 0,
                stroke: StrokeOverride {
                    width: Some(3),
                    color: None,
                },
            }
        );
    }

    #[test]
    fn decode_move_defaults_to_zero() {
        assert_eq!(
            decode("forward:").unwrap(),
            Command::Move {
                heading: Heading::Forward,
                distance: 0,
                offset: 0,
                stroke: StrokeOverride::default(),
            }
        );
    }

    #[test]
    fn down_and_backward_share_heading() {
        let Command::Move { heading, .. } = decode("down:5").unwrap() else {
            panic!("expected Move");
        };
        assert_eq!(heading, Heading::Backward);
    }

    #[test]
    fn decode_color_override() {
        let Command::Move { stroke, .. } = decode("move_to:1,2,None,#00FF00").unwrap() else {
            panic!("expected Move");
        };
        assert_eq!(stroke.color, Some(Color::rgb(0, 255, 0)));
    }

    #[test]
    fn unknown_name_is_unknown_command() {
        assert_eq!(
            decode("jump:10,10"),
            Err(Error::UnknownCommand {
                name: "jump".into()
            })
        );
    }

    #[test]
    fn arity_and_type_mismatches() {
        assert!(matches!(
            decode("pen_up:1"),
            Err(Error::ArgumentMismatch { .. })
        ));
        assert!(matches!(
            decode("forward:ten"),
            Err(Error::ArgumentMismatch { .. })
        ));
        assert!(matches!(
            decode("forward:1,2,3,red,extra"),
            Err(Error::ArgumentMismatch { .. })
        ));
        assert!(matches!(
            decode("set_position:10"),
            Err(Error::ArgumentMismatch { .. })
        ));
        assert!(matches!(
            decode("right:10,0,0"),
            Err(Error::ArgumentMismatch { .. })
        ));
        assert!(matches!(
            decode("circle:5,red,1,two,3,4"),
            Err(Error::ArgumentMismatch { .. })
        ));
    }

    #[test]
    fn bad_color_token() {
        assert_eq!(
            decode("circle:5,notacolor"),
            Err(Error::UnknownColor {
                token: "notacolor".into()
            })
        );
    }

    #[test]
    fn circle_collects_coordinate_tail() {
        assert_eq!(
            decode("circle:None,red,10,20,30,40").unwrap(),
            Command::Circle {
                radius: 0,
                fill: Some(Color::rgb(255, 0, 0)),
                coords: vec![10, 20, 30, 40],
            }
        );
        assert_eq!(
            decode("circle:50,,").unwrap(),
            Command::Circle {
                radius: 50,
                fill: None,
                coords: vec![],
            }
        );
    }

    #[test]
    fn shape_tail_length_is_left_to_the_cursor() {
        let Command::Circle { coords, .. } = decode("circle:5,,1,2,3,4,5").unwrap() else {
            panic!("expected Circle");
        };
        assert_eq!(coords, vec![1, 2, 3, 4, 5]);
        assert!(matches!(
            decode("rectangle:5,,1,2,3,4,5,6"),
            Ok(Command::Rectangle { .. })
        ));
    }

    #[test]
    fn rectangle_sizes() {
        let size = |line: &str| match decode(line).unwrap() {
            Command::Rectangle { size, .. } => size,
            _ => panic!("expected Rectangle"),
        };
        assert_eq!(size("rectangle:10"), Some(ShapeSize { width: 10, height: 10 }));
        assert_eq!(size("rectangle:10x100"), Some(ShapeSize { width: 10, height: 100 }));
        assert_eq!(size("rectangle:,,"), None);
        assert!(matches!(
            decode("rectangle:tall"),
            Err(Error::ArgumentMismatch { .. })
        ));
    }

    #[test]
    fn setup_lines() {
        let canvas = CanvasSetup::decode(&parse_line("*:300,200,white").unwrap()).unwrap();
        assert_eq!(
            canvas,
            CanvasSetup {
                width: 300,
                height: 200,
                background: Color::WHITE,
            }
        );

        let cursor = CursorSetup::decode(&parse_line("*:black,2").unwrap()).unwrap();
        assert_eq!(
            cursor,
            CursorSetup {
                color: Color::BLACK,
                width: 2,
            }
        );

        assert!(matches!(
            CanvasSetup::decode(&parse_line("*:300,white").unwrap()),
            Err(Error::ArgumentMismatch { .. })
        ));
        assert!(matches!(
            CursorSetup::decode(&parse_line("*:black,0").unwrap()),
            Err(Error::ArgumentMismatch { .. })
        ));
    }

    #[test]
    fn non_positive_canvas_size_still_decodes() {
        // Dimension checks belong to the canvas constructor.
        let canvas = CanvasSetup::decode(&parse_line("*:0,100,white").unwrap()).unwrap();
        assert_eq!(canvas.width, 0);
    }
}
