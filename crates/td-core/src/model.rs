//! Parsed program data model.
//!
//! A command file becomes a `Program`: an ordered list of `Step`s, each an
//! `Instruction` (name + typed arguments) tagged with the source line it
//! came from. Insertion order is execution order. Programs are built once,
//! up front, and never mutated afterwards.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::ops::Add;

// ─── Values ──────────────────────────────────────────────────────────────

/// A single decoded argument token.
///
/// Tokens are typed purely by parse success: the literal `None` is `Null`,
/// anything that parses fully as a signed decimal is `Int`, everything
/// else stays `Text`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Int(i64),
    Text(String),
}

impl Value {
    /// `true` for `None` and for an empty token (`right:100,,3`).
    pub fn is_omitted(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.is_empty(),
            Value::Int(_) => false,
        }
    }

    /// Short type label used in argument-mismatch messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "None",
            Value::Int(_) => "integer",
            Value::Text(_) => "text",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("None"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

// ─── Instructions ────────────────────────────────────────────────────────

/// Positional arguments. Most commands take four or fewer.
pub type Args = SmallVec<[Value; 4]>;

/// One parsed command line: `name:arg,arg,...`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub name: String,
    pub args: Args,
}

impl Instruction {
    pub fn new(name: impl Into<String>, args: impl IntoIterator<Item = Value>) -> Self {
        Self {
            name: name.into(),
            args: args.into_iter().collect(),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{arg}")?;
        }
        Ok(())
    }
}

/// An instruction plus the 1-based source line it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub line: usize,
    pub instruction: Instruction,
}

/// The full, ordered instruction sequence for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub steps: Vec<Step>,
}

impl Program {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

// ─── Geometry ────────────────────────────────────────────────────────────

/// Integer pixel coordinate. `y` grows downward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

impl Position {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl Add<(i64, i64)> for Position {
    type Output = Position;

    fn add(self, (dx, dy): (i64, i64)) -> Position {
        Position::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

/// Explicit shape bounds `(x0, y0, x1, y1)`, both corners inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x0: i64,
    pub y0: i64,
    pub x1: i64,
    pub y1: i64,
}

impl BoundingBox {
    pub const fn new(x0: i64, y0: i64, x1: i64, y1: i64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Box of the given half-extents centred on `center`.
    pub fn centered(center: Position, half_w: i64, half_h: i64) -> Self {
        Self::new(
            center.x.saturating_sub(half_w),
            center.y.saturating_sub(half_h),
            center.x.saturating_add(half_w),
            center.y.saturating_add(half_h),
        )
    }
}
