pub mod color;
pub mod command;
pub mod error;
pub mod model;
pub mod parser;

pub use color::Color;
pub use command::{
    CanvasSetup, Command, CommandKind, CursorSetup, Heading, ShapeSize, StrokeOverride,
};
pub use error::{Error, LineError};
pub use model::*;
pub use parser::parse_line;
