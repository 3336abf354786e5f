pub mod cursor;
pub mod interpreter;

pub use cursor::Cursor;
pub use interpreter::{Interpreter, Phase, RunError};
