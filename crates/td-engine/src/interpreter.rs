//! Program interpreter.
//!
//! A three-phase state machine over the program's steps:
//!
//! - **AwaitingCanvasSetup**: the first instruction's arguments build the
//!   canvas (`width, height, background`). Its name is ignored.
//! - **AwaitingCursorSetup**: the second instruction's arguments build the
//!   cursor (`color, width`), bound to that canvas.
//! - **Running**: every later instruction is decoded against the command
//!   vocabulary and applied to the cursor.
//!
//! Any error aborts the run. The partial canvas stays reachable through
//! [`Interpreter::canvas`] so the caller can decide what to do with it.

use crate::cursor::Cursor;
use std::mem;
use td_core::{CanvasSetup, Command, CursorSetup, Error, Instruction, LineError, Program, Step};
use td_render::{Canvas, Present, PresentError};
use thiserror::Error;

/// Observable interpreter phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingCanvasSetup,
    AwaitingCursorSetup,
    Running,
}

#[derive(Debug, Default)]
enum State {
    #[default]
    AwaitingCanvasSetup,
    AwaitingCursorSetup(Canvas),
    Running(Cursor),
}

/// Failure of a whole-program run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Program(#[from] LineError),
    #[error("program is incomplete: {0}")]
    Incomplete(Error),
    #[error("presentation failed: {0}")]
    Present(#[from] PresentError),
}

#[derive(Debug, Default)]
pub struct Interpreter {
    state: State,
    executed: usize,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            State::AwaitingCanvasSetup => Phase::AwaitingCanvasSetup,
            State::AwaitingCursorSetup(_) => Phase::AwaitingCursorSetup,
            State::Running(_) => Phase::Running,
        }
    }

    /// Number of instructions applied successfully so far.
    pub fn executed(&self) -> usize {
        self.executed
    }

    pub fn cursor(&self) -> Option<&Cursor> {
        match &self.state {
            State::Running(cursor) => Some(cursor),
            _ => None,
        }
    }

    /// The canvas in its current (possibly partial) state, once built.
    pub fn canvas(&self) -> Option<&Canvas> {
        match &self.state {
            State::AwaitingCanvasSetup => None,
            State::AwaitingCursorSetup(canvas) => Some(canvas),
            State::Running(cursor) => Some(cursor.canvas()),
        }
    }

    /// Apply one instruction in the current phase. On error the state is
    /// left exactly as it was before the call.
    pub fn execute(&mut self, instruction: &Instruction) -> Result<(), Error> {
        let state = mem::take(&mut self.state);
        let (next, result) = advance(state, instruction);
        self.state = next;
        if result.is_ok() {
            self.executed += 1;
        }
        result
    }

    /// [`Interpreter::execute`] with the failing source line attached.
    pub fn step(&mut self, step: &Step) -> Result<(), LineError> {
        log::trace!("line {}: {}", step.line, step.instruction);
        self.execute(&step.instruction)
            .map_err(|e| e.at(step.line, step.instruction.to_string()))
    }

    /// Hand over the finished canvas. Fails if setup never completed.
    pub fn finish(self) -> Result<Canvas, Error> {
        match self.state {
            State::Running(cursor) => Ok(cursor.into_canvas()),
            State::AwaitingCursorSetup(_) => Err(Error::IncompleteSetup { missing: "cursor" }),
            State::AwaitingCanvasSetup => Err(Error::IncompleteSetup { missing: "canvas" }),
        }
    }

    /// Run a whole program and return its canvas. A failing line comes
    /// back as [`RunError::Program`]; missing setup lines have no line to
    /// blame and come back as [`RunError::Incomplete`].
    pub fn run(program: &Program) -> Result<Canvas, RunError> {
        let mut interpreter = Interpreter::new();
        for step in program {
            interpreter.step(step)?;
        }
        interpreter.finish().map_err(RunError::Incomplete)
    }

    /// Run a program and hand the finished canvas to `presenter`. The
    /// presenter is never called when the run fails.
    pub fn run_and_present<P: Present + ?Sized>(
        program: &Program,
        presenter: &mut P,
    ) -> Result<(), RunError> {
        let canvas = Self::run(program)?;
        presenter.present(&canvas)?;
        Ok(())
    }
}

fn advance(state: State, instruction: &Instruction) -> (State, Result<(), Error>) {
    match state {
        State::AwaitingCanvasSetup => {
            match CanvasSetup::decode(instruction)
                .and_then(|s| Canvas::new(s.width, s.height, s.background))
            {
                Ok(canvas) => (State::AwaitingCursorSetup(canvas), Ok(())),
                Err(e) => (State::AwaitingCanvasSetup, Err(e)),
            }
        }
        State::AwaitingCursorSetup(canvas) => match CursorSetup::decode(instruction) {
            Ok(setup) => (
                State::Running(Cursor::new(canvas, setup.color, setup.width)),
                Ok(()),
            ),
            Err(e) => (State::AwaitingCursorSetup(canvas), Err(e)),
        },
        State::Running(mut cursor) => {
            let result = Command::decode(instruction).and_then(|command| {
                log::trace!("{} {:?}", command.kind(), command);
                cursor.execute(&command)
            });
            (State::Running(cursor), result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use td_core::{Position, parse_line};

    fn exec(interp: &mut Interpreter, line: &str) -> Result<(), Error> {
        interp.execute(&parse_line(line).expect("parse failed"))
    }

    #[test]
    fn phases_advance_in_order() {
        let mut interp = Interpreter::new();
        assert_eq!(interp.phase(), Phase::AwaitingCanvasSetup);
        exec(&mut interp, "*:40,20,white").unwrap();
        assert_eq!(interp.phase(), Phase::AwaitingCursorSetup);
        assert_eq!(interp.canvas().map(Canvas::size), Some((40, 20)));
        exec(&mut interp, "*:black,1").unwrap();
        assert_eq!(interp.phase(), Phase::Running);
        assert_eq!(interp.cursor().unwrap().position(), Position::new(20, 10));
        assert_eq!(interp.executed(), 2);
    }

    #[test]
    fn setup_names_are_ignored() {
        let mut interp = Interpreter::new();
        exec(&mut interp, "forward:40,20,white").unwrap();
        exec(&mut interp, "canvas:black,1").unwrap();
        assert_eq!(interp.phase(), Phase::Running);
    }

    #[test]
    fn failed_setup_keeps_phase() {
        let mut interp = Interpreter::new();
        assert_eq!(
            exec(&mut interp, "*:0,100,white"),
            Err(Error::InvalidDimension {
                width: 0,
                height: 100
            })
        );
        assert_eq!(interp.phase(), Phase::AwaitingCanvasSetup);

        exec(&mut interp, "*:10,10,white").unwrap();
        assert!(exec(&mut interp, "*:black").is_err());
        assert_eq!(interp.phase(), Phase::AwaitingCursorSetup);
        assert!(interp.canvas().is_some());
    }

    #[test]
    fn unknown_command_leaves_cursor_untouched() {
        let mut interp = Interpreter::new();
        exec(&mut interp, "*:100,100,white").unwrap();
        exec(&mut interp, "*:black,1").unwrap();
        exec(&mut interp, "forward:10").unwrap();
        let before = interp.cursor().unwrap().position();
        let painted = interp.canvas().unwrap().painted_pixels();

        assert_eq!(
            exec(&mut interp, "jump:10,10"),
            Err(Error::UnknownCommand {
                name: "jump".into()
            })
        );
        let cursor = interp.cursor().unwrap();
        assert_eq!(cursor.position(), before);
        assert!(cursor.is_pen_down());
        assert_eq!(interp.canvas().unwrap().painted_pixels(), painted);
        assert_eq!(interp.executed(), 3);
    }

    #[test]
    fn finish_requires_both_setup_lines() {
        assert_eq!(
            Interpreter::new().finish().unwrap_err(),
            Error::IncompleteSetup { missing: "canvas" }
        );
        let mut interp = Interpreter::new();
        exec(&mut interp, "*:10,10,white").unwrap();
        assert_eq!(
            interp.finish().unwrap_err(),
            Error::IncompleteSetup { missing: "cursor" }
        );
    }

    #[test]
    fn step_reports_line() {
        let program = Program::parse(["*:10,10,white", "*:black,1", "", "circle:1,2,3"]).unwrap();
        let RunError::Program(err) = Interpreter::run(&program).unwrap_err() else {
            panic!("expected a line-located error");
        };
        assert_eq!(err.line, 4);
        assert!(matches!(err.kind, Error::ArgumentMismatch { .. }));
    }
}
