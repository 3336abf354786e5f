//! Parser for turtle command files → `Program`.
//!
//! Built on `winnow` 0.7. One instruction per line, shaped
//! `name:arg1,arg2,...`. The whole file is parsed up front; the first
//! failing line aborts the parse.

use crate::error::{Error, LineError};
use crate::model::*;
use winnow::ascii::dec_int;
use winnow::error::ContextError;
use winnow::prelude::*;
use winnow::token::take_till;

/// Token that decodes to [`Value::Null`].
pub const NULL_TOKEN: &str = "None";

impl Program {
    /// Parse already-read source lines. Blank lines and `#` comments are
    /// skipped but still counted, so line numbers match the file.
    #[must_use = "parsing result should be used"]
    pub fn parse<I, S>(lines: I) -> Result<Program, LineError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut steps = Vec::new();
        for (idx, raw) in lines.into_iter().enumerate() {
            let raw = raw.as_ref();
            if is_blank_or_comment(raw) {
                continue;
            }
            let instruction = parse_line(raw).map_err(|e| e.at(idx + 1, raw.trim_end()))?;
            steps.push(Step {
                line: idx + 1,
                instruction,
            });
        }
        log::debug!("parsed {} instructions", steps.len());
        Ok(Program { steps })
    }

    /// Parse a whole command file held in memory.
    #[must_use = "parsing result should be used"]
    pub fn from_source(source: &str) -> Result<Program, LineError> {
        Program::parse(source.lines())
    }
}

fn is_blank_or_comment(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Parse one `name:arg,arg,...` line into an [`Instruction`].
pub fn parse_line(line: &str) -> Result<Instruction, Error> {
    let mut rest = line.trim_end_matches(['\r', '\n']);
    let malformed = || Error::MalformedLine {
        text: line.trim_end().to_string(),
    };

    let name = parse_name.parse_next(&mut rest).map_err(|_| malformed())?;
    let _ = ':'
        .parse_next(&mut rest)
        .map_err(|_: winnow::error::ErrMode<ContextError>| malformed())?;

    Ok(Instruction {
        name: name.trim().to_string(),
        args: parse_args(rest),
    })
}

// ─── Low-level parsers ──────────────────────────────────────────────────

fn parse_name<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_till(0.., ':').parse_next(input)
}

/// Split the argument segment on `,`. An empty segment means no arguments.
fn parse_args(rest: &str) -> Args {
    if rest.trim().is_empty() {
        return Args::new();
    }
    rest.split(',').map(decode_token).collect()
}

/// Coerce one raw token: `None` → null, full signed decimal → integer,
/// anything else → text (trimmed).
pub fn decode_token(token: &str) -> Value {
    let token = token.trim();
    if token == NULL_TOKEN {
        return Value::Null;
    }
    match parse_integer(token) {
        Some(n) => Value::Int(n),
        None => Value::Text(token.to_string()),
    }
}

/// Signed decimal that must consume the entire token.
fn parse_integer(token: &str) -> Option<i64> {
    dec_int::<_, i64, ContextError>.parse(token).ok()
}
