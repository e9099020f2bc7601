//! MessageFormat 2.0 message parser.
//!
//! This module parses MF2 source text into the [`ast`] types. The parser is
//! single-pass and fails on the first syntactic mismatch with a positioned
//! [`ParseError`]; the resulting tree is validated before it is returned.

pub mod ast;
mod error;
mod message;

pub use ast::{Ast, InvalidAst};
pub use error::ParseError;

pub(crate) use message::{is_name_char, is_name_start};

use winnow::error::{ContextError, ErrMode};

/// Parse an MF2 message into a validated [`Ast`].
///
/// # Example
///
/// ```
/// use mf2::parse;
///
/// let ast = parse("Hello, { $name } World!").unwrap();
/// assert_eq!(ast.to_string(), "Hello, { $name } World!");
/// ```
pub fn parse(input: &str) -> Result<Ast, ParseError> {
    let mut remaining = input;

    let message = match message::message(&mut remaining) {
        Ok(message) if remaining.is_empty() => message,
        Ok(_) => {
            let (line, column) = position(input, remaining);
            return Err(ParseError::Syntax {
                line,
                column,
                message: format!(
                    "unexpected character: '{}'",
                    remaining.chars().next().unwrap_or('?')
                ),
            });
        }
        Err(err) => {
            let (line, column) = position(input, remaining);
            if remaining.is_empty() {
                return Err(ParseError::UnexpectedEof { line, column });
            }
            return Err(ParseError::Syntax {
                line,
                column,
                message: describe(&err, remaining),
            });
        }
    };

    let ast = Ast { message };
    ast.validate()?;
    Ok(ast)
}

/// Calculate line and column from the original input and the remaining input.
fn position(original: &str, remaining: &str) -> (usize, usize) {
    let consumed = original.len() - remaining.len();
    let consumed_str = &original[..consumed];
    let line = consumed_str.chars().filter(|&c| c == '\n').count() + 1;
    let column = match consumed_str.rfind('\n') {
        Some(pos) => consumed - pos,
        None => consumed + 1,
    };
    (line, column)
}

/// Render a winnow error as an expected-token hint.
fn describe(err: &ErrMode<ContextError>, remaining: &str) -> String {
    let expected = match err {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e.to_string(),
        ErrMode::Incomplete(_) => String::new(),
    };

    if expected.is_empty() {
        format!(
            "unexpected character: '{}'",
            remaining.chars().next().unwrap_or('?')
        )
    } else {
        expected
    }
}
