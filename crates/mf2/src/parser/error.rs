//! Parse error types.

use thiserror::Error;

use crate::parser::ast::InvalidAst;

/// An error that occurred while parsing an MF2 message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// A syntax error with location information and an expected-token hint.
    #[error("syntax error at {line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    /// The input ended in the middle of a production.
    #[error("unexpected end of input at {line}:{column}")]
    UnexpectedEof { line: usize, column: usize },

    /// The input parsed but the tree violates a structural invariant.
    #[error(transparent)]
    Invalid(#[from] InvalidAst),
}
