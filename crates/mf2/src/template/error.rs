//! Error types for template evaluation.

use thiserror::Error;

use crate::template::registry::FuncError;

/// An error recorded while rendering a message.
///
/// Rendering is best-effort: benign errors (unresolved variables, unsupported
/// reserved syntax) produce placeholder output and rendering continues, while
/// fatal errors terminate the render. Both kinds end up in the error set
/// returned alongside the rendered text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    /// A variable reference is not bound in the environment.
    #[error("unresolved variable '${0}'")]
    UnresolvedVariable(String),

    /// An annotation names a function absent from the registry.
    #[error("unknown function reference '{0}'")]
    UnknownFunction(String),

    /// The same option key appears twice on one annotation.
    #[error("duplicate option name '{0}'")]
    DuplicateOptionName(String),

    /// The same variable is bound twice by `.input`/`.local` declarations.
    #[error("duplicate declaration of '${0}'")]
    DuplicateDeclaration(String),

    /// A reserved statement at declaration position.
    #[error("unsupported statement '.{0}'")]
    UnsupportedStatement(String),

    /// A private-use or reserved annotation, or a function lacking the
    /// callable required for its position.
    #[error("unsupported expression: {0}")]
    UnsupportedExpression(String),

    /// A matcher selector with neither an annotation nor an operand to
    /// infer one from.
    #[error("missing selector annotation")]
    MissingSelectorAnnotation,

    /// A selector function failed.
    #[error("selection error: {0}")]
    Selection(String),

    /// A format function failed.
    #[error("formatting error: {0}")]
    Formatting(String),

    /// An operand value not acceptable to the function.
    #[error("operand mismatch: {0}")]
    OperandMismatch(String),

    /// An option unknown to the function, or with an out-of-range value.
    #[error("unsupported option: {0}")]
    UnsupportedOption(String),
}

impl From<FuncError> for RenderError {
    fn from(error: FuncError) -> Self {
        match error {
            FuncError::OperandMismatch(message) => RenderError::OperandMismatch(message),
            FuncError::UnsupportedOption(message) => RenderError::UnsupportedOption(message),
            FuncError::Formatting(message) => RenderError::Formatting(message),
        }
    }
}
