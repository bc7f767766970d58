//! Parse errors.

use ember_ir::Span;
use ember_lexer::LexError;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("expected {expected}, found {found} at {span}")]
    Unexpected {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("expected {expected}, found end of input")]
    UnexpectedEof { expected: String },

    #[error("invalid assignment target at {span}")]
    InvalidAssignTarget { span: Span },

    #[error("parameter `{name}` without default follows a defaulted parameter at {span}")]
    DefaultOrder { name: String, span: Span },
}

impl ParseError {
    /// Source location of the error, when there is one.
    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::Lex(err) => Some(err.span),
            ParseError::Unexpected { span, .. }
            | ParseError::InvalidAssignTarget { span }
            | ParseError::DefaultOrder { span, .. } => Some(*span),
            ParseError::UnexpectedEof { .. } => None,
        }
    }
}
