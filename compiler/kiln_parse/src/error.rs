//! Parse errors.
//!
//! Grammar rules return the span-only [`ParseError`]. At the crate boundary it
//! becomes a [`ParseFailure`], which adds the 1-based line and column of the
//! error in its unit.

use kiln_diagnostic::span_utils::span_line_col;
use kiln_diagnostic::ErrorCode;
use kiln_ir::Span;
use kiln_lexer::LexError;

/// Error produced inside the grammar.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ParseError {
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        ParseError {
            code,
            message: message.into(),
            span,
        }
    }

    #[cold]
    pub fn unsupported(what: &str, span: Span) -> Self {
        Self::new(ErrorCode::E1008, format!("{what} are not supported"), span)
    }

    #[cold]
    pub fn integer_too_large(span: Span) -> Self {
        Self::new(ErrorCode::E1007, "integer number too large", span)
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            code: err.code,
            message: err.message,
            span: err.span,
        }
    }
}

/// Why a unit could not be parsed, with its position.
#[derive(Clone, Eq, PartialEq, Hash, Debug, thiserror::Error)]
#[error("{line}:{column}: {message}")]
pub struct ParseFailure {
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
    /// 1-based.
    pub line: u32,
    /// 1-based, in characters.
    pub column: u32,
}

impl ParseFailure {
    pub fn from_error(error: ParseError, source: &str) -> Self {
        let (line, column) = span_line_col(source, error.span);
        ParseFailure {
            code: error.code,
            message: error.message,
            span: error.span,
            line,
            column,
        }
    }
}
