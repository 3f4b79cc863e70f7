//! Lexer errors.
//!
//! Lexing stops at the first error. Each error carries the code of its class
//! and the span of the offending text.

use kiln_diagnostic::ErrorCode;
use kiln_ir::Span;

#[derive(Clone, Debug, Eq, PartialEq, Hash, thiserror::Error)]
#[error("{message}")]
pub struct LexError {
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
}

impl LexError {
    fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        LexError {
            code,
            message: message.into(),
            span,
        }
    }

    #[cold]
    pub(crate) fn unterminated_string(span: Span) -> Self {
        Self::new(ErrorCode::E0001, "unclosed string literal", span)
    }

    #[cold]
    pub(crate) fn invalid_character(c: char, span: Span) -> Self {
        Self::new(
            ErrorCode::E0002,
            format!("illegal character: '{}'", c.escape_default()),
            span,
        )
    }

    #[cold]
    pub(crate) fn source_too_large(len: usize) -> Self {
        Self::new(
            ErrorCode::E0002,
            format!("source of {len} bytes exceeds the 4 GiB limit"),
            Span::DUMMY,
        )
    }

    #[cold]
    pub(crate) fn malformed_number(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorCode::E0003, message, span)
    }

    #[cold]
    pub(crate) fn empty_char(span: Span) -> Self {
        Self::new(ErrorCode::E0004, "empty character literal", span)
    }

    #[cold]
    pub(crate) fn unterminated_char(span: Span) -> Self {
        Self::new(ErrorCode::E0004, "unclosed character literal", span)
    }

    #[cold]
    pub(crate) fn invalid_escape(span: Span) -> Self {
        Self::new(ErrorCode::E0005, "illegal escape character", span)
    }

    #[cold]
    pub(crate) fn invalid_unicode_escape(span: Span) -> Self {
        Self::new(ErrorCode::E0005, "illegal unicode escape", span)
    }

    #[cold]
    pub(crate) fn unterminated_comment(span: Span) -> Self {
        Self::new(ErrorCode::E0006, "unclosed comment", span)
    }

    #[cold]
    pub(crate) fn integer_too_large(span: Span) -> Self {
        Self::new(ErrorCode::E1007, "integer number too large", span)
    }

    #[cold]
    pub(crate) fn text_block(span: Span) -> Self {
        Self::new(ErrorCode::E1008, "text blocks are not supported", span)
    }
}
