//! Recursive descent parser for Kiln sources.
//!
//! [`parse`] turns the text of one compilation unit into a
//! [`CompilationUnit`]. Parsing is purely syntactic: names are not resolved
//! and no semantic rule is checked, with two exceptions the grammar itself
//! imposes (integer literal range and repeated modifiers). Parsing stops at
//! the first error.
//!
//! Constructs outside the supported subset (`switch`, lambdas, method
//! references, labeled statements, anonymous class bodies, records, ...) are
//! rejected with [`ErrorCode::E1008`](kiln_diagnostic::ErrorCode::E1008).

mod cursor;
mod error;
mod grammar;

pub use cursor::{Cursor, GtOperator};
pub use error::{ParseError, ParseFailure};

use kiln_ir::{CompilationUnit, Span, Token, TokenKind, TokenList};

/// Parse one unit of source text.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn parse(source: &str) -> Result<CompilationUnit, ParseFailure> {
    let result = kiln_lexer::lex(source)
        .map_err(ParseError::from)
        .and_then(|tokens| Parser::new(&tokens, source).parse_unit());
    match result {
        Ok(unit) => {
            tracing::debug!(types = unit.types.len(), "parsed unit");
            Ok(unit)
        }
        Err(error) => {
            tracing::debug!(code = %error.code, message = %error.message, "parse failed");
            Err(ParseFailure::from_error(error, source))
        }
    }
}

/// Parser state.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    /// The lexed text, for reading a token's spelling back.
    source: &'a str,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a TokenList, source: &'a str) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            source,
        }
    }

    /// Source text of a token.
    #[inline]
    fn spelling(&self, token: &Token) -> &'a str {
        self.source.get(token.span.to_range()).unwrap_or("")
    }

    #[inline]
    fn current(&self) -> &'a Token {
        self.cursor.current()
    }

    #[inline]
    fn current_kind(&self) -> &'a TokenKind {
        self.cursor.current_kind()
    }

    #[inline]
    fn current_span(&self) -> Span {
        self.cursor.current_span()
    }

    #[inline]
    fn peek_kind(&self, n: usize) -> &'a TokenKind {
        self.cursor.peek_kind(n)
    }

    #[inline]
    fn is_at_end(&self) -> bool {
        self.cursor.is_at_end()
    }

    #[inline]
    fn check(&self, kind: &TokenKind) -> bool {
        self.cursor.check(kind)
    }

    #[inline]
    fn check_ident(&self) -> bool {
        self.cursor.check_ident()
    }

    #[inline]
    fn advance(&mut self) -> &'a Token {
        self.cursor.advance()
    }

    #[inline]
    fn eat(&mut self, kind: &TokenKind) -> bool {
        self.cursor.eat(kind)
    }

    #[inline]
    fn expect(&mut self, kind: &TokenKind) -> Result<Span, ParseError> {
        self.cursor.expect(kind)
    }

    #[inline]
    fn expect_ident(&mut self) -> Result<(String, Span), ParseError> {
        self.cursor.expect_ident()
    }

    /// Span from `start` to the end of the last consumed token.
    #[inline]
    fn span_from(&self, start: Span) -> Span {
        start.merge(self.cursor.previous_span())
    }

    /// Run `f` speculatively: on failure, rewind and return `None`.
    fn try_parse<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, ParseError>) -> Option<T> {
        let saved = self.cursor.position();
        match f(self) {
            Ok(value) => Some(value),
            Err(_) => {
                self.cursor.set_position(saved);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests;
