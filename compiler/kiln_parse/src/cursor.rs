//! Token cursor for navigating the token stream.
//!
//! Provides token access, lookahead, consumption, and the reassembly of `>`
//! runs into shift and comparison operators.

use kiln_diagnostic::ErrorCode;
use kiln_ir::{Span, Token, TokenKind, TokenList};

use crate::ParseError;

/// Operator spelled by a run of adjacent `>` (and `=`) tokens.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GtOperator {
    Gt,
    GtEq,
    Shr,
    UShr,
    ShrAssign,
    UShrAssign,
}

impl GtOperator {
    /// Number of tokens the operator spans.
    pub fn token_count(self) -> usize {
        match self {
            GtOperator::Gt => 1,
            GtOperator::GtEq | GtOperator::Shr => 2,
            GtOperator::UShr | GtOperator::ShrAssign => 3,
            GtOperator::UShrAssign => 4,
        }
    }
}

/// Cursor over a lexed unit.
///
/// Invariant: the position is always within `0..tokens.len()`, and the last
/// token is `Eof`, so the current token always exists.
pub struct Cursor<'a> {
    tokens: &'a TokenList,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a TokenList) -> Self {
        Cursor { tokens, pos: 0 }
    }

    /// Current position, for speculative parsing.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Roll back to a position returned by [`Cursor::position`].
    pub fn set_position(&mut self, pos: usize) {
        debug_assert!(pos < self.tokens.len(), "cursor position out of bounds");
        self.pos = pos;
    }

    #[inline]
    pub fn current(&self) -> &'a Token {
        self.peek_token(0)
    }

    #[inline]
    pub fn current_kind(&self) -> &'a TokenKind {
        &self.current().kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    #[inline]
    pub fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            Span::DUMMY
        }
    }

    /// Token `n` positions ahead; `Eof` past the end.
    pub fn peek_token(&self, n: usize) -> &'a Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + n).min(last)]
    }

    #[inline]
    pub fn peek_kind(&self, n: usize) -> &'a TokenKind {
        &self.peek_token(n).kind
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    /// Check the current token's variant, ignoring payloads.
    #[inline]
    pub fn check(&self, kind: &TokenKind) -> bool {
        self.current_kind().same_variant(kind)
    }

    #[inline]
    pub fn check_ident(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Ident(_))
    }

    /// Advance and return the consumed token. Never moves past `Eof`.
    #[inline]
    pub fn advance(&mut self) -> &'a Token {
        let token = self.current();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Consume the current token if it matches.
    #[inline]
    pub fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn expect(&mut self, kind: &TokenKind) -> Result<Span, ParseError> {
        if self.check(kind) {
            Ok(self.advance().span)
        } else {
            Err(self.make_expect_error(kind.display_name()))
        }
    }

    #[cold]
    #[inline(never)]
    pub fn make_expect_error(&self, expected: &str) -> ParseError {
        ParseError::new(
            ErrorCode::E1001,
            format!(
                "expected {expected}, found {}",
                self.current_kind().display_name()
            ),
            self.current_span(),
        )
    }

    /// Expect and consume an identifier.
    #[inline]
    pub fn expect_ident(&mut self) -> Result<(String, Span), ParseError> {
        if let TokenKind::Ident(name) = self.current_kind() {
            let span = self.advance().span;
            Ok((name.clone(), span))
        } else {
            Err(self.make_expect_ident_error())
        }
    }

    #[cold]
    #[inline(never)]
    fn make_expect_ident_error(&self) -> ParseError {
        ParseError::new(
            ErrorCode::E1004,
            format!(
                "expected identifier, found {}",
                self.current_kind().display_name()
            ),
            self.current_span(),
        )
    }

    /// Whether the `n` tokens starting at the cursor have the given kinds and
    /// touch each other with no whitespace in between.
    fn adjacent_run(&self, kinds: &[TokenKind]) -> bool {
        kinds.iter().enumerate().all(|(i, kind)| {
            let token = self.peek_token(i);
            token.kind.same_variant(kind)
                && (i == 0 || self.peek_token(i - 1).span.end == token.span.start)
        })
    }

    /// Operator formed by the `>` run at the cursor, longest first.
    pub fn gt_operator(&self) -> Option<GtOperator> {
        use TokenKind::{Eq, Gt};
        if !self.check(&Gt) {
            return None;
        }
        let op = if self.adjacent_run(&[Gt, Gt, Gt, Eq]) {
            GtOperator::UShrAssign
        } else if self.adjacent_run(&[Gt, Gt, Eq]) {
            GtOperator::ShrAssign
        } else if self.adjacent_run(&[Gt, Gt, Gt]) {
            GtOperator::UShr
        } else if self.adjacent_run(&[Gt, Gt]) {
            GtOperator::Shr
        } else if self.adjacent_run(&[Gt, Eq]) {
            GtOperator::GtEq
        } else {
            GtOperator::Gt
        };
        Some(op)
    }

    /// Consume a `>` operator, returning its merged span.
    pub fn consume_gt_operator(&mut self, op: GtOperator) -> Span {
        let start = self.current_span();
        let mut end = start;
        for _ in 0..op.token_count() {
            end = self.advance().span;
        }
        start.merge(end)
    }
}
