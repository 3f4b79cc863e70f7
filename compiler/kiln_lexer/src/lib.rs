//! Lexer for Kiln sources, built on logos.
//!
//! Produces a [`TokenList`] with literal values already decoded. Whitespace
//! and comments are dropped. Lexing stops at the first error.

mod cook_escape;
mod cooker;
mod lex_error;
mod parse_helpers;
mod raw_token;

use kiln_ir::{Span, Token, TokenKind, TokenList};
use logos::Logos;

pub use lex_error::LexError;
use raw_token::RawToken;

/// Lex a whole unit into tokens terminated by `Eof`.
pub fn lex(source: &str) -> Result<TokenList, LexError> {
    let eof = u32::try_from(source.len()).map_err(|_| LexError::source_too_large(source.len()))?;

    let mut result = TokenList::new();
    let mut logos = RawToken::lexer(source);

    while let Some(token_result) = logos.next() {
        let range = logos.span();
        let span = Span::try_from_range(range.clone())
            .map_err(|_| LexError::source_too_large(source.len()))?;

        match token_result {
            Ok(raw) => {
                if let Some(kind) = cooker::cook(raw, logos.slice(), span)? {
                    result.push(Token::new(kind, span));
                }
            }
            Err(()) => return Err(classify_error(&source[range.start..], span)),
        }
    }

    result.push(Token::new(TokenKind::Eof, Span::point(eof)));
    Ok(result)
}

/// Name the error logos could not match, by what the text starts with.
#[cold]
fn classify_error(rest: &str, span: Span) -> LexError {
    if rest.starts_with("/*") {
        LexError::unterminated_comment(span)
    } else if rest.starts_with('"') {
        LexError::unterminated_string(span)
    } else if rest.starts_with('\'') {
        LexError::unterminated_char(span)
    } else {
        let c = rest.chars().next().unwrap_or('\0');
        LexError::invalid_character(c, span)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
