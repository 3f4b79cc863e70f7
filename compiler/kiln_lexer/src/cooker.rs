//! Turns raw tokens into cooked [`TokenKind`]s.
//!
//! Keywords and punctuation map one to one. Literals are decoded here:
//! integers by radix and suffix with the language's range rules, floating
//! point literals to IEEE bits, character and string literals through
//! escape processing.

use kiln_ir::{Span, TokenKind};

use crate::cook_escape::{unescape, unescape_char};
use crate::lex_error::LexError;
use crate::parse_helpers::{
    parse_int_skip_underscores, strip_underscores, underscores_between_digits,
};
use crate::raw_token::RawToken;

const INT_MIN_MAGNITUDE: u64 = 1 << 31;
const LONG_MIN_MAGNITUDE: u64 = 1 << 63;

/// Cook one raw token. Comments cook to `None`.
pub(crate) fn cook(raw: RawToken, slice: &str, span: Span) -> Result<Option<TokenKind>, LexError> {
    let kind = match raw {
        RawToken::LineComment | RawToken::BlockComment => return Ok(None),
        RawToken::DecInt | RawToken::HexInt | RawToken::BinInt => cook_integer(slice, span)?,
        RawToken::Float => cook_float(slice, span)?,
        RawToken::String => {
            let content = &slice[1..slice.len() - 1];
            TokenKind::String(unescape(content, span.start + 1)?)
        }
        RawToken::Char => {
            let content = &slice[1..slice.len() - 1];
            TokenKind::Char(unescape_char(content, span.start + 1, span)?)
        }
        RawToken::Ident => TokenKind::Ident(slice.to_owned()),

        RawToken::UnterminatedString => return Err(LexError::unterminated_string(span)),
        RawToken::UnterminatedChar => return Err(LexError::unterminated_char(span)),
        RawToken::UnterminatedComment => return Err(LexError::unterminated_comment(span)),
        RawToken::TextBlock => return Err(LexError::text_block(span)),

        RawToken::Package => TokenKind::Package,
        RawToken::Import => TokenKind::Import,
        RawToken::Class => TokenKind::Class,
        RawToken::Interface => TokenKind::Interface,
        RawToken::Enum => TokenKind::Enum,
        RawToken::Extends => TokenKind::Extends,
        RawToken::Implements => TokenKind::Implements,
        RawToken::Throws => TokenKind::Throws,
        RawToken::Public => TokenKind::Public,
        RawToken::Protected => TokenKind::Protected,
        RawToken::Private => TokenKind::Private,
        RawToken::Static => TokenKind::Static,
        RawToken::Final => TokenKind::Final,
        RawToken::Abstract => TokenKind::Abstract,
        RawToken::Native => TokenKind::Native,
        RawToken::Synchronized => TokenKind::Synchronized,
        RawToken::Transient => TokenKind::Transient,
        RawToken::Volatile => TokenKind::Volatile,
        RawToken::Strictfp => TokenKind::Strictfp,
        RawToken::Default => TokenKind::Default,
        RawToken::Void => TokenKind::Void,
        RawToken::Boolean => TokenKind::Boolean,
        RawToken::Byte => TokenKind::Byte,
        RawToken::Short => TokenKind::Short,
        RawToken::IntKw => TokenKind::IntKw,
        RawToken::LongKw => TokenKind::LongKw,
        RawToken::CharKw => TokenKind::CharKw,
        RawToken::FloatKw => TokenKind::FloatKw,
        RawToken::DoubleKw => TokenKind::DoubleKw,
        RawToken::If => TokenKind::If,
        RawToken::Else => TokenKind::Else,
        RawToken::While => TokenKind::While,
        RawToken::Do => TokenKind::Do,
        RawToken::For => TokenKind::For,
        RawToken::Return => TokenKind::Return,
        RawToken::Throw => TokenKind::Throw,
        RawToken::Break => TokenKind::Break,
        RawToken::Continue => TokenKind::Continue,
        RawToken::Try => TokenKind::Try,
        RawToken::Catch => TokenKind::Catch,
        RawToken::Finally => TokenKind::Finally,
        RawToken::New => TokenKind::New,
        RawToken::This => TokenKind::This,
        RawToken::Super => TokenKind::Super,
        RawToken::Instanceof => TokenKind::Instanceof,
        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,
        RawToken::Null => TokenKind::Null,
        RawToken::Switch => TokenKind::Switch,
        RawToken::Case => TokenKind::Case,
        RawToken::Assert => TokenKind::Assert,

        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Dot => TokenKind::Dot,
        RawToken::Ellipsis => TokenKind::Ellipsis,
        RawToken::At => TokenKind::At,
        RawToken::Question => TokenKind::Question,
        RawToken::Colon => TokenKind::Colon,
        RawToken::ColonColon => TokenKind::ColonColon,
        RawToken::Arrow => TokenKind::Arrow,

        RawToken::Eq => TokenKind::Eq,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::Bang => TokenKind::Bang,
        RawToken::BangEq => TokenKind::BangEq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::Gt => TokenKind::Gt,
        RawToken::Tilde => TokenKind::Tilde,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::Amp => TokenKind::Amp,
        RawToken::AmpAmp => TokenKind::AmpAmp,
        RawToken::Pipe => TokenKind::Pipe,
        RawToken::PipePipe => TokenKind::PipePipe,
        RawToken::Caret => TokenKind::Caret,
        RawToken::Shl => TokenKind::Shl,
        RawToken::PlusPlus => TokenKind::PlusPlus,
        RawToken::MinusMinus => TokenKind::MinusMinus,
        RawToken::PlusEq => TokenKind::PlusEq,
        RawToken::MinusEq => TokenKind::MinusEq,
        RawToken::StarEq => TokenKind::StarEq,
        RawToken::SlashEq => TokenKind::SlashEq,
        RawToken::PercentEq => TokenKind::PercentEq,
        RawToken::AmpEq => TokenKind::AmpEq,
        RawToken::PipeEq => TokenKind::PipeEq,
        RawToken::CaretEq => TokenKind::CaretEq,
        RawToken::ShlEq => TokenKind::ShlEq,
    };
    Ok(Some(kind))
}

/// Cook an integer literal.
///
/// Decimal `int` literals may not exceed `2^31` and decimal `long` literals
/// may not exceed `2^63`; those boundary values become [`TokenKind::IntMin`]
/// and [`TokenKind::LongMin`]. Hex, octal and binary literals may use every
/// bit of their type.
pub(crate) fn cook_integer(slice: &str, span: Span) -> Result<TokenKind, LexError> {
    let (body, is_long) = match slice.strip_suffix(['l', 'L']) {
        Some(body) => (body, true),
        None => (slice, false),
    };

    let (digits, radix) = if let Some(rest) = body.strip_prefix("0x").or(body.strip_prefix("0X")) {
        (rest, 16)
    } else if let Some(rest) = body.strip_prefix("0b").or(body.strip_prefix("0B")) {
        (rest, 2)
    } else if body.len() > 1 && body.starts_with('0') {
        (body, 8)
    } else {
        (body, 10)
    };

    if digits.is_empty() || !digits.chars().all(|c| c == '_' || c.is_digit(radix)) {
        return Err(LexError::malformed_number(
            format!("invalid {} literal `{slice}`", radix_name(radix)),
            span,
        ));
    }
    if !underscores_between_digits(digits, radix) {
        return Err(LexError::malformed_number(
            "illegal underscore in number literal",
            span,
        ));
    }

    let Some(value) = parse_int_skip_underscores(digits, radix) else {
        return Err(LexError::integer_too_large(span));
    };

    match (is_long, radix) {
        (true, 10) if value == LONG_MIN_MAGNITUDE => Ok(TokenKind::LongMin),
        (true, 10) if value > LONG_MIN_MAGNITUDE => Err(LexError::integer_too_large(span)),
        (true, _) => Ok(TokenKind::Long(value)),
        (false, 10) if value == INT_MIN_MAGNITUDE => Ok(TokenKind::IntMin),
        (false, 10) if value > INT_MIN_MAGNITUDE => Err(LexError::integer_too_large(span)),
        (false, _) => u32::try_from(value)
            .map(TokenKind::Int)
            .map_err(|_| LexError::integer_too_large(span)),
    }
}

fn radix_name(radix: u32) -> &'static str {
    match radix {
        16 => "hexadecimal",
        8 => "octal",
        2 => "binary",
        _ => "decimal",
    }
}

/// Cook a floating point literal. Without a suffix or with `d`/`D` it is a
/// `double`; with `f`/`F` a `float`.
pub(crate) fn cook_float(slice: &str, span: Span) -> Result<TokenKind, LexError> {
    let (body, is_float) = if let Some(body) = slice.strip_suffix(['f', 'F']) {
        (body, true)
    } else if let Some(body) = slice.strip_suffix(['d', 'D']) {
        (body, false)
    } else {
        (slice, false)
    };

    if !underscores_between_digits(body, 10) {
        return Err(LexError::malformed_number(
            "illegal underscore in number literal",
            span,
        ));
    }

    let text = strip_underscores(body);
    let mantissa_nonzero = text
        .split(['e', 'E'])
        .next()
        .is_some_and(|m| m.bytes().any(|b| matches!(b, b'1'..=b'9')));

    let malformed = || LexError::malformed_number(format!("malformed number `{slice}`"), span);

    if is_float {
        let value: f32 = text.parse().map_err(|_| malformed())?;
        check_float_range(value.is_infinite(), value == 0.0 && mantissa_nonzero, span)?;
        Ok(TokenKind::Float(value.to_bits()))
    } else {
        let value: f64 = text.parse().map_err(|_| malformed())?;
        check_float_range(value.is_infinite(), value == 0.0 && mantissa_nonzero, span)?;
        Ok(TokenKind::Double(value.to_bits()))
    }
}

fn check_float_range(too_large: bool, too_small: bool, span: Span) -> Result<(), LexError> {
    if too_large {
        Err(LexError::malformed_number(
            "floating-point number too large",
            span,
        ))
    } else if too_small {
        Err(LexError::malformed_number(
            "floating-point number too small",
            span,
        ))
    } else {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
