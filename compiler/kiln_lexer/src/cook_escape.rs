//! Escape processing for string and character literals.
//!
//! Recognized escapes: `\b \t \n \f \r \s \" \' \\`, octal escapes `\0` to
//! `\377`, and unicode escapes `\uXXXX` (any number of `u`s). Anything else
//! is an error located at the offending escape.

use kiln_ir::Span;

use crate::lex_error::LexError;

#[inline]
fn resolve_simple_escape(c: char) -> Option<char> {
    match c {
        'b' => Some('\u{8}'),
        't' => Some('\t'),
        'n' => Some('\n'),
        'f' => Some('\u{c}'),
        'r' => Some('\r'),
        's' => Some(' '),
        '"' => Some('"'),
        '\'' => Some('\''),
        '\\' => Some('\\'),
        _ => None,
    }
}

/// Decode the content of a string literal (between its quotes).
///
/// `base` is the byte offset of `content` in the unit, for error spans.
/// Escaped surrogate pairs combine into one character; a lone surrogate
/// cannot be represented in a `String` and is rejected.
pub(crate) fn unescape(content: &str, base: u32) -> Result<String, LexError> {
    if !content.contains('\\') {
        return Ok(content.to_owned());
    }
    let units = decode_units(content, base)?;
    String::from_utf16(&units)
        .map_err(|_| LexError::invalid_unicode_escape(escape_span(base, 0, content.len())))
}

/// Decode a character literal's content into exactly one UTF-16 code unit.
///
/// Any code unit is a valid `char` value, lone surrogates included; a
/// character outside the basic plane needs two units and is rejected.
pub(crate) fn unescape_char(content: &str, base: u32, literal: Span) -> Result<u16, LexError> {
    match decode_units(content, base)?.as_slice() {
        [unit] => Ok(*unit),
        [] => Err(LexError::empty_char(literal)),
        _ => Err(LexError::unterminated_char(literal)),
    }
}

/// Decode literal content into UTF-16 code units, resolving escapes.
fn decode_units(content: &str, base: u32) -> Result<Vec<u16>, LexError> {
    let mut units = Vec::with_capacity(content.len());
    let mut buf = [0u16; 2];
    let bytes = content.as_bytes();
    let mut i = 0;
    while i < content.len() {
        let Some(c) = content[i..].chars().next() else {
            break;
        };
        if c != '\\' {
            units.extend_from_slice(c.encode_utf16(&mut buf));
            i += c.len_utf8();
            continue;
        }

        let start = i;
        i += 1;
        let Some(esc) = content[i..].chars().next() else {
            return Err(LexError::invalid_escape(escape_span(base, start, i)));
        };

        if let Some(resolved) = resolve_simple_escape(esc) {
            units.extend_from_slice(resolved.encode_utf16(&mut buf));
            i += 1;
        } else if esc.is_digit(8) {
            // Up to three octal digits; three only when the first is 0-3.
            let max_len = if esc <= '3' { 3 } else { 2 };
            let mut value = 0u16;
            let mut len = 0;
            while len < max_len && i < bytes.len() && char::from(bytes[i]).is_digit(8) {
                value = value * 8 + u16::from(bytes[i] - b'0');
                i += 1;
                len += 1;
            }
            units.push(value);
        } else if esc == 'u' {
            while i < bytes.len() && bytes[i] == b'u' {
                i += 1;
            }
            let hex = content.get(i..i + 4).unwrap_or("");
            let decoded = (hex.len() == 4 && hex.bytes().all(|b| b.is_ascii_hexdigit()))
                .then(|| u16::from_str_radix(hex, 16).ok())
                .flatten();
            match decoded {
                Some(unit) => {
                    units.push(unit);
                    i += 4;
                }
                None => {
                    let end = (i + hex.len()).min(content.len());
                    return Err(LexError::invalid_unicode_escape(escape_span(
                        base, start, end,
                    )));
                }
            }
        } else {
            return Err(LexError::invalid_escape(escape_span(
                base,
                start,
                i + esc.len_utf8(),
            )));
        }
    }

    Ok(units)
}

fn escape_span(base: u32, start: usize, end: usize) -> Span {
    let offset = |i: usize| base.saturating_add(u32::try_from(i).unwrap_or(u32::MAX));
    Span::new(offset(start), offset(end))
}
