//! Numeric parsing helpers for literals with underscore separators.

/// Parse an integer, skipping underscores, without allocating.
///
/// Returns `None` on an invalid digit or on `u64` overflow.
#[inline]
pub(crate) fn parse_int_skip_underscores(s: &str, radix: u32) -> Option<u64> {
    let mut result: u64 = 0;
    let mut any = false;
    for c in s.chars() {
        if c == '_' {
            continue;
        }
        let digit = c.to_digit(radix)?;
        result = result.checked_mul(u64::from(radix))?;
        result = result.checked_add(u64::from(digit))?;
        any = true;
    }
    any.then_some(result)
}

/// Whether every `_` in `s` sits between two digits of `radix`.
///
/// Runs of underscores count as one separator: `1__000` is fine, `1_` and
/// `1_.5` are not.
pub(crate) fn underscores_between_digits(s: &str, radix: u32) -> bool {
    let bytes = s.as_bytes();
    let is_digit = |b: u8| char::from(b).is_digit(radix);
    for (i, &b) in bytes.iter().enumerate() {
        if b != b'_' {
            continue;
        }
        let before = bytes[..i].iter().rev().find(|&&c| c != b'_');
        let after = bytes[i + 1..].iter().find(|&&c| c != b'_');
        match (before, after) {
            (Some(&l), Some(&r)) if is_digit(l) && is_digit(r) => {}
            _ => return false,
        }
    }
    true
}

/// Copy `s` without underscores, borrowing when there are none.
pub(crate) fn strip_underscores(s: &str) -> std::borrow::Cow<'_, str> {
    if s.contains('_') {
        std::borrow::Cow::Owned(s.replace('_', ""))
    } else {
        std::borrow::Cow::Borrowed(s)
    }
}
