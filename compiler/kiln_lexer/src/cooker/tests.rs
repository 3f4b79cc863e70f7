use pretty_assertions::assert_eq;

use super::*;
use kiln_diagnostic::ErrorCode;

const SPAN: Span = Span::new(0, 1);

fn int(slice: &str) -> TokenKind {
    cook_integer(slice, SPAN).unwrap()
}

fn int_err(slice: &str) -> ErrorCode {
    cook_integer(slice, SPAN).unwrap_err().code
}

fn float(slice: &str) -> TokenKind {
    cook_float(slice, SPAN).unwrap()
}

// === Integers ===

#[test]
fn radix_spellings_share_a_value() {
    for spelling in ["16", "0x10", "0X10", "020", "0b1_0000", "0B10000", "1_6"] {
        assert_eq!(int(spelling), TokenKind::Int(16), "{spelling}");
    }
    assert_eq!(int("0"), TokenKind::Int(0));
    assert_eq!(int("00"), TokenKind::Int(0));
}

#[test]
fn long_suffix() {
    assert_eq!(int("16L"), TokenKind::Long(16));
    assert_eq!(int("0x10l"), TokenKind::Long(16));
    assert_eq!(int("0xFFFF_FFFF_FFFF_FFFFL"), TokenKind::Long(u64::MAX));
}

#[test]
fn decimal_int_boundaries() {
    assert_eq!(int("2147483647"), TokenKind::Int(0x7FFF_FFFF));
    assert_eq!(int("2147483648"), TokenKind::IntMin);
    assert_eq!(int_err("2147483649"), ErrorCode::E1007);
    assert_eq!(int_err("99999999999999999999999"), ErrorCode::E1007);
}

#[test]
fn decimal_long_boundaries() {
    assert_eq!(int("9223372036854775807L"), TokenKind::Long(0x7FFF_FFFF_FFFF_FFFF));
    assert_eq!(int("9223372036854775808L"), TokenKind::LongMin);
    assert_eq!(int_err("9223372036854775809L"), ErrorCode::E1007);
}

#[test]
fn non_decimal_ints_use_every_bit() {
    assert_eq!(int("0xFFFFFFFF"), TokenKind::Int(u32::MAX));
    assert_eq!(int("0x80000000"), TokenKind::Int(0x8000_0000));
    assert_eq!(int("037777777777"), TokenKind::Int(u32::MAX));
    assert_eq!(int_err("0x1_0000_0000"), ErrorCode::E1007);
}

#[test]
fn malformed_integers() {
    assert_eq!(int_err("09"), ErrorCode::E0003);
    assert_eq!(int_err("0x"), ErrorCode::E0003);
    assert_eq!(int_err("0b102"), ErrorCode::E0003);
    assert_eq!(int_err("1_"), ErrorCode::E0003);
    assert_eq!(int_err("0x_1"), ErrorCode::E0003);
    assert_eq!(
        cook_integer("09", SPAN).unwrap_err().message,
        "invalid octal literal `09`"
    );
}

// === Floating point ===

#[test]
fn double_spellings_share_a_value() {
    let one = TokenKind::Double(1.0f64.to_bits());
    for spelling in ["1.0", "1e0", "1.0d", "1.", "1D", "10e-1", "0.1e1"] {
        assert_eq!(float(spelling), one, "{spelling}");
    }
    assert_eq!(float(".5"), TokenKind::Double(0.5f64.to_bits()));
    assert_eq!(float("1_000.5"), TokenKind::Double(1000.5f64.to_bits()));
}

#[test]
fn float_suffix_is_a_different_type() {
    assert_eq!(float("1.0f"), TokenKind::Float(1.0f32.to_bits()));
    assert_eq!(float("1F"), TokenKind::Float(1.0f32.to_bits()));
    assert_ne!(float("1.0f"), float("1.0"));
}

#[test]
fn float_range() {
    let err = cook_float("1e40f", SPAN).unwrap_err();
    assert_eq!(err.message, "floating-point number too large");
    let err = cook_float("1e-50f", SPAN).unwrap_err();
    assert_eq!(err.message, "floating-point number too small");
    assert_eq!(float("0.0f"), TokenKind::Float(0.0f32.to_bits()));
    assert_eq!(float("0e10"), TokenKind::Double(0.0f64.to_bits()));
    assert!(cook_float("1e400", SPAN).is_err());
}

#[test]
fn float_underscores() {
    assert_eq!(cook_float("1_.0", SPAN).unwrap_err().code, ErrorCode::E0003);
    assert_eq!(cook_float("1._0", SPAN).unwrap_err().code, ErrorCode::E0003);
    assert_eq!(cook_float("1e_5", SPAN).unwrap_err().code, ErrorCode::E0003);
}

// === Other tokens ===

#[test]
fn comments_cook_to_nothing() {
    assert_eq!(cook(RawToken::LineComment, "// x", SPAN).unwrap(), None);
    assert_eq!(cook(RawToken::BlockComment, "/* x */", SPAN).unwrap(), None);
}

#[test]
fn string_and_char_literals() {
    assert_eq!(
        cook(RawToken::String, r#""a\tb""#, Span::new(0, 6)).unwrap(),
        Some(TokenKind::String("a\tb".to_string()))
    );
    assert_eq!(
        cook(RawToken::Char, r"'\101'", Span::new(0, 6)).unwrap(),
        Some(TokenKind::Char(u16::from(b'A')))
    );
    assert_eq!(
        cook(RawToken::Ident, "foo", SPAN).unwrap(),
        Some(TokenKind::Ident("foo".to_string()))
    );
}

#[test]
fn unterminated_literals_are_errors() {
    assert_eq!(
        cook(RawToken::UnterminatedString, "\"abc", SPAN).unwrap_err().code,
        ErrorCode::E0001
    );
    assert_eq!(
        cook(RawToken::UnterminatedChar, "'a", SPAN).unwrap_err().code,
        ErrorCode::E0004
    );
    assert_eq!(
        cook(RawToken::UnterminatedComment, "/*", SPAN).unwrap_err().code,
        ErrorCode::E0006
    );
    assert_eq!(
        cook(RawToken::TextBlock, "\"\"\"", SPAN).unwrap_err().code,
        ErrorCode::E1008
    );
}
