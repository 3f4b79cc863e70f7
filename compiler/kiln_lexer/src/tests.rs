use pretty_assertions::assert_eq;

use super::*;
use kiln_diagnostic::ErrorCode;

fn kinds(source: &str) -> Vec<TokenKind> {
    lex(source).unwrap().iter().map(|t| t.kind.clone()).collect()
}

fn ident(name: &str) -> TokenKind {
    TokenKind::Ident(name.to_string())
}

#[test]
fn lex_field_declaration() {
    assert_eq!(
        kinds("private int x = 0x10;"),
        vec![
            TokenKind::Private,
            TokenKind::IntKw,
            ident("x"),
            TokenKind::Eq,
            TokenKind::Int(16),
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn comments_and_whitespace_are_dropped() {
    let plain = kinds("class A { void f() { g(); } }");
    let noisy = kinds(
        "/** doc */ class A {\n  // line\n  void f( /* c */ ) {\r\n\tg();\n  }\n}\n",
    );
    assert_eq!(plain, noisy);
}

#[test]
fn closing_angles_stay_separate() {
    assert_eq!(
        kinds("List<List<String>>"),
        vec![
            ident("List"),
            TokenKind::Lt,
            ident("List"),
            TokenKind::Lt,
            ident("String"),
            TokenKind::Gt,
            TokenKind::Gt,
            TokenKind::Eof,
        ]
    );
    assert_eq!(
        kinds("a >>>= b"),
        vec![
            ident("a"),
            TokenKind::Gt,
            TokenKind::Gt,
            TokenKind::Gt,
            TokenKind::Eq,
            ident("b"),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn longest_operator_wins() {
    assert_eq!(
        kinds("i-->0"),
        vec![
            ident("i"),
            TokenKind::MinusMinus,
            TokenKind::Gt,
            TokenKind::Int(0),
            TokenKind::Eof,
        ]
    );
    assert_eq!(
        kinds("x <<= 1"),
        vec![ident("x"), TokenKind::ShlEq, TokenKind::Int(1), TokenKind::Eof]
    );
    assert_eq!(
        kinds("String... args"),
        vec![
            ident("String"),
            TokenKind::Ellipsis,
            ident("args"),
            TokenKind::Eof
        ]
    );
}

#[test]
fn keywords_versus_identifiers() {
    assert_eq!(
        kinds("classy class $x _y"),
        vec![
            ident("classy"),
            TokenKind::Class,
            ident("$x"),
            ident("_y"),
            TokenKind::Eof
        ]
    );
}

#[test]
fn literals() {
    assert_eq!(
        kinds(r#"'A' "hi\n" 1.5f 2.0 3L true null"#),
        vec![
            TokenKind::Char(u16::from(b'A')),
            TokenKind::String("hi\n".to_string()),
            TokenKind::Float(1.5f32.to_bits()),
            TokenKind::Double(2.0f64.to_bits()),
            TokenKind::Long(3),
            TokenKind::True,
            TokenKind::Null,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn spans_cover_tokens() {
    let tokens = lex("int  xy;").unwrap();
    assert_eq!(tokens[0].span, Span::new(0, 3));
    assert_eq!(tokens[1].span, Span::new(5, 7));
    assert_eq!(tokens[2].span, Span::new(7, 8));
    assert_eq!(tokens[3].span, Span::point(8));
    assert_eq!(tokens.len(), 4);
}

#[test]
fn empty_source_is_just_eof() {
    assert_eq!(kinds(""), vec![TokenKind::Eof]);
    assert_eq!(kinds("  // nothing\n"), vec![TokenKind::Eof]);
}

#[test]
fn lex_errors() {
    let err = lex("int x = \"abc;\n").unwrap_err();
    assert_eq!(err.code, ErrorCode::E0001);
    assert_eq!(err.span.start, 8);

    let err = lex("class A { /* never closed").unwrap_err();
    assert_eq!(err.code, ErrorCode::E0006);
    assert_eq!(err.span.start, 10);

    let err = lex("int # x;").unwrap_err();
    assert_eq!(err.code, ErrorCode::E0002);
    assert_eq!(err.message, "illegal character: '#'");

    let err = lex("char c = '';").unwrap_err();
    assert_eq!(err.code, ErrorCode::E0004);

    let err = lex("String s = \"\"\"\n  text\n  \"\"\";").unwrap_err();
    assert_eq!(err.code, ErrorCode::E1008);

    let err = lex("int x = 2147483649;").unwrap_err();
    assert_eq!(err.code, ErrorCode::E1007);
    assert_eq!(err.to_string(), "integer number too large");
}
