//! Token types produced by the lexer and consumed by the parser.

use std::fmt;

use crate::Span;

/// A cooked token: literal values are already decoded, comments and
/// whitespace are gone.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

/// Token kinds.
///
/// `>` is never merged with a following `>` or `=` by the lexer, so that
/// `List<List<String>>` closes two type argument lists. The parser rebuilds
/// `>=`, `>>`, `>>>` and their assignment forms from adjacent tokens.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // Literals
    Ident(String),
    /// `int` literal as its 32-bit pattern.
    Int(u32),
    /// `long` literal as its 64-bit pattern.
    Long(u64),
    /// Decimal `2147483648`, only valid as the operand of unary minus.
    IntMin,
    /// Decimal `9223372036854775808L`, only valid as the operand of unary minus.
    LongMin,
    /// `float` literal bits.
    Float(u32),
    /// `double` literal bits.
    Double(u64),
    /// `char` literal as its UTF-16 code unit.
    Char(u16),
    String(String),

    // Declaration keywords
    Package,
    Import,
    Class,
    Interface,
    Enum,
    Extends,
    Implements,
    Throws,

    // Modifiers
    Public,
    Protected,
    Private,
    Static,
    Final,
    Abstract,
    Native,
    Synchronized,
    Transient,
    Volatile,
    Strictfp,
    Default,

    // Primitive types
    Void,
    Boolean,
    Byte,
    Short,
    IntKw,
    LongKw,
    CharKw,
    FloatKw,
    DoubleKw,

    // Statements
    If,
    Else,
    While,
    Do,
    For,
    Return,
    Throw,
    Break,
    Continue,
    Try,
    Catch,
    Finally,

    // Expressions
    New,
    This,
    Super,
    Instanceof,
    True,
    False,
    Null,

    // Reserved but unsupported
    Switch,
    Case,
    Assert,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Dot,
    Ellipsis,
    At,
    Question,
    Colon,
    ColonColon,
    Arrow,

    // Operators
    Eq,
    EqEq,
    Bang,
    BangEq,
    Lt,
    LtEq,
    Gt,
    Tilde,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    AmpAmp,
    Pipe,
    PipePipe,
    Caret,
    Shl,
    PlusPlus,
    MinusMinus,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    AmpEq,
    PipeEq,
    CaretEq,
    ShlEq,

    Eof,
}

impl TokenKind {
    /// Human-readable name for parser error messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            TokenKind::Ident(_) => "identifier",
            TokenKind::Int(_) => "int literal",
            TokenKind::Long(_) => "long literal",
            TokenKind::IntMin => "int literal",
            TokenKind::LongMin => "long literal",
            TokenKind::Float(_) => "float literal",
            TokenKind::Double(_) => "double literal",
            TokenKind::Char(_) => "char literal",
            TokenKind::String(_) => "string literal",
            TokenKind::Package => "`package`",
            TokenKind::Import => "`import`",
            TokenKind::Class => "`class`",
            TokenKind::Interface => "`interface`",
            TokenKind::Enum => "`enum`",
            TokenKind::Extends => "`extends`",
            TokenKind::Implements => "`implements`",
            TokenKind::Throws => "`throws`",
            TokenKind::Public => "`public`",
            TokenKind::Protected => "`protected`",
            TokenKind::Private => "`private`",
            TokenKind::Static => "`static`",
            TokenKind::Final => "`final`",
            TokenKind::Abstract => "`abstract`",
            TokenKind::Native => "`native`",
            TokenKind::Synchronized => "`synchronized`",
            TokenKind::Transient => "`transient`",
            TokenKind::Volatile => "`volatile`",
            TokenKind::Strictfp => "`strictfp`",
            TokenKind::Default => "`default`",
            TokenKind::Void => "`void`",
            TokenKind::Boolean => "`boolean`",
            TokenKind::Byte => "`byte`",
            TokenKind::Short => "`short`",
            TokenKind::IntKw => "`int`",
            TokenKind::LongKw => "`long`",
            TokenKind::CharKw => "`char`",
            TokenKind::FloatKw => "`float`",
            TokenKind::DoubleKw => "`double`",
            TokenKind::If => "`if`",
            TokenKind::Else => "`else`",
            TokenKind::While => "`while`",
            TokenKind::Do => "`do`",
            TokenKind::For => "`for`",
            TokenKind::Return => "`return`",
            TokenKind::Throw => "`throw`",
            TokenKind::Break => "`break`",
            TokenKind::Continue => "`continue`",
            TokenKind::Try => "`try`",
            TokenKind::Catch => "`catch`",
            TokenKind::Finally => "`finally`",
            TokenKind::New => "`new`",
            TokenKind::This => "`this`",
            TokenKind::Super => "`super`",
            TokenKind::Instanceof => "`instanceof`",
            TokenKind::True => "`true`",
            TokenKind::False => "`false`",
            TokenKind::Null => "`null`",
            TokenKind::Switch => "`switch`",
            TokenKind::Case => "`case`",
            TokenKind::Assert => "`assert`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Comma => "`,`",
            TokenKind::Dot => "`.`",
            TokenKind::Ellipsis => "`...`",
            TokenKind::At => "`@`",
            TokenKind::Question => "`?`",
            TokenKind::Colon => "`:`",
            TokenKind::ColonColon => "`::`",
            TokenKind::Arrow => "`->`",
            TokenKind::Eq => "`=`",
            TokenKind::EqEq => "`==`",
            TokenKind::Bang => "`!`",
            TokenKind::BangEq => "`!=`",
            TokenKind::Lt => "`<`",
            TokenKind::LtEq => "`<=`",
            TokenKind::Gt => "`>`",
            TokenKind::Tilde => "`~`",
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::Star => "`*`",
            TokenKind::Slash => "`/`",
            TokenKind::Percent => "`%`",
            TokenKind::Amp => "`&`",
            TokenKind::AmpAmp => "`&&`",
            TokenKind::Pipe => "`|`",
            TokenKind::PipePipe => "`||`",
            TokenKind::Caret => "`^`",
            TokenKind::Shl => "`<<`",
            TokenKind::PlusPlus => "`++`",
            TokenKind::MinusMinus => "`--`",
            TokenKind::PlusEq => "`+=`",
            TokenKind::MinusEq => "`-=`",
            TokenKind::StarEq => "`*=`",
            TokenKind::SlashEq => "`/=`",
            TokenKind::PercentEq => "`%=`",
            TokenKind::AmpEq => "`&=`",
            TokenKind::PipeEq => "`|=`",
            TokenKind::CaretEq => "`^=`",
            TokenKind::ShlEq => "`<<=`",
            TokenKind::Eof => "end of file",
        }
    }

    /// Check whether two kinds are the same variant, ignoring payloads.
    #[inline]
    pub fn same_variant(&self, other: &TokenKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Lexer output. Always terminated by exactly one `Eof` token.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn new() -> Self {
        TokenList { tokens: Vec::new() }
    }

    #[inline]
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }
}

impl std::ops::Index<usize> for TokenList {
    type Output = Token;

    #[inline]
    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}
