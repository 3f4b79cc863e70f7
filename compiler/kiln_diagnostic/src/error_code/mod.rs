//! Error codes for toolchain diagnostics.
//!
//! Each code is a unique identifier (e.g. `E2001`) whose first digit names the
//! phase that produced it. Diagnostics emitted by processors carry no code.

use std::fmt;

/// Error codes for toolchain diagnostics.
///
/// Format: E#### where the first digit indicates phase:
/// - E0xxx: Lexer errors
/// - E1xxx: Parser errors
/// - E2xxx: Semantic checker errors
/// - E3xxx: Processing / harness errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Lexer Errors (E0xxx)
    /// Unterminated string literal
    E0001,
    /// Invalid character in source
    E0002,
    /// Malformed number literal
    E0003,
    /// Unterminated or empty character literal
    E0004,
    /// Invalid escape sequence
    E0005,
    /// Unterminated block comment
    E0006,

    // Parser Errors (E1xxx)
    /// Unexpected token
    E1001,
    /// Expected expression
    E1002,
    /// Expected identifier
    E1004,
    /// Expected type
    E1005,
    /// Repeated modifier
    E1006,
    /// Integer number too large
    E1007,
    /// Unsupported language construct
    E1008,

    // Checker Errors (E2xxx)
    /// Cannot find symbol: variable
    E2001,
    /// Cannot find symbol: method
    E2002,
    /// Duplicate type declaration
    E2003,
    /// Local variable already defined
    E2004,
    /// Unexpected return value
    E2005,
    /// Missing return value
    E2006,
    /// `break` or `continue` outside a loop
    E2007,
    /// Abstract method in a non-abstract class
    E2008,
    /// Missing method body
    E2009,
    /// Imported package does not exist
    E2010,
    /// Imported class does not exist
    E2011,
    /// Cannot find symbol: class
    E2012,

    // Processing Errors (E3xxx)
    /// Processing did not settle within the round limit
    E3001,
    /// Warnings found while warnings are treated as errors
    E3002,
}

impl ErrorCode {
    pub const ALL: &[ErrorCode] = &[
        ErrorCode::E0001,
        ErrorCode::E0002,
        ErrorCode::E0003,
        ErrorCode::E0004,
        ErrorCode::E0005,
        ErrorCode::E0006,
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1004,
        ErrorCode::E1005,
        ErrorCode::E1006,
        ErrorCode::E1007,
        ErrorCode::E1008,
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::E2005,
        ErrorCode::E2006,
        ErrorCode::E2007,
        ErrorCode::E2008,
        ErrorCode::E2009,
        ErrorCode::E2010,
        ErrorCode::E2011,
        ErrorCode::E2012,
        ErrorCode::E3001,
        ErrorCode::E3002,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            ErrorCode::E0005 => "E0005",
            ErrorCode::E0006 => "E0006",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E1007 => "E1007",
            ErrorCode::E1008 => "E1008",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E2008 => "E2008",
            ErrorCode::E2009 => "E2009",
            ErrorCode::E2010 => "E2010",
            ErrorCode::E2011 => "E2011",
            ErrorCode::E2012 => "E2012",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
        }
    }

    /// Check if this is a lexer error (E0xxx range).
    pub fn is_lexer_error(&self) -> bool {
        self.as_str().starts_with("E0")
    }

    /// Check if this is a syntax error (lexer or parser).
    pub fn is_syntax_error(&self) -> bool {
        self.is_lexer_error() || self.as_str().starts_with("E1")
    }

    /// Check if this is a semantic checker error (E2xxx range).
    pub fn is_check_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse an error code string like `"E2001"`. Case-insensitive.
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        Self::ALL
            .iter()
            .find(|code| code.as_str() == upper)
            .copied()
            .ok_or(())
    }
}
