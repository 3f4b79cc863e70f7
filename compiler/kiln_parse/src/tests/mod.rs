//! Parser tests.
//!
//! - `parser`: declarations, statements, expressions and literal handling
//! - `rejections`: syntax errors and unsupported constructs, with positions

mod parser;
