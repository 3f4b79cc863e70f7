//! Kiln IR - syntax tree model and shared source types.
//!
//! This crate contains the data structures every other Kiln crate shares:
//! - Spans for source locations
//! - Source units (named, immutable source text)
//! - Tokens and `TokenList` for lexer output
//! - The syntax tree of one compilation unit
//! - [`NodeRef`] / [`NodeKind`], a uniform read-only view over tree nodes
//!
//! Trees are plain owned data with no interior mutability, so they are
//! `Send + Sync` and can be shared across threads freely.

pub mod ast;
mod node;
mod source;
mod span;
mod token;

pub use ast::*;
pub use node::{NodeKind, NodeRef};
pub use source::{unit_name_for_type, SourceUnit, SOURCE_EXTENSION};
pub use span::{Span, SpanError};
pub use token::{Token, TokenKind, TokenList};
