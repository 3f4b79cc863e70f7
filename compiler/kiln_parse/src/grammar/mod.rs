//! Grammar productions, one module per syntactic level.

mod annotation;
mod decl;
mod expr;
mod stmt;
mod ty;
mod unit;

use kiln_diagnostic::ErrorCode;
use kiln_ir::{Annotation, ModifierSet, PrimitiveType, Span, TokenKind};

use crate::{ParseError, Parser};

/// Modifiers and annotations preceding a declaration.
#[derive(Default)]
pub(crate) struct Modifiers {
    pub set: ModifierSet,
    pub annotations: Vec<Annotation>,
    /// Span of the first modifier or annotation, if any.
    pub start: Option<Span>,
}

impl Modifiers {
    fn is_empty(&self) -> bool {
        self.set.is_empty() && self.annotations.is_empty()
    }
}

fn modifier_flag(kind: &TokenKind) -> Option<ModifierSet> {
    Some(match kind {
        TokenKind::Public => ModifierSet::PUBLIC,
        TokenKind::Protected => ModifierSet::PROTECTED,
        TokenKind::Private => ModifierSet::PRIVATE,
        TokenKind::Static => ModifierSet::STATIC,
        TokenKind::Final => ModifierSet::FINAL,
        TokenKind::Abstract => ModifierSet::ABSTRACT,
        TokenKind::Native => ModifierSet::NATIVE,
        TokenKind::Synchronized => ModifierSet::SYNCHRONIZED,
        TokenKind::Transient => ModifierSet::TRANSIENT,
        TokenKind::Volatile => ModifierSet::VOLATILE,
        TokenKind::Strictfp => ModifierSet::STRICTFP,
        TokenKind::Default => ModifierSet::DEFAULT,
        _ => return None,
    })
}

pub(crate) fn primitive_of(kind: &TokenKind) -> Option<PrimitiveType> {
    Some(match kind {
        TokenKind::Void => PrimitiveType::Void,
        TokenKind::Boolean => PrimitiveType::Boolean,
        TokenKind::Byte => PrimitiveType::Byte,
        TokenKind::Short => PrimitiveType::Short,
        TokenKind::IntKw => PrimitiveType::Int,
        TokenKind::LongKw => PrimitiveType::Long,
        TokenKind::CharKw => PrimitiveType::Char,
        TokenKind::FloatKw => PrimitiveType::Float,
        TokenKind::DoubleKw => PrimitiveType::Double,
        _ => return None,
    })
}

impl Parser<'_> {
    /// Parse modifier keywords and annotations in any order.
    pub(crate) fn parse_modifiers(&mut self) -> Result<Modifiers, ParseError> {
        let mut mods = Modifiers::default();
        loop {
            let span = self.current_span();
            if self.check(&TokenKind::At) {
                if matches!(self.peek_kind(1), TokenKind::Interface) {
                    return Err(ParseError::unsupported("annotation type declarations", span));
                }
                let annotation = self.parse_annotation()?;
                mods.annotations.push(annotation);
            } else if let Some(flag) = modifier_flag(self.current_kind()) {
                if mods.set.contains(flag) {
                    return Err(ParseError::new(ErrorCode::E1006, "repeated modifier", span));
                }
                self.advance();
                mods.set |= flag;
            } else {
                break;
            }
            mods.start.get_or_insert(span);
        }
        Ok(mods)
    }

    #[inline]
    pub(crate) fn check_primitive(&self) -> bool {
        primitive_of(self.current_kind()).is_some()
    }
}
