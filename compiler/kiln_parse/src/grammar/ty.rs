//! Types, type arguments and type parameters.

use kiln_diagnostic::ErrorCode;
use kiln_ir::{QualifiedName, TokenKind, TypeParam, TypeRef, TypeRefKind, WildcardBound};
use kiln_stack::ensure_sufficient_stack;

use super::primitive_of;
use crate::{ParseError, Parser};

impl Parser<'_> {
    /// A primitive or class type followed by any number of `[]`.
    pub(crate) fn parse_type(&mut self) -> Result<TypeRef, ParseError> {
        let start = self.current_span();
        let kind = if let Some(primitive) = primitive_of(self.current_kind()) {
            self.advance();
            TypeRefKind::Primitive(primitive)
        } else if self.check_ident() {
            self.parse_named_type(false)?.0
        } else {
            return Err(self.expected_type());
        };
        let dims = self.parse_dims();
        Ok(TypeRef {
            kind,
            dims,
            span: self.span_from(start),
        })
    }

    /// A type that must not be `void`.
    pub(crate) fn parse_value_type(&mut self) -> Result<TypeRef, ParseError> {
        let ty = self.parse_type()?;
        if ty.is_void() {
            return Err(ParseError::new(
                ErrorCode::E1005,
                "'void' type not allowed here",
                ty.span,
            ));
        }
        Ok(ty)
    }

    /// A class or interface type without dimensions.
    pub(crate) fn parse_class_type(&mut self) -> Result<TypeRef, ParseError> {
        let start = self.current_span();
        if !self.check_ident() {
            return Err(self.expected_type());
        }
        let (kind, _) = self.parse_named_type(false)?;
        Ok(TypeRef {
            kind,
            dims: 0,
            span: self.span_from(start),
        })
    }

    /// Comma-separated class types, for `implements` and `throws`.
    pub(crate) fn parse_class_type_list(&mut self) -> Result<Vec<TypeRef>, ParseError> {
        let mut types = vec![self.parse_class_type()?];
        while self.eat(&TokenKind::Comma) {
            types.push(self.parse_class_type()?);
        }
        Ok(types)
    }

    /// `a.b.C<T>`; type arguments may only follow the last segment.
    ///
    /// With `allow_diamond`, `C<>` is accepted and reported in the second
    /// component of the result.
    pub(crate) fn parse_named_type(
        &mut self,
        allow_diamond: bool,
    ) -> Result<(TypeRefKind, bool), ParseError> {
        let (first, start) = self.expect_ident()?;
        let mut segments = vec![first];
        let mut args = Vec::new();
        let mut diamond = false;

        loop {
            if self.check(&TokenKind::Lt) {
                if allow_diamond && matches!(self.peek_kind(1), TokenKind::Gt) {
                    self.advance();
                    self.advance();
                    diamond = true;
                } else {
                    args = self.parse_type_args()?;
                }
            }
            if !(self.check(&TokenKind::Dot) && matches!(self.peek_kind(1), TokenKind::Ident(_))) {
                break;
            }
            if diamond || !args.is_empty() {
                return Err(ParseError::unsupported(
                    "type arguments on qualifying types",
                    self.current_span(),
                ));
            }
            self.advance();
            let (segment, _) = self.expect_ident()?;
            segments.push(segment);
        }

        let name = QualifiedName::new(segments, self.span_from(start));
        Ok((TypeRefKind::Named { name, args }, diamond))
    }

    /// `<A, ? extends B, ...>`
    pub(crate) fn parse_type_args(&mut self) -> Result<Vec<TypeRef>, ParseError> {
        ensure_sufficient_stack(|| {
            self.expect(&TokenKind::Lt)?;
            let mut args = vec![self.parse_type_arg()?];
            while self.eat(&TokenKind::Comma) {
                args.push(self.parse_type_arg()?);
            }
            self.expect(&TokenKind::Gt)?;
            Ok(args)
        })
    }

    fn parse_type_arg(&mut self) -> Result<TypeRef, ParseError> {
        if !self.check(&TokenKind::Question) {
            return self.parse_value_type();
        }
        let start = self.current_span();
        self.advance();
        let bound = if self.eat(&TokenKind::Extends) {
            Some((WildcardBound::Extends, Box::new(self.parse_value_type()?)))
        } else if self.eat(&TokenKind::Super) {
            Some((WildcardBound::Super, Box::new(self.parse_value_type()?)))
        } else {
            None
        };
        Ok(TypeRef {
            kind: TypeRefKind::Wildcard { bound },
            dims: 0,
            span: self.span_from(start),
        })
    }

    /// `<T, U extends A & B>`
    pub(crate) fn parse_type_params(&mut self) -> Result<Vec<TypeParam>, ParseError> {
        self.expect(&TokenKind::Lt)?;
        let mut params = Vec::new();
        loop {
            // Type-use annotations on parameters are accepted and dropped.
            self.parse_annotations()?;
            let (name, start) = self.expect_ident()?;
            let mut bounds = Vec::new();
            if self.eat(&TokenKind::Extends) {
                bounds.push(self.parse_class_type()?);
                while self.eat(&TokenKind::Amp) {
                    bounds.push(self.parse_class_type()?);
                }
            }
            params.push(TypeParam {
                name,
                bounds,
                span: self.span_from(start),
            });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::Gt)?;
        Ok(params)
    }

    /// Count `[]` pairs.
    pub(crate) fn parse_dims(&mut self) -> u32 {
        let mut dims = 0;
        while self.check(&TokenKind::LBracket) && matches!(self.peek_kind(1), TokenKind::RBracket) {
            self.advance();
            self.advance();
            dims += 1;
        }
        dims
    }

    #[cold]
    #[inline(never)]
    fn expected_type(&self) -> ParseError {
        ParseError::new(
            ErrorCode::E1005,
            format!("expected type, found {}", self.current_kind().display_name()),
            self.current_span(),
        )
    }
}
