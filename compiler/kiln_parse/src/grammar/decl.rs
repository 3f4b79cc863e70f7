//! Type declarations and their members.

use kiln_diagnostic::ErrorCode;
use kiln_ir::{
    EnumConstant, FieldDecl, Initializer, Member, MethodDecl, Param, Span, TokenKind, TypeDecl,
    TypeDeclKind, TypeParam, TypeRef, VarDeclarator,
};

use super::Modifiers;
use crate::{ParseError, Parser};

impl Parser<'_> {
    /// `class`, `interface` or `enum` declaration after its modifiers.
    pub(crate) fn parse_type_decl(&mut self, modifiers: Modifiers) -> Result<TypeDecl, ParseError> {
        let start = modifiers.start.unwrap_or_else(|| self.current_span());
        let kind = match self.current_kind() {
            TokenKind::Class => TypeDeclKind::Class,
            TokenKind::Interface => TypeDeclKind::Interface,
            TokenKind::Enum => TypeDeclKind::Enum,
            TokenKind::Ident(name) if name == "record" => {
                return Err(ParseError::unsupported("records", self.current_span()));
            }
            _ => return Err(self.cursor.make_expect_error("`class`, `interface` or `enum`")),
        };
        self.advance();

        let (name, name_span) = self.expect_ident()?;
        let type_params = if self.check(&TokenKind::Lt) {
            self.parse_type_params()?
        } else {
            Vec::new()
        };

        let mut extends = Vec::new();
        let mut implements = Vec::new();
        match kind {
            TypeDeclKind::Class => {
                if self.eat(&TokenKind::Extends) {
                    extends.push(self.parse_class_type()?);
                }
                if self.eat(&TokenKind::Implements) {
                    implements = self.parse_class_type_list()?;
                }
            }
            TypeDeclKind::Interface => {
                if self.eat(&TokenKind::Extends) {
                    extends = self.parse_class_type_list()?;
                }
            }
            TypeDeclKind::Enum => {
                if self.eat(&TokenKind::Implements) {
                    implements = self.parse_class_type_list()?;
                }
            }
        }

        self.expect(&TokenKind::LBrace)?;
        let enum_constants = if kind == TypeDeclKind::Enum {
            self.parse_enum_constants()?
        } else {
            Vec::new()
        };
        let mut members = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            if self.is_at_end() {
                return Err(self.cursor.make_expect_error("`}`"));
            }
            if let Some(member) = self.parse_member(&name)? {
                members.push(member);
            }
        }
        self.advance();

        Ok(TypeDecl {
            kind,
            name,
            modifiers: modifiers.set,
            annotations: modifiers.annotations,
            type_params,
            extends,
            implements,
            enum_constants,
            members,
            span: self.span_from(start),
            name_span,
        })
    }

    /// Constants up to the optional `;` that opens the remaining body.
    fn parse_enum_constants(&mut self) -> Result<Vec<EnumConstant>, ParseError> {
        let mut constants = Vec::new();
        loop {
            if self.eat(&TokenKind::Semicolon) || self.check(&TokenKind::RBrace) {
                break;
            }
            let annotations = self.parse_annotations()?;
            let (name, start) = self.expect_ident()?;
            let start = annotations.first().map_or(start, |a| a.span);
            let args = if self.check(&TokenKind::LParen) {
                self.parse_arguments()?
            } else {
                Vec::new()
            };
            if self.check(&TokenKind::LBrace) {
                return Err(ParseError::unsupported(
                    "enum constant bodies",
                    self.current_span(),
                ));
            }
            constants.push(EnumConstant {
                name,
                annotations,
                args,
                span: self.span_from(start),
            });

            if self.eat(&TokenKind::Comma) {
                continue;
            }
            if self.eat(&TokenKind::Semicolon) || self.check(&TokenKind::RBrace) {
                break;
            }
            return Err(self.cursor.make_expect_error("`,`, `;` or `}`"));
        }
        Ok(constants)
    }

    /// One member of a type body; `None` for a stray `;`.
    fn parse_member(&mut self, type_name: &str) -> Result<Option<Member>, ParseError> {
        if self.eat(&TokenKind::Semicolon) {
            return Ok(None);
        }
        if self.check(&TokenKind::LBrace) {
            return self.parse_initializer(false).map(Some);
        }
        if self.check(&TokenKind::Static) && matches!(self.peek_kind(1), TokenKind::LBrace) {
            self.advance();
            return self.parse_initializer(true).map(Some);
        }

        let modifiers = self.parse_modifiers()?;
        if matches!(
            self.current_kind(),
            TokenKind::Class | TokenKind::Interface | TokenKind::Enum
        ) || matches!(self.current_kind(), TokenKind::Ident(name) if name == "record")
        {
            return self.parse_type_decl(modifiers).map(|t| Some(Member::Type(t)));
        }

        let start = modifiers.start.unwrap_or_else(|| self.current_span());
        let type_params = if self.check(&TokenKind::Lt) {
            self.parse_type_params()?
        } else {
            Vec::new()
        };

        // Constructor: a name directly followed by `(`.
        if self.check_ident() && matches!(self.peek_kind(1), TokenKind::LParen) {
            let (name, name_span) = self.expect_ident()?;
            if name != type_name {
                return Err(ParseError::new(
                    ErrorCode::E1001,
                    "invalid method declaration; return type required",
                    name_span,
                ));
            }
            let header = MethodHeader {
                modifiers,
                type_params,
                return_type: None,
                name,
                name_span,
            };
            return self.parse_method_rest(header, start).map(|m| Some(Member::Method(m)));
        }

        let ty = self.parse_type()?;
        let (name, name_span) = self.expect_ident()?;
        if self.check(&TokenKind::LParen) {
            let header = MethodHeader {
                modifiers,
                type_params,
                return_type: Some(ty),
                name,
                name_span,
            };
            return self.parse_method_rest(header, start).map(|m| Some(Member::Method(m)));
        }
        if !type_params.is_empty() || ty.is_void() {
            return Err(self.cursor.make_expect_error("`(`"));
        }

        let declarators = self.parse_declarators(name, name_span)?;
        self.expect(&TokenKind::Semicolon)?;
        Ok(Some(Member::Field(FieldDecl {
            modifiers: modifiers.set,
            annotations: modifiers.annotations,
            ty,
            declarators,
            span: self.span_from(start),
        })))
    }

    fn parse_initializer(&mut self, is_static: bool) -> Result<Member, ParseError> {
        let start = if is_static {
            self.cursor.previous_span()
        } else {
            self.current_span()
        };
        let body = self.parse_block()?;
        Ok(Member::Initializer(Initializer {
            is_static,
            body,
            span: self.span_from(start),
        }))
    }

    /// Parameters, legacy dimensions, `throws` and body of a method.
    fn parse_method_rest(
        &mut self,
        header: MethodHeader,
        start: Span,
    ) -> Result<MethodDecl, ParseError> {
        let MethodHeader {
            modifiers,
            type_params,
            mut return_type,
            name,
            name_span,
        } = header;

        let params = self.parse_params()?;

        // `int f()[]` declares an array return type.
        let legacy_dims = self.parse_dims();
        if legacy_dims > 0 {
            match return_type.as_mut() {
                Some(ty) if !ty.is_void() => ty.dims += legacy_dims,
                _ => return Err(self.cursor.make_expect_error("`{` or `;`")),
            }
        }

        let throws = if self.eat(&TokenKind::Throws) {
            self.parse_class_type_list()?
        } else {
            Vec::new()
        };

        let body = if self.check(&TokenKind::LBrace) {
            Some(self.parse_block()?)
        } else {
            self.expect(&TokenKind::Semicolon)?;
            None
        };

        Ok(MethodDecl {
            name,
            modifiers: modifiers.set,
            annotations: modifiers.annotations,
            type_params,
            return_type,
            params,
            throws,
            body,
            span: self.span_from(start),
            name_span,
        })
    }

    /// `(final int a, String... rest)`
    fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        self.expect(&TokenKind::LParen)?;
        let mut params: Vec<Param> = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                if let Some(previous) = params.last().filter(|p| p.varargs) {
                    return Err(ParseError::new(
                        ErrorCode::E1001,
                        "varargs parameter must be the last parameter",
                        previous.span,
                    ));
                }
                params.push(self.parse_param()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(params)
    }

    pub(crate) fn parse_param(&mut self) -> Result<Param, ParseError> {
        let modifiers = self.parse_modifiers()?;
        let start = modifiers.start.unwrap_or_else(|| self.current_span());
        let mut ty = self.parse_value_type()?;
        let varargs = self.eat(&TokenKind::Ellipsis);
        let (name, _) = self.expect_ident()?;
        ty.dims += self.parse_dims();
        Ok(Param {
            modifiers: modifiers.set,
            annotations: modifiers.annotations,
            ty,
            varargs,
            name,
            span: self.span_from(start),
        })
    }

    /// Declarators of a field or local variable, the first name already read.
    pub(crate) fn parse_declarators(
        &mut self,
        first: String,
        first_span: Span,
    ) -> Result<Vec<VarDeclarator>, ParseError> {
        let mut declarators = vec![self.parse_declarator_rest(first, first_span)?];
        while self.eat(&TokenKind::Comma) {
            let (name, span) = self.expect_ident()?;
            declarators.push(self.parse_declarator_rest(name, span)?);
        }
        Ok(declarators)
    }

    fn parse_declarator_rest(
        &mut self,
        name: String,
        start: Span,
    ) -> Result<VarDeclarator, ParseError> {
        let extra_dims = self.parse_dims();
        let init = if self.eat(&TokenKind::Eq) {
            Some(if self.check(&TokenKind::LBrace) {
                self.parse_array_init()?
            } else {
                self.parse_expr()?
            })
        } else {
            None
        };
        Ok(VarDeclarator {
            name,
            extra_dims,
            init,
            span: self.span_from(start),
        })
    }
}

/// Everything of a method declaration before its parameter list.
struct MethodHeader {
    modifiers: Modifiers,
    type_params: Vec<TypeParam>,
    return_type: Option<TypeRef>,
    name: String,
    name_span: Span,
}
