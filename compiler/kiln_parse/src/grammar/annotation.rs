//! Annotations and qualified names.

use kiln_ir::{Annotation, AnnotationArg, Expr, QualifiedName, TokenKind};

use crate::{ParseError, Parser};

impl Parser<'_> {
    /// `Ident (. Ident)*`
    pub(crate) fn parse_qualified_name(&mut self) -> Result<QualifiedName, ParseError> {
        let (first, start) = self.expect_ident()?;
        let mut segments = vec![first];
        while self.check(&TokenKind::Dot) && matches!(self.peek_kind(1), TokenKind::Ident(_)) {
            self.advance();
            let (segment, _) = self.expect_ident()?;
            segments.push(segment);
        }
        Ok(QualifiedName::new(segments, self.span_from(start)))
    }

    /// Annotations not followed by `interface`.
    pub(crate) fn parse_annotations(&mut self) -> Result<Vec<Annotation>, ParseError> {
        let mut annotations = Vec::new();
        while self.check(&TokenKind::At) && !matches!(self.peek_kind(1), TokenKind::Interface) {
            annotations.push(self.parse_annotation()?);
        }
        Ok(annotations)
    }

    /// `@Name`, `@Name(value)` or `@Name(key = value, ...)`.
    pub(crate) fn parse_annotation(&mut self) -> Result<Annotation, ParseError> {
        let start = self.expect(&TokenKind::At)?;
        let name = self.parse_qualified_name()?;
        let mut args = Vec::new();

        if self.eat(&TokenKind::LParen) {
            if self.check_ident() && matches!(self.peek_kind(1), TokenKind::Eq) {
                loop {
                    let (key, _) = self.expect_ident()?;
                    self.expect(&TokenKind::Eq)?;
                    let value = self.parse_element_value()?;
                    args.push(AnnotationArg {
                        name: Some(key),
                        value,
                    });
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
            } else if !self.check(&TokenKind::RParen) {
                let value = self.parse_element_value()?;
                args.push(AnnotationArg { name: None, value });
            }
            self.expect(&TokenKind::RParen)?;
        }

        Ok(Annotation {
            name,
            args,
            span: self.span_from(start),
        })
    }

    fn parse_element_value(&mut self) -> Result<Expr, ParseError> {
        if self.check(&TokenKind::At) {
            return Err(ParseError::unsupported(
                "nested annotations",
                self.current_span(),
            ));
        }
        if self.check(&TokenKind::LBrace) {
            return self.parse_array_init();
        }
        self.parse_conditional()
    }
}
