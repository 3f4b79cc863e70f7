//! Compilation unit: package, imports and top-level types.

use kiln_diagnostic::ErrorCode;
use kiln_ir::{CompilationUnit, Import, PackageDecl, QualifiedName, Span, TokenKind};

use crate::{ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn parse_unit(&mut self) -> Result<CompilationUnit, ParseError> {
        let mut unit = CompilationUnit::default();

        // Annotations before `package` belong to the package; otherwise they
        // are re-read as modifiers of the first type.
        let saved = self.cursor.position();
        let annotations = self.parse_annotations()?;
        if self.check(&TokenKind::Package) {
            let start = annotations
                .first()
                .map_or_else(|| self.current_span(), |a| a.span);
            self.advance();
            let name = self.parse_qualified_name()?;
            self.expect(&TokenKind::Semicolon)?;
            unit.package = Some(PackageDecl {
                name,
                annotations,
                span: self.span_from(start),
            });
        } else {
            self.cursor.set_position(saved);
        }

        while self.check(&TokenKind::Import) {
            unit.imports.push(self.parse_import()?);
            while self.eat(&TokenKind::Semicolon) {}
        }

        loop {
            while self.eat(&TokenKind::Semicolon) {}
            if self.is_at_end() {
                break;
            }
            if self.check(&TokenKind::Import) || self.check(&TokenKind::Package) {
                return Err(ParseError::new(
                    ErrorCode::E1001,
                    "class, interface, or enum expected",
                    self.current_span(),
                ));
            }
            let modifiers = self.parse_modifiers()?;
            unit.types.push(self.parse_type_decl(modifiers)?);
        }

        unit.span = Span::new(0, self.current_span().end);
        Ok(unit)
    }

    fn parse_import(&mut self) -> Result<Import, ParseError> {
        let start = self.expect(&TokenKind::Import)?;
        let is_static = self.eat(&TokenKind::Static);

        let (first, path_start) = self.expect_ident()?;
        let mut segments = vec![first];
        let mut on_demand = false;
        while self.eat(&TokenKind::Dot) {
            if self.check(&TokenKind::Star) {
                self.advance();
                on_demand = true;
                break;
            }
            let (segment, _) = self.expect_ident()?;
            segments.push(segment);
        }
        let path_end = self.cursor.previous_span();
        self.expect(&TokenKind::Semicolon)?;

        Ok(Import {
            path: QualifiedName::new(segments, path_start.merge(path_end)),
            is_static,
            on_demand,
            span: self.span_from(start),
        })
    }
}
