//! Blocks and statements.

use kiln_diagnostic::ErrorCode;
use kiln_ir::{
    Block, CatchClause, Expr, ExprKind, Param, Span, Stmt, StmtKind, TokenKind, UnaryOp,
};
use kiln_stack::ensure_sufficient_stack;

use super::Modifiers;
use crate::{ParseError, Parser};

impl Parser<'_> {
    /// `{ stmt* }`
    pub(crate) fn parse_block(&mut self) -> Result<Block, ParseError> {
        let start = self.expect(&TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            if self.is_at_end() {
                return Err(self.cursor.make_expect_error("`}`"));
            }
            stmts.push(self.parse_statement()?);
        }
        self.advance();
        Ok(Block {
            stmts,
            span: self.span_from(start),
        })
    }

    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        ensure_sufficient_stack(|| self.parse_statement_inner())
    }

    fn parse_statement_inner(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current_span();
        let kind = match self.current_kind() {
            TokenKind::LBrace => StmtKind::Block(self.parse_block()?),
            TokenKind::Semicolon => {
                self.advance();
                StmtKind::Empty
            }
            TokenKind::If => self.parse_if()?,
            TokenKind::While => {
                self.advance();
                let cond = self.parse_paren_expr()?;
                let body = Box::new(self.parse_statement()?);
                StmtKind::While { cond, body }
            }
            TokenKind::Do => {
                self.advance();
                let body = Box::new(self.parse_statement()?);
                self.expect(&TokenKind::While)?;
                let cond = self.parse_paren_expr()?;
                self.expect(&TokenKind::Semicolon)?;
                StmtKind::DoWhile { body, cond }
            }
            TokenKind::For => self.parse_for()?,
            TokenKind::Return => {
                self.advance();
                let value = if self.check(&TokenKind::Semicolon) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.expect(&TokenKind::Semicolon)?;
                StmtKind::Return(value)
            }
            TokenKind::Throw => {
                self.advance();
                let value = self.parse_expr()?;
                self.expect(&TokenKind::Semicolon)?;
                StmtKind::Throw(value)
            }
            TokenKind::Break | TokenKind::Continue => {
                let is_break = self.check(&TokenKind::Break);
                self.advance();
                let label = if self.check_ident() {
                    Some(self.expect_ident()?.0)
                } else {
                    None
                };
                self.expect(&TokenKind::Semicolon)?;
                if is_break {
                    StmtKind::Break(label)
                } else {
                    StmtKind::Continue(label)
                }
            }
            TokenKind::Try => self.parse_try()?,
            TokenKind::Switch => return Err(ParseError::unsupported("switch statements", start)),
            TokenKind::Assert => return Err(ParseError::unsupported("assert statements", start)),
            TokenKind::Synchronized if matches!(self.peek_kind(1), TokenKind::LParen) => {
                return Err(ParseError::unsupported("synchronized blocks", start));
            }
            TokenKind::Class | TokenKind::Interface | TokenKind::Enum => {
                return Err(ParseError::unsupported("local classes", start));
            }
            TokenKind::Ident(_) if matches!(self.peek_kind(1), TokenKind::Colon) => {
                return Err(ParseError::unsupported("labeled statements", start));
            }
            _ if self.at_local_var_decl() => {
                let modifiers = self.parse_modifiers()?;
                let kind = self.parse_local_var(modifiers)?;
                self.expect(&TokenKind::Semicolon)?;
                kind
            }
            _ => {
                let expr = self.parse_statement_expr()?;
                self.expect(&TokenKind::Semicolon)?;
                StmtKind::Expr(expr)
            }
        };
        Ok(Stmt::new(kind, self.span_from(start)))
    }

    fn parse_if(&mut self) -> Result<StmtKind, ParseError> {
        self.expect(&TokenKind::If)?;
        let cond = self.parse_paren_expr()?;
        let then_branch = Box::new(self.parse_statement()?);
        let else_branch = if self.eat(&TokenKind::Else) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        Ok(StmtKind::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    fn parse_paren_expr(&mut self) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::LParen)?;
        let expr = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;
        Ok(expr)
    }

    fn parse_for(&mut self) -> Result<StmtKind, ParseError> {
        self.expect(&TokenKind::For)?;
        self.expect(&TokenKind::LParen)?;

        let foreach_var = self.try_parse(|p| {
            let param = p.parse_param()?;
            p.expect(&TokenKind::Colon)?;
            Ok(param)
        });
        if let Some(var) = foreach_var {
            let iterable = self.parse_expr()?;
            self.expect(&TokenKind::RParen)?;
            let body = Box::new(self.parse_statement()?);
            return Ok(StmtKind::ForEach {
                var,
                iterable,
                body,
            });
        }

        let mut init = Vec::new();
        if !self.check(&TokenKind::Semicolon) {
            let start = self.current_span();
            if self.at_local_var_decl() {
                let modifiers = self.parse_modifiers()?;
                let kind = self.parse_local_var(modifiers)?;
                init.push(Stmt::new(kind, self.span_from(start)));
            } else {
                for expr in self.parse_statement_expr_list()? {
                    let span = expr.span;
                    init.push(Stmt::new(StmtKind::Expr(expr), span));
                }
            }
        }
        self.expect(&TokenKind::Semicolon)?;

        let cond = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(&TokenKind::Semicolon)?;

        let update = if self.check(&TokenKind::RParen) {
            Vec::new()
        } else {
            self.parse_statement_expr_list()?
        };
        self.expect(&TokenKind::RParen)?;

        let body = Box::new(self.parse_statement()?);
        Ok(StmtKind::For {
            init,
            cond,
            update,
            body,
        })
    }

    fn parse_try(&mut self) -> Result<StmtKind, ParseError> {
        let try_span = self.expect(&TokenKind::Try)?;
        if self.check(&TokenKind::LParen) {
            return Err(ParseError::unsupported(
                "try-with-resources statements",
                try_span,
            ));
        }
        let body = self.parse_block()?;

        let mut catches = Vec::new();
        while self.check(&TokenKind::Catch) {
            let start = self.current_span();
            self.advance();
            self.expect(&TokenKind::LParen)?;
            let param = self.parse_catch_param()?;
            self.expect(&TokenKind::RParen)?;
            let body = self.parse_block()?;
            catches.push(CatchClause {
                param,
                body,
                span: self.span_from(start),
            });
        }
        let finally = if self.eat(&TokenKind::Finally) {
            Some(self.parse_block()?)
        } else {
            None
        };

        if catches.is_empty() && finally.is_none() {
            return Err(ParseError::new(
                ErrorCode::E1001,
                "'try' without 'catch' or 'finally'",
                try_span,
            ));
        }
        Ok(StmtKind::Try {
            body,
            catches,
            finally,
        })
    }

    fn parse_catch_param(&mut self) -> Result<Param, ParseError> {
        let modifiers = self.parse_modifiers()?;
        let start = modifiers.start.unwrap_or_else(|| self.current_span());
        let ty = self.parse_class_type()?;
        if self.check(&TokenKind::Pipe) {
            return Err(ParseError::unsupported(
                "multi-catch clauses",
                self.current_span(),
            ));
        }
        let (name, _) = self.expect_ident()?;
        Ok(Param {
            modifiers: modifiers.set,
            annotations: modifiers.annotations,
            ty,
            varargs: false,
            name,
            span: self.span_from(start),
        })
    }

    /// Whether a local variable declaration starts at the cursor. Does not
    /// consume anything.
    fn at_local_var_decl(&mut self) -> bool {
        let saved = self.cursor.position();
        let result = match self.parse_modifiers() {
            Ok(modifiers) if !modifiers.is_empty() => true,
            Ok(_) if self.check_primitive() => {
                !matches!(self.peek_kind(1), TokenKind::Dot)
                    && self.parse_type().is_ok()
                    && !self.check(&TokenKind::Dot)
            }
            Ok(_) => self.check_ident() && self.parse_type().is_ok() && self.check_ident(),
            Err(_) => true,
        };
        self.cursor.set_position(saved);
        result
    }

    /// `Type name [= init], ...` without the terminating `;`.
    fn parse_local_var(&mut self, modifiers: Modifiers) -> Result<StmtKind, ParseError> {
        if matches!(
            self.current_kind(),
            TokenKind::Class | TokenKind::Interface | TokenKind::Enum
        ) {
            return Err(ParseError::unsupported("local classes", self.current_span()));
        }
        let ty = self.parse_value_type()?;
        let (name, span) = self.expect_ident()?;
        let declarators = self.parse_declarators(name, span)?;
        Ok(StmtKind::LocalVar {
            modifiers: modifiers.set,
            ty,
            declarators,
        })
    }

    /// An expression that may stand alone as a statement.
    fn parse_statement_expr(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expr()?;
        if !is_statement_expr(&expr) {
            return Err(not_a_statement(expr.span));
        }
        Ok(expr)
    }

    fn parse_statement_expr_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut exprs = vec![self.parse_statement_expr()?];
        while self.eat(&TokenKind::Comma) {
            exprs.push(self.parse_statement_expr()?);
        }
        Ok(exprs)
    }
}

fn is_statement_expr(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Assign { .. } | ExprKind::MethodCall { .. } | ExprKind::New { .. } => true,
        ExprKind::Unary { op, .. } => matches!(
            op,
            UnaryOp::PreInc | UnaryOp::PreDec | UnaryOp::PostInc | UnaryOp::PostDec
        ),
        _ => false,
    }
}

#[cold]
fn not_a_statement(span: Span) -> ParseError {
    ParseError::new(ErrorCode::E1001, "not a statement", span)
}
