//! Expressions, by precedence climbing.
//!
//! Levels from loosest to tightest: assignment (right associative),
//! conditional, the binary operators of [`binary_op`], unary prefix
//! operators and casts, then primaries with their postfix selectors.

use kiln_diagnostic::ErrorCode;
use kiln_ir::{
    AssignOp, BinaryOp, Expr, ExprKind, Literal, QualifiedName, Span, TokenKind, TypeRef,
    TypeRefKind, UnaryOp,
};
use kiln_stack::ensure_sufficient_stack;

use super::primitive_of;
use crate::{GtOperator, ParseError, Parser};

/// Binding power of `instanceof` and the relational operators.
const RELATIONAL: u8 = 7;

impl Parser<'_> {
    pub(crate) fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        ensure_sufficient_stack(|| self.parse_assignment())
    }

    fn parse_assignment(&mut self) -> Result<Expr, ParseError> {
        let target = self.parse_conditional()?;
        if self.check(&TokenKind::Arrow) {
            return Err(ParseError::unsupported(
                "lambda expressions",
                self.current_span(),
            ));
        }
        let Some(op) = self.assign_op() else {
            return Ok(target);
        };
        let value = self.parse_expr()?;
        let span = target.span.merge(value.span);
        Ok(Expr::new(
            ExprKind::Assign {
                op,
                target: Box::new(target),
                value: Box::new(value),
            },
            span,
        ))
    }

    /// Consume an assignment operator, if one is at the cursor.
    fn assign_op(&mut self) -> Option<AssignOp> {
        let op = match self.current_kind() {
            TokenKind::Eq => AssignOp::PLAIN,
            TokenKind::PlusEq => AssignOp(Some(BinaryOp::Add)),
            TokenKind::MinusEq => AssignOp(Some(BinaryOp::Sub)),
            TokenKind::StarEq => AssignOp(Some(BinaryOp::Mul)),
            TokenKind::SlashEq => AssignOp(Some(BinaryOp::Div)),
            TokenKind::PercentEq => AssignOp(Some(BinaryOp::Rem)),
            TokenKind::AmpEq => AssignOp(Some(BinaryOp::BitAnd)),
            TokenKind::PipeEq => AssignOp(Some(BinaryOp::BitOr)),
            TokenKind::CaretEq => AssignOp(Some(BinaryOp::BitXor)),
            TokenKind::ShlEq => AssignOp(Some(BinaryOp::Shl)),
            TokenKind::Gt => {
                let gt = self.cursor.gt_operator()?;
                let op = match gt {
                    GtOperator::ShrAssign => AssignOp(Some(BinaryOp::Shr)),
                    GtOperator::UShrAssign => AssignOp(Some(BinaryOp::UShr)),
                    _ => return None,
                };
                self.cursor.consume_gt_operator(gt);
                return Some(op);
            }
            _ => return None,
        };
        self.advance();
        Some(op)
    }

    /// `cond ? a : b`, or a binary expression.
    pub(crate) fn parse_conditional(&mut self) -> Result<Expr, ParseError> {
        let cond = self.parse_binary(1)?;
        if !self.eat(&TokenKind::Question) {
            return Ok(cond);
        }
        let then_expr = self.parse_expr()?;
        self.expect(&TokenKind::Colon)?;
        let else_expr = ensure_sufficient_stack(|| self.parse_conditional())?;
        let span = cond.span.merge(else_expr.span);
        Ok(Expr::new(
            ExprKind::Conditional {
                cond: Box::new(cond),
                then_expr: Box::new(then_expr),
                else_expr: Box::new(else_expr),
            },
            span,
        ))
    }

    /// Left-associative binary operators binding at least `min_prec`.
    fn parse_binary(&mut self, min_prec: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_unary()?;
        loop {
            if self.check(&TokenKind::Instanceof) && RELATIONAL >= min_prec {
                self.advance();
                let ty = self.parse_value_type()?;
                if self.check_ident() {
                    return Err(ParseError::unsupported(
                        "instanceof patterns",
                        self.current_span(),
                    ));
                }
                let span = lhs.span.merge(ty.span);
                lhs = Expr::new(
                    ExprKind::InstanceOf {
                        expr: Box::new(lhs),
                        ty,
                    },
                    span,
                );
                continue;
            }

            let Some((op, prec)) = self.binary_op() else {
                break;
            };
            if prec < min_prec {
                break;
            }
            match self.cursor.gt_operator() {
                Some(gt) => {
                    self.cursor.consume_gt_operator(gt);
                }
                None => {
                    self.advance();
                }
            }
            let rhs = self.parse_binary(prec + 1)?;
            let span = lhs.span.merge(rhs.span);
            lhs = Expr::new(
                ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            );
        }
        Ok(lhs)
    }

    /// Binary operator at the cursor with its binding power.
    fn binary_op(&self) -> Option<(BinaryOp, u8)> {
        Some(match self.current_kind() {
            TokenKind::PipePipe => (BinaryOp::Or, 1),
            TokenKind::AmpAmp => (BinaryOp::And, 2),
            TokenKind::Pipe => (BinaryOp::BitOr, 3),
            TokenKind::Caret => (BinaryOp::BitXor, 4),
            TokenKind::Amp => (BinaryOp::BitAnd, 5),
            TokenKind::EqEq => (BinaryOp::Eq, 6),
            TokenKind::BangEq => (BinaryOp::NotEq, 6),
            TokenKind::Lt => (BinaryOp::Lt, RELATIONAL),
            TokenKind::LtEq => (BinaryOp::LtEq, RELATIONAL),
            TokenKind::Gt => match self.cursor.gt_operator()? {
                GtOperator::Gt => (BinaryOp::Gt, RELATIONAL),
                GtOperator::GtEq => (BinaryOp::GtEq, RELATIONAL),
                GtOperator::Shr => (BinaryOp::Shr, 8),
                GtOperator::UShr => (BinaryOp::UShr, 8),
                GtOperator::ShrAssign | GtOperator::UShrAssign => return None,
            },
            TokenKind::Shl => (BinaryOp::Shl, 8),
            TokenKind::Plus => (BinaryOp::Add, 9),
            TokenKind::Minus => (BinaryOp::Sub, 9),
            TokenKind::Star => (BinaryOp::Mul, 10),
            TokenKind::Slash => (BinaryOp::Div, 10),
            TokenKind::Percent => (BinaryOp::Rem, 10),
            _ => return None,
        })
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        ensure_sufficient_stack(|| self.parse_unary_inner())
    }

    fn parse_unary_inner(&mut self) -> Result<Expr, ParseError> {
        let start = self.current_span();
        let op = match self.current_kind() {
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Minus => {
                if let Some(literal) = self.negated_decimal_literal() {
                    self.advance();
                    let span = start.merge(self.advance().span);
                    return Ok(Expr::new(ExprKind::Literal(literal), span));
                }
                UnaryOp::Neg
            }
            TokenKind::PlusPlus => UnaryOp::PreInc,
            TokenKind::MinusMinus => UnaryOp::PreDec,
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Tilde => UnaryOp::BitNot,
            TokenKind::LParen => return self.parse_cast_or_paren(),
            _ => return self.parse_postfix(),
        };
        self.advance();
        let operand = self.parse_unary()?;
        Ok(unary(op, operand, start))
    }

    /// The value of `-<decimal int or long literal>` when the minus is
    /// followed by one, folded into a single negative literal.
    ///
    /// Only decimal spellings fold: `-0x10` stays a negation. This is also
    /// the only place `2147483648` and `9223372036854775808L` are valid.
    fn negated_decimal_literal(&self) -> Option<Literal> {
        let token = self.cursor.peek_token(1);
        let literal = match token.kind {
            TokenKind::Int(bits) => Literal::Int(bits.wrapping_neg()),
            TokenKind::Long(bits) => Literal::Long(bits.wrapping_neg()),
            TokenKind::IntMin => return Some(Literal::Int(0x8000_0000)),
            TokenKind::LongMin => return Some(Literal::Long(1 << 63)),
            _ => return None,
        };
        let decimal = self
            .spelling(token)
            .starts_with(|c: char| c.is_ascii_digit() && c != '0');
        decimal.then_some(literal)
    }

    /// `(Type) operand`, or a parenthesized expression.
    fn parse_cast_or_paren(&mut self) -> Result<Expr, ParseError> {
        let start = self.current_span();
        let saved = self.cursor.position();
        let cast_type = self.try_parse(|p| {
            p.expect(&TokenKind::LParen)?;
            let ty = p.parse_value_type()?;
            p.expect(&TokenKind::RParen)?;
            Ok(ty)
        });

        if let Some(ty) = cast_type {
            let is_primitive = matches!(ty.kind, TypeRefKind::Primitive(_));
            if is_primitive || self.starts_cast_operand() {
                let operand = self.parse_unary()?;
                let span = start.merge(operand.span);
                return Ok(Expr::new(
                    ExprKind::Cast {
                        ty,
                        expr: Box::new(operand),
                    },
                    span,
                ));
            }
            self.cursor.set_position(saved);
        }
        self.parse_postfix()
    }

    /// Whether the token after `(Name)` can only continue a reference cast.
    fn starts_cast_operand(&self) -> bool {
        matches!(
            self.current_kind(),
            TokenKind::Ident(_)
                | TokenKind::Int(_)
                | TokenKind::Long(_)
                | TokenKind::IntMin
                | TokenKind::LongMin
                | TokenKind::Float(_)
                | TokenKind::Double(_)
                | TokenKind::Char(_)
                | TokenKind::String(_)
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
                | TokenKind::LParen
                | TokenKind::Bang
                | TokenKind::Tilde
                | TokenKind::This
                | TokenKind::Super
                | TokenKind::New
        ) || self.check_primitive()
    }

    /// A primary followed by member selects, calls, indexing and `++`/`--`.
    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.current_kind() {
                TokenKind::Dot => {
                    self.advance();
                    expr = self.parse_selector(expr)?;
                }
                TokenKind::LBracket if matches!(self.peek_kind(1), TokenKind::RBracket) => {
                    // `String[].class`
                    let Some(name) = qualified_name_of(&expr) else {
                        return Err(self.cursor.make_expect_error("expression"));
                    };
                    let dims = self.parse_dims();
                    expr = self.parse_class_literal_rest(
                        TypeRef {
                            kind: TypeRefKind::Named {
                                name,
                                args: Vec::new(),
                            },
                            dims,
                            span: expr.span.merge(self.cursor.previous_span()),
                        },
                        expr.span,
                    )?;
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expr()?;
                    self.expect(&TokenKind::RBracket)?;
                    let span = self.span_from(expr.span);
                    expr = Expr::new(
                        ExprKind::Index {
                            target: Box::new(expr),
                            index: Box::new(index),
                        },
                        span,
                    );
                }
                TokenKind::PlusPlus | TokenKind::MinusMinus => {
                    let op = if self.check(&TokenKind::PlusPlus) {
                        UnaryOp::PostInc
                    } else {
                        UnaryOp::PostDec
                    };
                    self.advance();
                    let span = self.span_from(expr.span);
                    expr = Expr::new(
                        ExprKind::Unary {
                            op,
                            operand: Box::new(expr),
                        },
                        span,
                    );
                }
                TokenKind::ColonColon => {
                    return Err(ParseError::unsupported(
                        "method references",
                        self.current_span(),
                    ));
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    /// What follows `target.`
    fn parse_selector(&mut self, target: Expr) -> Result<Expr, ParseError> {
        let start = target.span;
        match self.current_kind() {
            TokenKind::Ident(_) => {
                let (name, _) = self.expect_ident()?;
                if self.check(&TokenKind::LParen) {
                    let args = self.parse_arguments()?;
                    Ok(Expr::new(
                        ExprKind::MethodCall {
                            target: Some(Box::new(target)),
                            name,
                            args,
                        },
                        self.span_from(start),
                    ))
                } else {
                    Ok(Expr::new(
                        ExprKind::FieldAccess {
                            target: Box::new(target),
                            name,
                        },
                        self.span_from(start),
                    ))
                }
            }
            TokenKind::Class => {
                let Some(name) = qualified_name_of(&target) else {
                    return Err(self.cursor.make_expect_error("identifier"));
                };
                let ty = TypeRef {
                    kind: TypeRefKind::Named {
                        name,
                        args: Vec::new(),
                    },
                    dims: 0,
                    span: target.span,
                };
                self.advance();
                Ok(Expr::new(ExprKind::ClassLiteral(ty), self.span_from(start)))
            }
            // `Outer.this`
            TokenKind::This => {
                self.advance();
                Ok(Expr::new(
                    ExprKind::FieldAccess {
                        target: Box::new(target),
                        name: "this".to_string(),
                    },
                    self.span_from(start),
                ))
            }
            TokenKind::New => Err(ParseError::unsupported(
                "qualified instance creations",
                self.current_span(),
            )),
            TokenKind::Super => Err(ParseError::unsupported(
                "qualified super references",
                self.current_span(),
            )),
            TokenKind::Lt => Err(ParseError::unsupported(
                "explicit type arguments on method calls",
                self.current_span(),
            )),
            _ => Err(self.cursor.make_expect_error("identifier")),
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let start = self.current_span();
        let literal = match self.current_kind() {
            TokenKind::Int(bits) => Some(Literal::Int(*bits)),
            TokenKind::Long(bits) => Some(Literal::Long(*bits)),
            TokenKind::Float(bits) => Some(Literal::Float(*bits)),
            TokenKind::Double(bits) => Some(Literal::Double(*bits)),
            TokenKind::Char(c) => Some(Literal::Char(*c)),
            TokenKind::String(s) => Some(Literal::String(s.clone())),
            TokenKind::True => Some(Literal::Bool(true)),
            TokenKind::False => Some(Literal::Bool(false)),
            TokenKind::Null => Some(Literal::Null),
            _ => None,
        };
        if let Some(literal) = literal {
            self.advance();
            return Ok(Expr::new(ExprKind::Literal(literal), start));
        }

        match self.current_kind() {
            TokenKind::IntMin | TokenKind::LongMin => Err(ParseError::integer_too_large(start)),
            TokenKind::This | TokenKind::Super => {
                let is_this = self.check(&TokenKind::This);
                self.advance();
                if self.check(&TokenKind::LParen) {
                    // Explicit constructor invocation.
                    let args = self.parse_arguments()?;
                    let name = if is_this { "this" } else { "super" };
                    return Ok(Expr::new(
                        ExprKind::MethodCall {
                            target: None,
                            name: name.to_string(),
                            args,
                        },
                        self.span_from(start),
                    ));
                }
                if !is_this && self.check(&TokenKind::ColonColon) {
                    return Err(ParseError::unsupported(
                        "method references",
                        self.current_span(),
                    ));
                }
                let kind = if is_this { ExprKind::This } else { ExprKind::Super };
                Ok(Expr::new(kind, start))
            }
            TokenKind::LParen => {
                self.advance();
                if self.check(&TokenKind::RParen) {
                    return Err(ParseError::unsupported("lambda expressions", start));
                }
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                if self.check(&TokenKind::Arrow) {
                    return Err(ParseError::unsupported("lambda expressions", start));
                }
                Ok(inner)
            }
            TokenKind::New => self.parse_new(),
            TokenKind::Ident(_) => {
                if matches!(self.peek_kind(1), TokenKind::Arrow) {
                    return Err(ParseError::unsupported("lambda expressions", start));
                }
                let (name, _) = self.expect_ident()?;
                if self.check(&TokenKind::LParen) {
                    let args = self.parse_arguments()?;
                    return Ok(Expr::new(
                        ExprKind::MethodCall {
                            target: None,
                            name,
                            args,
                        },
                        self.span_from(start),
                    ));
                }
                Ok(Expr::new(ExprKind::Name(name), start))
            }
            kind if primitive_of(kind).is_some() => {
                // `int.class`, `int[].class`
                let ty = self.parse_type()?;
                self.parse_class_literal_rest(ty, start)
            }
            TokenKind::Switch => Err(ParseError::unsupported("switch expressions", start)),
            _ => Err(ParseError::new(
                ErrorCode::E1002,
                format!(
                    "illegal start of expression: {}",
                    self.current_kind().display_name()
                ),
                start,
            )),
        }
    }

    /// The `.class` of a class literal whose type has been read.
    fn parse_class_literal_rest(&mut self, ty: TypeRef, start: Span) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::Dot)?;
        self.expect(&TokenKind::Class)?;
        Ok(Expr::new(ExprKind::ClassLiteral(ty), self.span_from(start)))
    }

    /// `new T(args)`, `new T<>(args)` or an array creation.
    fn parse_new(&mut self) -> Result<Expr, ParseError> {
        let start = self.expect(&TokenKind::New)?;
        if self.check(&TokenKind::Lt) {
            return Err(ParseError::unsupported(
                "explicit constructor type arguments",
                self.current_span(),
            ));
        }

        let type_start = self.current_span();
        let (kind, diamond) = if let Some(primitive) = primitive_of(self.current_kind()) {
            self.advance();
            (TypeRefKind::Primitive(primitive), false)
        } else if self.check_ident() {
            self.parse_named_type(true)?
        } else {
            return Err(self.cursor.make_expect_error("type"));
        };
        let ty = TypeRef {
            kind,
            dims: 0,
            span: self.span_from(type_start),
        };

        if self.check(&TokenKind::LBracket) && !diamond && !ty.is_void() {
            return self.parse_new_array(ty, start);
        }
        if matches!(ty.kind, TypeRefKind::Primitive(_)) {
            return Err(self.cursor.make_expect_error("`[`"));
        }

        let args = self.parse_arguments()?;
        if self.check(&TokenKind::LBrace) {
            return Err(ParseError::unsupported(
                "anonymous classes",
                self.current_span(),
            ));
        }
        Ok(Expr::new(
            ExprKind::New { ty, diamond, args },
            self.span_from(start),
        ))
    }

    fn parse_new_array(&mut self, elem: TypeRef, start: Span) -> Result<Expr, ParseError> {
        let mut dims = Vec::new();
        while self.check(&TokenKind::LBracket) && !matches!(self.peek_kind(1), TokenKind::RBracket)
        {
            self.advance();
            dims.push(self.parse_expr()?);
            self.expect(&TokenKind::RBracket)?;
        }
        let extra_dims = self.parse_dims();

        let init = if dims.is_empty() {
            if !self.check(&TokenKind::LBrace) {
                return Err(ParseError::new(
                    ErrorCode::E1001,
                    "array dimension missing",
                    self.current_span(),
                ));
            }
            match self.parse_array_init()?.kind {
                ExprKind::ArrayInit(elements) => Some(elements),
                _ => None,
            }
        } else {
            None
        };

        Ok(Expr::new(
            ExprKind::NewArray {
                elem,
                dims,
                extra_dims,
                init,
            },
            self.span_from(start),
        ))
    }

    /// `{a, {b, c}, d,}`
    pub(crate) fn parse_array_init(&mut self) -> Result<Expr, ParseError> {
        ensure_sufficient_stack(|| {
            let start = self.expect(&TokenKind::LBrace)?;
            let mut elements = Vec::new();
            while !self.check(&TokenKind::RBrace) {
                let element = if self.check(&TokenKind::LBrace) {
                    self.parse_array_init()?
                } else {
                    self.parse_expr()?
                };
                elements.push(element);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(&TokenKind::RBrace)?;
            Ok(Expr::new(ExprKind::ArrayInit(elements), self.span_from(start)))
        })
    }

    /// `(a, b, ...)`
    pub(crate) fn parse_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.expect(&TokenKind::LParen)?;
        let mut args = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                args.push(self.parse_expr()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(args)
    }
}

fn unary(op: UnaryOp, operand: Expr, start: Span) -> Expr {
    let span = start.merge(operand.span);
    Expr::new(
        ExprKind::Unary {
            op,
            operand: Box::new(operand),
        },
        span,
    )
}

/// `a.b.C` written as an expression, read back as a name.
fn qualified_name_of(expr: &Expr) -> Option<QualifiedName> {
    let mut segments = Vec::new();
    let mut current = expr;
    loop {
        match &current.kind {
            ExprKind::Name(name) => {
                segments.push(name.clone());
                break;
            }
            ExprKind::FieldAccess { target, name } => {
                segments.push(name.clone());
                current = target;
            }
            _ => return None,
        }
    }
    segments.reverse();
    Some(QualifiedName::new(segments, expr.span))
}
