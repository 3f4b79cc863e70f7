//! Statement and expression walks.

use kiln_diagnostic::ErrorCode;
use kiln_ir::{Block, Expr, ExprKind, Param, Stmt, StmtKind, TypeDeclKind, TypeRef};
use kiln_stack::ensure_sufficient_stack;

use super::Checker;
use crate::builtins::{ENUM_METHODS, OBJECT_METHODS};

/// Explicit constructor invocations, `this(..)` and `super(..)`.
const CONSTRUCTOR_CALLS: [&str; 2] = ["this", "super"];

impl<'t, 'a> Checker<'t, 'a> {
    pub(crate) fn check_block(&mut self, block: &'a Block) {
        self.with_block_scope(|this| {
            for stmt in &block.stmts {
                this.check_stmt(stmt);
            }
        });
    }

    /// Loop and branch bodies get their own scope even without braces.
    fn check_nested(&mut self, stmt: &'a Stmt) {
        self.with_block_scope(|this| this.check_stmt(stmt));
    }

    pub(crate) fn check_stmt(&mut self, stmt: &'a Stmt) {
        ensure_sufficient_stack(|| self.check_stmt_inner(stmt));
    }

    fn check_stmt_inner(&mut self, stmt: &'a Stmt) {
        match &stmt.kind {
            StmtKind::Block(block) => self.check_block(block),
            StmtKind::LocalVar {
                ty, declarators, ..
            } => {
                self.check_local_type(ty);
                for declarator in declarators {
                    self.declare_local(&declarator.name, declarator.span);
                    if let Some(init) = &declarator.init {
                        self.check_expr(init);
                    }
                }
            }
            StmtKind::Expr(expr) | StmtKind::Throw(expr) => self.check_expr(expr),
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.check_expr(cond);
                self.check_nested(then_branch);
                if let Some(else_branch) = else_branch {
                    self.check_nested(else_branch);
                }
            }
            StmtKind::While { cond, body } => {
                self.check_expr(cond);
                self.with_loop(|this| this.check_nested(body));
            }
            StmtKind::DoWhile { body, cond } => {
                self.with_loop(|this| this.check_nested(body));
                self.check_expr(cond);
            }
            StmtKind::For {
                init,
                cond,
                update,
                body,
            } => self.with_block_scope(|this| {
                for stmt in init {
                    this.check_stmt(stmt);
                }
                if let Some(cond) = cond {
                    this.check_expr(cond);
                }
                for expr in update {
                    this.check_expr(expr);
                }
                this.with_loop(|this| this.check_nested(body));
            }),
            StmtKind::ForEach {
                var,
                iterable,
                body,
            } => {
                self.check_expr(iterable);
                self.with_block_scope(|this| {
                    this.declare_param(var);
                    this.with_loop(|this| this.check_nested(body));
                });
            }
            StmtKind::Return(value) => self.check_return(stmt, value.as_ref()),
            StmtKind::Break(label) => self.check_jump("break", label.as_deref(), stmt),
            StmtKind::Continue(label) => self.check_jump("continue", label.as_deref(), stmt),
            StmtKind::Try {
                body,
                catches,
                finally,
            } => {
                self.check_block(body);
                for catch in catches {
                    self.with_block_scope(|this| {
                        this.declare_param(&catch.param);
                        this.check_block(&catch.body);
                    });
                }
                if let Some(finally) = finally {
                    self.check_block(finally);
                }
            }
            StmtKind::Empty => {}
        }
    }

    fn declare_param(&mut self, param: &'a Param) {
        self.check_local_type(&param.ty);
        self.declare_local(&param.name, param.span);
    }

    /// Local variable types may be `var`, unless a type of that name exists.
    fn check_local_type(&mut self, ty: &TypeRef) {
        if ty.simple_name() == Some("var")
            && self
                .resolver
                .resolve_simple("var", &self.chain, &self.type_params)
                .is_none()
        {
            return;
        }
        self.check_type(ty);
    }

    fn check_return(&mut self, stmt: &Stmt, value: Option<&'a Expr>) {
        match value {
            Some(value) => {
                if self.body.returns_void {
                    self.report(
                        ErrorCode::E2005,
                        "incompatible types: unexpected return value",
                        value.span,
                    );
                }
                self.check_expr(value);
            }
            None if !self.body.returns_void => {
                self.report(ErrorCode::E2006, "missing return value", stmt.span);
            }
            None => {}
        }
    }

    fn check_jump(&mut self, keyword: &str, label: Option<&str>, stmt: &Stmt) {
        // Labeled statements do not parse, so no label is ever in scope.
        if let Some(label) = label {
            self.report(ErrorCode::E2007, format!("undefined label: {label}"), stmt.span);
        } else if self.body.loop_depth == 0 {
            let message = if keyword == "break" {
                "break outside switch or loop"
            } else {
                "continue outside of loop"
            };
            self.report(ErrorCode::E2007, message, stmt.span);
        }
    }

    pub(crate) fn check_expr(&mut self, expr: &'a Expr) {
        ensure_sufficient_stack(|| self.check_expr_inner(expr));
    }

    fn check_expr_inner(&mut self, expr: &'a Expr) {
        match &expr.kind {
            ExprKind::Literal(_) | ExprKind::This | ExprKind::Super => {}
            ExprKind::Name(name) => {
                if !self.variable_in_scope(name) {
                    self.report(
                        ErrorCode::E2001,
                        format!("cannot find symbol: variable {name}"),
                        expr.span,
                    );
                }
            }
            ExprKind::FieldAccess { target, .. } => self.check_qualifier(target),
            ExprKind::MethodCall { target, name, args } => {
                match target {
                    Some(target) => self.check_qualifier(target),
                    None if CONSTRUCTOR_CALLS.contains(&name.as_str()) => {}
                    None => {
                        if !self.method_in_scope(name) {
                            self.report(
                                ErrorCode::E2002,
                                format!("cannot find symbol: method {name}"),
                                expr.span,
                            );
                        }
                    }
                }
                for arg in args {
                    self.check_expr(arg);
                }
            }
            ExprKind::New { ty, args, .. } => {
                self.check_type(ty);
                for arg in args {
                    self.check_expr(arg);
                }
            }
            ExprKind::NewArray {
                elem, dims, init, ..
            } => {
                self.check_type(elem);
                for dim in dims {
                    self.check_expr(dim);
                }
                for value in init.iter().flatten() {
                    self.check_expr(value);
                }
            }
            ExprKind::ArrayInit(values) => {
                for value in values {
                    self.check_expr(value);
                }
            }
            ExprKind::Index { target, index } => {
                self.check_expr(target);
                self.check_expr(index);
            }
            ExprKind::Unary { operand, .. } => self.check_expr(operand),
            ExprKind::Binary { lhs, rhs, .. } => {
                self.check_expr(lhs);
                self.check_expr(rhs);
            }
            ExprKind::Assign { target, value, .. } => {
                self.check_expr(target);
                self.check_expr(value);
            }
            ExprKind::Conditional {
                cond,
                then_expr,
                else_expr,
            } => {
                self.check_expr(cond);
                self.check_expr(then_expr);
                self.check_expr(else_expr);
            }
            ExprKind::InstanceOf { expr, ty } => {
                self.check_expr(expr);
                self.check_type(ty);
            }
            ExprKind::Cast { ty, expr } => {
                self.check_type(ty);
                self.check_expr(expr);
            }
            ExprKind::ClassLiteral(ty) => self.check_type(ty),
        }
    }

    /// The target of `.name` or `.m()`. A leading simple name may also be a
    /// type or the first segment of a package; members after a dot are not
    /// checked.
    fn check_qualifier(&mut self, target: &'a Expr) {
        match &target.kind {
            ExprKind::Name(name) => {
                let known = self.variable_in_scope(name)
                    || self
                        .resolver
                        .resolve_simple(name, &self.chain, &self.type_params)
                        .is_some()
                    || self.resolver.package_known(name);
                if !known {
                    self.report(
                        ErrorCode::E2001,
                        format!("cannot find symbol: variable {name}"),
                        target.span,
                    );
                }
            }
            ExprKind::FieldAccess { target, .. } => {
                ensure_sufficient_stack(|| self.check_qualifier(target));
            }
            _ => self.check_expr(target),
        }
    }

    fn variable_in_scope(&self, name: &str) -> bool {
        let table = self.table();
        self.is_local(name)
            || self.chain.iter().any(|info| table.has_field(info, name))
            || self.inherits_unknown_members()
            || self.statically_imported(name)
    }

    fn method_in_scope(&self, name: &str) -> bool {
        let table = self.table();
        OBJECT_METHODS.contains(&name)
            || self.chain.iter().any(|info| table.has_method(info, name))
            || (ENUM_METHODS.contains(&name)
                && self
                    .chain
                    .iter()
                    .any(|info| info.decl.kind == TypeDeclKind::Enum))
            || self.inherits_unknown_members()
            || self.statically_imported(name)
    }

    /// Some enclosing type extends a library type or an unresolved one.
    fn inherits_unknown_members(&self) -> bool {
        let table = self.table();
        self.chain.iter().any(|info| table.has_external_super(info))
    }

    fn statically_imported(&self, name: &str) -> bool {
        self.resolver
            .imports()
            .iter()
            .any(|i| i.is_static && (i.on_demand || i.path.last() == name))
    }
}
