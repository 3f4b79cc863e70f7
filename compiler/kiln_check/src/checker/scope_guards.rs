//! Scope helpers for [`Checker`] context management.
//!
//! Each helper saves the piece of context it changes, runs the closure, and
//! restores the saved state, so nested declarations and blocks never leak
//! names into their surroundings.

use kiln_ir::Span;

use super::{BodyState, Checker};
use crate::symbols::TypeInfo;
use kiln_diagnostic::ErrorCode;

impl<'t, 'a> Checker<'t, 'a> {
    /// Run `f` inside type `info`: its type parameters and member types are
    /// in scope.
    pub(crate) fn with_type_scope<T>(
        &mut self,
        info: &'t TypeInfo<'a>,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        let saved_params = self.type_params.len();
        self.chain.push(info);
        self.type_params
            .extend(info.decl.type_params.iter().map(|p| p.name.as_str()));

        let result = f(self);

        self.type_params.truncate(saved_params);
        self.chain.pop();
        result
    }

    /// Run `f` over a fresh body with one empty local scope.
    pub(crate) fn with_body_scope<T>(
        &mut self,
        owner: String,
        returns_void: bool,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        let fresh = BodyState {
            locals: vec![Vec::new()],
            loop_depth: 0,
            returns_void,
            owner,
        };
        let saved = std::mem::replace(&mut self.body, fresh);

        let result = f(self);

        self.body = saved;
        result
    }

    /// Run `f` in a nested block scope.
    pub(crate) fn with_block_scope<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.body.locals.push(Vec::new());
        let result = f(self);
        self.body.locals.pop();
        result
    }

    /// Run `f` as the body of a loop, where `break` and `continue` apply.
    pub(crate) fn with_loop<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.body.loop_depth += 1;
        let result = f(self);
        self.body.loop_depth -= 1;
        result
    }

    pub(crate) fn is_local(&self, name: &str) -> bool {
        self.body
            .locals
            .iter()
            .any(|scope| scope.iter().any(|local| *local == name))
    }

    /// Declare a local in the innermost scope. Locals may not shadow other
    /// locals of the same body.
    pub(crate) fn declare_local(&mut self, name: &'a str, span: Span) {
        if self.is_local(name) {
            let message = format!(
                "variable {name} is already defined in {}",
                self.body.owner
            );
            self.report(ErrorCode::E2004, message, span);
            return;
        }
        if let Some(scope) = self.body.locals.last_mut() {
            scope.push(name);
        }
    }
}
