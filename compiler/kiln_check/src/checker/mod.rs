//! Per-unit semantic checks.
//!
//! A [`Checker`] walks one compilation unit against the shared symbol
//! table. Declarations are visited in source order; each diagnostic is
//! tagged with its offset so the caller can emit them in declaration order.

mod body;
mod resolve;
mod scope_guards;

use kiln_diagnostic::{Diagnostic, ErrorCode, UnitLocator};
use kiln_ir::{
    CompilationUnit, Member, MethodDecl, ModifierSet, Span, TypeDecl, TypeDeclKind, TypeRef,
    TypeRefKind,
};
use kiln_stack::ensure_sufficient_stack;

use crate::symbols::{qualify, SuperRef, SymbolTable, TypeInfo};

pub(crate) use resolve::{Resolved, Resolver};

/// Resolve the declared supertypes of every type in the table.
pub(crate) fn link_supertypes(table: &mut SymbolTable<'_>, trees: &[&CompilationUnit]) {
    table.link_supers(|table, info| {
        let Some(tree) = trees.get(info.unit) else {
            return Vec::new();
        };
        let resolver = Resolver::new(table, tree);
        let chain = table.chain_of(info);
        let outer = &chain[..chain.len() - 1];
        let type_params: Vec<&str> = info
            .decl
            .type_params
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        info.decl
            .extends
            .iter()
            .chain(&info.decl.implements)
            .map(|ty| match &ty.kind {
                TypeRefKind::Named { name, .. } => match resolver.resolve(name, outer, &type_params) {
                    Some(Resolved::Source(sup)) => SuperRef::Source(sup.fq.clone()),
                    _ => SuperRef::External,
                },
                _ => SuperRef::External,
            })
            .collect()
    });
}

pub(crate) struct Checker<'t, 'a> {
    resolver: Resolver<'t, 'a>,
    locator: &'t UnitLocator,
    tree: &'a CompilationUnit,
    unit: usize,
    diagnostics: Vec<(u32, Diagnostic)>,
    /// Enclosing types, outermost first.
    chain: Vec<&'t TypeInfo<'a>>,
    type_params: Vec<&'a str>,
    body: BodyState<'a>,
}

/// State of the method body, initializer or field initializer being walked.
#[derive(Default)]
pub(crate) struct BodyState<'a> {
    /// Block scopes of local variables, innermost last.
    locals: Vec<Vec<&'a str>>,
    loop_depth: u32,
    returns_void: bool,
    /// `method m`, `constructor C` or `initializer`, for redeclarations.
    owner: String,
}

impl<'t, 'a> Checker<'t, 'a> {
    pub fn new(
        table: &'t SymbolTable<'a>,
        tree: &'a CompilationUnit,
        unit: usize,
        locator: &'t UnitLocator,
    ) -> Self {
        Checker {
            resolver: Resolver::new(table, tree),
            locator,
            tree,
            unit,
            diagnostics: Vec::new(),
            chain: Vec::new(),
            type_params: Vec::new(),
            body: BodyState::default(),
        }
    }

    fn table(&self) -> &'t SymbolTable<'a> {
        self.resolver.table()
    }

    /// Check the unit, returning its diagnostics in source order.
    pub fn check_unit(mut self) -> Vec<Diagnostic> {
        for duplicate in self.table().duplicates() {
            if duplicate.unit == self.unit {
                self.report(
                    ErrorCode::E2003,
                    format!("duplicate class: {}", duplicate.fq),
                    duplicate.span,
                );
            }
        }

        let tree = self.tree;
        for import in &tree.imports {
            if let Some((code, message)) = self.resolver.import_problem(import) {
                self.report(code, message, import.path.span);
            }
        }

        let package = tree.package_name();
        for decl in &tree.types {
            let fq = qualify(&package, &decl.name);
            if let Some(info) = self.info_for(&fq, decl) {
                self.check_type_decl(info);
            }
        }

        self.diagnostics.sort_by_key(|(offset, _)| *offset);
        self.diagnostics.into_iter().map(|(_, d)| d).collect()
    }

    /// The table entry for `decl`; `None` when the name belongs to an
    /// earlier duplicate.
    fn info_for(&self, fq: &str, decl: &TypeDecl) -> Option<&'t TypeInfo<'a>> {
        self.table()
            .get(fq)
            .filter(|info| std::ptr::eq(info.decl, decl))
    }

    #[tracing::instrument(level = "trace", skip_all, fields(ty = %info.fq))]
    fn check_type_decl(&mut self, info: &'t TypeInfo<'a>) {
        let decl = info.decl;
        self.with_type_scope(info, |this| {
            for param in &decl.type_params {
                for bound in &param.bounds {
                    this.check_type(bound);
                }
            }
            for ty in decl.extends.iter().chain(&decl.implements) {
                this.check_type(ty);
            }
            for constant in &decl.enum_constants {
                this.with_body_scope("initializer".to_string(), true, |this| {
                    for arg in &constant.args {
                        this.check_expr(arg);
                    }
                });
            }
            for member in &decl.members {
                this.check_member(info, member);
            }
        });
    }

    fn check_member(&mut self, info: &'t TypeInfo<'a>, member: &'a Member) {
        match member {
            Member::Field(field) => {
                self.check_type(&field.ty);
                for declarator in &field.declarators {
                    if let Some(init) = &declarator.init {
                        self.with_body_scope("initializer".to_string(), true, |this| {
                            this.check_expr(init);
                        });
                    }
                }
            }
            Member::Method(method) => self.check_method(info.decl, method),
            Member::Initializer(init) => {
                self.with_body_scope("initializer".to_string(), true, |this| {
                    this.check_block(&init.body);
                });
            }
            Member::Type(inner) => {
                let fq = format!("{}.{}", info.fq, inner.name);
                if let Some(inner_info) = self.info_for(&fq, inner) {
                    ensure_sufficient_stack(|| self.check_type_decl(inner_info));
                }
            }
        }
    }

    fn check_method(&mut self, owner: &TypeDecl, method: &'a MethodDecl) {
        let saved = self.type_params.len();
        self.type_params
            .extend(method.type_params.iter().map(|p| p.name.as_str()));

        for param in &method.type_params {
            for bound in &param.bounds {
                self.check_type(bound);
            }
        }
        if let Some(ret) = &method.return_type {
            self.check_type(ret);
        }
        for param in &method.params {
            self.check_type(&param.ty);
        }
        for thrown in &method.throws {
            self.check_type(thrown);
        }

        let is_abstract = method.modifiers.contains(ModifierSet::ABSTRACT);
        let concrete_owner = match owner.kind {
            TypeDeclKind::Class => !owner.modifiers.contains(ModifierSet::ABSTRACT),
            TypeDeclKind::Enum => true,
            TypeDeclKind::Interface => false,
        };
        if is_abstract && concrete_owner {
            self.report(
                ErrorCode::E2008,
                format!(
                    "{} is not abstract and does not override abstract method {}() in {}",
                    owner.name, method.name, owner.name
                ),
                method.name_span,
            );
        }

        match &method.body {
            None => {
                let may_omit = is_abstract
                    || method.modifiers.contains(ModifierSet::NATIVE)
                    || (owner.kind == TypeDeclKind::Interface
                        && !method
                            .modifiers
                            .intersects(ModifierSet::DEFAULT | ModifierSet::STATIC));
                if !may_omit {
                    self.report(
                        ErrorCode::E2009,
                        "missing method body, or declare abstract",
                        method.name_span,
                    );
                }
            }
            Some(body) => {
                let owner_name = if method.is_constructor() {
                    format!("constructor {}", method.name)
                } else {
                    format!("method {}", method.name)
                };
                self.with_body_scope(owner_name, method.returns_void(), |this| {
                    for param in &method.params {
                        this.declare_local(&param.name, param.span);
                    }
                    this.check_block(body);
                });
            }
        }

        self.type_params.truncate(saved);
    }

    /// Report a type reference that does not resolve, then its arguments.
    pub(crate) fn check_type(&mut self, ty: &TypeRef) {
        match &ty.kind {
            TypeRefKind::Primitive(_) => {}
            TypeRefKind::Named { name, args } => {
                if self
                    .resolver
                    .resolve(name, &self.chain, &self.type_params)
                    .is_none()
                {
                    self.report(
                        ErrorCode::E2012,
                        format!("cannot find symbol: class {name}"),
                        name.span,
                    );
                }
                for arg in args {
                    ensure_sufficient_stack(|| self.check_type(arg));
                }
            }
            TypeRefKind::Wildcard { bound } => {
                if let Some((_, bound)) = bound {
                    ensure_sufficient_stack(|| self.check_type(bound));
                }
            }
        }
    }

    #[cold]
    #[inline(never)]
    pub(crate) fn report(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        tracing::trace!(code = code.as_str(), start = span.start, "checker diagnostic");
        let diagnostic = self.locator.error(code, message, span);
        self.diagnostics.push((span.start, diagnostic));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
