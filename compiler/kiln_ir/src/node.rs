//! Uniform read-only view over syntax tree nodes.
//!
//! [`NodeRef`] wraps a borrowed node of any level and exposes a stable
//! [`NodeKind`] tag, its span, and its direct children. Consumers that do not
//! care about the typed payload (walkers, the comparator's error paths,
//! processors looking for annotated elements) work through this view.

use std::fmt;

use crate::ast::{
    Annotation, Block, CatchClause, CompilationUnit, EnumConstant, Expr, ExprKind, FieldDecl,
    Import, Initializer, Member, MethodDecl, PackageDecl, Param, Stmt, StmtKind, TypeDecl,
    TypeDeclKind, TypeParam, TypeRef, TypeRefKind, VarDeclarator,
};
use crate::Span;

/// Stable kind tag of a syntax node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    CompilationUnit,
    Package,
    Import,
    Class,
    Interface,
    Enum,
    TypeParam,
    EnumConstant,
    Field,
    VarDeclarator,
    Method,
    Constructor,
    Initializer,
    Parameter,
    TypeRef,
    Annotation,
    Block,
    CatchClause,
    // Statements
    LocalVar,
    ExprStmt,
    If,
    While,
    DoWhile,
    For,
    ForEach,
    Return,
    Throw,
    Break,
    Continue,
    Try,
    EmptyStmt,
    // Expressions
    Literal,
    Name,
    This,
    Super,
    FieldAccess,
    MethodCall,
    New,
    NewArray,
    ArrayInit,
    Index,
    Unary,
    Binary,
    Assign,
    Conditional,
    InstanceOf,
    Cast,
    ClassLiteral,
}

impl NodeKind {
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::CompilationUnit => "CompilationUnit",
            NodeKind::Package => "Package",
            NodeKind::Import => "Import",
            NodeKind::Class => "Class",
            NodeKind::Interface => "Interface",
            NodeKind::Enum => "Enum",
            NodeKind::TypeParam => "TypeParam",
            NodeKind::EnumConstant => "EnumConstant",
            NodeKind::Field => "Field",
            NodeKind::VarDeclarator => "VarDeclarator",
            NodeKind::Method => "Method",
            NodeKind::Constructor => "Constructor",
            NodeKind::Initializer => "Initializer",
            NodeKind::Parameter => "Parameter",
            NodeKind::TypeRef => "TypeRef",
            NodeKind::Annotation => "Annotation",
            NodeKind::Block => "Block",
            NodeKind::CatchClause => "CatchClause",
            NodeKind::LocalVar => "LocalVar",
            NodeKind::ExprStmt => "ExprStmt",
            NodeKind::If => "If",
            NodeKind::While => "While",
            NodeKind::DoWhile => "DoWhile",
            NodeKind::For => "For",
            NodeKind::ForEach => "ForEach",
            NodeKind::Return => "Return",
            NodeKind::Throw => "Throw",
            NodeKind::Break => "Break",
            NodeKind::Continue => "Continue",
            NodeKind::Try => "Try",
            NodeKind::EmptyStmt => "EmptyStmt",
            NodeKind::Literal => "Literal",
            NodeKind::Name => "Name",
            NodeKind::This => "This",
            NodeKind::Super => "Super",
            NodeKind::FieldAccess => "FieldAccess",
            NodeKind::MethodCall => "MethodCall",
            NodeKind::New => "New",
            NodeKind::NewArray => "NewArray",
            NodeKind::ArrayInit => "ArrayInit",
            NodeKind::Index => "Index",
            NodeKind::Unary => "Unary",
            NodeKind::Binary => "Binary",
            NodeKind::Assign => "Assign",
            NodeKind::Conditional => "Conditional",
            NodeKind::InstanceOf => "InstanceOf",
            NodeKind::Cast => "Cast",
            NodeKind::ClassLiteral => "ClassLiteral",
        }
    }

    /// Class, interface or enum declaration.
    pub fn is_type_decl(self) -> bool {
        matches!(self, NodeKind::Class | NodeKind::Interface | NodeKind::Enum)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Borrowed reference to any syntax node.
#[derive(Copy, Clone, Debug)]
pub enum NodeRef<'a> {
    Unit(&'a CompilationUnit),
    Package(&'a PackageDecl),
    Import(&'a Import),
    Type(&'a TypeDecl),
    TypeParam(&'a TypeParam),
    EnumConstant(&'a EnumConstant),
    Field(&'a FieldDecl),
    /// One declarator of a field together with the field's modifiers and
    /// type, so `int a, b;` reads as `int a; int b;`.
    FieldVariable(&'a FieldDecl, &'a VarDeclarator),
    VarDeclarator(&'a VarDeclarator),
    Method(&'a MethodDecl),
    Initializer(&'a Initializer),
    Param(&'a Param),
    TypeRef(&'a TypeRef),
    Annotation(&'a Annotation),
    Block(&'a Block),
    Catch(&'a CatchClause),
    Stmt(&'a Stmt),
    Expr(&'a Expr),
}

impl<'a> NodeRef<'a> {
    /// View a type member.
    pub fn member(member: &'a Member) -> Self {
        match member {
            Member::Field(f) => NodeRef::Field(f),
            Member::Method(m) => NodeRef::Method(m),
            Member::Initializer(i) => NodeRef::Initializer(i),
            Member::Type(t) => NodeRef::Type(t),
        }
    }

    /// View type members with every field split into one
    /// [`NodeRef::FieldVariable`] per declarator.
    pub fn split_members(members: &'a [Member]) -> Vec<Self> {
        let mut out = Vec::with_capacity(members.len());
        for member in members {
            match member {
                Member::Field(f) => {
                    out.extend(f.declarators.iter().map(|d| NodeRef::FieldVariable(f, d)));
                }
                _ => out.push(NodeRef::member(member)),
            }
        }
        out
    }

    pub fn kind(self) -> NodeKind {
        match self {
            NodeRef::Unit(_) => NodeKind::CompilationUnit,
            NodeRef::Package(_) => NodeKind::Package,
            NodeRef::Import(_) => NodeKind::Import,
            NodeRef::Type(t) => match t.kind {
                TypeDeclKind::Class => NodeKind::Class,
                TypeDeclKind::Interface => NodeKind::Interface,
                TypeDeclKind::Enum => NodeKind::Enum,
            },
            NodeRef::TypeParam(_) => NodeKind::TypeParam,
            NodeRef::EnumConstant(_) => NodeKind::EnumConstant,
            NodeRef::Field(_) | NodeRef::FieldVariable(..) => NodeKind::Field,
            NodeRef::VarDeclarator(_) => NodeKind::VarDeclarator,
            NodeRef::Method(m) if m.is_constructor() => NodeKind::Constructor,
            NodeRef::Method(_) => NodeKind::Method,
            NodeRef::Initializer(_) => NodeKind::Initializer,
            NodeRef::Param(_) => NodeKind::Parameter,
            NodeRef::TypeRef(_) => NodeKind::TypeRef,
            NodeRef::Annotation(_) => NodeKind::Annotation,
            NodeRef::Block(_) => NodeKind::Block,
            NodeRef::Catch(_) => NodeKind::CatchClause,
            NodeRef::Stmt(s) => stmt_kind(s),
            NodeRef::Expr(e) => expr_kind(e),
        }
    }

    pub fn span(self) -> Span {
        match self {
            NodeRef::Unit(n) => n.span,
            NodeRef::Package(n) => n.span,
            NodeRef::Import(n) => n.span,
            NodeRef::Type(n) => n.span,
            NodeRef::TypeParam(n) => n.span,
            NodeRef::EnumConstant(n) => n.span,
            NodeRef::Field(n) => n.span,
            NodeRef::FieldVariable(_, d) => d.span,
            NodeRef::VarDeclarator(n) => n.span,
            NodeRef::Method(n) => n.span,
            NodeRef::Initializer(n) => n.span,
            NodeRef::Param(n) => n.span,
            NodeRef::TypeRef(n) => n.span,
            NodeRef::Annotation(n) => n.span,
            NodeRef::Block(n) => n.span,
            NodeRef::Catch(n) => n.span,
            NodeRef::Stmt(n) => n.span,
            NodeRef::Expr(n) => n.span,
        }
    }

    /// Declared or referenced name, when the node has one.
    ///
    /// Fields report their first declarator's name.
    pub fn name(self) -> Option<&'a str> {
        match self {
            NodeRef::Type(t) => Some(&t.name),
            NodeRef::TypeParam(p) => Some(&p.name),
            NodeRef::EnumConstant(c) => Some(&c.name),
            NodeRef::Field(f) => f.declarators.first().map(|d| d.name.as_str()),
            NodeRef::VarDeclarator(d) | NodeRef::FieldVariable(_, d) => Some(&d.name),
            NodeRef::Method(m) => Some(&m.name),
            NodeRef::Param(p) => Some(&p.name),
            NodeRef::Annotation(a) => Some(a.name.last()),
            NodeRef::Expr(e) => match &e.kind {
                ExprKind::Name(name)
                | ExprKind::FieldAccess { name, .. }
                | ExprKind::MethodCall { name, .. } => Some(name),
                _ => None,
            },
            _ => None,
        }
    }

    /// Direct children in source order, annotations included.
    pub fn children(self) -> Vec<NodeRef<'a>> {
        let mut out = Vec::new();
        match self {
            NodeRef::Unit(u) => {
                out.extend(u.package.iter().map(NodeRef::Package));
                out.extend(u.imports.iter().map(NodeRef::Import));
                out.extend(u.types.iter().map(NodeRef::Type));
            }
            NodeRef::Package(p) => out.extend(p.annotations.iter().map(NodeRef::Annotation)),
            NodeRef::Import(_) => {}
            NodeRef::Type(t) => {
                out.extend(t.annotations.iter().map(NodeRef::Annotation));
                out.extend(t.type_params.iter().map(NodeRef::TypeParam));
                out.extend(t.extends.iter().map(NodeRef::TypeRef));
                out.extend(t.implements.iter().map(NodeRef::TypeRef));
                out.extend(t.enum_constants.iter().map(NodeRef::EnumConstant));
                out.extend(t.members.iter().map(NodeRef::member));
            }
            NodeRef::TypeParam(p) => out.extend(p.bounds.iter().map(NodeRef::TypeRef)),
            NodeRef::EnumConstant(c) => {
                out.extend(c.annotations.iter().map(NodeRef::Annotation));
                out.extend(c.args.iter().map(NodeRef::Expr));
            }
            NodeRef::Field(f) => {
                out.extend(f.annotations.iter().map(NodeRef::Annotation));
                out.push(NodeRef::TypeRef(&f.ty));
                out.extend(f.declarators.iter().map(NodeRef::VarDeclarator));
            }
            NodeRef::FieldVariable(f, d) => {
                out.extend(f.annotations.iter().map(NodeRef::Annotation));
                out.push(NodeRef::TypeRef(&f.ty));
                out.push(NodeRef::VarDeclarator(d));
            }
            NodeRef::VarDeclarator(d) => out.extend(d.init.iter().map(NodeRef::Expr)),
            NodeRef::Method(m) => {
                out.extend(m.annotations.iter().map(NodeRef::Annotation));
                out.extend(m.type_params.iter().map(NodeRef::TypeParam));
                out.extend(m.return_type.iter().map(NodeRef::TypeRef));
                out.extend(m.params.iter().map(NodeRef::Param));
                out.extend(m.throws.iter().map(NodeRef::TypeRef));
                out.extend(m.body.iter().map(NodeRef::Block));
            }
            NodeRef::Initializer(i) => out.push(NodeRef::Block(&i.body)),
            NodeRef::Param(p) => {
                out.extend(p.annotations.iter().map(NodeRef::Annotation));
                out.push(NodeRef::TypeRef(&p.ty));
            }
            NodeRef::TypeRef(t) => match &t.kind {
                TypeRefKind::Primitive(_) => {}
                TypeRefKind::Named { args, .. } => out.extend(args.iter().map(NodeRef::TypeRef)),
                TypeRefKind::Wildcard { bound } => {
                    out.extend(bound.iter().map(|(_, ty)| NodeRef::TypeRef(ty)));
                }
            },
            NodeRef::Annotation(a) => out.extend(a.args.iter().map(|arg| NodeRef::Expr(&arg.value))),
            NodeRef::Block(b) => out.extend(b.stmts.iter().map(NodeRef::Stmt)),
            NodeRef::Catch(c) => {
                out.push(NodeRef::Param(&c.param));
                out.push(NodeRef::Block(&c.body));
            }
            NodeRef::Stmt(s) => stmt_children(s, &mut out),
            NodeRef::Expr(e) => expr_children(e, &mut out),
        }
        out
    }

    /// Direct children of one kind, in source order.
    pub fn children_of_kind(self, kind: NodeKind) -> Vec<NodeRef<'a>> {
        self.children()
            .into_iter()
            .filter(|child| child.kind() == kind)
            .collect()
    }
}

fn stmt_kind(stmt: &Stmt) -> NodeKind {
    match &stmt.kind {
        StmtKind::Block(_) => NodeKind::Block,
        StmtKind::LocalVar { .. } => NodeKind::LocalVar,
        StmtKind::Expr(_) => NodeKind::ExprStmt,
        StmtKind::If { .. } => NodeKind::If,
        StmtKind::While { .. } => NodeKind::While,
        StmtKind::DoWhile { .. } => NodeKind::DoWhile,
        StmtKind::For { .. } => NodeKind::For,
        StmtKind::ForEach { .. } => NodeKind::ForEach,
        StmtKind::Return(_) => NodeKind::Return,
        StmtKind::Throw(_) => NodeKind::Throw,
        StmtKind::Break(_) => NodeKind::Break,
        StmtKind::Continue(_) => NodeKind::Continue,
        StmtKind::Try { .. } => NodeKind::Try,
        StmtKind::Empty => NodeKind::EmptyStmt,
    }
}

fn expr_kind(expr: &Expr) -> NodeKind {
    match &expr.kind {
        ExprKind::Literal(_) => NodeKind::Literal,
        ExprKind::Name(_) => NodeKind::Name,
        ExprKind::This => NodeKind::This,
        ExprKind::Super => NodeKind::Super,
        ExprKind::FieldAccess { .. } => NodeKind::FieldAccess,
        ExprKind::MethodCall { .. } => NodeKind::MethodCall,
        ExprKind::New { .. } => NodeKind::New,
        ExprKind::NewArray { .. } => NodeKind::NewArray,
        ExprKind::ArrayInit(_) => NodeKind::ArrayInit,
        ExprKind::Index { .. } => NodeKind::Index,
        ExprKind::Unary { .. } => NodeKind::Unary,
        ExprKind::Binary { .. } => NodeKind::Binary,
        ExprKind::Assign { .. } => NodeKind::Assign,
        ExprKind::Conditional { .. } => NodeKind::Conditional,
        ExprKind::InstanceOf { .. } => NodeKind::InstanceOf,
        ExprKind::Cast { .. } => NodeKind::Cast,
        ExprKind::ClassLiteral(_) => NodeKind::ClassLiteral,
    }
}

fn stmt_children<'a>(stmt: &'a Stmt, out: &mut Vec<NodeRef<'a>>) {
    match &stmt.kind {
        StmtKind::Block(b) => out.extend(b.stmts.iter().map(NodeRef::Stmt)),
        StmtKind::LocalVar {
            ty, declarators, ..
        } => {
            out.push(NodeRef::TypeRef(ty));
            out.extend(declarators.iter().map(NodeRef::VarDeclarator));
        }
        StmtKind::Expr(e) | StmtKind::Throw(e) => out.push(NodeRef::Expr(e)),
        StmtKind::If {
            cond,
            then_branch,
            else_branch,
        } => {
            out.push(NodeRef::Expr(cond));
            out.push(NodeRef::Stmt(then_branch));
            out.extend(else_branch.iter().map(|s| NodeRef::Stmt(s)));
        }
        StmtKind::While { cond, body } => {
            out.push(NodeRef::Expr(cond));
            out.push(NodeRef::Stmt(body));
        }
        StmtKind::DoWhile { body, cond } => {
            out.push(NodeRef::Stmt(body));
            out.push(NodeRef::Expr(cond));
        }
        StmtKind::For {
            init,
            cond,
            update,
            body,
        } => {
            out.extend(init.iter().map(NodeRef::Stmt));
            out.extend(cond.iter().map(NodeRef::Expr));
            out.extend(update.iter().map(NodeRef::Expr));
            out.push(NodeRef::Stmt(body));
        }
        StmtKind::ForEach {
            var,
            iterable,
            body,
        } => {
            out.push(NodeRef::Param(var));
            out.push(NodeRef::Expr(iterable));
            out.push(NodeRef::Stmt(body));
        }
        StmtKind::Return(value) => out.extend(value.iter().map(NodeRef::Expr)),
        StmtKind::Try {
            body,
            catches,
            finally,
        } => {
            out.push(NodeRef::Block(body));
            out.extend(catches.iter().map(NodeRef::Catch));
            out.extend(finally.iter().map(NodeRef::Block));
        }
        StmtKind::Break(_) | StmtKind::Continue(_) | StmtKind::Empty => {}
    }
}

fn expr_children<'a>(expr: &'a Expr, out: &mut Vec<NodeRef<'a>>) {
    match &expr.kind {
        ExprKind::Literal(_) | ExprKind::Name(_) | ExprKind::This | ExprKind::Super => {}
        ExprKind::FieldAccess { target, .. } => out.push(NodeRef::Expr(target)),
        ExprKind::MethodCall { target, args, .. } => {
            out.extend(target.iter().map(|t| NodeRef::Expr(t)));
            out.extend(args.iter().map(NodeRef::Expr));
        }
        ExprKind::New { ty, args, .. } => {
            out.push(NodeRef::TypeRef(ty));
            out.extend(args.iter().map(NodeRef::Expr));
        }
        ExprKind::NewArray {
            elem, dims, init, ..
        } => {
            out.push(NodeRef::TypeRef(elem));
            out.extend(dims.iter().map(NodeRef::Expr));
            if let Some(init) = init {
                out.extend(init.iter().map(NodeRef::Expr));
            }
        }
        ExprKind::ArrayInit(elems) => out.extend(elems.iter().map(NodeRef::Expr)),
        ExprKind::Index { target, index } => {
            out.push(NodeRef::Expr(target));
            out.push(NodeRef::Expr(index));
        }
        ExprKind::Unary { operand, .. } => out.push(NodeRef::Expr(operand)),
        ExprKind::Binary { lhs, rhs, .. } => {
            out.push(NodeRef::Expr(lhs));
            out.push(NodeRef::Expr(rhs));
        }
        ExprKind::Assign { target, value, .. } => {
            out.push(NodeRef::Expr(target));
            out.push(NodeRef::Expr(value));
        }
        ExprKind::Conditional {
            cond,
            then_expr,
            else_expr,
        } => {
            out.push(NodeRef::Expr(cond));
            out.push(NodeRef::Expr(then_expr));
            out.push(NodeRef::Expr(else_expr));
        }
        ExprKind::InstanceOf { expr, ty } => {
            out.push(NodeRef::Expr(expr));
            out.push(NodeRef::TypeRef(ty));
        }
        ExprKind::Cast { ty, expr } => {
            out.push(NodeRef::TypeRef(ty));
            out.push(NodeRef::Expr(expr));
        }
        ExprKind::ClassLiteral(ty) => out.push(NodeRef::TypeRef(ty)),
    }
}
