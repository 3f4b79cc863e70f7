//! Comparable decomposition of a node.
//!
//! A [`Shape`] lists the scalar payload of a node and its child groups, each
//! group tagged ordered or unordered. Spans and annotations never appear in a
//! shape, so they cannot influence a comparison.

use std::fmt;

use kiln_ir::{
    ExprKind, Literal, ModifierSet, NodeRef, QualifiedName, StmtKind, TypeRefKind,
};

/// How a child group is matched.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Order {
    /// Pairwise by position.
    Ordered,
    /// By pairing each element with an equivalent counterpart.
    Unordered,
}

/// One scalar payload field.
#[derive(Copy, Clone, Debug)]
pub(crate) enum Scalar<'a> {
    Name(&'a str),
    OptName(Option<&'a str>),
    Path(&'a QualifiedName),
    Flag(bool),
    Count(u32),
    Modifiers(ModifierSet),
    Literal(&'a Literal),
    Symbol(&'static str),
}

impl PartialEq for Scalar<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Name(a), Scalar::Name(b)) => a == b,
            (Scalar::OptName(a), Scalar::OptName(b)) => a == b,
            (Scalar::Path(a), Scalar::Path(b)) => a.segments == b.segments,
            (Scalar::Flag(a), Scalar::Flag(b)) => a == b,
            (Scalar::Count(a), Scalar::Count(b)) => a == b,
            (Scalar::Modifiers(a), Scalar::Modifiers(b)) => a == b,
            (Scalar::Literal(a), Scalar::Literal(b)) => a == b,
            (Scalar::Symbol(a), Scalar::Symbol(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Scalar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Name(name) => f.write_str(name),
            Scalar::OptName(Some(name)) => f.write_str(name),
            Scalar::OptName(None) => f.write_str("<none>"),
            Scalar::Path(path) => write!(f, "{path}"),
            Scalar::Flag(flag) => write!(f, "{flag}"),
            Scalar::Count(count) => write!(f, "{count}"),
            Scalar::Modifiers(mods) => write!(f, "{mods}"),
            Scalar::Literal(literal) => write!(f, "{literal} ({})", literal.type_name()),
            Scalar::Symbol(symbol) => f.write_str(symbol),
        }
    }
}

pub(crate) struct Group<'a> {
    pub name: &'static str,
    pub order: Order,
    pub children: Vec<NodeRef<'a>>,
}

#[derive(Default)]
pub(crate) struct Shape<'a> {
    pub scalars: Vec<(&'static str, Scalar<'a>)>,
    pub groups: Vec<Group<'a>>,
}

impl<'a> Shape<'a> {
    fn scalar(mut self, name: &'static str, value: Scalar<'a>) -> Self {
        self.scalars.push((name, value));
        self
    }

    fn ordered(mut self, name: &'static str, children: impl IntoIterator<Item = NodeRef<'a>>) -> Self {
        self.groups.push(Group {
            name,
            order: Order::Ordered,
            children: children.into_iter().collect(),
        });
        self
    }

    fn unordered(
        mut self,
        name: &'static str,
        children: impl IntoIterator<Item = NodeRef<'a>>,
    ) -> Self {
        self.groups.push(Group {
            name,
            order: Order::Unordered,
            children: children.into_iter().collect(),
        });
        self
    }

    /// Decompose `node`. Both sides of a comparison have the same kind by the
    /// time this is called, so they produce the same scalar and group names.
    pub fn of(node: NodeRef<'a>) -> Self {
        let shape = Shape::default();
        match node {
            NodeRef::Unit(unit) => shape
                .ordered("package", unit.package.iter().map(NodeRef::Package))
                .unordered("imports", unit.imports.iter().map(NodeRef::Import))
                .unordered("types", unit.types.iter().map(NodeRef::Type)),
            NodeRef::Package(package) => shape.scalar("name", Scalar::Path(&package.name)),
            NodeRef::Import(import) => shape
                .scalar("path", Scalar::Path(&import.path))
                .scalar("static", Scalar::Flag(import.is_static))
                .scalar("on_demand", Scalar::Flag(import.on_demand)),
            NodeRef::Type(ty) => shape
                .scalar("name", Scalar::Name(&ty.name))
                .scalar("modifiers", Scalar::Modifiers(ty.modifiers))
                .ordered("type_params", ty.type_params.iter().map(NodeRef::TypeParam))
                .unordered("extends", ty.extends.iter().map(NodeRef::TypeRef))
                .unordered("implements", ty.implements.iter().map(NodeRef::TypeRef))
                .ordered(
                    "enum_constants",
                    ty.enum_constants.iter().map(NodeRef::EnumConstant),
                )
                .unordered("members", NodeRef::split_members(&ty.members)),
            NodeRef::TypeParam(param) => shape
                .scalar("name", Scalar::Name(&param.name))
                .unordered("bounds", param.bounds.iter().map(NodeRef::TypeRef)),
            NodeRef::EnumConstant(constant) => shape
                .scalar("name", Scalar::Name(&constant.name))
                .ordered("args", constant.args.iter().map(NodeRef::Expr)),
            NodeRef::Field(field) => shape
                .scalar("modifiers", Scalar::Modifiers(field.modifiers))
                .ordered("type", [NodeRef::TypeRef(&field.ty)])
                .ordered(
                    "declarators",
                    field.declarators.iter().map(NodeRef::VarDeclarator),
                ),
            NodeRef::FieldVariable(field, decl) => shape
                .scalar("modifiers", Scalar::Modifiers(field.modifiers))
                .ordered("type", [NodeRef::TypeRef(&field.ty)])
                .ordered("declarators", [NodeRef::VarDeclarator(decl)]),
            NodeRef::VarDeclarator(decl) => shape
                .scalar("name", Scalar::Name(&decl.name))
                .scalar("extra_dims", Scalar::Count(decl.extra_dims))
                .ordered("init", decl.init.iter().map(NodeRef::Expr)),
            NodeRef::Method(method) => shape
                .scalar("name", Scalar::Name(&method.name))
                .scalar("modifiers", Scalar::Modifiers(method.modifiers))
                .ordered(
                    "type_params",
                    method.type_params.iter().map(NodeRef::TypeParam),
                )
                .ordered("return_type", method.return_type.iter().map(NodeRef::TypeRef))
                .ordered("params", method.params.iter().map(NodeRef::Param))
                .unordered("throws", method.throws.iter().map(NodeRef::TypeRef))
                .ordered("body", method.body.iter().map(NodeRef::Block)),
            NodeRef::Initializer(init) => shape
                .scalar("static", Scalar::Flag(init.is_static))
                .ordered("body", [NodeRef::Block(&init.body)]),
            NodeRef::Param(param) => shape
                .scalar("name", Scalar::Name(&param.name))
                .scalar("modifiers", Scalar::Modifiers(param.modifiers))
                .scalar("varargs", Scalar::Flag(param.varargs))
                .ordered("type", [NodeRef::TypeRef(&param.ty)]),
            NodeRef::TypeRef(ty) => {
                let shape = shape.scalar("dims", Scalar::Count(ty.dims));
                match &ty.kind {
                    TypeRefKind::Primitive(primitive) => {
                        shape.scalar("type", Scalar::Symbol(primitive.keyword()))
                    }
                    TypeRefKind::Named { name, args } => shape
                        .scalar("type", Scalar::Path(name))
                        .ordered("args", args.iter().map(NodeRef::TypeRef)),
                    TypeRefKind::Wildcard { bound } => shape
                        .scalar("type", Scalar::Symbol("?"))
                        .scalar(
                            "bound",
                            Scalar::Symbol(bound.as_ref().map_or("", |(kind, _)| kind.keyword())),
                        )
                        .ordered("bound", bound.iter().map(|(_, ty)| NodeRef::TypeRef(ty))),
                }
            }
            // Never reached through a group: annotations are not part of any shape.
            NodeRef::Annotation(_) => shape,
            NodeRef::Block(block) => shape.ordered("stmts", block.stmts.iter().map(NodeRef::Stmt)),
            NodeRef::Catch(catch) => shape
                .ordered("param", [NodeRef::Param(&catch.param)])
                .ordered("body", [NodeRef::Block(&catch.body)]),
            NodeRef::Stmt(stmt) => stmt_shape(shape, &stmt.kind),
            NodeRef::Expr(expr) => expr_shape(shape, &expr.kind),
        }
    }
}

fn stmt_shape<'a>(shape: Shape<'a>, kind: &'a StmtKind) -> Shape<'a> {
    match kind {
        StmtKind::Block(block) => shape.ordered("stmts", block.stmts.iter().map(NodeRef::Stmt)),
        StmtKind::LocalVar {
            modifiers,
            ty,
            declarators,
        } => shape
            .scalar("modifiers", Scalar::Modifiers(*modifiers))
            .ordered("type", [NodeRef::TypeRef(ty)])
            .ordered("declarators", declarators.iter().map(NodeRef::VarDeclarator)),
        StmtKind::Expr(expr) | StmtKind::Throw(expr) => shape.ordered("expr", [NodeRef::Expr(expr)]),
        StmtKind::If {
            cond,
            then_branch,
            else_branch,
        } => shape
            .ordered("cond", [NodeRef::Expr(cond)])
            .ordered("then", [NodeRef::Stmt(then_branch)])
            .ordered("else", else_branch.iter().map(|s| NodeRef::Stmt(s))),
        StmtKind::While { cond, body } => shape
            .ordered("cond", [NodeRef::Expr(cond)])
            .ordered("body", [NodeRef::Stmt(body)]),
        StmtKind::DoWhile { body, cond } => shape
            .ordered("body", [NodeRef::Stmt(body)])
            .ordered("cond", [NodeRef::Expr(cond)]),
        StmtKind::For {
            init,
            cond,
            update,
            body,
        } => shape
            .ordered("init", init.iter().map(NodeRef::Stmt))
            .ordered("cond", cond.iter().map(NodeRef::Expr))
            .ordered("update", update.iter().map(NodeRef::Expr))
            .ordered("body", [NodeRef::Stmt(body)]),
        StmtKind::ForEach {
            var,
            iterable,
            body,
        } => shape
            .ordered("var", [NodeRef::Param(var)])
            .ordered("iterable", [NodeRef::Expr(iterable)])
            .ordered("body", [NodeRef::Stmt(body)]),
        StmtKind::Return(value) => shape.ordered("value", value.iter().map(NodeRef::Expr)),
        StmtKind::Break(label) | StmtKind::Continue(label) => {
            shape.scalar("label", Scalar::OptName(label.as_deref()))
        }
        StmtKind::Try {
            body,
            catches,
            finally,
        } => shape
            .ordered("body", [NodeRef::Block(body)])
            .ordered("catches", catches.iter().map(NodeRef::Catch))
            .ordered("finally", finally.iter().map(NodeRef::Block)),
        StmtKind::Empty => shape,
    }
}

fn expr_shape<'a>(shape: Shape<'a>, kind: &'a ExprKind) -> Shape<'a> {
    match kind {
        ExprKind::Literal(literal) => shape.scalar("value", Scalar::Literal(literal)),
        ExprKind::Name(name) => shape.scalar("name", Scalar::Name(name)),
        ExprKind::This | ExprKind::Super => shape,
        ExprKind::FieldAccess { target, name } => shape
            .scalar("name", Scalar::Name(name))
            .ordered("target", [NodeRef::Expr(target)]),
        ExprKind::MethodCall { target, name, args } => shape
            .scalar("name", Scalar::Name(name))
            .ordered("target", target.iter().map(|t| NodeRef::Expr(t)))
            .ordered("args", args.iter().map(NodeRef::Expr)),
        ExprKind::New { ty, diamond, args } => shape
            .scalar("diamond", Scalar::Flag(*diamond))
            .ordered("type", [NodeRef::TypeRef(ty)])
            .ordered("args", args.iter().map(NodeRef::Expr)),
        ExprKind::NewArray {
            elem,
            dims,
            extra_dims,
            init,
        } => shape
            .scalar("extra_dims", Scalar::Count(*extra_dims))
            .scalar("has_init", Scalar::Flag(init.is_some()))
            .ordered("type", [NodeRef::TypeRef(elem)])
            .ordered("dims", dims.iter().map(NodeRef::Expr))
            .ordered("init", init.iter().flatten().map(NodeRef::Expr)),
        ExprKind::ArrayInit(elements) => {
            shape.ordered("elements", elements.iter().map(NodeRef::Expr))
        }
        ExprKind::Index { target, index } => shape
            .ordered("target", [NodeRef::Expr(target)])
            .ordered("index", [NodeRef::Expr(index)]),
        ExprKind::Unary { op, operand } => shape
            .scalar("op", Scalar::Symbol(op.symbol()))
            .ordered("operand", [NodeRef::Expr(operand)]),
        ExprKind::Binary { op, lhs, rhs } => shape
            .scalar("op", Scalar::Symbol(op.symbol()))
            .ordered("lhs", [NodeRef::Expr(lhs)])
            .ordered("rhs", [NodeRef::Expr(rhs)]),
        ExprKind::Assign { op, target, value } => shape
            .scalar("op", Scalar::Symbol(op.symbol()))
            .ordered("target", [NodeRef::Expr(target)])
            .ordered("value", [NodeRef::Expr(value)]),
        ExprKind::Conditional {
            cond,
            then_expr,
            else_expr,
        } => shape
            .ordered("cond", [NodeRef::Expr(cond)])
            .ordered("then", [NodeRef::Expr(then_expr)])
            .ordered("else", [NodeRef::Expr(else_expr)]),
        ExprKind::InstanceOf { expr, ty } => shape
            .ordered("expr", [NodeRef::Expr(expr)])
            .ordered("type", [NodeRef::TypeRef(ty)]),
        ExprKind::Cast { ty, expr } => shape
            .ordered("type", [NodeRef::TypeRef(ty)])
            .ordered("expr", [NodeRef::Expr(expr)]),
        ExprKind::ClassLiteral(ty) => shape.ordered("type", [NodeRef::TypeRef(ty)]),
    }
}
