//! Syntax tree of one compilation unit.
//!
//! Each node owns its children; there is no sharing and no cycles. Node
//! structs expose their payload as public fields for pattern matching. Only
//! the parser builds trees; everything else reads them, either directly or
//! through the uniform [`NodeRef`](crate::NodeRef) view.

mod decl;
mod expr;
mod modifiers;
mod stmt;
mod ty;

pub use decl::{
    has_annotation, Annotation, AnnotationArg, CompilationUnit, EnumConstant, FieldDecl, Import,
    Initializer, Member, MethodDecl, PackageDecl, Param, TypeDecl, TypeDeclKind, TypeParam,
    VarDeclarator,
};
pub use expr::{AssignOp, BinaryOp, Expr, ExprKind, Literal, UnaryOp};
pub use modifiers::ModifierSet;
pub use stmt::{Block, CatchClause, Stmt, StmtKind};
pub use ty::{PrimitiveType, QualifiedName, TypeRef, TypeRefKind, WildcardBound};
