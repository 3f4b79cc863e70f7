//! Compilation units and declarations.

use super::{Block, Expr, ModifierSet, QualifiedName, TypeRef};
use crate::Span;

/// Root of a parsed compilation unit.
#[derive(Clone, Debug, Default)]
pub struct CompilationUnit {
    pub package: Option<PackageDecl>,
    pub imports: Vec<Import>,
    pub types: Vec<TypeDecl>,
    pub span: Span,
}

impl CompilationUnit {
    /// Dotted package name, empty for the unnamed package.
    pub fn package_name(&self) -> String {
        self.package
            .as_ref()
            .map(|p| p.name.dotted())
            .unwrap_or_default()
    }

    /// Find a top-level type by simple name.
    pub fn find_type(&self, name: &str) -> Option<&TypeDecl> {
        self.types.iter().find(|t| t.name == name)
    }
}

#[derive(Clone, Debug)]
pub struct PackageDecl {
    pub name: QualifiedName,
    pub annotations: Vec<Annotation>,
    pub span: Span,
}

/// `import a.b.C;`, `import a.b.*;`, `import static a.b.C.m;`.
#[derive(Clone, Debug)]
pub struct Import {
    pub path: QualifiedName,
    pub is_static: bool,
    /// Trailing `.*`.
    pub on_demand: bool,
    pub span: Span,
}

/// `@Name`, `@Name(value)`, `@Name(key = value, ...)`.
///
/// Annotations are kept for processors and the checker but never take part
/// in structural comparison.
#[derive(Clone, Debug)]
pub struct Annotation {
    pub name: QualifiedName,
    pub args: Vec<AnnotationArg>,
    pub span: Span,
}

impl Annotation {
    /// Value of a named element; `value` also matches the single-element form.
    pub fn arg(&self, key: &str) -> Option<&Expr> {
        self.args
            .iter()
            .find(|a| a.name.as_deref().unwrap_or("value") == key)
            .map(|a| &a.value)
    }
}

#[derive(Clone, Debug)]
pub struct AnnotationArg {
    /// `None` for the single-element shorthand `@A(x)`.
    pub name: Option<String>,
    pub value: Expr,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeDeclKind {
    Class,
    Interface,
    Enum,
}

impl TypeDeclKind {
    pub fn keyword(self) -> &'static str {
        match self {
            TypeDeclKind::Class => "class",
            TypeDeclKind::Interface => "interface",
            TypeDeclKind::Enum => "enum",
        }
    }
}

#[derive(Clone, Debug)]
pub struct TypeDecl {
    pub kind: TypeDeclKind,
    pub name: String,
    pub modifiers: ModifierSet,
    pub annotations: Vec<Annotation>,
    pub type_params: Vec<TypeParam>,
    /// Superclass for classes; superinterfaces for interfaces.
    pub extends: Vec<TypeRef>,
    pub implements: Vec<TypeRef>,
    pub enum_constants: Vec<EnumConstant>,
    pub members: Vec<Member>,
    pub span: Span,
    pub name_span: Span,
}

impl TypeDecl {
    pub fn has_annotation(&self, name: &str) -> bool {
        has_annotation(&self.annotations, name)
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.members.iter().filter_map(|m| match m {
            Member::Method(method) => Some(method),
            _ => None,
        })
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.members.iter().filter_map(|m| match m {
            Member::Field(field) => Some(field),
            _ => None,
        })
    }

    pub fn nested_types(&self) -> impl Iterator<Item = &TypeDecl> {
        self.members.iter().filter_map(|m| match m {
            Member::Type(ty) => Some(ty),
            _ => None,
        })
    }
}

/// `T extends A & B`.
#[derive(Clone, Debug)]
pub struct TypeParam {
    pub name: String,
    pub bounds: Vec<TypeRef>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct EnumConstant {
    pub name: String,
    pub annotations: Vec<Annotation>,
    pub args: Vec<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub enum Member {
    Field(FieldDecl),
    Method(MethodDecl),
    Initializer(Initializer),
    Type(TypeDecl),
}

impl Member {
    pub fn span(&self) -> Span {
        match self {
            Member::Field(f) => f.span,
            Member::Method(m) => m.span,
            Member::Initializer(i) => i.span,
            Member::Type(t) => t.span,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FieldDecl {
    pub modifiers: ModifierSet,
    pub annotations: Vec<Annotation>,
    pub ty: TypeRef,
    pub declarators: Vec<VarDeclarator>,
    pub span: Span,
}

/// One `name [= init]` of a field or local variable declaration.
#[derive(Clone, Debug)]
pub struct VarDeclarator {
    pub name: String,
    /// C-style dimensions after the name, `int a[]`.
    pub extra_dims: u32,
    pub init: Option<Expr>,
    pub span: Span,
}

/// Method or constructor. Constructors have no return type.
#[derive(Clone, Debug)]
pub struct MethodDecl {
    pub name: String,
    pub modifiers: ModifierSet,
    pub annotations: Vec<Annotation>,
    pub type_params: Vec<TypeParam>,
    pub return_type: Option<TypeRef>,
    pub params: Vec<Param>,
    pub throws: Vec<TypeRef>,
    pub body: Option<Block>,
    pub span: Span,
    pub name_span: Span,
}

impl MethodDecl {
    #[inline]
    pub fn is_constructor(&self) -> bool {
        self.return_type.is_none()
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        has_annotation(&self.annotations, name)
    }

    /// `void` methods and constructors.
    pub fn returns_void(&self) -> bool {
        self.return_type.as_ref().map_or(true, TypeRef::is_void)
    }
}

#[derive(Clone, Debug)]
pub struct Param {
    pub modifiers: ModifierSet,
    pub annotations: Vec<Annotation>,
    pub ty: TypeRef,
    pub varargs: bool,
    pub name: String,
    pub span: Span,
}

/// `{ ... }` or `static { ... }` in a type body.
#[derive(Clone, Debug)]
pub struct Initializer {
    pub is_static: bool,
    pub body: Block,
    pub span: Span,
}

/// Match an annotation by simple or qualified name.
///
/// `Foo` matches `@Foo` and `@a.b.Foo`; `a.b.Foo` matches `@a.b.Foo` and
/// the simple spelling `@Foo`, since imports are not resolved here.
pub fn has_annotation(annotations: &[Annotation], name: &str) -> bool {
    let simple = name.rsplit('.').next().unwrap_or(name);
    annotations.iter().any(|a| {
        let written = a.name.dotted();
        written == name || (a.name.last() == simple && (a.name.is_simple() || !name.contains('.')))
    })
}
