//! What a processor sees of one round: its root units and their annotated
//! declarations.

use kiln_ir::{
    has_annotation, Annotation, CompilationUnit, EnumConstant, FieldDecl, Member, MethodDecl,
    ModifierSet, NodeRef, Param, SourceUnit, Span, TypeDecl, TypeDeclKind,
};

/// A parsed unit that is a root of the current round.
#[derive(Copy, Clone, Debug)]
pub struct RootUnit<'a> {
    pub source: &'a SourceUnit,
    pub tree: &'a CompilationUnit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Class,
    Interface,
    Enum,
    EnumConstant,
    Field,
    Method,
    Constructor,
    Parameter,
}

#[derive(Copy, Clone, Debug)]
enum Decl<'a> {
    Type(&'a TypeDecl),
    EnumConstant(&'a EnumConstant),
    Field(&'a FieldDecl),
    Method(&'a MethodDecl),
    Param(&'a Param),
}

/// A declaration in a root unit.
#[derive(Clone, Debug)]
pub struct Element<'a> {
    unit: &'a SourceUnit,
    decl: Decl<'a>,
    /// Fully qualified name of the type itself, or of the declaring type.
    owner: String,
}

impl<'a> Element<'a> {
    pub fn kind(&self) -> ElementKind {
        match self.decl {
            Decl::Type(ty) => match ty.kind {
                TypeDeclKind::Class => ElementKind::Class,
                TypeDeclKind::Interface => ElementKind::Interface,
                TypeDeclKind::Enum => ElementKind::Enum,
            },
            Decl::EnumConstant(_) => ElementKind::EnumConstant,
            Decl::Field(_) => ElementKind::Field,
            Decl::Method(m) if m.is_constructor() => ElementKind::Constructor,
            Decl::Method(_) => ElementKind::Method,
            Decl::Param(_) => ElementKind::Parameter,
        }
    }

    /// Simple name. A field declaration is named by its first declarator.
    pub fn simple_name(&self) -> &'a str {
        match self.decl {
            Decl::Type(ty) => ty.name.as_str(),
            Decl::EnumConstant(c) => c.name.as_str(),
            Decl::Field(f) => f.declarators.first().map_or("", |d| d.name.as_str()),
            Decl::Method(m) => m.name.as_str(),
            Decl::Param(p) => p.name.as_str(),
        }
    }

    /// Fully qualified name for types; members and parameters are qualified
    /// by their declaring type.
    pub fn qualified_name(&self) -> String {
        match self.decl {
            Decl::Type(_) => self.owner.clone(),
            _ => format!("{}.{}", self.owner, self.simple_name()),
        }
    }

    /// Fully qualified name of the declaring type; the type itself for types.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn annotations(&self) -> &'a [Annotation] {
        match self.decl {
            Decl::Type(ty) => ty.annotations.as_slice(),
            Decl::EnumConstant(c) => c.annotations.as_slice(),
            Decl::Field(f) => f.annotations.as_slice(),
            Decl::Method(m) => m.annotations.as_slice(),
            Decl::Param(p) => p.annotations.as_slice(),
        }
    }

    /// The annotation matching `name` (simple or qualified), if present.
    pub fn annotation(&self, name: &str) -> Option<&'a Annotation> {
        self.annotations()
            .iter()
            .find(|a| has_annotation(std::slice::from_ref(*a), name))
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        has_annotation(self.annotations(), name)
    }

    pub fn modifiers(&self) -> ModifierSet {
        match self.decl {
            Decl::Type(ty) => ty.modifiers,
            Decl::EnumConstant(_) => ModifierSet::empty(),
            Decl::Field(f) => f.modifiers,
            Decl::Method(m) => m.modifiers,
            Decl::Param(p) => p.modifiers,
        }
    }

    pub fn unit(&self) -> &'a SourceUnit {
        self.unit
    }

    /// Where diagnostics about this element point: its name where the tree
    /// records one.
    pub fn span(&self) -> Span {
        match self.decl {
            Decl::Type(ty) => ty.name_span,
            Decl::EnumConstant(c) => c.span,
            Decl::Field(f) => f.declarators.first().map_or(f.span, |d| d.span),
            Decl::Method(m) => m.name_span,
            Decl::Param(p) => p.span,
        }
    }

    /// The declaration as a tree node.
    pub fn node(&self) -> NodeRef<'a> {
        match self.decl {
            Decl::Type(ty) => NodeRef::Type(ty),
            Decl::EnumConstant(c) => NodeRef::EnumConstant(c),
            Decl::Field(f) => NodeRef::Field(f),
            Decl::Method(m) => NodeRef::Method(m),
            Decl::Param(p) => NodeRef::Param(p),
        }
    }

    pub fn type_decl(&self) -> Option<&'a TypeDecl> {
        match self.decl {
            Decl::Type(ty) => Some(ty),
            _ => None,
        }
    }

    pub fn method_decl(&self) -> Option<&'a MethodDecl> {
        match self.decl {
            Decl::Method(m) => Some(m),
            _ => None,
        }
    }

    pub fn field_decl(&self) -> Option<&'a FieldDecl> {
        match self.decl {
            Decl::Field(f) => Some(f),
            _ => None,
        }
    }
}

/// The environment of one processing round.
#[derive(Clone, Debug)]
pub struct RoundEnv<'a> {
    roots: Vec<RootUnit<'a>>,
    round: u32,
    processing_over: bool,
    error_raised: bool,
}

impl<'a> RoundEnv<'a> {
    pub(crate) fn new(
        roots: Vec<RootUnit<'a>>,
        round: u32,
        processing_over: bool,
        error_raised: bool,
    ) -> Self {
        RoundEnv {
            roots,
            round,
            processing_over,
            error_raised,
        }
    }

    /// Units introduced by this round: the inputs in round 1, then the units
    /// generated by the previous round. Empty in the final round.
    pub fn roots(&self) -> &[RootUnit<'a>] {
        &self.roots
    }

    /// 1-based round number.
    pub fn round_number(&self) -> u32 {
        self.round
    }

    /// True in the final round, which has no roots.
    pub fn processing_over(&self) -> bool {
        self.processing_over
    }

    /// Whether an error was reported before this round.
    pub fn error_raised(&self) -> bool {
        self.error_raised
    }

    /// Top-level types of the roots.
    pub fn root_elements(&self) -> Vec<Element<'a>> {
        let mut elements = Vec::new();
        for root in &self.roots {
            let package = root.tree.package_name();
            for ty in &root.tree.types {
                elements.push(Element {
                    unit: root.source,
                    decl: Decl::Type(ty),
                    owner: qualify(&package, &ty.name),
                });
            }
        }
        elements
    }

    /// Every declaration in the roots, in source order.
    pub fn elements(&self) -> Vec<Element<'a>> {
        let mut elements = Vec::new();
        for root in &self.roots {
            let package = root.tree.package_name();
            for ty in &root.tree.types {
                collect_type(root.source, ty, qualify(&package, &ty.name), &mut elements);
            }
        }
        elements
    }

    /// Declarations carrying annotation `name`, simple or qualified.
    pub fn elements_annotated_with(&self, name: &str) -> Vec<Element<'a>> {
        self.elements()
            .into_iter()
            .filter(|e| e.has_annotation(name))
            .collect()
    }

    pub fn is_annotation_present(&self, name: &str) -> bool {
        self.elements().iter().any(|e| e.has_annotation(name))
    }

    /// Distinct annotation names present on the roots, as written.
    pub fn annotations_present(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for element in self.elements() {
            for annotation in element.annotations() {
                let name = annotation.name.dotted();
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }
}

fn collect_type<'a>(
    unit: &'a SourceUnit,
    ty: &'a TypeDecl,
    fq: String,
    out: &mut Vec<Element<'a>>,
) {
    let element = |decl| Element {
        unit,
        decl,
        owner: fq.clone(),
    };
    out.push(element(Decl::Type(ty)));
    out.extend(
        ty.enum_constants
            .iter()
            .map(|c| element(Decl::EnumConstant(c))),
    );
    for member in &ty.members {
        match member {
            Member::Field(f) => out.push(element(Decl::Field(f))),
            Member::Method(m) => {
                out.push(element(Decl::Method(m)));
                out.extend(m.params.iter().map(|p| element(Decl::Param(p))));
            }
            Member::Type(inner) => {
                collect_type(unit, inner, format!("{fq}.{}", inner.name), out);
            }
            Member::Initializer(_) => {}
        }
    }
}

fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{package}.{name}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
