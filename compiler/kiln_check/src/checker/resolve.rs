//! Type name resolution within one compilation unit.

use kiln_diagnostic::ErrorCode;
use kiln_ir::{CompilationUnit, Import, QualifiedName};

use crate::builtins;
use crate::symbols::{qualify, SymbolTable, TypeInfo};

/// What a type name denotes.
#[derive(Copy, Clone, Debug)]
pub(crate) enum Resolved<'t, 'a> {
    Source(&'t TypeInfo<'a>),
    Library,
    TypeParam,
}

/// Resolves type names as seen from one unit.
pub(crate) struct Resolver<'t, 'a> {
    table: &'t SymbolTable<'a>,
    tree: &'a CompilationUnit,
    package: String,
}

impl<'t, 'a> Resolver<'t, 'a> {
    pub fn new(table: &'t SymbolTable<'a>, tree: &'a CompilationUnit) -> Self {
        Resolver {
            table,
            tree,
            package: tree.package_name(),
        }
    }

    pub fn table(&self) -> &'t SymbolTable<'a> {
        self.table
    }

    pub fn imports(&self) -> &'a [Import] {
        &self.tree.imports
    }

    /// Resolve a type name written inside `chain` (enclosing types,
    /// outermost first) with `type_params` in scope.
    pub fn resolve(
        &self,
        name: &QualifiedName,
        chain: &[&'t TypeInfo<'a>],
        type_params: &[&str],
    ) -> Option<Resolved<'t, 'a>> {
        let Some((first, rest)) = name.segments.split_first() else {
            return None;
        };
        if rest.is_empty() {
            return self.resolve_simple(first, chain, type_params);
        }

        match self.resolve_simple(first, chain, type_params) {
            Some(Resolved::Source(mut current)) => {
                for segment in rest {
                    match self.table.member_type(current, segment) {
                        Some(inner) => current = inner,
                        None if self.table.has_external_super(current) => {
                            return Some(Resolved::Library);
                        }
                        None => return None,
                    }
                }
                Some(Resolved::Source(current))
            }
            // Members of library types are not tracked.
            Some(Resolved::Library) => Some(Resolved::Library),
            Some(Resolved::TypeParam) => None,
            None => self.resolve_qualified(&name.segments),
        }
    }

    /// Simple type name, in resolution order: type parameters, the enclosing
    /// types and their member types, types of this unit, single-type
    /// imports, the current package, on-demand imports, `java.lang`.
    pub fn resolve_simple(
        &self,
        name: &str,
        chain: &[&'t TypeInfo<'a>],
        type_params: &[&str],
    ) -> Option<Resolved<'t, 'a>> {
        if type_params.contains(&name) {
            return Some(Resolved::TypeParam);
        }

        for &info in chain.iter().rev() {
            if info.decl.name == name {
                return Some(Resolved::Source(info));
            }
            if let Some(inner) = self.table.member_type(info, name) {
                return Some(Resolved::Source(inner));
            }
        }

        if self.tree.types.iter().any(|t| t.name == name) {
            if let Some(info) = self.table.get(&qualify(&self.package, name)) {
                return Some(Resolved::Source(info));
            }
        }

        for import in self.imports() {
            if import.is_static || import.on_demand || import.path.last() != name {
                continue;
            }
            // A broken import is reported once, at the import.
            return Some(
                self.resolve_qualified(&import.path.segments)
                    .unwrap_or(Resolved::Library),
            );
        }

        if let Some(found) = self.in_package(&self.package, name) {
            return Some(found);
        }

        for import in self.imports().iter().filter(|i| i.on_demand) {
            let mut segments = import.path.segments.clone();
            segments.push(name.to_string());
            if let Some(found) = self.resolve_qualified(&segments) {
                return Some(found);
            }
        }

        builtins::implicit_class(name).then_some(Resolved::Library)
    }

    fn in_package(&self, package: &str, name: &str) -> Option<Resolved<'t, 'a>> {
        if let Some(info) = self.table.get(&qualify(package, name)) {
            if info.is_top_level() {
                return Some(Resolved::Source(info));
            }
        }
        builtins::class_exists(package, name).then_some(Resolved::Library)
    }

    /// A fully qualified name such as `java.util.Map.Entry`.
    pub fn resolve_qualified(&self, segments: &[String]) -> Option<Resolved<'t, 'a>> {
        if let Some(info) = self.table.get(&segments.join(".")) {
            return Some(Resolved::Source(info));
        }
        builtins::qualified_class_exists(segments).then_some(Resolved::Library)
    }

    /// Whether a source or library package has this dotted name.
    pub fn package_known(&self, package: &str) -> bool {
        self.table.has_package(package) || builtins::package_exists(package)
    }

    /// The error an import should report, if any.
    pub fn import_problem(&self, import: &Import) -> Option<(ErrorCode, String)> {
        let segments = &import.path.segments;
        let type_path = match (import.is_static, import.on_demand) {
            // import a.b.*;
            (false, true) => {
                if self.package_known(&import.path.dotted())
                    || self.resolve_qualified(segments).is_some()
                {
                    return None;
                }
                return Some((
                    ErrorCode::E2010,
                    format!("package {} does not exist", import.path),
                ));
            }
            // import a.b.C; and import static a.b.C.*;
            (false, false) | (true, true) => segments.as_slice(),
            // import static a.b.C.m;
            (true, false) => &segments[..segments.len().saturating_sub(1)],
        };
        if self.resolve_qualified(type_path).is_some() {
            return None;
        }
        Some(self.missing_type(type_path))
    }

    #[cold]
    fn missing_type(&self, segments: &[String]) -> (ErrorCode, String) {
        let Some((class, qualifier)) = segments.split_last() else {
            return (ErrorCode::E2011, "cannot find symbol".to_string());
        };
        if qualifier.is_empty() {
            return (ErrorCode::E2011, format!("cannot find symbol: class {class}"));
        }
        let qualifier_name = qualifier.join(".");
        if self.package_known(&qualifier_name) {
            (
                ErrorCode::E2011,
                format!("cannot find symbol: class {class} in package {qualifier_name}"),
            )
        } else if self.resolve_qualified(qualifier).is_some() {
            (
                ErrorCode::E2011,
                format!("cannot find symbol: class {class} in class {qualifier_name}"),
            )
        } else {
            (
                ErrorCode::E2010,
                format!("package {qualifier_name} does not exist"),
            )
        }
    }
}
