//! Symbol table of the types declared in a compilation's sources.
//!
//! Types are keyed by fully qualified name; nested types extend their
//! enclosing type's name (`a.b.Outer.Inner`), so a dotted name written in
//! source can be looked up directly.

use kiln_ir::{CompilationUnit, EnumConstant, Member, Span, TypeDecl};
use rustc_hash::{FxHashMap, FxHashSet};

/// A resolved supertype.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum SuperRef {
    /// Declared in the sources, by fully qualified name.
    Source(String),
    /// A library type or a name that does not resolve. Its members are
    /// unknown.
    External,
}

#[derive(Debug)]
pub(crate) struct TypeInfo<'a> {
    pub fq: String,
    pub unit: usize,
    pub decl: &'a TypeDecl,
    pub enclosing: Option<String>,
    /// Simple name to fully qualified name.
    pub member_types: FxHashMap<&'a str, String>,
    /// Fields and enum constants.
    pub fields: FxHashSet<&'a str>,
    pub methods: FxHashSet<&'a str>,
    pub supers: Vec<SuperRef>,
}

impl TypeInfo<'_> {
    pub fn is_top_level(&self) -> bool {
        self.enclosing.is_none()
    }
}

/// A type whose fully qualified name was already taken.
#[derive(Clone, Debug)]
pub(crate) struct Duplicate {
    pub unit: usize,
    pub fq: String,
    pub span: Span,
}

#[derive(Debug, Default)]
pub(crate) struct SymbolTable<'a> {
    types: FxHashMap<String, TypeInfo<'a>>,
    packages: FxHashSet<String>,
    duplicates: Vec<Duplicate>,
}

impl<'a> SymbolTable<'a> {
    /// Register every declared type. The first declaration of a name wins;
    /// later ones are recorded as duplicates.
    pub fn build(trees: &[&'a CompilationUnit]) -> Self {
        let mut table = SymbolTable::default();
        for (unit, tree) in trees.iter().enumerate() {
            let package = tree.package_name();
            let mut prefix = String::new();
            for segment in package.split('.').filter(|s| !s.is_empty()) {
                if !prefix.is_empty() {
                    prefix.push('.');
                }
                prefix.push_str(segment);
                table.packages.insert(prefix.clone());
            }
            for decl in &tree.types {
                table.register(unit, qualify(&package, &decl.name), decl, None);
            }
        }
        table
    }

    fn register(&mut self, unit: usize, fq: String, decl: &'a TypeDecl, enclosing: Option<String>) {
        if self.types.contains_key(&fq) {
            self.duplicates.push(Duplicate {
                unit,
                fq,
                span: decl.name_span,
            });
            return;
        }

        let mut info = TypeInfo {
            fq: fq.clone(),
            unit,
            decl,
            enclosing,
            member_types: FxHashMap::default(),
            fields: decl
                .enum_constants
                .iter()
                .map(|c: &'a EnumConstant| c.name.as_str())
                .collect(),
            methods: FxHashSet::default(),
            supers: Vec::new(),
        };
        let mut nested = Vec::new();
        for member in &decl.members {
            match member {
                Member::Field(field) => {
                    info.fields
                        .extend(field.declarators.iter().map(|d| d.name.as_str()));
                }
                Member::Method(method) if !method.is_constructor() => {
                    info.methods.insert(method.name.as_str());
                }
                Member::Type(inner) => {
                    let inner_fq = format!("{fq}.{}", inner.name);
                    info.member_types
                        .entry(inner.name.as_str())
                        .or_insert_with(|| inner_fq.clone());
                    nested.push((inner_fq, inner));
                }
                Member::Method(_) | Member::Initializer(_) => {}
            }
        }
        self.types.insert(fq.clone(), info);
        for (inner_fq, inner) in nested {
            self.register(unit, inner_fq, inner, Some(fq.clone()));
        }
    }

    pub fn get(&self, fq: &str) -> Option<&TypeInfo<'a>> {
        self.types.get(fq)
    }

    /// Whether a source package (or a prefix of one) has this name.
    pub fn has_package(&self, package: &str) -> bool {
        self.packages.contains(package)
    }

    pub fn duplicates(&self) -> &[Duplicate] {
        &self.duplicates
    }

    /// Enclosing types of `info`, outermost first, ending with `info`.
    pub fn chain_of<'t>(&'t self, info: &'t TypeInfo<'a>) -> Vec<&'t TypeInfo<'a>> {
        let mut chain = vec![info];
        let mut current = info;
        while let Some(outer) = current.enclosing.as_deref().and_then(|fq| self.get(fq)) {
            chain.push(outer);
            current = outer;
        }
        chain.reverse();
        chain
    }

    /// Fill in supertypes, computed from the table as it stands.
    pub fn link_supers(&mut self, resolve: impl Fn(&Self, &TypeInfo<'a>) -> Vec<SuperRef>) {
        let linked: Vec<(String, Vec<SuperRef>)> = self
            .types
            .values()
            .map(|info| (info.fq.clone(), resolve(self, info)))
            .collect();
        for (fq, supers) in linked {
            if let Some(info) = self.types.get_mut(&fq) {
                info.supers = supers;
            }
        }
    }

    /// Visit `info` and its source supertypes breadth first, stopping at the
    /// first `Some`. Cyclic hierarchies are visited once.
    pub fn find_in_hierarchy<'t, T>(
        &'t self,
        info: &'t TypeInfo<'a>,
        mut visit: impl FnMut(&'t TypeInfo<'a>) -> Option<T>,
    ) -> Option<T> {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut queue = std::collections::VecDeque::from([info]);
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current.fq.as_str()) {
                continue;
            }
            if let Some(found) = visit(current) {
                return Some(found);
            }
            for sup in &current.supers {
                if let SuperRef::Source(fq) = sup {
                    if let Some(next) = self.get(fq) {
                        queue.push_back(next);
                    }
                }
            }
        }
        None
    }

    /// Whether anything in the hierarchy extends a type with unknown members.
    pub fn has_external_super(&self, info: &TypeInfo<'a>) -> bool {
        self.find_in_hierarchy(info, |t| {
            t.supers
                .iter()
                .any(|s| *s == SuperRef::External)
                .then_some(())
        })
        .is_some()
    }

    pub fn has_field(&self, info: &TypeInfo<'a>, name: &str) -> bool {
        self.find_in_hierarchy(info, |t| t.fields.contains(name).then_some(()))
            .is_some()
    }

    pub fn has_method(&self, info: &TypeInfo<'a>, name: &str) -> bool {
        self.find_in_hierarchy(info, |t| t.methods.contains(name).then_some(()))
            .is_some()
    }

    /// Member type `name` of `info`, declared or inherited from a source
    /// supertype.
    pub fn member_type(&self, info: &TypeInfo<'a>, name: &str) -> Option<&TypeInfo<'a>> {
        self.find_in_hierarchy(info, |t| t.member_types.get(name))
            .and_then(|fq| self.get(fq))
    }
}

/// `package.name`, or `name` in the unnamed package.
pub(crate) fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{package}.{name}")
    }
}
