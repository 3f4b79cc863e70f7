//! Kiln Check - semantic checks over parsed compilation units.
//!
//! The checker resolves every type reference, simple name and unqualified
//! method call against the types declared across all units of a compilation
//! plus a built-in table of library classes, and reports the errors a
//! conventional compiler front end would: unknown symbols, duplicate types,
//! broken imports, misplaced `return`/`break`/`continue`, and abstract or
//! body-less methods where they are not allowed.
//!
//! The checker is lenient where it cannot know better. Members of library
//! types are never tracked, so anything a class may inherit from a library
//! supertype is assumed to exist.
//!
//! # Entry point
//!
//! [`check`] takes every unit of a compilation at once, since types from any
//! unit are visible to all others, and returns diagnostics unit by unit in
//! declaration order.

mod builtins;
mod checker;
mod symbols;

use kiln_diagnostic::{Diagnostic, UnitLocator};
use kiln_ir::{CompilationUnit, SourceUnit};

use crate::checker::{link_supertypes, Checker};
use crate::symbols::SymbolTable;

/// One parsed unit of a compilation.
#[derive(Copy, Clone, Debug)]
pub struct CheckInput<'a> {
    pub source: &'a SourceUnit,
    pub tree: &'a CompilationUnit,
}

impl<'a> CheckInput<'a> {
    pub fn new(source: &'a SourceUnit, tree: &'a CompilationUnit) -> Self {
        CheckInput { source, tree }
    }
}

/// Check all units of one compilation together.
#[tracing::instrument(level = "debug", skip_all, fields(units = units.len()))]
pub fn check(units: &[CheckInput<'_>]) -> Vec<Diagnostic> {
    let trees: Vec<&CompilationUnit> = units.iter().map(|u| u.tree).collect();
    let mut table = SymbolTable::build(&trees);
    link_supertypes(&mut table, &trees);

    let mut diagnostics = Vec::new();
    for (index, unit) in units.iter().enumerate() {
        let locator = UnitLocator::new(unit.source);
        diagnostics.extend(Checker::new(&table, unit.tree, index, &locator).check_unit());
    }
    tracing::debug!(count = diagnostics.len(), "checked");
    diagnostics
}
