//! Structural equivalence of syntax trees.
//!
//! Two trees are equivalent when they have the same node kinds, the same
//! scalar payloads (names, modifier sets, operators, literal values) and
//! equivalent children, where children in ordered groups pair by position
//! and children in unordered groups (imports, top-level types, members,
//! supertypes, `throws`, bounds) pair in any order. Spans, annotations,
//! comments and formatting never take part.
//!
//! The first divergence found is reported with its full path from the root.

mod compare;
mod shape;
mod verdict;

pub use verdict::{Divergence, EquivalenceVerdict, Mismatch, PathStep, Side, StepKey};

use kiln_ir::{CompilationUnit, NodeRef};
use kiln_parse::ParseFailure;

/// Compare two compilation units.
pub fn compare(actual: &CompilationUnit, expected: &CompilationUnit) -> EquivalenceVerdict {
    compare_nodes(NodeRef::Unit(actual), NodeRef::Unit(expected))
}

/// Compare two subtrees of any kind.
#[tracing::instrument(level = "debug", skip_all, fields(kind = %actual.kind()))]
pub fn compare_nodes(actual: NodeRef<'_>, expected: NodeRef<'_>) -> EquivalenceVerdict {
    let verdict = compare::run(actual, expected);
    tracing::debug!(equivalent = verdict.is_equivalent(), "compared");
    verdict
}

/// Parse both texts and compare them.
///
/// A parse failure on either side is an error, not a verdict: it means the
/// inputs themselves are malformed.
pub fn compare_sources(actual: &str, expected: &str) -> Result<EquivalenceVerdict, ParseFailure> {
    let actual = kiln_parse::parse(actual)?;
    let expected = kiln_parse::parse(expected)?;
    Ok(compare(&actual, &expected))
}
