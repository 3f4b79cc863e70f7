//! Tests for the semantic checker.

use kiln_diagnostic::Diagnostic;
use kiln_ir::{CompilationUnit, SourceUnit};

use crate::{check, CheckInput};


/// Check several named units together.
fn check_units(sources: &[(&str, &str)]) -> Vec<Diagnostic> {
    let units: Vec<SourceUnit> = sources
        .iter()
        .map(|(name, text)| SourceUnit::new(*name, *text))
        .collect();
    let trees: Vec<CompilationUnit> = units
        .iter()
        .map(|unit| kiln_parse::parse(unit.text()).unwrap())
        .collect();
    let inputs: Vec<CheckInput<'_>> = units
        .iter()
        .zip(&trees)
        .map(|(source, tree)| CheckInput::new(source, tree))
        .collect();
    check(&inputs)
}

fn rendered(sources: &[(&str, &str)]) -> Vec<String> {
    check_units(sources).iter().map(ToString::to_string).collect()
}

/// Diagnostics of a single unit named `Test.java`.
fn check_source(text: &str) -> Vec<String> {
    rendered(&[("Test.java", text)])
}

fn assert_clean(text: &str) {
    let diagnostics = check_source(text);
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:#?}");
}
