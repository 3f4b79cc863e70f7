use std::sync::Arc;

use pretty_assertions::assert_eq;

use super::*;
use crate::DiagnosticSource;

fn sample() -> DiagnosticIndex {
    let hello: Arc<str> = Arc::from("HelloWorld.java");
    let other: Arc<str> = Arc::from("Other.java");
    DiagnosticIndex::new(vec![
        Diagnostic::error("No types named HelloWorld were found")
            .at(Arc::clone(&hello), 23, 5)
            .from_processor(Arc::from("ErrorProcessor")),
        Diagnostic::warning("unchecked call").at(Arc::clone(&other), 2, 1),
        Diagnostic::note("processing round 1"),
        Diagnostic::error("cannot find symbol: variable y").at(Arc::clone(&hello), 23, 5),
        Diagnostic::error("cannot find symbol: method frob()").at(hello, 30, 9),
    ])
}

fn messages<'a>(diags: &[&'a Diagnostic]) -> Vec<&'a str> {
    diags.iter().map(|d| d.message.as_str()).collect()
}

#[test]
fn empty_index() {
    let index = DiagnosticIndex::default();
    assert!(index.is_empty());
    assert_eq!(index.len(), 0);
    assert!(!index.has_errors());
    assert!(index.errors().is_empty());
    assert!(index.at_location("Foo.java", 1, 1).is_empty());
    assert!(!index.query().exists());
}

#[test]
fn by_kind_keeps_emission_order() {
    let index = sample();
    assert_eq!(
        messages(&index.errors()),
        vec![
            "No types named HelloWorld were found",
            "cannot find symbol: variable y",
            "cannot find symbol: method frob()",
        ]
    );
    assert_eq!(messages(&index.warnings()), vec!["unchecked call"]);
    assert_eq!(messages(&index.notes()), vec!["processing round 1"]);
    assert_eq!(index.count(DiagnosticKind::Error), 3);
    assert!(index.has_errors());
}

#[test]
fn at_location_is_exact() {
    let index = sample();
    assert_eq!(index.at_location("HelloWorld.java", 23, 5).len(), 2);
    assert!(index.at_location("HelloWorld.java", 23, 6).is_empty());
    assert!(index.at_location("Other.java", 23, 5).is_empty());
    assert!(index.at_location("Missing.java", 2, 1).is_empty());
}

#[test]
fn in_unit_skips_unlocated() {
    let index = sample();
    assert_eq!(index.in_unit("HelloWorld.java").len(), 3);
    assert_eq!(index.in_unit("Other.java").len(), 1);
    let total: usize = ["HelloWorld.java", "Other.java"]
        .iter()
        .map(|u| index.in_unit(u).len())
        .sum();
    assert_eq!(total + 1, index.len());
}

#[test]
fn containing_message_is_case_sensitive() {
    let index = sample();
    assert_eq!(index.containing_message("cannot find symbol").len(), 2);
    assert!(index.containing_message("Cannot find symbol").is_empty());
    assert_eq!(index.containing_message("").len(), index.len());
}

#[test]
fn query_combines_predicates() {
    let index = sample();
    assert!(index
        .query()
        .kind(DiagnosticKind::Error)
        .containing("No types named HelloWorld")
        .in_unit("HelloWorld.java")
        .on_line(23)
        .at_column(5)
        .exists());

    assert!(!index
        .query()
        .kind(DiagnosticKind::Warning)
        .in_unit("HelloWorld.java")
        .exists());

    assert_eq!(index.query().on_line(23).count(), 2);
    assert_eq!(index.query().in_unit("HelloWorld.java").at_column(9).count(), 1);
    assert_eq!(
        index
            .query()
            .containing("symbol")
            .first()
            .map(|d| d.message.as_str()),
        Some("cannot find symbol: variable y")
    );
}

#[test]
fn processor_source_is_kept() {
    let index = sample();
    let first = index.query().in_unit("HelloWorld.java").first();
    assert_eq!(
        first.map(|d| d.source.clone()),
        Some(DiagnosticSource::Processor(Arc::from("ErrorProcessor")))
    );
}

#[test]
fn iteration_matches_input() {
    let index = sample();
    let via_iter: Vec<&str> = index.iter().map(|d| d.message.as_str()).collect();
    let via_into: Vec<&str> = (&index).into_iter().map(|d| d.message.as_str()).collect();
    assert_eq!(via_iter, via_into);
    assert_eq!(via_iter.len(), 5);
    assert_eq!(index.as_slice().len(), 5);
}
