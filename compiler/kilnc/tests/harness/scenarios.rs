//! The baseline scenarios: plain compiles, a semantic error, a generated
//! unit checked against a golden unit, a faulting processor, and member
//! order in comparisons.

use kiln_equiv::{compare, compare_sources, EquivalenceVerdict};
use kilnc::{compile, CompilationStatus, Compiler, DiagnosticKind, ErrorCode};
use pretty_assertions::assert_eq;

use crate::common::{
    assert_success, boxed, unit, BuilderProcessor, PanickingProcessor, RecordingProcessor,
    UnregistrableProcessor, POINT, POINT_BUILDER_GOLDEN,
};

#[test]
fn valid_unit_compiles_cleanly() {
    let result = compile(
        &[unit(
            "com.example.Greeter",
            "package com.example;\n\nimport java.util.List;\n\npublic class Greeter {\n    private final List<String> names;\n\n    public Greeter(List<String> names) {\n        this.names = names;\n    }\n\n    public String greet(int i) {\n        return \"Hello, \" + names.get(i);\n    }\n}\n",
        )],
        Vec::new(),
    );

    assert_success(&result);
    assert_eq!(result.status(), CompilationStatus::Success);
    assert!(result.diagnostics().is_empty());
    assert_eq!(result.generated_count(), 0);
    assert_eq!(result.rounds(), 0);
    assert!(result.tree("com/example/Greeter.java").is_some());
}

#[test]
fn undeclared_symbol_is_one_located_error() {
    let result = compile(
        &[unit(
            "Greeter",
            "class Greeter {\n    String greet() {\n        return nmae;\n    }\n}\n",
        )],
        Vec::new(),
    );

    assert_eq!(result.status(), CompilationStatus::Failure);
    let errors = result.diagnostics().by_kind(DiagnosticKind::Error);
    assert_eq!(errors.len(), 1);
    let error = errors[0];
    assert_eq!(error.unit_name(), Some("Greeter.java"));
    assert_eq!((error.line, error.column), (3, 16));
    assert_eq!(error.code, Some(ErrorCode::E2001));
    assert_eq!(error.message, "cannot find symbol: variable nmae");
    assert_eq!(result.diagnostics().at_location("Greeter.java", 3, 16).len(), 1);
    assert_eq!(result.diagnostics().containing_message("nmae").len(), 1);
}

#[test]
fn generated_unit_matches_golden_despite_formatting() {
    let result = compile(&[unit("p.Point", POINT)], boxed(BuilderProcessor::default()));

    assert_success(&result);
    assert_eq!(result.generated_count(), 1);
    let generated = result.generated_unit("p/PointBuilder.java").unwrap();
    assert_ne!(generated.text(), POINT_BUILDER_GOLDEN);

    let golden = kiln_parse::parse(POINT_BUILDER_GOLDEN).unwrap();
    let tree = result.tree("p/PointBuilder.java").unwrap();
    assert_eq!(compare(tree, &golden), EquivalenceVerdict::Equivalent);
}

#[test]
fn processor_panic_is_captured_as_fault() {
    let result = compile(&[unit("p.Point", POINT)], boxed(PanickingProcessor));

    assert_eq!(result.status(), CompilationStatus::InternalFault);
    let fault = result.fault().unwrap();
    assert_eq!(&*fault.processor, "panicking");
    assert_eq!(fault.message, "boom: processor state corrupted");
    assert!(fault.panicked);
    assert!(result.to_string().contains("processor panicking panicked: boom"));
}

#[test]
fn processor_panic_during_registration_is_captured_as_fault() {
    let (recorder, log) = RecordingProcessor::new(&["*"]);
    let result = Compiler::new()
        .processor(recorder)
        .processor(UnregistrableProcessor { in_name: false })
        .compile(&[unit("A", "class A {}")]);

    assert_eq!(result.status(), CompilationStatus::InternalFault);
    assert_eq!(result.rounds(), 0);
    assert!(log.lock().unwrap().is_empty());
    let fault = result.fault().unwrap();
    assert_eq!(&*fault.processor, "unregistrable");
    assert_eq!(fault.message, "supported types lookup failed");
    assert!(fault.panicked);

    let result = compile(
        &[unit("A", "class A {}")],
        boxed(UnregistrableProcessor { in_name: true }),
    );
    assert_eq!(result.status(), CompilationStatus::InternalFault);
    let fault = result.fault().unwrap();
    assert_eq!(&*fault.processor, "processor #0");
    assert_eq!(fault.message, "name lookup failed");
    assert!(result.tree("A.java").is_some());
}

#[test]
fn member_order_is_free_but_parameter_order_is_not() {
    let original = "class Shape {\n    int sides;\n    void scale(int factor, String unit) {}\n    double area() { return 0; }\n}";
    let reordered = "class Shape {\n    double area() { return 0; }\n    void scale(int factor, String unit) {}\n    int sides;\n}";
    let swapped = "class Shape {\n    double area() { return 0; }\n    void scale(String unit, int factor) {}\n    int sides;\n}";

    assert!(compare_sources(reordered, original).unwrap().is_equivalent());

    let verdict = compare_sources(swapped, original).unwrap();
    let divergence = verdict.divergence().unwrap();
    assert!(
        divergence.path_string().contains("/params[0]:Parameter"),
        "{divergence}"
    );
}

#[test]
fn parse_failure_is_located_and_stops_the_pipeline() {
    let result = compile(
        &[
            unit("p.Point", POINT),
            unit("p.Broken", "package p;\nclass Broken {\n    int x\n}\n"),
        ],
        boxed(BuilderProcessor::default()),
    );

    assert_eq!(result.status(), CompilationStatus::Failure);
    assert_eq!(result.generated_count(), 0);
    assert_eq!(result.rounds(), 0);
    let errors = result.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].unit_name(), Some("p/Broken.java"));
    assert_eq!((errors[0].line, errors[0].column), (4, 1));
    assert_eq!(errors[0].code, Some(ErrorCode::E1001));
    assert!(result.tree("p/Broken.java").is_none());
    assert!(result.tree("p/Point.java").is_some());
}
