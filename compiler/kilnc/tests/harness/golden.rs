//! Verifying generated units against golden units.

use kilnc::{compile, verify_generated, Compiler, GoldenOutcome, SourceUnit};
use pretty_assertions::assert_eq;

use crate::common::{assert_success, boxed, unit, BuilderProcessor, POINT, POINT_BUILDER_GOLDEN};

#[test]
fn generated_builder_matches_its_golden_unit() {
    let result = compile(&[unit("p.Point", POINT)], boxed(BuilderProcessor::default()));
    assert_success(&result);

    let golden = SourceUnit::for_type("p.PointBuilder", POINT_BUILDER_GOLDEN);
    let report = verify_generated(&result, &[golden]).unwrap();
    assert!(report.is_success(), "{report}");
    assert_eq!(
        report.to_string(),
        "1 of 1 golden units matched\n  p/PointBuilder.java: matched by p/PointBuilder.java"
    );
}

#[test]
fn renamed_output_still_matches_by_structure() {
    // Under another suffix the unit name and class name both change, so the
    // golden unit below describes exactly that output.
    let result = Compiler::new()
        .processor(BuilderProcessor::default())
        .option("builder.suffix", "Maker")
        .compile(&[unit("p.Point", POINT)]);
    let golden = SourceUnit::new(
        "expected/PointMaker.java",
        POINT_BUILDER_GOLDEN.replace("PointBuilder", "PointMaker"),
    );

    let report = verify_generated(&result, &[golden]).unwrap();
    assert_eq!(
        report.entries()[0].outcome,
        GoldenOutcome::Matched {
            generated: "p/PointMaker.java".to_string()
        }
    );
}

#[test]
fn drifted_output_reports_where() {
    let result = compile(&[unit("p.Point", POINT)], boxed(BuilderProcessor::default()));
    let drifted = POINT_BUILDER_GOLDEN.replace("private int x;", "private long x;");
    let golden = SourceUnit::for_type("p.PointBuilder", drifted);

    let report = verify_generated(&result, &[golden]).unwrap();
    assert!(!report.is_success());
    let failure = report.failures().next().unwrap();
    let GoldenOutcome::Diverged { divergence, .. } = &failure.outcome else {
        panic!("expected a divergence: {report}");
    };
    assert!(
        divergence.path_string().starts_with("CompilationUnit/types[0]:Class/members["),
        "{divergence}"
    );
}

#[test]
fn absent_output_is_missing() {
    let result = compile(&[unit("p.Point", POINT)], Vec::new());
    let golden = SourceUnit::for_type("p.PointBuilder", POINT_BUILDER_GOLDEN);

    let report = verify_generated(&result, &[golden]).unwrap();
    assert_eq!(report.entries()[0].outcome, GoldenOutcome::Missing);
}

#[test]
fn malformed_golden_unit_is_a_setup_error() {
    let result = compile(&[unit("p.Point", POINT)], boxed(BuilderProcessor::default()));
    let golden = SourceUnit::for_type("p.PointBuilder", "public final class PointBuilder {");

    assert!(verify_generated(&result, &[golden]).is_err());
}
