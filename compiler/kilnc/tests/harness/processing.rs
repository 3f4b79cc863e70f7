//! Processing rounds, the filer, the messager, options and faults.

use kilnc::{compile, CompilationStatus, Compiler, DiagnosticKind, ErrorCode, Processor};
use pretty_assertions::assert_eq;

use crate::common::{
    assert_success, boxed, unit, BuilderProcessor, ChainProcessor, DuplicatingProcessor,
    FailingProcessor, FixedProcessor, ImmutableProcessor, LateProcessor, RecordingProcessor,
    RoundRecord, POINT,
};

fn record(round: u32, processing_over: bool, error_raised: bool, roots: &[&str]) -> RoundRecord {
    RoundRecord {
        round,
        processing_over,
        error_raised,
        roots: roots.iter().map(ToString::to_string).collect(),
    }
}

#[test]
fn generated_units_root_the_next_round() {
    let (recorder, log) = RecordingProcessor::new(&["*"]);
    let result = Compiler::new()
        .processor(BuilderProcessor::default())
        .processor(recorder)
        .compile(&[unit("p.Point", POINT)]);

    assert_success(&result);
    assert_eq!(result.rounds(), 3);
    assert_eq!(
        *log.lock().unwrap(),
        vec![
            record(1, false, false, &["p/Point.java"]),
            record(2, false, false, &["p/PointBuilder.java"]),
            record(3, true, false, &[]),
        ]
    );
}

#[test]
fn unclaimed_processor_is_never_invoked() {
    let (recorder, log) = RecordingProcessor::new(&["Entity"]);
    let result = compile(&[unit("p.Point", POINT)], boxed(recorder));

    assert_success(&result);
    assert_eq!(result.rounds(), 2);
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn claimed_processor_runs_in_every_later_round() {
    let (recorder, log) = RecordingProcessor::new(&["Builder"]);
    let result = Compiler::new()
        .processor(BuilderProcessor::default())
        .processor(recorder)
        .compile(&[unit("p.Point", POINT)]);

    assert_success(&result);
    let rounds: Vec<u32> = log.lock().unwrap().iter().map(|r| r.round).collect();
    assert_eq!(rounds, [1, 2, 3]);
}

#[test]
fn processor_errors_are_located_and_seen_by_later_rounds() {
    let source = "package com.example;\n\n@Immutable\npublic class Money {\n    private long cents;\n    private final String currency = \"EUR\";\n}\n";
    let (recorder, log) = RecordingProcessor::new(&["*"]);
    let result = Compiler::new()
        .processor(ImmutableProcessor)
        .processor(recorder)
        .compile(&[unit("com.example.Money", source)]);

    assert_eq!(result.status(), CompilationStatus::Failure);
    let errors = result.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].to_string(),
        "com/example/Money.java:5:18: error: field cents of Money must be final"
    );
    let seen: Vec<(u32, bool)> = log.lock().unwrap().iter().map(|r| (r.round, r.error_raised)).collect();
    assert_eq!(seen, [(1, false), (2, true)]);
}

#[test]
fn rounds_stop_at_the_limit() {
    let result = Compiler::new()
        .processor(ChainProcessor { steps: 10 })
        .max_rounds(3)
        .compile(&[unit("Seed", "class Seed {}")]);

    assert_eq!(result.status(), CompilationStatus::Failure);
    assert_eq!(result.rounds(), 3);
    let names: Vec<&str> = result.generated().map(|u| u.name()).collect();
    assert_eq!(names, ["gen/Step1.java", "gen/Step2.java", "gen/Step3.java"]);
    let error = result
        .diagnostics()
        .query()
        .kind(DiagnosticKind::Error)
        .containing("maximum number of processing rounds (3) exceeded")
        .first()
        .unwrap();
    assert_eq!(error.code, Some(ErrorCode::E3001));
    assert_eq!(error.unit_name(), None);
}

#[test]
fn chains_within_the_limit_complete() {
    let result = compile(
        &[unit("Seed", "class Seed {}")],
        boxed(ChainProcessor { steps: 3 }),
    );

    assert_success(&result);
    assert_eq!(result.generated_count(), 3);
    assert_eq!(result.rounds(), 5);
}

#[test]
fn generating_after_processing_is_over_faults() {
    let result = compile(&[unit("Seed", "class Seed {}")], boxed(LateProcessor));

    assert_eq!(result.status(), CompilationStatus::InternalFault);
    let fault = result.fault().unwrap();
    assert_eq!(fault.message, "cannot generate gen/Late.java: processing is over");
    assert!(!fault.panicked);
    assert_eq!(result.generated_count(), 0);
}

#[test]
fn recreating_a_unit_is_reported() {
    let result = compile(&[unit("Seed", "class Seed {}")], boxed(DuplicatingProcessor));

    assert_eq!(result.status(), CompilationStatus::Failure);
    assert_eq!(result.generated_count(), 1);
    let messages: Vec<&str> = result.errors().iter().map(|d| d.message.as_str()).collect();
    assert_eq!(messages, ["attempt to recreate unit gen/Dup.java"]);
}

#[test]
fn generating_over_an_input_is_refused() {
    let fixed = FixedProcessor {
        qualified_type: "Seed",
        text: "class Seed { int x; }",
    };
    let result = compile(&[unit("Seed", "class Seed {}")], boxed(fixed));

    assert_eq!(result.status(), CompilationStatus::InternalFault);
    assert_eq!(
        result.fault().unwrap().to_string(),
        "processor fixed failed: generated unit Seed.java clashes with an input unit"
    );
}

#[test]
fn returned_errors_are_faults() {
    let in_process = compile(
        &[unit("Seed", "class Seed {}")],
        boxed(FailingProcessor { in_init: false }),
    );
    assert_eq!(in_process.status(), CompilationStatus::InternalFault);
    assert_eq!(in_process.fault().unwrap().message, "unsupported input");
    assert_eq!(in_process.rounds(), 1);

    let in_init = compile(
        &[unit("Seed", "class Seed {}")],
        boxed(FailingProcessor { in_init: true }),
    );
    assert_eq!(in_init.status(), CompilationStatus::InternalFault);
    assert_eq!(in_init.fault().unwrap().message, "cannot start");
    assert_eq!(in_init.rounds(), 0);
}

#[test]
fn fault_stops_later_processors() {
    let (recorder, log) = RecordingProcessor::new(&["*"]);
    let processors: Vec<Box<dyn Processor>> = vec![
        Box::new(FailingProcessor { in_init: false }),
        Box::new(recorder),
    ];
    let result = compile(&[unit("Seed", "class Seed {}")], processors);

    assert_eq!(result.status(), CompilationStatus::InternalFault);
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn processor_options_reach_init() {
    let by_option = Compiler::new()
        .processor(BuilderProcessor::default())
        .option("builder.suffix", "Factory")
        .compile(&[unit("p.Point", POINT)]);
    assert_success(&by_option);
    assert!(by_option.generated_unit("p/PointFactory.java").is_some());

    let by_arg = Compiler::new()
        .processor(BuilderProcessor::default())
        .option_arg("-Abuilder.suffix=Maker")
        .compile(&[unit("p.Point", POINT)]);
    assert!(by_arg.generated_unit("p/PointMaker.java").is_some());
}

#[test]
fn warnings_fail_only_with_werror() {
    let empty = [unit("p.Empty", "package p;\n@Builder\nclass Empty {}\n")];

    let lenient = compile(&empty, boxed(BuilderProcessor::default()));
    assert_success(&lenient);
    let warnings = lenient.warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(
        warnings[0].to_string(),
        "p/Empty.java:3:7: warning: Empty has no fields to build"
    );

    let strict = Compiler::new()
        .processor(BuilderProcessor::default())
        .warnings_as_errors(true)
        .compile(&empty);
    assert_eq!(strict.status(), CompilationStatus::Failure);
    let errors = strict.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, Some(ErrorCode::E3002));
    assert_eq!(errors[0].message, "warnings found and -Werror specified");
}

#[test]
fn messager_reports_misapplied_annotations() {
    let source = "package p;\nclass Holder {\n    @Builder int count;\n}\n";
    let result = compile(&[unit("p.Holder", source)], boxed(BuilderProcessor::default()));

    assert_eq!(result.status(), CompilationStatus::Failure);
    assert_eq!(
        result.errors()[0].to_string(),
        "p/Holder.java:3:18: error: @Builder applies to classes only"
    );
}

#[test]
fn generated_units_are_checked() {
    let fixed = FixedProcessor {
        qualified_type: "gen.Bad",
        text: "package gen;\nclass Bad {\n    Strin name;\n}\n",
    };
    let result = compile(&[unit("Seed", "class Seed {}")], boxed(fixed));

    assert_eq!(result.status(), CompilationStatus::Failure);
    let errors = result.diagnostics().in_unit("gen/Bad.java");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, Some(ErrorCode::E2012));
    assert_eq!((errors[0].line, errors[0].column), (3, 5));
}

#[test]
fn unparsable_generated_unit_is_reported_and_kept() {
    let fixed = FixedProcessor {
        qualified_type: "gen.Broken",
        text: "package gen;\nclass Broken {\n",
    };
    let result = compile(&[unit("Seed", "class Seed {}")], boxed(fixed));

    assert_eq!(result.status(), CompilationStatus::Failure);
    assert_eq!(result.generated_count(), 1);
    assert!(result.tree("gen/Broken.java").is_none());
    assert_eq!(result.diagnostics().in_unit("gen/Broken.java").len(), 1);
}

#[test]
fn checker_can_be_skipped() {
    let result = Compiler::new()
        .without_checker()
        .compile(&[unit("A", "class A { Strin s; }")]);
    assert_success(&result);
    assert!(result.diagnostics().is_empty());
}
