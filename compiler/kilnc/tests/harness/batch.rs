//! Independent compilations in parallel.

use kilnc::{compile_batch, BatchCase, CompilationResult, CompilationStatus, Compiler, SourceUnit};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::common::{unit, BuilderProcessor, ChainProcessor, PanickingProcessor, POINT};

#[test]
fn batch_results_come_back_in_order() {
    let cases: Vec<BatchCase> = (0..32)
        .map(|i| match i % 3 {
            0 => BatchCase::new(
                Compiler::new().processor(BuilderProcessor::default()),
                vec![unit("p.Point", POINT)],
            ),
            1 => BatchCase::new(
                Compiler::new(),
                vec![unit(&format!("C{i}"), &format!("class C{i} {{ int f() {{ return missing{i}; }} }}"))],
            ),
            _ => BatchCase::new(
                Compiler::new().processor(PanickingProcessor),
                vec![unit("Seed", "class Seed {}")],
            ),
        })
        .collect();

    let results = compile_batch(cases);
    assert_eq!(results.len(), 32);
    for (i, result) in results.iter().enumerate() {
        match i % 3 {
            0 => {
                assert_eq!(result.status(), CompilationStatus::Success, "{result}");
                assert_eq!(result.generated_count(), 1);
            }
            1 => {
                assert_eq!(result.status(), CompilationStatus::Failure);
                let errors = result.errors();
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].unit_name(), Some(format!("C{i}.java").as_str()));
                assert_eq!(errors[0].message, format!("cannot find symbol: variable missing{i}"));
            }
            _ => assert_eq!(result.status(), CompilationStatus::InternalFault),
        }
    }
}

#[test]
fn sessions_do_not_share_generated_units() {
    // Each case generates the same unit name; a shared filer would refuse all
    // but the first.
    let cases = (0..8)
        .map(|_| {
            BatchCase::new(
                Compiler::new().processor(BuilderProcessor::default()),
                vec![unit("p.Point", POINT)],
            )
        })
        .collect();

    let results = compile_batch(cases);
    assert!(results.iter().all(|r| r.is_success() && r.generated_count() == 1));
}

#[test]
fn results_cross_threads() {
    let result = Compiler::new()
        .processor(BuilderProcessor::default())
        .compile(&[unit("p.Point", POINT)]);

    let generated = std::thread::spawn(move || result.generated_count())
        .join()
        .unwrap();
    assert_eq!(generated, 1);
}

/// One of four compilations: generating, failing, faulting or chained.
fn case(kind: u8, i: usize) -> (Compiler, Vec<SourceUnit>) {
    match kind {
        0 => (
            Compiler::new().processor(BuilderProcessor::default()),
            vec![unit("p.Point", POINT)],
        ),
        1 => (
            Compiler::new(),
            vec![unit(&format!("C{i}"), &format!("class C{i} {{ Strin s{i}; }}"))],
        ),
        2 => (
            Compiler::new().processor(PanickingProcessor),
            vec![unit("Seed", "class Seed {}")],
        ),
        _ => (
            Compiler::new().processor(ChainProcessor { steps: 2 }),
            vec![unit("Seed", "class Seed {}")],
        ),
    }
}

fn outcome(result: &CompilationResult) -> (String, u32, Vec<String>) {
    let generated = result.generated().map(|u| u.name().to_string()).collect();
    (result.to_string(), result.rounds(), generated)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn batch_agrees_with_sequential_compiles(kinds in prop::collection::vec(0u8..4, 0..12)) {
        let cases = kinds
            .iter()
            .enumerate()
            .map(|(i, &kind)| {
                let (compiler, units) = case(kind, i);
                BatchCase::new(compiler, units)
            })
            .collect();
        let batch = compile_batch(cases);

        prop_assert_eq!(batch.len(), kinds.len());
        for ((i, &kind), result) in kinds.iter().enumerate().zip(&batch) {
            let (compiler, units) = case(kind, i);
            let alone = compiler.compile(&units);
            prop_assert_eq!(outcome(result), outcome(&alone));
        }
    }
}
