//! The processing round loop.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use kiln_diagnostic::{Diagnostic, ErrorCode};
use kiln_ir::{CompilationUnit, SourceUnit};

use super::{Registered, Session};
use crate::processor::{
    ProcessingContext, ProcessingEnv, Processor, ProcessorError, RootUnit, RoundEnv,
    ALL_ANNOTATIONS,
};
use crate::result::ProcessorFault;

/// A parsed unit that roots a round.
type Root = (SourceUnit, Arc<CompilationUnit>);

impl Session {
    /// Initialize every processor, then run rounds until one generates
    /// nothing, then the final round.
    pub(super) fn process(&mut self) {
        if !self.init_processors() {
            return;
        }

        let mut roots: Vec<Root> = self
            .inputs
            .iter()
            .filter_map(|u| u.tree.as_ref().map(|t| (u.source.clone(), Arc::clone(t))))
            .collect();
        let max_rounds = self.options.max_rounds;
        let mut round = 0;

        while !roots.is_empty() {
            if round == max_rounds {
                tracing::debug!(max_rounds, "round limit reached");
                self.diagnostics.push(
                    Diagnostic::error(format!(
                        "maximum number of processing rounds ({max_rounds}) exceeded"
                    ))
                    .with_code(ErrorCode::E3001),
                );
                self.rounds = round;
                return;
            }
            round += 1;
            match self.run_round(round, &roots, false) {
                Some(next) => roots = next,
                None => {
                    self.rounds = round;
                    return;
                }
            }
        }

        round += 1;
        self.rounds = round;
        self.run_round(round, &[], true);
    }

    /// Read each processor's name and supported annotations. Stops at the
    /// first processor that panics, recording the fault.
    pub(super) fn register_processors(&mut self, processors: Vec<Box<dyn Processor>>) {
        for (index, processor) in processors.into_iter().enumerate() {
            match register(index, processor) {
                Ok(registered) => self.processors.push(registered),
                Err(fault) => {
                    self.fault = Some(fault);
                    return;
                }
            }
        }
    }

    /// Returns false when a processor faulted.
    fn init_processors(&mut self) -> bool {
        let env = ProcessingEnv::new(&self.options.processor_options, self.options.max_rounds);
        for registered in &mut self.processors {
            let outcome = catch_unwind(AssertUnwindSafe(|| registered.processor.init(&env)));
            if let Some(fault) = fault_of(&registered.name, outcome) {
                self.fault = Some(fault);
                return false;
            }
        }
        true
    }

    /// Run one round. Returns the roots of the next round, or `None` when a
    /// processor faulted.
    #[tracing::instrument(level = "debug", skip(self, roots), fields(roots = roots.len()))]
    fn run_round(&mut self, round: u32, roots: &[Root], processing_over: bool) -> Option<Vec<Root>> {
        let error_raised = self.diagnostics.iter().any(Diagnostic::is_error);
        let env = RoundEnv::new(
            roots
                .iter()
                .map(|(source, tree)| RootUnit { source, tree })
                .collect(),
            round,
            processing_over,
            error_raised,
        );
        self.filer.set_processing_over(processing_over);

        for registered in &mut self.processors {
            let claimed = registered.invoked
                || registered
                    .supported
                    .iter()
                    .any(|a| a == ALL_ANNOTATIONS || env.is_annotation_present(a));
            if !claimed {
                continue;
            }
            registered.invoked = true;
            tracing::trace!(processor = &*registered.name, "invoking processor");

            let mut ctx = ProcessingContext::new(
                Arc::clone(&registered.name),
                &mut self.filer,
                &mut self.diagnostics,
                &self.options.processor_options,
            );
            let outcome =
                catch_unwind(AssertUnwindSafe(|| registered.processor.process(&env, &mut ctx)));
            if let Some(fault) = fault_of(&registered.name, outcome) {
                self.fault = Some(fault);
                return None;
            }
        }

        let mut next = Vec::new();
        for source in self.filer.take_pending() {
            let parsed = self.parse_unit(source);
            if let Some(tree) = &parsed.tree {
                next.push((parsed.source.clone(), Arc::clone(tree)));
            }
            self.generated.push(parsed);
        }
        Some(next)
    }
}

fn register(index: usize, processor: Box<dyn Processor>) -> Result<Registered, ProcessorFault> {
    let name: Arc<str> = match catch_unwind(AssertUnwindSafe(|| Arc::<str>::from(processor.name()))) {
        Ok(name) => name,
        Err(payload) => {
            let placeholder: Arc<str> = Arc::from(format!("processor #{index}"));
            return Err(panic_fault(&placeholder, payload.as_ref()));
        }
    };
    let supported = catch_unwind(AssertUnwindSafe(|| processor.supported_annotations()))
        .map_err(|payload| panic_fault(&name, payload.as_ref()))?;
    Ok(Registered {
        processor,
        name,
        supported,
        invoked: false,
    })
}

fn fault_of(
    processor: &Arc<str>,
    outcome: std::thread::Result<Result<(), ProcessorError>>,
) -> Option<ProcessorFault> {
    match outcome {
        Ok(Ok(())) => None,
        Ok(Err(error)) => Some(fault(processor, error.to_string(), false)),
        Err(payload) => Some(panic_fault(processor, payload.as_ref())),
    }
}

fn panic_fault(processor: &Arc<str>, payload: &(dyn Any + Send)) -> ProcessorFault {
    fault(processor, panic_message(payload), true)
}

fn fault(processor: &Arc<str>, message: String, panicked: bool) -> ProcessorFault {
    tracing::debug!(processor = &**processor, %message, panicked, "processor fault");
    ProcessorFault {
        processor: Arc::clone(processor),
        message,
        panicked,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    }
}
