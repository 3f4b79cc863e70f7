//! One isolated compilation.
//!
//! A [`Session`] owns every piece of mutable state a compilation needs: the
//! parsed units, the filer, the diagnostic stream and the processors. It is
//! built per `compile` call and consumed into a [`CompilationResult`], so
//! nothing is shared between calls.

mod rounds;

use std::sync::Arc;

use kiln_check::CheckInput;
use kiln_diagnostic::{Diagnostic, DiagnosticIndex, DiagnosticKind, ErrorCode};
use kiln_ir::SourceUnit;

use crate::options::CompileOptions;
use crate::processor::{Filer, Processor};
use crate::result::{CompilationResult, CompilationStatus, ParsedUnit, ProcessorFault};

/// A processor with its bookkeeping.
struct Registered {
    processor: Box<dyn Processor>,
    name: Arc<str>,
    supported: Vec<String>,
    /// Invoked in an earlier round; such processors run in every later one.
    invoked: bool,
}

pub(crate) struct Session {
    options: CompileOptions,
    processors: Vec<Registered>,
    sources: Vec<SourceUnit>,
    inputs: Vec<ParsedUnit>,
    generated: Vec<ParsedUnit>,
    diagnostics: Vec<Diagnostic>,
    filer: Filer,
    fault: Option<ProcessorFault>,
    rounds: u32,
}

impl Session {
    pub fn new(
        sources: &[SourceUnit],
        processors: Vec<Box<dyn Processor>>,
        options: CompileOptions,
    ) -> Self {
        let mut session = Session {
            options,
            processors: Vec::with_capacity(processors.len()),
            filer: Filer::new(sources),
            sources: sources.to_vec(),
            inputs: Vec::with_capacity(sources.len()),
            generated: Vec::new(),
            diagnostics: Vec::new(),
            fault: None,
            rounds: 0,
        };
        session.register_processors(processors);
        session
    }

    /// Parse, process, check, and collect the outcome.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(units = self.sources.len(), processors = self.processors.len())
    )]
    pub fn run(mut self) -> CompilationResult {
        let all_parsed = self.parse_inputs();
        if !all_parsed {
            tracing::debug!("inputs failed to parse; skipping processing and checking");
        } else {
            if self.fault.is_none() && !self.processors.is_empty() {
                self.process();
            }
            if self.fault.is_none() && self.options.run_checker {
                self.check();
            }
        }
        self.finish()
    }

    /// Parse every input. Returns whether all of them parsed.
    fn parse_inputs(&mut self) -> bool {
        let sources = std::mem::take(&mut self.sources);
        let mut all_parsed = true;
        for source in sources {
            let parsed = self.parse_unit(source);
            all_parsed &= parsed.tree.is_some();
            self.inputs.push(parsed);
        }
        all_parsed
    }

    /// Parse one unit; a failure becomes an error located in the unit.
    fn parse_unit(&mut self, source: SourceUnit) -> ParsedUnit {
        match kiln_parse::parse(source.text()) {
            Ok(tree) => ParsedUnit {
                source,
                tree: Some(Arc::new(tree)),
            },
            Err(failure) => {
                tracing::debug!(unit = source.name(), %failure, "parse failure");
                self.diagnostics.push(
                    Diagnostic::error(failure.message)
                        .with_code(failure.code)
                        .at(source.shared_name(), failure.line, failure.column),
                );
                ParsedUnit { source, tree: None }
            }
        }
    }

    /// Run the semantic checker over every parsed unit, inputs and
    /// generated alike.
    fn check(&mut self) {
        let units: Vec<CheckInput<'_>> = self
            .inputs
            .iter()
            .chain(&self.generated)
            .filter_map(|u| u.tree.as_deref().map(|tree| CheckInput::new(&u.source, tree)))
            .collect();
        let found = kiln_check::check(&units);
        self.diagnostics.extend(found);
    }

    fn finish(mut self) -> CompilationResult {
        let has_kind =
            |diagnostics: &[Diagnostic], kind: DiagnosticKind| diagnostics.iter().any(|d| d.kind == kind);

        if self.options.warnings_as_errors
            && self.fault.is_none()
            && has_kind(&self.diagnostics, DiagnosticKind::Warning)
        {
            self.diagnostics.push(
                Diagnostic::error("warnings found and -Werror specified")
                    .with_code(ErrorCode::E3002),
            );
        }

        let status = if self.fault.is_some() {
            CompilationStatus::InternalFault
        } else if has_kind(&self.diagnostics, DiagnosticKind::Error) {
            CompilationStatus::Failure
        } else {
            CompilationStatus::Success
        };
        tracing::debug!(
            %status,
            diagnostics = self.diagnostics.len(),
            generated = self.generated.len(),
            rounds = self.rounds,
            "compilation finished"
        );

        CompilationResult {
            status,
            inputs: self.inputs,
            generated: self.generated,
            diagnostics: DiagnosticIndex::new(self.diagnostics),
            fault: self.fault,
            rounds: self.rounds,
        }
    }
}
