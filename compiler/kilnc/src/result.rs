//! The immutable outcome of one compilation.

use std::fmt;
use std::sync::Arc;

use kiln_diagnostic::{Diagnostic, DiagnosticIndex};
use kiln_ir::{CompilationUnit, SourceUnit};

/// Overall outcome of a compilation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CompilationStatus {
    Success,
    /// Errors were reported; the diagnostics say which.
    Failure,
    /// A processor faulted; see [`CompilationResult::fault`].
    InternalFault,
}

impl fmt::Display for CompilationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompilationStatus::Success => f.write_str("success"),
            CompilationStatus::Failure => f.write_str("failure"),
            CompilationStatus::InternalFault => f.write_str("internal fault"),
        }
    }
}

/// A fault raised by a processor: a returned error or a panic.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProcessorFault {
    pub processor: Arc<str>,
    pub message: String,
    /// The processor panicked rather than returning an error.
    pub panicked: bool,
}

impl fmt::Display for ProcessorFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let how = if self.panicked { "panicked" } else { "failed" };
        write!(f, "processor {} {how}: {}", self.processor, self.message)
    }
}

/// A unit of the compilation with its tree, when it parsed.
#[derive(Clone, Debug)]
pub struct ParsedUnit {
    pub source: SourceUnit,
    pub tree: Option<Arc<CompilationUnit>>,
}

/// Everything one compilation produced. Never mutated after construction.
#[derive(Clone, Debug)]
pub struct CompilationResult {
    pub(crate) status: CompilationStatus,
    pub(crate) inputs: Vec<ParsedUnit>,
    pub(crate) generated: Vec<ParsedUnit>,
    pub(crate) diagnostics: DiagnosticIndex,
    pub(crate) fault: Option<ProcessorFault>,
    pub(crate) rounds: u32,
}

impl CompilationResult {
    pub fn status(&self) -> CompilationStatus {
        self.status
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.status == CompilationStatus::Success
    }

    /// Generated units in generation order.
    pub fn generated(&self) -> impl ExactSizeIterator<Item = &SourceUnit> {
        self.generated.iter().map(|u| &u.source)
    }

    pub fn generated_count(&self) -> usize {
        self.generated.len()
    }

    pub fn generated_unit(&self, name: &str) -> Option<&SourceUnit> {
        self.generated().find(|u| u.name() == name)
    }

    /// Generated units with their trees.
    pub fn generated_parsed(&self) -> &[ParsedUnit] {
        &self.generated
    }

    pub fn inputs(&self) -> &[ParsedUnit] {
        &self.inputs
    }

    /// The tree of any input or generated unit, if it parsed.
    pub fn tree(&self, name: &str) -> Option<&CompilationUnit> {
        self.inputs
            .iter()
            .chain(&self.generated)
            .find(|u| u.source.name() == name)
            .and_then(|u| u.tree.as_deref())
    }

    pub fn diagnostics(&self) -> &DiagnosticIndex {
        &self.diagnostics
    }

    pub fn errors(&self) -> Vec<&Diagnostic> {
        self.diagnostics.errors()
    }

    pub fn warnings(&self) -> Vec<&Diagnostic> {
        self.diagnostics.warnings()
    }

    pub fn fault(&self) -> Option<&ProcessorFault> {
        self.fault.as_ref()
    }

    /// Processing rounds run, including the final one. Zero when no
    /// processing took place.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }
}

impl fmt::Display for CompilationResult {
    /// A summary for failure messages: status, fault, then each diagnostic.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "compilation {} ({} generated, {} diagnostics)",
            self.status,
            self.generated.len(),
            self.diagnostics.len()
        )?;
        if let Some(fault) = &self.fault {
            write!(f, "\n  {fault}")?;
        }
        for diagnostic in &self.diagnostics {
            write!(f, "\n  {diagnostic}")?;
        }
        Ok(())
    }
}
