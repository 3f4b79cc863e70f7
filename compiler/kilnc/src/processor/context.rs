//! Services a processor uses while processing: the filer for generated
//! units and the messager for diagnostics.

use std::sync::Arc;

use kiln_diagnostic::{Diagnostic, DiagnosticKind, UnitLocator};
use kiln_ir::SourceUnit;
use rustc_hash::{FxHashMap, FxHashSet};

use super::Element;

/// Why the filer refused a unit.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FilerError {
    #[error("attempt to recreate unit {0}")]
    Duplicate(String),
    #[error("generated unit {0} clashes with an input unit")]
    ClashesWithInput(String),
    #[error("cannot generate {0}: processing is over")]
    ProcessingOver(String),
}

/// Holds the units generated during one compilation.
///
/// Unit names are unique across inputs and every generated unit.
#[derive(Debug, Default)]
pub struct Filer {
    inputs: FxHashSet<String>,
    generated: FxHashSet<String>,
    pending: Vec<SourceUnit>,
    processing_over: bool,
}

impl Filer {
    pub(crate) fn new<'i>(inputs: impl IntoIterator<Item = &'i SourceUnit>) -> Self {
        Filer {
            inputs: inputs.into_iter().map(|u| u.name().to_string()).collect(),
            ..Filer::default()
        }
    }

    /// Generate the unit for a type, named after its fully qualified name:
    /// `com.example.Foo` becomes `com/example/Foo.java`.
    pub fn generate_source(
        &mut self,
        qualified_type: &str,
        text: impl Into<String>,
    ) -> Result<SourceUnit, FilerError> {
        self.generate_unit(SourceUnit::for_type(qualified_type, text))
    }

    /// Generate a unit with an explicit name.
    pub fn generate_unit(&mut self, unit: SourceUnit) -> Result<SourceUnit, FilerError> {
        let name = unit.name();
        if self.processing_over {
            return Err(FilerError::ProcessingOver(name.to_string()));
        }
        if self.inputs.contains(name) {
            return Err(FilerError::ClashesWithInput(name.to_string()));
        }
        if !self.generated.insert(name.to_string()) {
            return Err(FilerError::Duplicate(name.to_string()));
        }
        tracing::debug!(unit = name, "generated unit");
        self.pending.push(unit.clone());
        Ok(unit)
    }

    pub fn is_generated(&self, name: &str) -> bool {
        self.generated.contains(name)
    }

    pub(crate) fn set_processing_over(&mut self, over: bool) {
        self.processing_over = over;
    }

    /// Units generated since the last call, in generation order.
    pub(crate) fn take_pending(&mut self) -> Vec<SourceUnit> {
        std::mem::take(&mut self.pending)
    }
}

/// Reports processor diagnostics into the compilation's diagnostic stream.
pub struct Messager<'c> {
    processor: &'c Arc<str>,
    diagnostics: &'c mut Vec<Diagnostic>,
}

impl Messager<'_> {
    /// Report an unlocated diagnostic.
    pub fn print_message(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let diagnostic = Diagnostic::new(kind, message).from_processor(Arc::clone(self.processor));
        self.diagnostics.push(diagnostic);
    }

    /// Report a diagnostic located at an element.
    pub fn print_message_at(
        &mut self,
        kind: DiagnosticKind,
        message: impl Into<String>,
        element: &Element<'_>,
    ) {
        let diagnostic = Diagnostic::new(kind, message).from_processor(Arc::clone(self.processor));
        let located = UnitLocator::new(element.unit()).locate(diagnostic, element.span());
        self.diagnostics.push(located);
    }

    pub fn error_at(&mut self, message: impl Into<String>, element: &Element<'_>) {
        self.print_message_at(DiagnosticKind::Error, message, element);
    }

    pub fn warning_at(&mut self, message: impl Into<String>, element: &Element<'_>) {
        self.print_message_at(DiagnosticKind::Warning, message, element);
    }

    pub fn note(&mut self, message: impl Into<String>) {
        self.print_message(DiagnosticKind::Note, message);
    }
}

/// Everything a processor may act on while processing a round.
pub struct ProcessingContext<'s> {
    processor: Arc<str>,
    filer: &'s mut Filer,
    diagnostics: &'s mut Vec<Diagnostic>,
    options: &'s FxHashMap<String, String>,
}

impl<'s> ProcessingContext<'s> {
    pub(crate) fn new(
        processor: Arc<str>,
        filer: &'s mut Filer,
        diagnostics: &'s mut Vec<Diagnostic>,
        options: &'s FxHashMap<String, String>,
    ) -> Self {
        ProcessingContext {
            processor,
            filer,
            diagnostics,
            options,
        }
    }

    pub fn filer(&mut self) -> &mut Filer {
        &mut *self.filer
    }

    pub fn messager(&mut self) -> Messager<'_> {
        Messager {
            processor: &self.processor,
            diagnostics: &mut *self.diagnostics,
        }
    }

    /// Shorthand for [`Filer::generate_source`].
    pub fn generate_source(
        &mut self,
        qualified_type: &str,
        text: impl Into<String>,
    ) -> Result<SourceUnit, FilerError> {
        self.filer.generate_source(qualified_type, text)
    }

    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    /// Name of the processor this context belongs to.
    pub fn processor_name(&self) -> &str {
        &self.processor
    }
}
