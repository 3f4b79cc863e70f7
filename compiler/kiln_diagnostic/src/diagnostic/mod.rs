//! The located diagnostic record.

use std::fmt;
use std::sync::Arc;

use kiln_ir::{SourceUnit, Span};

use crate::span_utils::LineOffsetTable;
use crate::ErrorCode;

/// Kind of a diagnostic.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DiagnosticKind {
    Error,
    Warning,
    Note,
}

impl DiagnosticKind {
    pub const ALL: [DiagnosticKind; 3] = [
        DiagnosticKind::Error,
        DiagnosticKind::Warning,
        DiagnosticKind::Note,
    ];

    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            DiagnosticKind::Error => 0,
            DiagnosticKind::Warning => 1,
            DiagnosticKind::Note => 2,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::Error => write!(f, "error"),
            DiagnosticKind::Warning => write!(f, "warning"),
            DiagnosticKind::Note => write!(f, "note"),
        }
    }
}

/// Who emitted a diagnostic.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum DiagnosticSource {
    /// Lexer, parser, checker or the harness itself.
    Toolchain,
    /// A processor, by name.
    Processor(Arc<str>),
}

/// An immutable diagnostic record.
///
/// `unit` is `None` for diagnostics without a location; `line` and `column`
/// are 1-based, and 0 when unknown.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub code: Option<ErrorCode>,
    pub message: String,
    pub unit: Option<Arc<str>>,
    pub line: u32,
    pub column: u32,
    pub source: DiagnosticSource,
}

impl Diagnostic {
    /// Create an unlocated toolchain diagnostic.
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Diagnostic {
            kind,
            code: None,
            message: message.into(),
            unit: None,
            line: 0,
            column: 0,
            source: DiagnosticSource::Toolchain,
        }
    }

    #[cold]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, message)
    }

    #[cold]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Warning, message)
    }

    pub fn note(message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Note, message)
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Attach an explicit location.
    pub fn at(mut self, unit: Arc<str>, line: u32, column: u32) -> Self {
        self.unit = Some(unit);
        self.line = line;
        self.column = column;
        self
    }

    /// Attach a unit without a position.
    pub fn in_unit(mut self, unit: Arc<str>) -> Self {
        self.unit = Some(unit);
        self
    }

    pub fn from_processor(mut self, processor: Arc<str>) -> Self {
        self.source = DiagnosticSource::Processor(processor);
        self
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.kind == DiagnosticKind::Error
    }

    /// Name of the unit this diagnostic is located in, if any.
    pub fn unit_name(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// Location as `unit:line:column`, omitting unknown parts.
    pub fn location(&self) -> Option<String> {
        let unit = self.unit.as_deref()?;
        Some(match (self.line, self.column) {
            (0, _) => unit.to_string(),
            (line, 0) => format!("{unit}:{line}"),
            (line, column) => format!("{unit}:{line}:{column}"),
        })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(location) = self.location() {
            write!(f, "{location}: ")?;
        }
        write!(f, "{}", self.kind)?;
        if let Some(code) = self.code {
            write!(f, "[{code}]")?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Maps spans of one unit to located diagnostics.
///
/// Builds the unit's line table once so that reporting many diagnostics
/// against the same unit stays cheap.
#[derive(Clone, Debug)]
pub struct UnitLocator {
    unit: SourceUnit,
    table: LineOffsetTable,
}

impl UnitLocator {
    pub fn new(unit: &SourceUnit) -> Self {
        UnitLocator {
            table: LineOffsetTable::build(unit.text()),
            unit: unit.clone(),
        }
    }

    pub fn unit(&self) -> &SourceUnit {
        &self.unit
    }

    /// 1-based (line, column) of a span's start.
    pub fn line_col(&self, span: Span) -> (u32, u32) {
        self.table.offset_to_line_col(self.unit.text(), span.start)
    }

    /// Locate an existing diagnostic at `span`.
    pub fn locate(&self, diagnostic: Diagnostic, span: Span) -> Diagnostic {
        let (line, column) = self.line_col(span);
        diagnostic.at(self.unit.shared_name(), line, column)
    }

    /// Create a located diagnostic.
    pub fn diagnostic(
        &self,
        kind: DiagnosticKind,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
    ) -> Diagnostic {
        self.locate(Diagnostic::new(kind, message).with_code(code), span)
    }

    /// Create a located error.
    pub fn error(&self, code: ErrorCode, message: impl Into<String>, span: Span) -> Diagnostic {
        self.diagnostic(DiagnosticKind::Error, code, message, span)
    }
}
