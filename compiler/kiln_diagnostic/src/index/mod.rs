//! Indexed, read-only views over captured diagnostics.
//!
//! The index is built once from the emission-ordered diagnostic sequence.
//! Every query returns diagnostics in that original order; there is no way to
//! mutate the index after construction.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::{Diagnostic, DiagnosticKind};

/// Diagnostics of one compilation, queryable by kind, unit, position and
/// message.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticIndex {
    diagnostics: Vec<Diagnostic>,
    by_kind: [Vec<usize>; 3],
    by_unit: FxHashMap<Arc<str>, Vec<usize>>,
    by_position: FxHashMap<Arc<str>, FxHashMap<(u32, u32), Vec<usize>>>,
}

impl DiagnosticIndex {
    /// Index diagnostics, keeping their emission order.
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        let mut by_kind: [Vec<usize>; 3] = Default::default();
        let mut by_unit: FxHashMap<Arc<str>, Vec<usize>> = FxHashMap::default();
        let mut by_position: FxHashMap<Arc<str>, FxHashMap<(u32, u32), Vec<usize>>> =
            FxHashMap::default();

        for (i, diag) in diagnostics.iter().enumerate() {
            by_kind[diag.kind.index()].push(i);
            if let Some(unit) = &diag.unit {
                by_unit.entry(Arc::clone(unit)).or_default().push(i);
                by_position
                    .entry(Arc::clone(unit))
                    .or_default()
                    .entry((diag.line, diag.column))
                    .or_default()
                    .push(i);
            }
        }

        DiagnosticIndex {
            diagnostics,
            by_kind,
            by_unit,
            by_position,
        }
    }

    fn select(&self, indices: &[usize]) -> Vec<&Diagnostic> {
        indices.iter().map(|&i| &self.diagnostics[i]).collect()
    }

    /// All diagnostics of one kind.
    pub fn by_kind(&self, kind: DiagnosticKind) -> Vec<&Diagnostic> {
        self.select(&self.by_kind[kind.index()])
    }

    /// Diagnostics located exactly at `unit:line:column`.
    pub fn at_location(&self, unit: &str, line: u32, column: u32) -> Vec<&Diagnostic> {
        self.by_position
            .get(unit)
            .and_then(|positions| positions.get(&(line, column)))
            .map(|indices| self.select(indices))
            .unwrap_or_default()
    }

    /// Diagnostics whose message contains `substring` (case-sensitive).
    pub fn containing_message(&self, substring: &str) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.message.contains(substring))
            .collect()
    }

    /// Diagnostics located anywhere in `unit`.
    pub fn in_unit(&self, unit: &str) -> Vec<&Diagnostic> {
        self.by_unit
            .get(unit)
            .map(|indices| self.select(indices))
            .unwrap_or_default()
    }

    pub fn errors(&self) -> Vec<&Diagnostic> {
        self.by_kind(DiagnosticKind::Error)
    }

    pub fn warnings(&self) -> Vec<&Diagnostic> {
        self.by_kind(DiagnosticKind::Warning)
    }

    pub fn notes(&self) -> Vec<&Diagnostic> {
        self.by_kind(DiagnosticKind::Note)
    }

    pub fn has_errors(&self) -> bool {
        !self.by_kind[DiagnosticKind::Error.index()].is_empty()
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.by_kind[kind.index()].len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    /// The full sequence in emission order.
    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Start a composable query.
    pub fn query(&self) -> DiagnosticQuery<'_> {
        DiagnosticQuery {
            index: self,
            kind: None,
            substring: None,
            unit: None,
            line: None,
            column: None,
        }
    }
}

impl<'a> IntoIterator for &'a DiagnosticIndex {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

/// Conjunction of diagnostic predicates.
///
/// ```text
/// result.diagnostics()
///     .query()
///     .kind(DiagnosticKind::Error)
///     .containing("No types named HelloWorld")
///     .in_unit("HelloWorld.java")
///     .on_line(23)
///     .at_column(5)
///     .exists()
/// ```
#[derive(Clone, Debug)]
#[must_use = "a query does nothing until it is evaluated"]
pub struct DiagnosticQuery<'a> {
    index: &'a DiagnosticIndex,
    kind: Option<DiagnosticKind>,
    substring: Option<String>,
    unit: Option<String>,
    line: Option<u32>,
    column: Option<u32>,
}

impl<'a> DiagnosticQuery<'a> {
    pub fn kind(mut self, kind: DiagnosticKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn containing(mut self, substring: impl Into<String>) -> Self {
        self.substring = Some(substring.into());
        self
    }

    pub fn in_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn on_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn at_column(mut self, column: u32) -> Self {
        self.column = Some(column);
        self
    }

    fn accepts(&self, diag: &Diagnostic) -> bool {
        self.kind.map_or(true, |kind| diag.kind == kind)
            && self
                .substring
                .as_deref()
                .map_or(true, |s| diag.message.contains(s))
            && self
                .unit
                .as_deref()
                .map_or(true, |unit| diag.unit_name() == Some(unit))
            && self.line.map_or(true, |line| diag.line == line)
            && self.column.map_or(true, |column| diag.column == column)
    }

    /// Matching diagnostics in emission order.
    pub fn matches(&self) -> Vec<&'a Diagnostic> {
        // Start from the narrowest precomputed list.
        let candidates: Vec<&'a Diagnostic> = match (&self.unit, self.line, self.column) {
            (Some(unit), Some(line), Some(column)) => self.index.at_location(unit, line, column),
            (Some(unit), _, _) => self.index.in_unit(unit),
            _ => match self.kind {
                Some(kind) => self.index.by_kind(kind),
                None => self.index.iter().collect(),
            },
        };
        candidates.into_iter().filter(|d| self.accepts(d)).collect()
    }

    pub fn first(&self) -> Option<&'a Diagnostic> {
        self.matches().into_iter().next()
    }

    pub fn count(&self) -> usize {
        self.matches().len()
    }

    pub fn exists(&self) -> bool {
        self.first().is_some()
    }
}

#[cfg(test)]
mod tests;
