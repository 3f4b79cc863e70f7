//! Checking generated units against golden units.

use std::fmt;

use kiln_equiv::{compare, Divergence, EquivalenceVerdict};
use kiln_ir::SourceUnit;
use kiln_parse::ParseFailure;

use crate::result::CompilationResult;

/// How one golden unit fared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GoldenOutcome {
    /// An equivalent unit was generated.
    Matched { generated: String },
    /// The unit generated under the golden unit's name is not equivalent.
    Diverged {
        generated: String,
        divergence: Divergence,
    },
    /// Nothing equivalent was generated.
    Missing,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoldenEntry {
    /// Name of the golden unit.
    pub expected: String,
    pub outcome: GoldenOutcome,
}

impl GoldenEntry {
    pub fn is_matched(&self) -> bool {
        matches!(self.outcome, GoldenOutcome::Matched { .. })
    }
}

impl fmt::Display for GoldenEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            GoldenOutcome::Matched { generated } => {
                write!(f, "{}: matched by {generated}", self.expected)
            }
            GoldenOutcome::Diverged {
                generated,
                divergence,
            } => write!(f, "{}: {generated} diverges {divergence}", self.expected),
            GoldenOutcome::Missing => write!(f, "{}: no equivalent unit generated", self.expected),
        }
    }
}

/// One entry per golden unit, in the order given.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GoldenReport {
    entries: Vec<GoldenEntry>,
}

impl GoldenReport {
    pub fn entries(&self) -> &[GoldenEntry] {
        &self.entries
    }

    pub fn entry(&self, expected: &str) -> Option<&GoldenEntry> {
        self.entries.iter().find(|e| e.expected == expected)
    }

    /// Every golden unit was matched.
    pub fn is_success(&self) -> bool {
        self.entries.iter().all(GoldenEntry::is_matched)
    }

    pub fn failures(&self) -> impl Iterator<Item = &GoldenEntry> {
        self.entries.iter().filter(|e| !e.is_matched())
    }
}

impl fmt::Display for GoldenReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let failed = self.failures().count();
        write!(f, "{} of {} golden units matched", self.entries.len() - failed, self.entries.len())?;
        for entry in &self.entries {
            write!(f, "\n  {entry}")?;
        }
        Ok(())
    }
}

/// Compare the units a compilation generated with golden units.
///
/// Each golden unit pairs with the generated unit of the same name; failing
/// that, with any equivalent generated unit. A generated unit that did not
/// parse never matches. A golden unit that does not parse is a setup error.
#[tracing::instrument(level = "debug", skip_all, fields(expected = expected.len()))]
pub fn verify_generated(
    result: &CompilationResult,
    expected: &[SourceUnit],
) -> Result<GoldenReport, ParseFailure> {
    let generated = result.generated_parsed();
    let mut entries = Vec::with_capacity(expected.len());

    for golden in expected {
        let golden_tree = kiln_parse::parse(golden.text()).inspect_err(|failure| {
            tracing::debug!(unit = golden.name(), %failure, "golden unit failed to parse");
        })?;

        let same_name = generated
            .iter()
            .find(|u| u.source.name() == golden.name())
            .and_then(|u| u.tree.as_deref().map(|tree| (u.source.name(), tree)));

        let outcome = match same_name.map(|(name, tree)| (name, compare(tree, &golden_tree))) {
            Some((name, EquivalenceVerdict::Equivalent)) => GoldenOutcome::Matched {
                generated: name.to_string(),
            },
            Some((name, EquivalenceVerdict::NotEquivalent(divergence))) => {
                GoldenOutcome::Diverged {
                    generated: name.to_string(),
                    divergence,
                }
            }
            None => generated
                .iter()
                .find(|u| {
                    u.tree
                        .as_deref()
                        .is_some_and(|tree| compare(tree, &golden_tree).is_equivalent())
                })
                .map_or(GoldenOutcome::Missing, |u| GoldenOutcome::Matched {
                    generated: u.source.name().to_string(),
                }),
        };
        entries.push(GoldenEntry {
            expected: golden.name().to_string(),
            outcome,
        });
    }

    Ok(GoldenReport { entries })
}
