//! Comparison outcomes.

use std::fmt;

use kiln_ir::NodeKind;

/// Outcome of comparing two trees.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use = "a verdict should be checked"]
pub enum EquivalenceVerdict {
    Equivalent,
    NotEquivalent(Divergence),
}

impl EquivalenceVerdict {
    #[inline]
    pub fn is_equivalent(&self) -> bool {
        matches!(self, EquivalenceVerdict::Equivalent)
    }

    pub fn divergence(&self) -> Option<&Divergence> {
        match self {
            EquivalenceVerdict::Equivalent => None,
            EquivalenceVerdict::NotEquivalent(divergence) => Some(divergence),
        }
    }
}

impl fmt::Display for EquivalenceVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EquivalenceVerdict::Equivalent => f.write_str("equivalent"),
            EquivalenceVerdict::NotEquivalent(divergence) => write!(f, "{divergence}"),
        }
    }
}

/// Where a step leads from its parent.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum StepKey {
    Root,
    /// Element `index` of the named child group.
    Child { group: &'static str, index: usize },
    /// A scalar payload field of the node.
    Field(&'static str),
}

/// One step of a divergence path: the node reached and how.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PathStep {
    pub kind: NodeKind,
    pub key: StepKey,
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            StepKey::Root => write!(f, "{}", self.kind),
            StepKey::Child { group, index } => write!(f, "{group}[{index}]:{}", self.kind),
            StepKey::Field(name) => write!(f, ".{name}"),
        }
    }
}

/// Which tree an unmatched element belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Actual,
    Expected,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Actual => f.write_str("actual"),
            Side::Expected => f.write_str("expected"),
        }
    }
}

/// Why the nodes at the end of a path differ.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mismatch {
    Kind {
        actual: NodeKind,
        expected: NodeKind,
    },
    Field {
        name: &'static str,
        actual: String,
        expected: String,
    },
    Length {
        group: &'static str,
        actual: usize,
        expected: usize,
    },
    /// An element of an unordered group with no equivalent counterpart.
    Unmatched {
        group: &'static str,
        side: Side,
        index: usize,
        kind: NodeKind,
        name: Option<String>,
    },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Kind { actual, expected } => {
                write!(f, "expected {expected}, found {actual}")
            }
            Mismatch::Field {
                name,
                actual,
                expected,
            } => write!(f, "{name} differs: expected `{expected}`, found `{actual}`"),
            Mismatch::Length {
                group,
                actual,
                expected,
            } => write!(f, "expected {expected} {group}, found {actual}"),
            Mismatch::Unmatched {
                group,
                side,
                index,
                kind,
                name,
            } => {
                write!(f, "{side} {kind}")?;
                if let Some(name) = name {
                    write!(f, " `{name}`")?;
                }
                let other = match side {
                    Side::Actual => Side::Expected,
                    Side::Expected => Side::Actual,
                };
                write!(f, " ({group}[{index}]) has no equivalent in the {other} tree")
            }
        }
    }
}

/// The first divergence found, with its path from the root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Divergence {
    pub path: Vec<PathStep>,
    pub reason: Mismatch,
}

impl Divergence {
    /// The path rendered as `CompilationUnit/types[0]:Class/members[1]:Method`.
    pub fn path_string(&self) -> String {
        let mut out = String::new();
        for (i, step) in self.path.iter().enumerate() {
            if i > 0 && !matches!(step.key, StepKey::Field(_)) {
                out.push('/');
            }
            out.push_str(&step.to_string());
        }
        out
    }
}

impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at {}: {}", self.path_string(), self.reason)
    }
}
