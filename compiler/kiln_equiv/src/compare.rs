//! The comparison engine.
//!
//! Comparison runs over an explicit task stack instead of recursion. A node
//! task checks kind and scalars and pushes one task per child group; a group
//! task pairs children and pushes node tasks for the pairs. Every task records
//! the path depth it belongs to, so the path vector is always exactly the
//! chain of steps leading to the task being processed.
//!
//! Unordered groups are matched by pairwise elimination: each actual element
//! takes the first remaining expected element that is equivalent to it. The
//! greedy choice is exact because equivalence is an equivalence relation, at
//! the price of O(n·m) sub-comparisons per group.

use kiln_ir::{NodeKind, NodeRef};
use kiln_stack::ensure_sufficient_stack;

use crate::shape::{Group, Order, Shape};
use crate::{Divergence, EquivalenceVerdict, Mismatch, PathStep, Side, StepKey};

enum Task<'a> {
    Node {
        depth: usize,
        key: StepKey,
        actual: NodeRef<'a>,
        expected: NodeRef<'a>,
    },
    Group {
        depth: usize,
        name: &'static str,
        order: Order,
        actual: Vec<NodeRef<'a>>,
        expected: Vec<NodeRef<'a>>,
    },
}

/// Outcome of pairwise elimination over one unordered group.
enum Pairing<'a> {
    Complete,
    /// `actual[index]` has no partner; `candidates` are the expected elements
    /// still unpaired at that point.
    ActualUnmatched {
        index: usize,
        candidates: Vec<NodeRef<'a>>,
    },
    /// Everything actual was paired; `expected[index]` was left over.
    ExpectedUnmatched { index: usize },
}

pub(crate) fn run<'a>(actual: NodeRef<'a>, expected: NodeRef<'a>) -> EquivalenceVerdict {
    let mut stack = vec![Task::Node {
        depth: 0,
        key: StepKey::Root,
        actual,
        expected,
    }];
    let mut path: Vec<PathStep> = Vec::new();

    while let Some(task) = stack.pop() {
        match task {
            Task::Node {
                depth,
                key,
                actual,
                expected,
            } => {
                path.truncate(depth);
                path.push(PathStep {
                    kind: actual.kind(),
                    key,
                });
                if let Err(reason) = expand(actual, expected, &mut path, &mut stack) {
                    return diverge(path, reason);
                }
            }
            Task::Group {
                depth,
                name,
                order: Order::Ordered,
                actual,
                expected,
            } => {
                path.truncate(depth);
                if actual.len() != expected.len() {
                    return diverge(
                        path,
                        Mismatch::Length {
                            group: name,
                            actual: actual.len(),
                            expected: expected.len(),
                        },
                    );
                }
                let pairs = actual.into_iter().zip(expected).enumerate().rev();
                for (index, (actual, expected)) in pairs {
                    stack.push(Task::Node {
                        depth,
                        key: StepKey::Child { group: name, index },
                        actual,
                        expected,
                    });
                }
            }
            Task::Group {
                depth,
                name,
                order: Order::Unordered,
                actual,
                expected,
            } => {
                path.truncate(depth);
                match pair_up(&actual, &expected) {
                    Pairing::Complete => {}
                    Pairing::ActualUnmatched { index, candidates } => {
                        let node = actual[index];
                        let key = StepKey::Child { group: name, index };
                        if let Some(partner) = sole_namesake(node, &candidates) {
                            // Not equivalent, so the descent is bound to diverge
                            // somewhere below and report a deeper path.
                            stack.push(Task::Node {
                                depth,
                                key,
                                actual: node,
                                expected: partner,
                            });
                            continue;
                        }
                        path.push(PathStep {
                            kind: node.kind(),
                            key,
                        });
                        return diverge(path, unmatched(name, Side::Actual, index, node));
                    }
                    Pairing::ExpectedUnmatched { index } => {
                        let node = expected[index];
                        path.push(PathStep {
                            kind: node.kind(),
                            key: StepKey::Child { group: name, index },
                        });
                        return diverge(path, unmatched(name, Side::Expected, index, node));
                    }
                }
            }
        }
    }
    EquivalenceVerdict::Equivalent
}

/// Check a node pair's own payload and schedule its child groups.
fn expand<'a>(
    actual: NodeRef<'a>,
    expected: NodeRef<'a>,
    path: &mut Vec<PathStep>,
    stack: &mut Vec<Task<'a>>,
) -> Result<(), Mismatch> {
    let kind = actual.kind();
    if kind != expected.kind() {
        return Err(kind_mismatch(kind, expected.kind()));
    }

    let actual = Shape::of(actual);
    let expected = Shape::of(expected);

    for (&(name, a), (_, e)) in actual.scalars.iter().zip(&expected.scalars) {
        if a != *e {
            path.push(PathStep {
                kind,
                key: StepKey::Field(name),
            });
            return Err(Mismatch::Field {
                name,
                actual: a.to_string(),
                expected: e.to_string(),
            });
        }
    }

    if actual.groups.len() != expected.groups.len()
        || actual
            .groups
            .iter()
            .zip(&expected.groups)
            .any(|(a, e)| a.name != e.name)
    {
        return Err(kind_mismatch(kind, kind));
    }

    let depth = path.len();
    let groups = actual.groups.into_iter().zip(expected.groups).rev();
    for (a, Group { children, .. }) in groups {
        stack.push(Task::Group {
            depth,
            name: a.name,
            order: a.order,
            actual: a.children,
            expected: children,
        });
    }
    Ok(())
}

fn pair_up<'a>(actual: &[NodeRef<'a>], expected: &[NodeRef<'a>]) -> Pairing<'a> {
    let mut remaining: Vec<usize> = (0..expected.len()).collect();
    for (index, &node) in actual.iter().enumerate() {
        let partner = remaining
            .iter()
            .position(|&j| equivalent(node, expected[j]));
        match partner {
            Some(position) => {
                remaining.remove(position);
            }
            None => {
                return Pairing::ActualUnmatched {
                    index,
                    candidates: remaining.iter().map(|&j| expected[j]).collect(),
                };
            }
        }
    }
    match remaining.first() {
        Some(&index) => Pairing::ExpectedUnmatched { index },
        None => Pairing::Complete,
    }
}

/// Full sub-comparison used for pairing.
fn equivalent<'a>(actual: NodeRef<'a>, expected: NodeRef<'a>) -> bool {
    actual.kind() == expected.kind()
        && ensure_sufficient_stack(|| run(actual, expected)).is_equivalent()
}

/// The only candidate sharing `node`'s kind and name, if there is exactly one.
fn sole_namesake<'a>(node: NodeRef<'_>, candidates: &[NodeRef<'a>]) -> Option<NodeRef<'a>> {
    let key = (node.kind(), node.name());
    let mut matching = candidates
        .iter()
        .filter(|candidate| (candidate.kind(), candidate.name()) == key);
    let first = matching.next()?;
    match matching.next() {
        Some(_) => None,
        None => Some(*first),
    }
}

fn unmatched(group: &'static str, side: Side, index: usize, node: NodeRef<'_>) -> Mismatch {
    Mismatch::Unmatched {
        group,
        side,
        index,
        kind: node.kind(),
        name: node.name().map(str::to_owned),
    }
}

#[cold]
fn kind_mismatch(actual: NodeKind, expected: NodeKind) -> Mismatch {
    Mismatch::Kind { actual, expected }
}

#[cold]
fn diverge(path: Vec<PathStep>, reason: Mismatch) -> EquivalenceVerdict {
    tracing::trace!(%reason, "divergence");
    EquivalenceVerdict::NotEquivalent(Divergence { path, reason })
}
