//! Filter executor.
//!
//! Evaluates a WHERE tree over a dataset and returns the positions of the
//! matching records, in dataset order. Negation is not applied to a boolean
//! result after the fact: a `not` flag is threaded down the tree and flipped
//! at every `NOT`, so that AND/OR swap roles under negation (De Morgan) and
//! leaves invert their comparison.

use alloc::vec::Vec;
use hashbrown::HashSet;
use insight_core::Record;

use crate::ast::{Filter, LogicalOp};

/// Filter executor - selects the records matching a WHERE tree.
pub struct FilterExecutor<'f> {
    filter: &'f Filter,
}

impl<'f> FilterExecutor<'f> {
    /// Creates a new filter executor.
    pub fn new(filter: &'f Filter) -> Self {
        Self { filter }
    }

    /// Executes the filter and returns the positions of matching records.
    pub fn execute(&self, records: &[Record]) -> Vec<usize> {
        let candidates: Vec<usize> = (0..records.len()).collect();
        evaluate(self.filter, records, &candidates, false)
    }
}

fn evaluate(filter: &Filter, records: &[Record], candidates: &[usize], not: bool) -> Vec<usize> {
    match filter {
        Filter::Logic { op, children } => {
            let intersect = matches!(
                (op, not),
                (LogicalOp::And, false) | (LogicalOp::Or, true)
            );
            if intersect {
                intersection(children, records, candidates, not)
            } else {
                union(children, records, candidates, not)
            }
        }
        Filter::Not(child) => evaluate(child, records, candidates, !not),
        leaf => candidates
            .iter()
            .copied()
            .filter(|&pos| matches_leaf(leaf, &records[pos]) != not)
            .collect(),
    }
}

/// Re-filters a shrinking candidate set through each child in turn.
fn intersection(children: &[Filter], records: &[Record], candidates: &[usize], not: bool) -> Vec<usize> {
    let mut current = candidates.to_vec();
    for child in children {
        if current.is_empty() {
            break;
        }
        current = evaluate(child, records, &current, not);
    }
    current
}

/// Evaluates every child against the original candidates and merges the
/// results, restoring dataset order.
fn union(children: &[Filter], records: &[Record], candidates: &[usize], not: bool) -> Vec<usize> {
    let mut seen: HashSet<usize> = HashSet::new();
    for child in children {
        seen.extend(evaluate(child, records, candidates, not));
    }
    let mut merged: Vec<usize> = seen.into_iter().collect();
    merged.sort_unstable();
    merged
}

/// Evaluates a comparison leaf. A record lacking the field, or holding a
/// value of the wrong type, does not satisfy the comparison.
fn matches_leaf(leaf: &Filter, record: &Record) -> bool {
    match leaf {
        Filter::Numeric { op, key, value } => record
            .get(key.field)
            .and_then(|v| v.as_f64())
            .is_some_and(|lhs| op.compare(lhs, *value)),
        Filter::String { key, pattern } => record
            .get(key.field)
            .and_then(|v| v.as_str())
            .is_some_and(|s| pattern.matches(s)),
        Filter::Logic { .. } | Filter::Not(_) => false,
    }
}

/// Evaluates a WHERE tree against a single record with plain boolean logic.
///
/// Equivalent to [`FilterExecutor`] on one record; used to cross-check the
/// flag-threading evaluator.
pub fn matches_record(filter: &Filter, record: &Record) -> bool {
    match filter {
        Filter::Logic {
            op: LogicalOp::And,
            children,
        } => children.iter().all(|child| matches_record(child, record)),
        Filter::Logic {
            op: LogicalOp::Or,
            children,
        } => children.iter().any(|child| matches_record(child, record)),
        Filter::Not(child) => !matches_record(child, record),
        leaf => matches_leaf(leaf, record),
    }
}
