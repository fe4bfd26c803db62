//! Nested-Set Invariant Checker
//!
//! Read-only validation of a snapshot of the interval table. Used by tests and
//! by `NestedSetEngine::verify`; never called on the mutation path and never
//! repairs anything.
//!
//! A well-formed collection of `n` nodes has:
//!
//! 1. `left < right` for every node
//! 2. no bound value shared by two nodes
//! 3. exactly one root (`left == 1`) containing every other node
//! 4. intervals that are disjoint or strictly nested
//! 5. `right - left + 1 == 2 * subtree_size` for every node
//!
//! Together these make the bound set exactly `1..=2n`: the root spans `2n`
//! values starting at 1 and holds every other bound.

use crate::models::Node;
use std::collections::HashMap;
use thiserror::Error;

/// The first invariant violation found in a snapshot
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("Node {id} has an empty interval [{left}, {right}]")]
    EmptyInterval { id: i64, left: i64, right: i64 },

    #[error("Bound {value} is shared by nodes {first} and {second}")]
    DuplicateBound { value: i64, first: i64, second: i64 },

    #[error("Expected exactly one root, found {count}")]
    RootCount { count: usize },

    #[error("Nodes {outer} and {inner} partially overlap")]
    PartialOverlap { outer: i64, inner: i64 },

    #[error("Node {id} lies outside the root interval")]
    DetachedNode { id: i64 },

    #[error("Node {id} has width {width} but its subtree needs {expected}")]
    WidthMismatch { id: i64, width: i64, expected: i64 },
}

/// Check every nested-set invariant over `nodes` (in any order)
///
/// An empty slice is valid.
pub fn check_invariants(nodes: &[Node]) -> Result<(), InvariantViolation> {
    if nodes.is_empty() {
        return Ok(());
    }

    let mut owners: HashMap<i64, i64> = HashMap::with_capacity(nodes.len() * 2);
    for node in nodes {
        if node.left >= node.right {
            return Err(InvariantViolation::EmptyInterval {
                id: node.id,
                left: node.left,
                right: node.right,
            });
        }
        for value in [node.left, node.right] {
            if let Some(&first) = owners.get(&value) {
                return Err(InvariantViolation::DuplicateBound {
                    value,
                    first,
                    second: node.id,
                });
            }
            owners.insert(value, node.id);
        }
    }

    let roots: Vec<&Node> = nodes.iter().filter(|n| n.is_root()).collect();
    let root = match roots.as_slice() {
        [root] => *root,
        _ => return Err(InvariantViolation::RootCount { count: roots.len() }),
    };

    let mut sorted: Vec<&Node> = nodes.iter().collect();
    sorted.sort_by_key(|n| n.left);

    // Open intervals, innermost last
    let mut open: Vec<&Node> = Vec::new();
    for &node in &sorted {
        while open.last().is_some_and(|top| top.right < node.left) {
            open.pop();
        }
        if let Some(top) = open.last() {
            if node.right > top.right {
                return Err(InvariantViolation::PartialOverlap {
                    outer: top.id,
                    inner: node.id,
                });
            }
        }
        open.push(node);
    }

    if let Some(stray) = sorted.iter().find(|n| n.id != root.id && !root.contains(n)) {
        return Err(InvariantViolation::DetachedNode { id: stray.id });
    }

    let lefts: Vec<i64> = sorted.iter().map(|n| n.left).collect();
    for &node in &sorted {
        let first = lefts.partition_point(|&l| l <= node.left);
        let end = lefts.partition_point(|&l| l < node.right);
        let expected = 2 * (end - first + 1) as i64;
        if node.width() != expected {
            return Err(InvariantViolation::WidthMismatch {
                id: node.id,
                width: node.width(),
                expected,
            });
        }
    }

    Ok(())
}
