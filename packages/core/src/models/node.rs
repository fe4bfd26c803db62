//! Node Data Structures
//!
//! This module defines the flat `Node` row stored in the interval table and the
//! nested `TreeNode` shape produced when the table is materialized for reads.
//!
//! # Architecture
//!
//! - **Interval encoding**: every node owns the closed range `[left, right]`
//! - **Containment = ancestry**: a node's range strictly contains the ranges of
//!   all of its descendants
//! - **Dense bounds**: a collection of `n` nodes uses exactly the bounds `1..=2n`
//!
//! # Examples
//!
//! ```rust
//! use nestedset_core::models::Node;
//!
//! let root = Node::new(1, "Root", 1, 6);
//! let child = Node::new(2, "Child", 2, 3);
//!
//! assert!(root.contains(&child));
//! assert_eq!(root.subtree_size(), 3);
//! ```

use serde::{Deserialize, Serialize};

/// A single row of the interval table.
///
/// # Fields
///
/// - `id`: Store-assigned identifier, never reused or mutated
/// - `name`: Display label (the only user-mutable field)
/// - `left` / `right`: Interval bounds, `left < right`
///
/// Only the nested-set engine writes `left` and `right`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique identifier assigned by the store on insert
    pub id: i64,

    /// Display label
    pub name: String,

    /// Left interval bound
    pub left: i64,

    /// Right interval bound
    pub right: i64,
}

impl Node {
    /// Create a node row from its parts
    pub fn new(id: i64, name: impl Into<String>, left: i64, right: i64) -> Self {
        Self {
            id,
            name: name.into(),
            left,
            right,
        }
    }

    /// Interval width, `right - left + 1`
    pub fn width(&self) -> i64 {
        self.right - self.left + 1
    }

    /// Number of nodes in this node's subtree (itself included)
    ///
    /// Every node consumes two units of the integer line, so this is half the
    /// width on a well-formed table.
    pub fn subtree_size(&self) -> i64 {
        self.width() / 2
    }

    /// Whether this node is the tree root (`left == 1`)
    pub fn is_root(&self) -> bool {
        self.left == 1
    }

    /// Whether `other` lies strictly inside this node's interval
    pub fn contains(&self, other: &Node) -> bool {
        self.left < other.left && other.right < self.right
    }

    /// Whether this node has no descendants
    pub fn is_leaf(&self) -> bool {
        self.right == self.left + 1
    }
}

/// A node together with its ordered children, as returned by read APIs.
///
/// Children are ordered by ascending `left`, which is insertion order.
///
/// ```rust
/// # use nestedset_core::models::TreeNode;
/// let tree = TreeNode {
///     id: 1,
///     name: "A".to_string(),
///     children: vec![TreeNode::leaf(2, "B")],
/// };
/// assert_eq!(tree.size(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: i64,
    pub name: String,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create a childless tree node
    pub fn leaf(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Total number of nodes in this tree (itself included)
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TreeNode::size).sum::<usize>()
    }

    /// Depth-first search for a node by id
    pub fn find(&self, id: i64) -> Option<&TreeNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Names of the direct children, in order
    pub fn child_names(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Result of a subtree deletion
///
/// # Examples
///
/// ```rust
/// # use nestedset_core::models::DeleteResult;
/// let result = DeleteResult { removed: 3 };
/// assert_eq!(result.removed, 3);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteResult {
    /// Number of rows removed (the node plus its descendants)
    pub removed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_and_subtree_size() {
        let root = Node::new(1, "A", 1, 8);
        assert_eq!(root.width(), 8);
        assert_eq!(root.subtree_size(), 4);
        assert!(root.is_root());
        assert!(!root.is_leaf());

        let leaf = Node::new(2, "B", 2, 3);
        assert!(leaf.is_leaf());
        assert_eq!(leaf.subtree_size(), 1);
        assert!(!leaf.is_root());
    }

    #[test]
    fn test_contains_is_strict() {
        let a = Node::new(1, "A", 1, 6);
        let b = Node::new(2, "B", 2, 3);
        let c = Node::new(3, "C", 4, 5);

        assert!(a.contains(&b));
        assert!(a.contains(&c));
        assert!(!b.contains(&c));
        assert!(!a.contains(&a));
    }

    #[test]
    fn test_node_serializes_camel_case() {
        let node = Node::new(7, "Leaf", 4, 5);
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["name"], "Leaf");
        assert_eq!(json["left"], 4);
        assert_eq!(json["right"], 5);
    }

    #[test]
    fn test_tree_node_find_and_size() {
        let tree = TreeNode {
            id: 1,
            name: "A".to_string(),
            children: vec![
                TreeNode::leaf(2, "B"),
                TreeNode {
                    id: 3,
                    name: "C".to_string(),
                    children: vec![TreeNode::leaf(4, "D")],
                },
            ],
        };

        assert_eq!(tree.size(), 4);
        assert_eq!(tree.find(4).map(|n| n.name.as_str()), Some("D"));
        assert!(tree.find(99).is_none());
        assert_eq!(tree.child_names(), vec!["B", "C"]);
    }
}
