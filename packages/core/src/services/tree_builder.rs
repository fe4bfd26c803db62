//! Tree Builder - Materialize Nested Trees from Interval Rows
//!
//! Reconstructs a children-array tree from the flat interval table with a
//! single range fetch followed by an in-memory walk of the integer line.
//!
//! # Walk
//!
//! Starting one past the start node's `left`, the cursor looks for a node whose
//! `left` equals the cursor. On a hit, that node becomes the next child (built
//! recursively) and the cursor jumps to `child.right + 1`, skipping the whole
//! child subtree. On a miss the cursor advances by one. Children therefore come
//! out in ascending `left` order, which is insertion order.
//!
//! # Examples
//!
//! ```rust,no_run
//! use nestedset_core::db::MemoryStore;
//! use nestedset_core::services::{NestedSetEngine, TreeBuilder};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(MemoryStore::new());
//! let engine = NestedSetEngine::new(store.clone());
//! let root = engine.insert(None, "A").await?;
//! engine.insert(Some(root), "B").await?;
//!
//! let tree = TreeBuilder::new(store).build_tree().await?;
//! assert_eq!(tree.child_names(), vec!["B"]);
//! # Ok(())
//! # }
//! ```

use crate::db::{IntervalStore, Span};
use crate::models::{Node, TreeNode};
use crate::services::error::NestedSetError;
use std::collections::HashMap;
use std::sync::Arc;

/// Builds [`TreeNode`] hierarchies over an [`IntervalStore`]
#[derive(Clone)]
pub struct TreeBuilder {
    store: Arc<dyn IntervalStore>,
}

impl TreeBuilder {
    pub fn new(store: Arc<dyn IntervalStore>) -> Self {
        Self { store }
    }

    /// Build the whole tree from the root
    ///
    /// # Errors
    ///
    /// - `RootNotFound` if the collection is empty
    /// - `Storage` if the store fails
    pub async fn build_tree(&self) -> Result<TreeNode, NestedSetError> {
        let mut tx = self.store.begin_read().await?;
        let root = tx.get_root().await?.ok_or(NestedSetError::RootNotFound)?;
        let inside = tx.range_query(inner_span(&root)).await?;
        tx.rollback().await?;

        tracing::debug!("Building tree from root {} over {} nodes", root.id, inside.len() + 1);
        Ok(assemble(&root, &inside))
    }

    /// Build the subtree rooted at `id`
    ///
    /// # Errors
    ///
    /// - `NodeNotFound` if no node has this id
    /// - `Storage` if the store fails
    pub async fn build_subtree(&self, id: i64) -> Result<TreeNode, NestedSetError> {
        let mut tx = self.store.begin_read().await?;
        let start = tx
            .get_by_id(id)
            .await?
            .ok_or_else(|| NestedSetError::node_not_found(id))?;
        let inside = tx.range_query(inner_span(&start)).await?;
        tx.rollback().await?;

        Ok(assemble(&start, &inside))
    }
}

/// Values strictly between a node's bounds
fn inner_span(node: &Node) -> Span {
    Span::new(node.left + 1, node.right - 1)
}

/// Assemble the tree rooted at `start` from the nodes strictly inside it
///
/// `inside` may be in any order. Nodes that are not reachable by the walk
/// (which only happens on a corrupted table) are left out.
pub fn assemble(start: &Node, inside: &[Node]) -> TreeNode {
    let by_left: HashMap<i64, &Node> = inside.iter().map(|n| (n.left, n)).collect();
    walk(start, &by_left)
}

fn walk(node: &Node, by_left: &HashMap<i64, &Node>) -> TreeNode {
    let mut children = Vec::new();
    let mut cursor = node.left + 1;
    while cursor < node.right {
        match by_left.get(&cursor) {
            Some(child) => {
                children.push(walk(child, by_left));
                cursor = child.right + 1;
            }
            None => cursor += 1,
        }
    }

    TreeNode {
        id: node.id,
        name: node.name.clone(),
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    // A -> [B, C -> [D]]
    fn sample() -> Vec<Node> {
        vec![
            Node::new(1, "A", 1, 8),
            Node::new(2, "B", 2, 3),
            Node::new(3, "C", 4, 7),
            Node::new(4, "D", 5, 6),
        ]
    }

    #[test]
    fn test_assemble_orders_children_by_left() {
        let nodes = sample();
        let mut inside = nodes[1..].to_vec();
        inside.reverse();

        let tree = assemble(&nodes[0], &inside);

        assert_eq!(tree.child_names(), vec!["B", "C"]);
        assert_eq!(tree.children[1].child_names(), vec!["D"]);
        assert_eq!(tree.size(), 4);
    }

    #[test]
    fn test_assemble_single_node() {
        let leaf = Node::new(9, "Solo", 1, 2);
        assert_eq!(assemble(&leaf, &[]), TreeNode::leaf(9, "Solo"));
    }

    #[test]
    fn test_tree_node_json_shape() {
        let nodes = sample();
        let tree = assemble(&nodes[2], &nodes[3..]);
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 3,
                "name": "C",
                "children": [{"id": 4, "name": "D", "children": []}]
            })
        );
    }

    #[tokio::test]
    async fn test_build_tree_and_subtree() {
        let builder = TreeBuilder::new(Arc::new(MemoryStore::with_nodes(sample())));

        let tree = builder.build_tree().await.unwrap();
        assert_eq!(tree.name, "A");
        assert_eq!(tree.size(), 4);

        let subtree = builder.build_subtree(3).await.unwrap();
        assert_eq!(subtree.name, "C");
        assert_eq!(subtree.child_names(), vec!["D"]);
    }

    #[tokio::test]
    async fn test_missing_root_and_node() {
        let builder = TreeBuilder::new(Arc::new(MemoryStore::new()));

        assert!(matches!(
            builder.build_tree().await,
            Err(NestedSetError::RootNotFound)
        ));
        assert!(matches!(
            builder.build_subtree(42).await,
            Err(NestedSetError::NodeNotFound { id: 42 })
        ));
    }
}
