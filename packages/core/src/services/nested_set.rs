//! Nested-Set Engine - Structural Mutations over the Interval Table
//!
//! This module provides the business logic for every tree mutation:
//!
//! - Insert (root, or last child of an existing node)
//! - Rename
//! - Delete a whole subtree
//! - Delete one node and promote its children
//! - Move a subtree under a new parent
//!
//! # Units of Work
//!
//! Each operation opens exactly one read-write unit of work on the store,
//! reads the rows it needs, validates the request against that snapshot and
//! hands the store one list of shifts computed from it (see `relabel`). The
//! unit of work is committed on success and rolled back on every error, so a
//! failed call leaves no partial state behind.
//!
//! Domain events are broadcast only after a successful commit.

use crate::db::{DomainEvent, IntervalStore, IntervalTransaction, Span};
use crate::models::{DeleteResult, Node};
use crate::services::error::NestedSetError;
use crate::services::invariants::check_invariants;
use crate::services::relabel;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Domain event channel capacity
const DOMAIN_EVENT_CHANNEL_CAPACITY: usize = 128;

/// Reject names that are empty or only whitespace
pub fn validate_name(name: &str) -> Result<(), NestedSetError> {
    if name.trim().is_empty() {
        return Err(NestedSetError::validation("Node name must not be empty"));
    }
    Ok(())
}

/// Nested-set engine over any [`IntervalStore`]
///
/// Cheap to clone: clones share the store and the event channel.
///
/// # Examples
///
/// ```rust,no_run
/// use nestedset_core::db::MemoryStore;
/// use nestedset_core::services::NestedSetEngine;
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let engine = NestedSetEngine::new(Arc::new(MemoryStore::new()));
///
/// let a = engine.insert(None, "A").await?;
/// let b = engine.insert(Some(a), "B").await?;
/// let c = engine.insert(Some(a), "C").await?;
///
/// engine.move_subtree(c, b).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct NestedSetEngine {
    store: Arc<dyn IntervalStore>,

    /// Broadcast channel for domain events (buffers up to 128 events)
    event_tx: broadcast::Sender<DomainEvent>,
}

impl NestedSetEngine {
    pub fn new(store: Arc<dyn IntervalStore>) -> Self {
        let (event_tx, _) = broadcast::channel(DOMAIN_EVENT_CHANNEL_CAPACITY);
        Self { store, event_tx }
    }

    /// Get access to the underlying store
    pub fn store(&self) -> &Arc<dyn IntervalStore> {
        &self.store
    }

    /// Subscribe to domain events
    ///
    /// Returns a broadcast receiver that receives an event for every committed
    /// mutation.
    pub fn subscribe_to_events(&self) -> broadcast::Receiver<DomainEvent> {
        self.event_tx.subscribe()
    }

    /// Emit a domain event to all subscribers
    ///
    /// Ignores errors if no subscribers (expected in some tests).
    fn emit_event(&self, event: DomainEvent) {
        let _ = self.event_tx.send(event);
    }

    /// Commit on success, roll back on error
    async fn finish<T>(
        &self,
        tx: Box<dyn IntervalTransaction>,
        operation: &str,
        result: Result<T, NestedSetError>,
    ) -> Result<T, NestedSetError> {
        match result {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!("Failed to roll back {}: {}", operation, rollback_err);
                }
                Err(e)
            }
        }
    }

    /// Insert a node
    ///
    /// With `parent_id == None` the node becomes the root of an empty
    /// collection. Otherwise it becomes the last child of `parent_id`.
    ///
    /// # Errors
    ///
    /// - `Validation` if `name` is blank
    /// - `RootAlreadyExists` for a root insert on a non-empty collection
    /// - `InvalidParent` if `parent_id` does not exist
    pub async fn insert(&self, parent_id: Option<i64>, name: &str) -> Result<i64, NestedSetError> {
        validate_name(name)?;

        let mut tx = self.store.begin().await?;
        let result = insert_in(tx.as_mut(), parent_id, name).await;
        let node = self.finish(tx, "insert", result).await?;

        tracing::info!(
            "Inserted node {} at [{}, {}] under {:?}",
            node.id,
            node.left,
            node.right,
            parent_id
        );
        let id = node.id;
        self.emit_event(DomainEvent::NodeCreated { node, parent_id });
        Ok(id)
    }

    /// Change the name of a node; bounds are untouched
    pub async fn rename(&self, id: i64, name: &str) -> Result<(), NestedSetError> {
        validate_name(name)?;

        let mut tx = self.store.begin().await?;
        let result = match tx.rename(id, name).await {
            Ok(0) => Err(NestedSetError::node_not_found(id)),
            Ok(_) => Ok(()),
            Err(e) => Err(e.into()),
        };
        self.finish(tx, "rename", result).await?;

        tracing::info!("Renamed node {}", id);
        self.emit_event(DomainEvent::NodeRenamed {
            id,
            name: name.to_string(),
        });
        Ok(())
    }

    /// Delete a node together with all of its descendants
    ///
    /// Bounds after the removed subtree slide left by its width, so the
    /// remaining labeling stays dense.
    pub async fn delete_subtree(&self, id: i64) -> Result<DeleteResult, NestedSetError> {
        let mut tx = self.store.begin().await?;
        let result = delete_subtree_in(tx.as_mut(), id).await;
        let deleted = self.finish(tx, "delete_subtree", result).await?;

        tracing::info!("Deleted subtree {} ({} nodes)", id, deleted.removed);
        self.emit_event(DomainEvent::SubtreeDeleted {
            id,
            removed: deleted.removed,
        });
        Ok(deleted)
    }

    /// Delete one node and splice its children into its parent
    ///
    /// The children keep their relative order and take the removed node's
    /// place among its siblings.
    ///
    /// # Errors
    ///
    /// - `NodeNotFound` if `id` does not exist
    /// - `MultipleRoots` if `id` is the root and has more than one child
    pub async fn delete_and_promote(&self, id: i64) -> Result<(), NestedSetError> {
        let mut tx = self.store.begin().await?;
        let result = delete_and_promote_in(tx.as_mut(), id).await;
        self.finish(tx, "delete_and_promote", result).await?;

        tracing::info!("Deleted node {} and promoted its children", id);
        self.emit_event(DomainEvent::NodePromoted { id });
        Ok(())
    }

    /// Move a subtree so it becomes the last child of `new_parent_id`
    ///
    /// Moving a node under its current parent re-appends it as the last child.
    ///
    /// # Errors
    ///
    /// - `NodeNotFound` if either node does not exist
    /// - `CircularMove` if `new_parent_id` is the node itself or one of its
    ///   descendants
    pub async fn move_subtree(&self, id: i64, new_parent_id: i64) -> Result<(), NestedSetError> {
        let mut tx = self.store.begin().await?;
        let result = move_subtree_in(tx.as_mut(), id, new_parent_id).await;
        self.finish(tx, "move_subtree", result).await?;

        tracing::info!("Moved subtree {} under {}", id, new_parent_id);
        self.emit_event(DomainEvent::SubtreeMoved { id, new_parent_id });
        Ok(())
    }

    /// Fetch one node by id
    pub async fn get_node(&self, id: i64) -> Result<Node, NestedSetError> {
        let mut tx = self.store.begin_read().await?;
        let node = tx.get_by_id(id).await?;
        tx.rollback().await?;
        node.ok_or_else(|| NestedSetError::node_not_found(id))
    }

    /// Fetch the root node
    pub async fn get_root(&self) -> Result<Node, NestedSetError> {
        let mut tx = self.store.begin_read().await?;
        let root = tx.get_root().await?;
        tx.rollback().await?;
        root.ok_or(NestedSetError::RootNotFound)
    }

    /// Check every nested-set invariant over a consistent snapshot
    ///
    /// Read-only: a violation is reported, never repaired.
    pub async fn verify(&self) -> Result<(), NestedSetError> {
        let mut tx = self.store.begin_read().await?;
        let nodes = tx.range_query(Span::all()).await?;
        tx.rollback().await?;
        check_invariants(&nodes)?;
        Ok(())
    }
}

async fn insert_in(
    tx: &mut dyn IntervalTransaction,
    parent_id: Option<i64>,
    name: &str,
) -> Result<Node, NestedSetError> {
    let Some(parent_id) = parent_id else {
        if tx.count().await? > 0 {
            return Err(NestedSetError::RootAlreadyExists);
        }
        let id = tx.insert(name, 1, 2).await?;
        return Ok(Node::new(id, name, 1, 2));
    };

    let parent = tx
        .get_by_id(parent_id)
        .await?
        .ok_or_else(|| NestedSetError::invalid_parent(parent_id))?;

    let shifts = relabel::insert_gap(&parent);
    let touched = tx.apply_shifts(&shifts).await?;
    tracing::debug!("Opened gap at {} ({} rows relabeled)", parent.right, touched);

    let (left, right) = relabel::appended_child(&parent);
    let id = tx.insert(name, left, right).await?;
    Ok(Node::new(id, name, left, right))
}

async fn delete_subtree_in(
    tx: &mut dyn IntervalTransaction,
    id: i64,
) -> Result<DeleteResult, NestedSetError> {
    let node = tx
        .get_by_id(id)
        .await?
        .ok_or_else(|| NestedSetError::node_not_found(id))?;

    let removed = tx.delete_range(Span::new(node.left, node.right)).await?;
    let touched = tx.apply_shifts(&relabel::close_subtree_gap(&node)).await?;
    tracing::debug!(
        "Removed {} rows of subtree {}, {} rows relabeled",
        removed,
        id,
        touched
    );

    Ok(DeleteResult { removed })
}

async fn delete_and_promote_in(
    tx: &mut dyn IntervalTransaction,
    id: i64,
) -> Result<(), NestedSetError> {
    let node = tx
        .get_by_id(id)
        .await?
        .ok_or_else(|| NestedSetError::node_not_found(id))?;

    // The root may only be promoted away when at most one child takes its place
    if node.is_root() && !node.is_leaf() {
        let first_child = tx
            .range_query(Span::new(node.left + 1, node.left + 1))
            .await?;
        let single_child = first_child.first().is_some_and(|c| c.right == node.right - 1);
        if !single_child {
            return Err(NestedSetError::multiple_roots(id));
        }
    }

    tx.delete_range(Span::new(node.left, node.left)).await?;
    let touched = tx.apply_shifts(&relabel::promote_children(&node)).await?;
    tracing::debug!("Promoted children of {}, {} rows relabeled", id, touched);

    Ok(())
}

async fn move_subtree_in(
    tx: &mut dyn IntervalTransaction,
    id: i64,
    new_parent_id: i64,
) -> Result<(), NestedSetError> {
    let origin = tx
        .get_by_id(id)
        .await?
        .ok_or_else(|| NestedSetError::node_not_found(id))?;
    let new_parent = tx
        .get_by_id(new_parent_id)
        .await?
        .ok_or_else(|| NestedSetError::node_not_found(new_parent_id))?;

    if new_parent.left >= origin.left && new_parent.right <= origin.right {
        return Err(NestedSetError::circular_move(id, new_parent_id));
    }

    let shifts = relabel::move_subtree(&origin, &new_parent);
    if shifts.is_empty() {
        tracing::debug!("Node {} is already the last child of {}", id, new_parent_id);
        return Ok(());
    }

    let touched = tx.apply_shifts(&shifts).await?;
    tracing::debug!(
        "Moved [{}, {}] to end at {}, {} rows relabeled",
        origin.left,
        origin.right,
        new_parent.right,
        touched
    );

    Ok(())
}
