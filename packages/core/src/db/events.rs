//! Domain Events for the Interval Table
//!
//! This module defines the domain events emitted by `NestedSetEngine` after a
//! mutation has been committed. Events follow the observer pattern so other
//! parts of the system (the HTTP layer, audit logging) can react to tree
//! changes without coupling to the engine.
//!
//! # Architecture
//!
//! Events are emitted using tokio's broadcast channel, allowing multiple
//! subscribers to receive notifications asynchronously.
//!
//! # Event Flow
//!
//! 1. The engine commits a unit of work
//! 2. A domain event is emitted via the broadcast channel
//! 3. All subscribers receive the event asynchronously
//!
//! Nothing is emitted for a rolled-back unit of work.

use crate::models::Node;
use serde::{Deserialize, Serialize};

/// Domain events emitted by the nested-set engine
///
/// These represent tree-level changes, not individual row updates: a single
/// `SubtreeMoved` stands for every relabeled row of that move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DomainEvent {
    /// A node was inserted (as root, or as the last child of `parent_id`)
    #[serde(rename = "node:created", rename_all = "camelCase")]
    NodeCreated { node: Node, parent_id: Option<i64> },

    /// A node's name changed
    #[serde(rename = "node:renamed", rename_all = "camelCase")]
    NodeRenamed { id: i64, name: String },

    /// A node and all of its descendants were removed
    #[serde(rename = "subtree:deleted", rename_all = "camelCase")]
    SubtreeDeleted { id: i64, removed: u64 },

    /// A node was removed and its children moved up one level
    #[serde(rename = "node:promoted", rename_all = "camelCase")]
    NodePromoted { id: i64 },

    /// A subtree became the last child of `new_parent_id`
    #[serde(rename = "subtree:moved", rename_all = "camelCase")]
    SubtreeMoved { id: i64, new_parent_id: i64 },
}

impl DomainEvent {
    /// Get a string representation of the event type
    pub fn event_type(&self) -> &str {
        match self {
            DomainEvent::NodeCreated { .. } => "node:created",
            DomainEvent::NodeRenamed { .. } => "node:renamed",
            DomainEvent::SubtreeDeleted { .. } => "subtree:deleted",
            DomainEvent::NodePromoted { .. } => "node:promoted",
            DomainEvent::SubtreeMoved { .. } => "subtree:moved",
        }
    }
}
