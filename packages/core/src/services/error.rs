//! Service Layer Error Types
//!
//! This module defines error types for nested-set operations, providing
//! detailed error handling for business logic failures.

use crate::db::DatabaseError;
use crate::services::invariants::InvariantViolation;
use thiserror::Error;

/// Coarse classification of a [`NestedSetError`]
///
/// Boundaries map this to their own status codes instead of matching every
/// variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced node (or the root) does not exist
    NotFound,
    /// The request is well-formed but would break the tree
    Conflict,
    /// The request itself is malformed
    Validation,
    /// The store failed or holds inconsistent data
    Storage,
}

/// Nested-set operation errors
///
/// Every error is detected before any relabeling is issued, or causes the
/// surrounding unit of work to be rolled back.
#[derive(Error, Debug)]
pub enum NestedSetError {
    /// Node not found by ID
    #[error("Node not found: {id}")]
    NodeNotFound { id: i64 },

    /// The collection has no node with `left == 1`
    #[error("Root node not found")]
    RootNotFound,

    /// Insert under a parent that does not exist
    #[error("Invalid parent node: {parent_id}")]
    InvalidParent { parent_id: i64 },

    /// Root insert on a non-empty collection
    #[error("Root node already exists")]
    RootAlreadyExists,

    /// Move target lies inside the moving subtree
    #[error("Cannot move node {node_id} under itself or its descendant {new_parent_id}")]
    CircularMove { node_id: i64, new_parent_id: i64 },

    /// Promoting the children of this node would leave more than one root
    #[error("Cannot promote children of root node {node_id}: it has more than one child")]
    MultipleRoots { node_id: i64 },

    /// Input validation failed
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Store operation failed
    #[error("Database operation failed: {0}")]
    Storage(#[from] DatabaseError),

    /// The stored intervals do not form a valid nested set
    #[error("Integrity check failed: {0}")]
    IntegrityViolation(#[from] InvariantViolation),
}

impl NestedSetError {
    /// Create a node not found error
    pub fn node_not_found(id: i64) -> Self {
        Self::NodeNotFound { id }
    }

    /// Create an invalid parent error
    pub fn invalid_parent(parent_id: i64) -> Self {
        Self::InvalidParent { parent_id }
    }

    /// Create a circular move error
    pub fn circular_move(node_id: i64, new_parent_id: i64) -> Self {
        Self::CircularMove {
            node_id,
            new_parent_id,
        }
    }

    /// Create a multiple roots error
    pub fn multiple_roots(node_id: i64) -> Self {
        Self::MultipleRoots { node_id }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NodeNotFound { .. } | Self::RootNotFound | Self::InvalidParent { .. } => {
                ErrorKind::NotFound
            }
            Self::RootAlreadyExists | Self::CircularMove { .. } | Self::MultipleRoots { .. } => {
                ErrorKind::Conflict
            }
            Self::Validation(_) => ErrorKind::Validation,
            Self::Storage(_) | Self::IntegrityViolation(_) => ErrorKind::Storage,
        }
    }
}
