//! Nested-Set Tree Core
//!
//! This crate maintains a single rooted tree inside a flat table of
//! `(id, name, left, right)` rows using the nested-set (interval) encoding.
//!
//! # Architecture
//!
//! - **Interval encoding**: a node's interval strictly contains the intervals
//!   of all of its descendants; siblings never overlap
//! - **Snapshot relabeling**: every structural mutation is a list of additive
//!   shifts evaluated against one pre-mutation snapshot
//! - **libsql/Turso**: embedded SQLite-compatible storage, one transaction per
//!   mutation
//!
//! # Modules
//!
//! - [`models`] - Data structures (Node, TreeNode, DeleteResult)
//! - [`db`] - Store contract, libsql and in-memory backends, domain events
//! - [`services`] - NestedSetEngine, TreeBuilder, invariant checker, errors

pub mod db;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use models::*;
pub use services::*;
