//! Database Layer
//!
//! This module handles all interval-table storage:
//!
//! - Database initialization and connection management (libsql)
//! - The `IntervalStore` contract the nested-set engine is written against
//! - A libsql-backed store and an in-memory store
//! - Domain events emitted after committed mutations
//!
//! # Architecture
//!
//! The engine only ever sees `IntervalStore`/`IntervalTransaction`. Each
//! backend decides how to make a unit of work atomic:
//!
//! - `TursoStore`: one connection and one `BEGIN IMMEDIATE` transaction per
//!   unit of work, relabeling in a single `UPDATE` statement
//! - `MemoryStore`: a mutex-guarded table edited through a private copy

mod database;
mod error;
pub mod events;
mod interval_store;
mod memory_store;
mod turso_store;

pub use database::DatabaseService;
pub use error::DatabaseError;
pub use events::DomainEvent;
pub use interval_store::{shifted, Bound, IntervalStore, IntervalTransaction, Shift, Span};
pub use memory_store::{MemoryStore, MemoryTransaction};
pub use turso_store::{TursoStore, TursoTransaction};
