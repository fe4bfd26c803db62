//! Business Services
//!
//! This module contains the core nested-set logic:
//!
//! - `NestedSetEngine` - Insert, rename, delete, promote and move
//! - `TreeBuilder` - Materialize children-array trees from interval rows
//! - `relabel` - Pure shift plans for every structural mutation
//! - `invariants` - Read-only nested-set integrity checker
//!
//! Services coordinate between the store layer and callers such as the HTTP
//! server, and own every write to the `left`/`right` bounds.

pub mod error;
pub mod invariants;
pub mod nested_set;
pub mod relabel;
pub mod tree_builder;

pub use error::{ErrorKind, NestedSetError};
pub use invariants::{check_invariants, InvariantViolation};
pub use nested_set::{validate_name, NestedSetEngine};
pub use tree_builder::{assemble, TreeBuilder};
