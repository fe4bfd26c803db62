//! Data Models
//!
//! This module contains the data structures shared by the store, the engine
//! and the HTTP boundary:
//!
//! - `Node` - One row of the interval table
//! - `TreeNode` - A node with its ordered children, produced for reads
//! - `DeleteResult` - Outcome of a subtree deletion

mod node;

pub use node::{DeleteResult, Node, TreeNode};
