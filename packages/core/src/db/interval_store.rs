//! IntervalStore Trait - Storage Abstraction for the Nested-Set Engine
//!
//! This module defines the contract between the nested-set engine and the
//! record store holding the interval table. The engine never talks SQL (or
//! any other storage dialect) directly; it opens a unit of work, reads the
//! rows it needs, and hands the store a list of [`Shift`]s to apply.
//!
//! # Architecture
//!
//! - **Abstraction Point**: Between `NestedSetEngine` (interval arithmetic) and
//!   the storage backend (`TursoStore`, `MemoryStore`)
//! - **Unit of Work**: Every engine operation runs inside exactly one
//!   [`IntervalTransaction`], committed or rolled back as a whole
//! - **Snapshot Relabeling**: All shifts passed to one `apply_shifts` call are
//!   evaluated against the bounds as they were *before* the call, so a row that
//!   one shift moves is never re-matched by another
//!
//! # Examples
//!
//! ```rust,no_run
//! use nestedset_core::db::{IntervalStore, MemoryStore, Shift, Span};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), nestedset_core::db::DatabaseError> {
//! let store = MemoryStore::new();
//! let mut tx = store.begin().await?;
//! let root_id = tx.insert("Root", 1, 2).await?;
//! tx.apply_shifts(&[Shift::right(Span::at_least(2), 2)]).await?;
//! tx.commit().await?;
//! # let _ = root_id;
//! # Ok(())
//! # }
//! ```

use crate::db::error::DatabaseError;
use crate::models::Node;
use async_trait::async_trait;

/// Which bound column a [`Shift`] targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bound {
    Left,
    Right,
}

impl Bound {
    /// Column name used by SQL backends (`left`/`right` are reserved words)
    pub fn column(self) -> &'static str {
        match self {
            Bound::Left => "lft",
            Bound::Right => "rgt",
        }
    }

    /// Read this bound from a node
    pub fn of(self, node: &Node) -> i64 {
        match self {
            Bound::Left => node.left,
            Bound::Right => node.right,
        }
    }
}

/// Inclusive range of bound values, `from..=to`
///
/// A span with `from > to` is empty and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub from: i64,
    pub to: i64,
}

impl Span {
    pub fn new(from: i64, to: i64) -> Self {
        Self { from, to }
    }

    /// Every value greater than or equal to `from`
    pub fn at_least(from: i64) -> Self {
        Self { from, to: i64::MAX }
    }

    /// The whole integer line
    pub fn all() -> Self {
        Self {
            from: i64::MIN,
            to: i64::MAX,
        }
    }

    pub fn contains(&self, value: i64) -> bool {
        self.from <= value && value <= self.to
    }

    pub fn is_empty(&self) -> bool {
        self.from > self.to
    }
}

/// Additive relabeling of one bound column over a span of pre-mutation values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shift {
    pub bound: Bound,
    pub span: Span,
    pub delta: i64,
}

impl Shift {
    pub fn new(bound: Bound, span: Span, delta: i64) -> Self {
        Self { bound, span, delta }
    }

    /// Shift `left` values inside `span` by `delta`
    pub fn left(span: Span, delta: i64) -> Self {
        Self::new(Bound::Left, span, delta)
    }

    /// Shift `right` values inside `span` by `delta`
    pub fn right(span: Span, delta: i64) -> Self {
        Self::new(Bound::Right, span, delta)
    }

    /// Whether applying this shift can change anything
    pub fn is_noop(&self) -> bool {
        self.delta == 0 || self.span.is_empty()
    }
}

/// New value of one bound after applying `shifts`, all matched against `value`
///
/// Deltas of every matching shift are summed. Backends must produce exactly
/// this result for every row, whatever their execution strategy.
pub fn shifted(value: i64, bound: Bound, shifts: &[Shift]) -> i64 {
    value
        + shifts
            .iter()
            .filter(|s| s.bound == bound && s.span.contains(value))
            .map(|s| s.delta)
            .sum::<i64>()
}

/// Factory for units of work over an interval table
///
/// Implementations must be `Send + Sync` so one store can be shared by every
/// request handler through an `Arc<dyn IntervalStore>`.
#[async_trait]
pub trait IntervalStore: Send + Sync {
    /// Open a read-write unit of work
    ///
    /// Concurrent read-write units of work on the same store must not
    /// interleave: each one observes either all or none of another's writes.
    async fn begin(&self) -> Result<Box<dyn IntervalTransaction>, DatabaseError>;

    /// Open a read-only unit of work over a consistent snapshot
    ///
    /// Writes issued through a read unit of work are never published.
    async fn begin_read(&self) -> Result<Box<dyn IntervalTransaction>, DatabaseError>;
}

/// One atomic unit of work over the interval table
///
/// Dropping a transaction without calling [`commit`](Self::commit) discards
/// every change made through it.
#[async_trait]
pub trait IntervalTransaction: Send {
    /// Point lookup by id
    async fn get_by_id(&mut self, id: i64) -> Result<Option<Node>, DatabaseError>;

    /// The unique node with `left == 1`, if any
    async fn get_root(&mut self) -> Result<Option<Node>, DatabaseError>;

    /// Every node whose `left` lies in `span`, ordered by `left`
    async fn range_query(&mut self, span: Span) -> Result<Vec<Node>, DatabaseError>;

    /// Number of nodes in the table
    async fn count(&mut self) -> Result<u64, DatabaseError>;

    /// Insert a new row and return its assigned id
    async fn insert(&mut self, name: &str, left: i64, right: i64) -> Result<i64, DatabaseError>;

    /// Update the name of one row, returning the number of rows changed
    async fn rename(&mut self, id: i64, name: &str) -> Result<u64, DatabaseError>;

    /// Apply every shift against the same pre-call snapshot of bounds
    ///
    /// Returns the number of rows touched.
    async fn apply_shifts(&mut self, shifts: &[Shift]) -> Result<u64, DatabaseError>;

    /// Delete every node whose `left` lies in `span`
    async fn delete_range(&mut self, span: Span) -> Result<u64, DatabaseError>;

    /// Publish every change made through this unit of work
    async fn commit(self: Box<Self>) -> Result<(), DatabaseError>;

    /// Discard every change made through this unit of work
    async fn rollback(self: Box<Self>) -> Result<(), DatabaseError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_bounds() {
        let span = Span::new(3, 5);
        assert!(span.contains(3));
        assert!(span.contains(5));
        assert!(!span.contains(6));
        assert!(!span.is_empty());

        assert!(Span::new(4, 3).is_empty());
        assert!(Span::at_least(10).contains(i64::MAX));
        assert!(Span::all().contains(i64::MIN));
    }

    #[test]
    fn test_shifted_sums_matching_deltas() {
        let shifts = [
            Shift::left(Span::new(2, 4), 2),
            Shift::right(Span::new(2, 4), -1),
            Shift::left(Span::at_least(4), 10),
        ];

        assert_eq!(shifted(1, Bound::Left, &shifts), 1);
        assert_eq!(shifted(2, Bound::Left, &shifts), 4);
        assert_eq!(shifted(4, Bound::Left, &shifts), 16);
        assert_eq!(shifted(3, Bound::Right, &shifts), 2);
        assert_eq!(shifted(9, Bound::Right, &shifts), 9);
    }

    #[test]
    fn test_shifted_matches_pre_call_value_only() {
        // A value moved into the second span by the first shift must not be
        // matched again.
        let shifts = [
            Shift::right(Span::new(5, 5), 3),
            Shift::right(Span::new(8, 8), 100),
        ];
        assert_eq!(shifted(5, Bound::Right, &shifts), 8);
    }

    #[test]
    fn test_noop_detection() {
        assert!(Shift::left(Span::new(1, 9), 0).is_noop());
        assert!(Shift::left(Span::new(9, 1), 4).is_noop());
        assert!(!Shift::right(Span::at_least(1), 2).is_noop());
    }

    #[test]
    fn test_bound_columns() {
        let node = Node::new(1, "A", 1, 4);
        assert_eq!(Bound::Left.column(), "lft");
        assert_eq!(Bound::Right.column(), "rgt");
        assert_eq!(Bound::Left.of(&node), 1);
        assert_eq!(Bound::Right.of(&node), 4);
    }
}
