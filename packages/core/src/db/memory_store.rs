//! In-memory IntervalStore
//!
//! Keeps the interval table in a `BTreeMap` behind a `tokio::sync::Mutex`.
//! A read-write unit of work holds the lock for its whole lifetime and edits a
//! private copy of the table, which replaces the shared one only on commit.
//! Read units of work copy the table and release the lock immediately.
//!
//! Used by tests and by deployments that do not need persistence.

use crate::db::error::DatabaseError;
use crate::db::interval_store::{shifted, Bound, IntervalStore, IntervalTransaction, Shift, Span};
use crate::models::Node;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Clone, Default)]
struct Table {
    rows: BTreeMap<i64, Node>,
    next_id: i64,
}

impl Table {
    fn sorted_by_left(&self, span: Span) -> Vec<Node> {
        let mut nodes: Vec<Node> = self
            .rows
            .values()
            .filter(|n| span.contains(n.left))
            .cloned()
            .collect();
        nodes.sort_by_key(|n| n.left);
        nodes
    }
}

/// Interval table held in process memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    table: Arc<Mutex<Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with pre-built rows (ids are kept as given)
    pub fn with_nodes(nodes: Vec<Node>) -> Self {
        let next_id = nodes.iter().map(|n| n.id).max().unwrap_or(0);
        let rows = nodes.into_iter().map(|n| (n.id, n)).collect();
        Self {
            table: Arc::new(Mutex::new(Table { rows, next_id })),
        }
    }

    /// Copy of every row, ordered by `left`
    pub async fn snapshot(&self) -> Vec<Node> {
        self.table.lock().await.sorted_by_left(Span::all())
    }
}

#[async_trait]
impl IntervalStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn IntervalTransaction>, DatabaseError> {
        let guard = self.table.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryTransaction {
            guard: Some(guard),
            working,
        }))
    }

    async fn begin_read(&self) -> Result<Box<dyn IntervalTransaction>, DatabaseError> {
        let working = self.table.lock().await.clone();
        Ok(Box::new(MemoryTransaction {
            guard: None,
            working,
        }))
    }
}

/// Unit of work over a private copy of the table
///
/// `guard` is `None` for read units of work, which never publish.
pub struct MemoryTransaction {
    guard: Option<OwnedMutexGuard<Table>>,
    working: Table,
}

#[async_trait]
impl IntervalTransaction for MemoryTransaction {
    async fn get_by_id(&mut self, id: i64) -> Result<Option<Node>, DatabaseError> {
        Ok(self.working.rows.get(&id).cloned())
    }

    async fn get_root(&mut self) -> Result<Option<Node>, DatabaseError> {
        Ok(self.working.rows.values().find(|n| n.left == 1).cloned())
    }

    async fn range_query(&mut self, span: Span) -> Result<Vec<Node>, DatabaseError> {
        Ok(self.working.sorted_by_left(span))
    }

    async fn count(&mut self) -> Result<u64, DatabaseError> {
        Ok(self.working.rows.len() as u64)
    }

    async fn insert(&mut self, name: &str, left: i64, right: i64) -> Result<i64, DatabaseError> {
        if left >= right {
            return Err(DatabaseError::sql_execution(format!(
                "Failed to insert node: empty interval [{}, {}]",
                left, right
            )));
        }
        self.working.next_id += 1;
        let id = self.working.next_id;
        self.working.rows.insert(id, Node::new(id, name, left, right));
        Ok(id)
    }

    async fn rename(&mut self, id: i64, name: &str) -> Result<u64, DatabaseError> {
        match self.working.rows.get_mut(&id) {
            Some(node) => {
                node.name = name.to_string();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn apply_shifts(&mut self, shifts: &[Shift]) -> Result<u64, DatabaseError> {
        let mut touched = 0;
        for node in self.working.rows.values_mut() {
            let left = shifted(node.left, Bound::Left, shifts);
            let right = shifted(node.right, Bound::Right, shifts);
            if left != node.left || right != node.right {
                node.left = left;
                node.right = right;
                touched += 1;
            }
        }
        Ok(touched)
    }

    async fn delete_range(&mut self, span: Span) -> Result<u64, DatabaseError> {
        let before = self.working.rows.len();
        self.working.rows.retain(|_, n| !span.contains(n.left));
        Ok((before - self.working.rows.len()) as u64)
    }

    async fn commit(self: Box<Self>) -> Result<(), DatabaseError> {
        let MemoryTransaction { guard, working } = *self;
        if let Some(mut guard) = guard {
            *guard = working;
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), DatabaseError> {
        Ok(())
    }
}
