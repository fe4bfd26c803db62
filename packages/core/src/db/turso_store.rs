//! TursoStore - IntervalStore Implementation for Turso/libsql Backend
//!
//! This module implements the `IntervalStore` trait for an embedded libsql
//! database managed by [`DatabaseService`].
//!
//! # Design Principles
//!
//! 1. **One connection per unit of work**: a transaction owns its connection,
//!    so dropping it closes the connection and SQLite discards any open
//!    transaction
//! 2. **Writers lock up front**: read-write units of work start with
//!    `BEGIN IMMEDIATE`, so two mutations never compute bounds from the same
//!    stale snapshot
//! 3. **Single-statement relabeling**: `apply_shifts` issues one `UPDATE`
//!    whose `CASE` expressions all read the pre-update row
//!
//! # Examples
//!
//! ```rust,no_run
//! use nestedset_core::db::{DatabaseService, IntervalStore, TursoStore};
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Arc::new(DatabaseService::new(PathBuf::from("./data/tree.db")).await?);
//!     let store: Arc<dyn IntervalStore> = Arc::new(TursoStore::new(db));
//!
//!     let mut tx = store.begin_read().await?;
//!     let root = tx.get_root().await?;
//!     tx.rollback().await?;
//!     # let _ = root;
//!     Ok(())
//! }
//! ```

use crate::db::error::DatabaseError;
use crate::db::interval_store::{Bound, IntervalStore, IntervalTransaction, Shift, Span};
use crate::db::DatabaseService;
use crate::models::Node;
use async_trait::async_trait;
use libsql::{Connection, Row, Value};
use std::sync::Arc;

const SELECT_NODE: &str = "SELECT id, name, lft, rgt FROM nodes";

/// TursoStore implements IntervalStore for the libsql backend
pub struct TursoStore {
    db: Arc<DatabaseService>,
}

impl TursoStore {
    /// Create a new TursoStore wrapper
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use nestedset_core::db::{TursoStore, DatabaseService};
    /// # use std::sync::Arc;
    /// # use std::path::PathBuf;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let db = Arc::new(DatabaseService::new(PathBuf::from("./test.db")).await?);
    /// let store = TursoStore::new(db);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(db: Arc<DatabaseService>) -> Self {
        Self { db }
    }

    /// Get access to the underlying DatabaseService
    pub fn database(&self) -> &Arc<DatabaseService> {
        &self.db
    }

    async fn open(&self, begin: &str) -> Result<Box<dyn IntervalTransaction>, DatabaseError> {
        let conn = self.db.connect_with_timeout().await?;

        conn.execute(begin, ()).await.map_err(|e| {
            DatabaseError::transaction_failed(format!("Failed to begin transaction: {}", e))
        })?;

        Ok(Box::new(TursoTransaction { conn }))
    }
}

#[async_trait]
impl IntervalStore for TursoStore {
    async fn begin(&self) -> Result<Box<dyn IntervalTransaction>, DatabaseError> {
        self.open("BEGIN IMMEDIATE").await
    }

    async fn begin_read(&self) -> Result<Box<dyn IntervalTransaction>, DatabaseError> {
        self.open("BEGIN DEFERRED").await
    }
}

/// Convert libsql::Row to Node model
///
/// Expected columns (in order): id, name, lft, rgt
fn row_to_node(row: &Row) -> Result<Node, DatabaseError> {
    let id: i64 = row
        .get(0)
        .map_err(|e| DatabaseError::sql_execution(format!("Failed to get id: {}", e)))?;
    let name: String = row
        .get(1)
        .map_err(|e| DatabaseError::sql_execution(format!("Failed to get name: {}", e)))?;
    let left: i64 = row
        .get(2)
        .map_err(|e| DatabaseError::sql_execution(format!("Failed to get lft: {}", e)))?;
    let right: i64 = row
        .get(3)
        .map_err(|e| DatabaseError::sql_execution(format!("Failed to get rgt: {}", e)))?;

    Ok(Node {
        id,
        name,
        left,
        right,
    })
}

/// Build the relabeling statement for a list of shifts
///
/// Each bound column becomes `col + (CASE ...) + (CASE ...)`. SQLite evaluates
/// every SET expression against the row as it was before the UPDATE, which is
/// what gives all shifts one shared snapshot.
fn shift_statement(shifts: &[Shift]) -> (String, Vec<Value>) {
    let mut params = Vec::new();
    let mut assignments = Vec::new();

    for bound in [Bound::Left, Bound::Right] {
        let col = bound.column();
        let mut expr = col.to_string();
        for shift in shifts.iter().filter(|s| s.bound == bound) {
            expr.push_str(&format!(
                " + (CASE WHEN {col} BETWEEN ? AND ? THEN ? ELSE 0 END)"
            ));
            params.push(Value::Integer(shift.span.from));
            params.push(Value::Integer(shift.span.to));
            params.push(Value::Integer(shift.delta));
        }
        assignments.push(format!("{col} = {expr}"));
    }

    let mut predicates = Vec::new();
    for shift in shifts {
        predicates.push(format!("{} BETWEEN ? AND ?", shift.bound.column()));
        params.push(Value::Integer(shift.span.from));
        params.push(Value::Integer(shift.span.to));
    }

    let sql = format!(
        "UPDATE nodes SET {} WHERE {}",
        assignments.join(", "),
        predicates.join(" OR ")
    );

    (sql, params)
}

/// One libsql transaction on a dedicated connection
pub struct TursoTransaction {
    conn: Connection,
}

impl TursoTransaction {
    async fn query_nodes(
        &self,
        sql: &str,
        params: Vec<Value>,
    ) -> Result<Vec<Node>, DatabaseError> {
        let mut stmt = self.conn.prepare(sql).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to prepare query: {}", e))
        })?;

        let mut rows = stmt.query(params).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute query: {}", e))
        })?;

        let mut nodes = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))?
        {
            nodes.push(row_to_node(&row)?);
        }

        Ok(nodes)
    }
}

#[async_trait]
impl IntervalTransaction for TursoTransaction {
    async fn get_by_id(&mut self, id: i64) -> Result<Option<Node>, DatabaseError> {
        let nodes = self
            .query_nodes(
                &format!("{SELECT_NODE} WHERE id = ?"),
                vec![Value::Integer(id)],
            )
            .await?;
        Ok(nodes.into_iter().next())
    }

    async fn get_root(&mut self) -> Result<Option<Node>, DatabaseError> {
        let nodes = self
            .query_nodes(&format!("{SELECT_NODE} WHERE lft = 1"), Vec::new())
            .await?;
        Ok(nodes.into_iter().next())
    }

    async fn range_query(&mut self, span: Span) -> Result<Vec<Node>, DatabaseError> {
        self.query_nodes(
            &format!("{SELECT_NODE} WHERE lft BETWEEN ? AND ? ORDER BY lft"),
            vec![Value::Integer(span.from), Value::Integer(span.to)],
        )
        .await
    }

    async fn count(&mut self) -> Result<u64, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT COUNT(*) FROM nodes")
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to prepare count query: {}", e))
            })?;
        let mut rows = stmt.query(()).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute count query: {}", e))
        })?;
        let row = rows
            .next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))?
            .ok_or_else(|| DatabaseError::sql_execution("COUNT(*) returned no rows"))?;
        let count: i64 = row
            .get(0)
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to get count: {}", e)))?;
        Ok(count as u64)
    }

    async fn insert(&mut self, name: &str, left: i64, right: i64) -> Result<i64, DatabaseError> {
        self.conn
            .execute(
                "INSERT INTO nodes (name, lft, rgt) VALUES (?, ?, ?)",
                (name, left, right),
            )
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to insert node: {}", e)))?;

        Ok(self.conn.last_insert_rowid())
    }

    async fn rename(&mut self, id: i64, name: &str) -> Result<u64, DatabaseError> {
        self.conn
            .execute("UPDATE nodes SET name = ? WHERE id = ?", (name, id))
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to rename node: {}", e)))
    }

    async fn apply_shifts(&mut self, shifts: &[Shift]) -> Result<u64, DatabaseError> {
        let shifts: Vec<Shift> = shifts.iter().copied().filter(|s| !s.is_noop()).collect();
        if shifts.is_empty() {
            return Ok(0);
        }

        let (sql, params) = shift_statement(&shifts);
        self.conn
            .execute(&sql, params)
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to shift bounds: {}", e)))
    }

    async fn delete_range(&mut self, span: Span) -> Result<u64, DatabaseError> {
        self.conn
            .execute(
                "DELETE FROM nodes WHERE lft BETWEEN ? AND ?",
                [span.from, span.to],
            )
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to delete nodes: {}", e)))
    }

    async fn commit(self: Box<Self>) -> Result<(), DatabaseError> {
        if let Err(e) = self.conn.execute("COMMIT", ()).await {
            if let Err(rollback_err) = self.conn.execute("ROLLBACK", ()).await {
                tracing::warn!("Failed to roll back after commit error: {}", rollback_err);
            }
            return Err(DatabaseError::transaction_failed(format!(
                "Failed to commit transaction: {}",
                e
            )));
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), DatabaseError> {
        self.conn.execute("ROLLBACK", ()).await.map_err(|e| {
            DatabaseError::transaction_failed(format!("Failed to roll back transaction: {}", e))
        })?;
        Ok(())
    }
}
