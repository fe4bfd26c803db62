//! End-to-End Tests against the libsql Store
//!
//! Runs the engine and tree builder over a real on-disk database, covering
//! the documented insert/delete/move walkthrough, cycle rejection, and
//! concurrent writers serialized by `BEGIN IMMEDIATE`.

#[cfg(test)]
mod turso_scenario_tests {
    use anyhow::Result;
    use nestedset_core::db::{DatabaseService, IntervalStore, Span, TursoStore};
    use nestedset_core::models::Node;
    use nestedset_core::services::{NestedSetEngine, NestedSetError, TreeBuilder};
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Helper to create an engine and tree builder over a fresh database
    async fn create_test_engine() -> Result<(NestedSetEngine, TreeBuilder, TempDir)> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("tree.db");
        let db = Arc::new(DatabaseService::new(db_path).await?);
        let store: Arc<dyn IntervalStore> = Arc::new(TursoStore::new(db));
        Ok((
            NestedSetEngine::new(store.clone()),
            TreeBuilder::new(store),
            temp_dir,
        ))
    }

    async fn all_nodes(engine: &NestedSetEngine) -> Result<Vec<Node>> {
        let mut tx = engine.store().begin_read().await?;
        let nodes = tx.range_query(Span::all()).await?;
        tx.rollback().await?;
        Ok(nodes)
    }

    async fn bounds_of(engine: &NestedSetEngine, id: i64) -> Result<(i64, i64)> {
        let node = engine.get_node(id).await?;
        Ok((node.left, node.right))
    }

    #[tokio::test]
    async fn test_insert_and_delete_walkthrough() -> Result<()> {
        let (engine, builder, _temp_dir) = create_test_engine().await?;

        let a = engine.insert(None, "A").await?;
        assert_eq!(bounds_of(&engine, a).await?, (1, 2));

        let b = engine.insert(Some(a), "B").await?;
        assert_eq!(bounds_of(&engine, a).await?, (1, 4));
        assert_eq!(bounds_of(&engine, b).await?, (2, 3));

        let c = engine.insert(Some(a), "C").await?;
        assert_eq!(bounds_of(&engine, a).await?, (1, 6));
        assert_eq!(bounds_of(&engine, b).await?, (2, 3));
        assert_eq!(bounds_of(&engine, c).await?, (4, 5));

        engine.delete_subtree(b).await?;
        assert_eq!(bounds_of(&engine, a).await?, (1, 4));
        assert_eq!(bounds_of(&engine, c).await?, (2, 3));

        let tree = builder.build_tree().await?;
        assert_eq!(tree.child_names(), vec!["C"]);
        engine.verify().await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_move_walkthrough() -> Result<()> {
        let (engine, builder, _temp_dir) = create_test_engine().await?;

        let a = engine.insert(None, "A").await?;
        engine.insert(Some(a), "B").await?;
        let c = engine.insert(Some(a), "C").await?;
        let d = engine.insert(Some(a), "D").await?;

        engine.move_subtree(c, d).await?;

        let tree = builder.build_tree().await?;
        assert_eq!(tree.name, "A");
        assert_eq!(tree.child_names(), vec!["B", "D"]);
        assert_eq!(tree.children[1].child_names(), vec!["C"]);
        engine.verify().await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_promote_keeps_child_order() -> Result<()> {
        let (engine, builder, _temp_dir) = create_test_engine().await?;

        let a = engine.insert(None, "A").await?;
        engine.insert(Some(a), "First").await?;
        let mid = engine.insert(Some(a), "Mid").await?;
        engine.insert(Some(mid), "M1").await?;
        engine.insert(Some(mid), "M2").await?;
        engine.insert(Some(a), "Last").await?;

        engine.delete_and_promote(mid).await?;

        let tree = builder.build_tree().await?;
        assert_eq!(tree.child_names(), vec!["First", "M1", "M2", "Last"]);
        engine.verify().await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_cycle_rejection_leaves_intervals_unchanged() -> Result<()> {
        let (engine, _builder, _temp_dir) = create_test_engine().await?;

        let a = engine.insert(None, "A").await?;
        let b = engine.insert(Some(a), "B").await?;
        let c = engine.insert(Some(b), "C").await?;
        let before = all_nodes(&engine).await?;

        let err = engine.move_subtree(b, c).await.unwrap_err();
        assert!(matches!(err, NestedSetError::CircularMove { .. }));

        assert_eq!(all_nodes(&engine).await?, before);
        Ok(())
    }

    #[tokio::test]
    async fn test_subtree_build_and_missing_root() -> Result<()> {
        let (engine, builder, _temp_dir) = create_test_engine().await?;

        assert!(matches!(
            builder.build_tree().await,
            Err(NestedSetError::RootNotFound)
        ));

        let a = engine.insert(None, "A").await?;
        let b = engine.insert(Some(a), "B").await?;
        engine.insert(Some(b), "B1").await?;

        let subtree = builder.build_subtree(b).await?;
        assert_eq!(subtree.name, "B");
        assert_eq!(subtree.child_names(), vec!["B1"]);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_serialize() -> Result<()> {
        let (engine, builder, _temp_dir) = create_test_engine().await?;
        let root = engine.insert(None, "Root").await?;

        let mut handles = Vec::new();
        for i in 0..8 {
            let engine = engine.clone();
            handles.push(tokio::spawn(async move {
                engine.insert(Some(root), &format!("Child {}", i)).await
            }));
        }
        for handle in handles {
            handle.await??;
        }

        let tree = builder.build_tree().await?;
        assert_eq!(tree.children.len(), 8);
        assert_eq!(bounds_of(&engine, root).await?, (1, 18));
        engine.verify().await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_state_survives_reopen() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("tree.db");

        {
            let db = Arc::new(DatabaseService::new(db_path.clone()).await?);
            let engine = NestedSetEngine::new(Arc::new(TursoStore::new(db)));
            let a = engine.insert(None, "A").await?;
            engine.insert(Some(a), "B").await?;
        }

        let db = Arc::new(DatabaseService::new(db_path).await?);
        let tree = TreeBuilder::new(Arc::new(TursoStore::new(db)))
            .build_tree()
            .await?;
        assert_eq!(tree.name, "A");
        assert_eq!(tree.child_names(), vec!["B"]);
        Ok(())
    }
}
