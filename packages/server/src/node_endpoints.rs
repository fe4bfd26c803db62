//! Node Endpoints
//!
//! REST mapping of the nested-set engine and tree builder.
//!
//! # Endpoints
//!
//! - `GET /api/health` - Health check endpoint
//! - `GET /api/nodes` - Whole tree from the root
//! - `GET /api/nodes/:id` - Subtree rooted at a node
//! - `POST /api/nodes` - Create a node (root or last child)
//! - `PUT /api/nodes/:id` - Rename a node
//! - `DELETE /api/nodes/:id` - Delete a node and its descendants
//! - `DELETE /api/nodes/:id/promote` - Delete a node, promoting its children
//! - `PUT /api/nodes/move/:id` - Move a subtree under a new parent

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{delete, get, put},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::extract::{ApiJson, ApiPath};
use crate::{AppState, HttpError};
use nestedset_core::models::TreeNode;

/// Request body for node creation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNodeInput {
    /// Parent node; absent, `null` or `0` creates the root
    #[serde(default)]
    pub parent_id: Option<i64>,
    pub name: String,
}

/// Request body for rename
#[derive(Debug, Deserialize)]
pub struct RenameNodeInput {
    pub name: String,
}

/// Request body for move
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveNodeInput {
    pub new_parent_id: i64,
}

/// Response from node creation
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedNode {
    pub id: i64,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

/// Health check endpoint
///
/// ```bash
/// curl http://localhost:3001/api/health
/// ```
async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Fetch the whole tree
///
/// ```bash
/// curl http://localhost:3001/api/nodes
/// ```
async fn get_tree(State(state): State<AppState>) -> Result<Json<TreeNode>, HttpError> {
    let tree = state.tree_builder.build_tree().await?;
    Ok(Json(tree))
}

/// Fetch the subtree rooted at `id`
async fn get_subtree(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<TreeNode>, HttpError> {
    let tree = state.tree_builder.build_subtree(id).await?;
    Ok(Json(tree))
}

/// Create a node
///
/// ```bash
/// curl -X POST http://localhost:3001/api/nodes \
///   -H "Content-Type: application/json" \
///   -d '{"parentId": 1, "name": "Child"}'
/// ```
async fn create_node(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateNodeInput>,
) -> Result<(StatusCode, Json<CreatedNode>), HttpError> {
    let parent_id = input.parent_id.filter(|&id| id != 0);
    let id = state.engine.insert(parent_id, &input.name).await?;

    tracing::debug!("Created node {} under {:?}", id, parent_id);
    Ok((StatusCode::CREATED, Json(CreatedNode { id })))
}

/// Rename a node
async fn rename_node(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<RenameNodeInput>,
) -> Result<StatusCode, HttpError> {
    state.engine.rename(id, &input.name).await?;
    Ok(StatusCode::OK)
}

/// Delete a node and all of its descendants
///
/// ```bash
/// curl -X DELETE http://localhost:3001/api/nodes/2
/// ```
async fn delete_subtree(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, HttpError> {
    let deleted = state.engine.delete_subtree(id).await?;
    tracing::debug!("Deleted subtree {} ({} nodes)", id, deleted.removed);
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a node and promote its children
async fn delete_and_promote(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, HttpError> {
    state.engine.delete_and_promote(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Move a subtree under a new parent
///
/// ```bash
/// curl -X PUT http://localhost:3001/api/nodes/move/3 \
///   -H "Content-Type: application/json" \
///   -d '{"newParentId": 4}'
/// ```
async fn move_subtree(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<MoveNodeInput>,
) -> Result<StatusCode, HttpError> {
    state.engine.move_subtree(id, input.new_parent_id).await?;
    Ok(StatusCode::OK)
}

/// Create router with all node endpoints
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/nodes", get(get_tree).post(create_node))
        .route(
            "/api/nodes/:id",
            get(get_subtree).put(rename_node).delete(delete_subtree),
        )
        .route("/api/nodes/:id/promote", delete(delete_and_promote))
        .route("/api/nodes/move/:id", put(move_subtree))
        .with_state(state)
}
