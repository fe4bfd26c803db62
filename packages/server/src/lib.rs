//! HTTP server for the nested-set tree store
//!
//! Exposes the engine and tree builder of `nestedset-core` as a small REST
//! API. Every request runs as exactly one engine call, so each mutation is one
//! unit of work on the store and needs no extra locking here.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin nestedset-server
//!
//! # In-memory tree on another port
//! NESTEDSET_STORE=memory NESTEDSET_PORT=3002 cargo run --bin nestedset-server
//! ```

use axum::{
    http::{HeaderValue, Method},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use nestedset_core::db::{DatabaseError, DatabaseService, IntervalStore, MemoryStore, TursoStore};
use nestedset_core::services::{NestedSetEngine, TreeBuilder};

pub mod config;
mod extract;
mod http_error;
mod node_endpoints;

pub use config::{ConfigError, ServerConfig, StoreKind};
pub use http_error::HttpError;
pub use node_endpoints::{CreateNodeInput, CreatedNode, MoveNodeInput, RenameNodeInput};

/// Application state shared across all endpoints
///
/// The engine and the tree builder share one store.
#[derive(Clone)]
pub struct AppState {
    pub engine: NestedSetEngine,
    pub tree_builder: TreeBuilder,
}

impl AppState {
    pub fn new(store: Arc<dyn IntervalStore>) -> Self {
        Self {
            engine: NestedSetEngine::new(store.clone()),
            tree_builder: TreeBuilder::new(store),
        }
    }
}

/// Create the application router with request tracing
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(node_endpoints::routes(state))
        .layer(TraceLayer::new_for_http())
}

/// CORS layer for browser clients on the configured origins
fn cors_layer(origins: &[HeaderValue]) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origins.to_vec())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
        .allow_credentials(false)
}

/// Open the store selected by `config`
pub async fn open_store(config: &ServerConfig) -> Result<Arc<dyn IntervalStore>, DatabaseError> {
    match config.store {
        StoreKind::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreKind::Turso => {
            let db = DatabaseService::new(config.db_path.clone()).await?;
            Ok(Arc::new(TursoStore::new(Arc::new(db))))
        }
    }
}

/// Start the HTTP server
///
/// # Errors
///
/// Returns error if the store cannot be opened or the server fails to bind.
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let store = open_store(&config).await?;
    let state = AppState::new(store);

    let mut events = state.engine.subscribe_to_events();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            tracing::debug!("{}: {:?}", event.event_type(), event);
        }
    });

    let app = create_router(state).layer(cors_layer(&config.cors_origins));

    let addr = config.bind_addr();
    match config.store {
        StoreKind::Memory => tracing::info!("Store: in-memory"),
        StoreKind::Turso => tracing::info!("Store: {}", config.db_path.display()),
    }
    tracing::info!("Nested-set server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
