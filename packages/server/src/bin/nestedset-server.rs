//! Nested-Set HTTP Server Binary
//!
//! # Usage
//!
//! ```bash
//! # Start with default settings (port 3001, default DB path)
//! cargo run --bin nestedset-server
//!
//! # Custom port
//! NESTEDSET_PORT=3002 cargo run --bin nestedset-server
//! ```
//!
//! # Environment Variables
//!
//! - `NESTEDSET_HOST`, `NESTEDSET_PORT`: Listen address (default 127.0.0.1:3001)
//! - `NESTEDSET_STORE`: `turso` (default) or `memory`
//! - `NESTEDSET_DB_PATH`: Database file (default ~/.nestedset/database/nestedset.db)
//! - `NESTEDSET_CORS_ORIGIN`: Comma-separated allowed origins
//! - `RUST_LOG`: Logging level (e.g., "info", "debug", "trace")

use nestedset_server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    tracing::info!("Nested-set server {}", env!("CARGO_PKG_VERSION"));

    nestedset_server::start_server(config).await
}
