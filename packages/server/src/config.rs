//! Runtime server configuration
//!
//! ServerConfig is built once at startup from `NESTEDSET_*` environment
//! variables and is immutable afterwards.
//!
//! | Variable | Default |
//! |---|---|
//! | `NESTEDSET_HOST` | `127.0.0.1` |
//! | `NESTEDSET_PORT` | `3001` |
//! | `NESTEDSET_STORE` | `turso` (`memory` keeps the tree in process memory) |
//! | `NESTEDSET_DB_PATH` | `~/.nestedset/database/nestedset.db` |
//! | `NESTEDSET_CORS_ORIGIN` | `http://localhost:1420,http://localhost:5173` |

use axum::http::HeaderValue;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3001;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:1420,http://localhost:5173";

/// Configuration errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid NESTEDSET_PORT '{value}': expected a port number")]
    InvalidPort { value: String },

    #[error("Invalid NESTEDSET_STORE '{value}': expected 'memory' or 'turso'")]
    InvalidStore { value: String },

    #[error("Invalid NESTEDSET_CORS_ORIGIN entry '{value}'")]
    InvalidCorsOrigin { value: String },

    #[error("Failed to get home directory for the default database path")]
    HomeDirUnavailable,
}

/// Which IntervalStore backs the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    Turso,
}

impl FromStr for StoreKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreKind::Memory),
            "turso" | "libsql" => Ok(StoreKind::Turso),
            _ => Err(ConfigError::InvalidStore {
                value: s.to_string(),
            }),
        }
    }
}

/// Runtime server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreKind,

    /// Database file, only used with [`StoreKind::Turso`]
    pub db_path: PathBuf,

    /// Origins allowed by the CORS layer
    pub cors_origins: Vec<HeaderValue>,
}

impl ServerConfig {
    /// Build the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("NESTEDSET_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("NESTEDSET_PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort { value })?,
            None => DEFAULT_PORT,
        };

        let store = match lookup("NESTEDSET_STORE") {
            Some(value) => value.parse()?,
            None => StoreKind::Turso,
        };

        let db_path = match lookup("NESTEDSET_DB_PATH") {
            Some(path) => PathBuf::from(path),
            None => default_db_path()?,
        };

        let cors_origins = lookup("NESTEDSET_CORS_ORIGIN")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|_| ConfigError::InvalidCorsOrigin {
                        value: o.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            host,
            port,
            store,
            db_path,
            cors_origins,
        })
    }

    /// `host:port` to bind the listener to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Default: ~/.nestedset/database/nestedset.db
fn default_db_path() -> Result<PathBuf, ConfigError> {
    let home_dir = dirs::home_dir().ok_or(ConfigError::HomeDirUnavailable)?;
    Ok(home_dir
        .join(".nestedset")
        .join("database")
        .join("nestedset.db"))
}
