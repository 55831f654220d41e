//! Storage mode selection.
//!
//! Runs once at startup. With a reachable PostgreSQL the process is
//! *durable*; with no database URL, or a connection that fails or times out,
//! it falls back to *ephemeral* mode and keeps serving from memory. The
//! choice never changes afterwards: the selected [`Store`] is injected
//! everywhere and reports its mode through [`Store::mode`].

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tracing::{info, warn};

use crate::store::Store;
use crate::store::memory::MemoryStore;
use crate::store::postgres::PgStore;

/// Default bound on the initial connection attempt.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default pool size in durable mode.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Which backend the process runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// PostgreSQL; data survives restarts.
    Durable,
    /// Process memory; data is lost on restart.
    Ephemeral,
}

impl StorageMode {
    /// Whether this is the in-memory demo mode.
    pub fn is_ephemeral(&self) -> bool {
        matches!(self, StorageMode::Ephemeral)
    }
}

/// Why durable mode could not be established.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("connection timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection failed: {0}")]
    Connect(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Connection settings for durable mode.
#[derive(Debug, Clone)]
pub struct ModeOptions {
    pub connect_timeout: Duration,
    pub max_connections: u32,
}

impl Default for ModeOptions {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

/// Connect to PostgreSQL within the timeout and run migrations.
pub async fn connect_durable(
    database_url: &str,
    options: &ModeOptions,
) -> Result<PgPool, ConnectError> {
    let connect = PgPoolOptions::new()
        .max_connections(options.max_connections)
        .acquire_timeout(options.connect_timeout)
        .connect(database_url);

    let pool = tokio::time::timeout(options.connect_timeout, connect)
        .await
        .map_err(|_| ConnectError::Timeout(options.connect_timeout))??;

    crate::migrate::migrate(&pool).await?;
    Ok(pool)
}

/// Pick the storage backend for this process.
///
/// Never fails: any problem with the durable store is logged and the
/// in-memory store is returned instead.
pub async fn select_store(database_url: Option<&str>, options: &ModeOptions) -> Arc<dyn Store> {
    let Some(url) = database_url.map(str::trim).filter(|u| !u.is_empty()) else {
        warn!("DATABASE_URL not set, running in ephemeral mode with in-memory data");
        return Arc::new(MemoryStore::new());
    };

    match connect_durable(url, options).await {
        Ok(pool) => {
            info!("PostgreSQL connected, running in durable mode");
            Arc::new(PgStore::new(pool))
        }
        Err(e) => {
            warn!(error = %e, "failed to connect to PostgreSQL, switching to ephemeral mode");
            Arc::new(MemoryStore::new())
        }
    }
}
