//! Verdance storage adapter.
//!
//! [`KeyValueStore`] abstracts a JSON key-value store with three backends:
//!
//! - [`MemoryStore`]: process-local map, for development and tests.
//! - [`BlobStore`]: one JSON file per key under a directory.
//! - [`PgStore`]: a `kv_store` table in PostgreSQL.
//!
//! [`GardenStore`] layers typed garden-record access on top.

use async_trait::async_trait;

pub mod blob;
pub mod garden_store;
pub mod memory;
pub mod postgres;

pub use blob::BlobStore;
pub use garden_store::GardenStore;
pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors raised by storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem failure in the blob backend.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A migration failed to apply.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The key cannot be represented by this backend.
    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),
}

/// A JSON key-value store.
///
/// Writes are last-writer-wins; no backend coordinates concurrent writers.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value under `key`, `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError>;

    /// Insert or replace the value under `key`.
    async fn set(&self, key: &str, value: &serde_json::Value) -> Result<(), StoreError>;

    /// Remove `key`. Returns whether a value was present.
    async fn delete(&self, key: &str) -> Result<bool, StoreError>;

    /// Verify the backend is reachable.
    async fn health_check(&self) -> Result<(), StoreError>;

    /// Short backend name for logs and the health endpoint.
    fn backend_name(&self) -> &'static str;
}
