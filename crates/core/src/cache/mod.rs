//! Lookup cache shared by the resolvers.
//!
//! Identity, metadata and file listing lookups are expensive network calls
//! whose answers rarely change. Results are stored as JSON strings with a
//! TTL behind the [`CacheStore`] trait so the backing store can be swapped
//! (in-process map or SQLite file) without touching the resolvers.

mod memory;
mod sqlite;

pub use memory::MemoryCache;
pub use sqlite::SqliteCache;

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::metrics;

/// Errors that can occur when reading or writing the cache.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache database error: {0}")]
    Database(String),

    #[error("Cache serialization error: {0}")]
    Serialization(String),
}

/// Key-value store with per-entry expiry.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Get a live entry. Expired entries are reported as missing.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Insert or replace an entry. Last writer wins.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Delete expired entries. Returns how many were removed.
    async fn purge_expired(&self) -> Result<usize, CacheError>;
}

/// Read and decode a JSON entry.
///
/// Store errors and undecodable entries are logged and treated as a miss so
/// a broken cache never blocks ingestion.
pub async fn get_json<T: DeserializeOwned>(
    cache: &dyn CacheStore,
    namespace: &str,
    key: &str,
) -> Option<T> {
    let full_key = format!("{}:{}", namespace, key);
    let raw = match cache.get(&full_key).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(key = %full_key, error = %e, "Cache read failed");
            None
        }
    };

    let decoded = raw.and_then(|raw| match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key = %full_key, error = %e, "Discarding undecodable cache entry");
            None
        }
    });

    metrics::CACHE_LOOKUPS
        .with_label_values(&[namespace, if decoded.is_some() { "hit" } else { "miss" }])
        .inc();
    decoded
}

/// Encode and store a JSON entry, logging failures.
pub async fn set_json<T: Serialize>(
    cache: &dyn CacheStore,
    namespace: &str,
    key: &str,
    value: &T,
    ttl: Duration,
) {
    let full_key = format!("{}:{}", namespace, key);
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(key = %full_key, error = %e, "Failed to encode cache entry");
            return;
        }
    };
    if let Err(e) = cache.set(&full_key, &raw, ttl).await {
        warn!(key = %full_key, error = %e, "Cache write failed");
    }
}
