//! In-process cache.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{CacheError, CacheStore};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires: DateTime<Utc>,
}

/// Cache kept in a shared map. Expired entries are dropped on read and by
/// [`CacheStore::purge_expired`].
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    map: Arc<RwLock<HashMap<String, Entry>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.map.read().expect("RwLock should never be poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Utc::now();
        {
            let map = self.map.read().expect("RwLock should never be poisoned");
            match map.get(key) {
                Some(entry) if entry.expires > now => return Ok(Some(entry.value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        self.map
            .write()
            .expect("RwLock should never be poisoned")
            .remove(key);
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| CacheError::Serialization(e.to_string()))?;
        let entry = Entry {
            value: value.to_string(),
            expires: Utc::now() + ttl,
        };
        self.map
            .write()
            .expect("RwLock should never be poisoned")
            .insert(key.to_string(), entry);
        Ok(())
    }

    async fn purge_expired(&self) -> Result<usize, CacheError> {
        let now = Utc::now();
        let mut map = self.map.write().expect("RwLock should never be poisoned");
        let before = map.len();
        map.retain(|_, entry| entry.expires > now);
        Ok(before - map.len())
    }
}
