//! Shared TTL Cache
//!
//! Thread-safe handle over a [`CacheStore`], shared between request handlers
//! and the background sweeper.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::cache::{CacheStats, CacheStore, Lookup};

/// Cloneable handle to a shared, lock-guarded cache store.
///
/// Every clone refers to the same store. Reads take the write lock because a
/// stale entry is deleted by the read that discovers it.
#[derive(Debug)]
pub struct TtlCache<V> {
    store: Arc<RwLock<CacheStore<V>>>,
}

impl<V> Clone for TtlCache<V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            store: Arc::new(RwLock::new(CacheStore::new(ttl))),
        }
    }

    pub async fn set(&self, key: impl Into<String>, value: V) {
        self.store.write().await.set(key.into(), value);
    }

    pub async fn get(&self, key: &str) -> Lookup<V> {
        self.store.write().await.get(key)
    }

    /// Runs one sweep pass, returning the number of entries removed.
    pub async fn purge_expired(&self) -> usize {
        self.store.write().await.cleanup_expired()
    }

    pub async fn contains_key(&self, key: &str) -> bool {
        self.store.read().await.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    pub async fn ttl(&self) -> Duration {
        self.store.read().await.ttl()
    }
}
