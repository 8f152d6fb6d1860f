//! Cache Store Module
//!
//! Synchronous cache engine combining HashMap storage with TTL expiration.
//! Callers provide their own locking; see [`TtlCache`](super::TtlCache).

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

use crate::cache::{CacheEntry, CacheStats};

// == Lookup ==
/// Outcome of reading a key from the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<V> {
    /// Present and within its TTL
    Fresh(V),
    /// Present but past its TTL; the entry has been removed
    Stale,
    /// No entry under this key
    Missing,
}

impl<V> Lookup<V> {
    pub fn is_fresh(&self) -> bool {
        matches!(self, Lookup::Fresh(_))
    }

    /// Returns the value of a fresh lookup.
    pub fn fresh(self) -> Option<V> {
        match self {
            Lookup::Fresh(value) => Some(value),
            Lookup::Stale | Lookup::Missing => None,
        }
    }
}

// == Cache Store ==
/// Key-value storage with a single TTL applied to every entry.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum age of a visible entry
    ttl: Duration,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a new empty CacheStore whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Set ==
    /// Stores a value, overwriting any existing entry and resetting its age.
    pub fn set(&mut self, key: String, value: V) {
        self.entries.insert(key, CacheEntry::new(value));
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// A stale entry is removed by the read that discovers it.
    pub fn get(&mut self, key: &str) -> Lookup<V> {
        let now = Instant::now();

        let stale = match self.entries.get(key) {
            None => {
                self.stats.record_miss();
                return Lookup::Missing;
            }
            Some(entry) => entry.is_stale(self.ttl, now),
        };

        if stale {
            self.entries.remove(key);
            self.stats.record_miss();
            self.stats.record_expired(1);
            self.stats.set_total_entries(self.entries.len());
            return Lookup::Stale;
        }

        self.stats.record_hit();
        match self.entries.get(key) {
            Some(entry) => Lookup::Fresh(entry.value.clone()),
            None => Lookup::Missing,
        }
    }

    // == Remove ==
    /// Removes an entry by key. Removing an absent key is a no-op.
    pub fn remove(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Cleanup Expired ==
    /// Removes every entry older than the TTL.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = Instant::now();
        let ttl = self.ttl;
        let before = self.entries.len();

        self.entries.retain(|_, entry| !entry.is_stale(ttl, now));

        let removed = before - self.entries.len();
        self.stats.record_expired(removed);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    /// Reports raw presence, without an expiry check.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
