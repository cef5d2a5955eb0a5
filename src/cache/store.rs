//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and TTL
//! staleness. Staleness is evaluated lazily on read; there is no per-entry
//! timer, so a stale entry lingers until the next read touches it or capacity
//! pressure evicts it.

use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, LruTracker};

// == Cache Store ==
/// Bounded key-value cache with LRU eviction and a store-wide TTL.
///
/// `get` promotes the entry it returns, so reads participate in recency.
/// Capacity is a hard upper bound: after any public operation completes,
/// `len() <= capacity()` holds.
#[derive(Debug)]
pub struct CacheStore<T> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<T>>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed (at least 1)
    capacity: usize,
    /// Store-wide time-to-live
    ttl: Duration,
}

impl<T: Clone> CacheStore<T> {
    // == Constructor ==
    /// Creates a new CacheStore with the given capacity and TTL.
    ///
    /// A capacity of zero is clamped to 1 so the bound stays meaningful.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries the cache can hold
    /// * `ttl` - Time-to-live applied to every entry
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            capacity: capacity.max(1),
            ttl,
        }
    }

    // == Get ==
    /// Retrieves a clone of the value stored under `key`.
    ///
    /// A live hit promotes the entry to most recently used. A stale entry is
    /// deleted as part of the miss path, so a later `put` of the same key is
    /// never blocked by it. Missing keys have no side effect.
    pub fn get(&mut self, key: &str) -> Option<T> {
        match self.entries.get(key) {
            Some(entry) if entry.is_stale(self.ttl) => {
                debug!(key, age_ms = entry.age().as_millis() as u64, "cache entry expired");
                self.entries.remove(key);
                self.lru.remove(key);
                self.stats.record_expiration();
                self.stats.record_miss();
                self.stats.set_entries(self.entries.len());
                None
            }
            Some(entry) => {
                let value = entry.value.clone();
                self.stats.record_hit();
                self.lru.touch(key);
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Put ==
    /// Inserts or overwrites `key` with a fresh timestamp at the most-recent
    /// position.
    ///
    /// When inserting a new key into a full store, the single least recently
    /// used entry is evicted first, so the capacity bound holds throughout.
    pub fn put(&mut self, key: String, value: T) {
        let is_overwrite = self.entries.contains_key(&key);

        if !is_overwrite && self.entries.len() >= self.capacity {
            if let Some(evicted) = self.lru.evict_oldest() {
                self.entries.remove(&evicted);
                self.stats.record_eviction();
                debug!(key = %evicted, "cache entry evicted");
            }
        }

        self.entries.insert(key.clone(), CacheEntry::new(value));
        self.lru.touch(&key);
        self.stats.set_entries(self.entries.len());
    }

    // == Clear ==
    /// Removes every entry. Intended for test isolation and explicit cache
    /// flushes, not ordinary runtime behavior.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.stats.set_entries(0);
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_entries(self.entries.len());
        stats
    }

    // == Recency Order ==
    /// Returns the cached keys in recency order, least recently used first.
    /// Diagnostic accessor; stale entries not yet touched still appear.
    pub fn keys_by_recency(&self) -> Vec<String> {
        self.lru.keys_oldest_first()
    }

    // == Introspection ==
    /// Returns the current number of entries (live and not-yet-reaped stale).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the configured TTL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
