//! Cache Statistics Module
//!
//! Tracks cache performance metrics. Capacity evictions and TTL expirations
//! are counted separately: an eviction frees room for a new key, while an
//! expiration is a stale entry reaped on the read path.

use serde::Serialize;

// == Cache Stats ==
/// Counters describing cache behavior since construction (or last reset via
/// a fresh store).
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of live cache retrievals
    pub hits: u64,
    /// Number of failed retrievals (key missing or stale)
    pub misses: u64,
    /// Number of entries evicted by capacity pressure
    pub evictions: u64,
    /// Number of stale entries removed on the read path
    pub expirations: u64,
    /// Current number of entries in the cache
    pub entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Increments the capacity-eviction counter.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Increments the stale-removal counter.
    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }

    /// Updates the current entry count.
    pub fn set_entries(&mut self, count: usize) {
        self.entries = count;
    }
}
