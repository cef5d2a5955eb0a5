//! Cache Entry Module
//!
//! Defines the structure for individual cache entries. Staleness is measured
//! against the owning store's TTL, so an entry only carries its creation
//! instant.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A single cached value with its creation instant.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The stored value
    pub value: T,
    /// Monotonic creation instant, reset on overwrite
    pub created_at: Instant,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates a fresh entry timestamped at the current instant.
    pub fn new(value: T) -> Self {
        Self {
            value,
            created_at: Instant::now(),
        }
    }

    // == Age ==
    /// Returns the time elapsed since this entry was created or refreshed.
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    // == Is Stale ==
    /// Checks whether the entry has outlived the given TTL.
    ///
    /// Boundary condition: an entry is stale once its age is greater than or
    /// equal to the TTL, so a full TTL elapsing makes it immediately invalid.
    ///
    /// # Arguments
    /// * `ttl` - The store's configured time-to-live
    pub fn is_stale(&self, ttl: Duration) -> bool {
        self.age() >= ttl
    }

    // == Time To Live ==
    /// Returns the remaining lifetime under the given TTL, or zero when the
    /// entry is already stale.
    pub fn ttl_remaining(&self, ttl: Duration) -> Duration {
        ttl.saturating_sub(self.age())
    }
}
