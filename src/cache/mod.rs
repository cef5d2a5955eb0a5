//! Cache Module
//!
//! Provides the shared in-memory response cache with TTL staleness and LRU
//! eviction. One store is typically shared by every fetch controller in the
//! process through the [`SharedCache`] handle.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

mod entry;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Default maximum number of cached responses
pub const DEFAULT_CAPACITY: usize = 100;

/// Default time-to-live for cached responses (5 minutes)
pub const DEFAULT_TTL: Duration = Duration::from_millis(300_000);

// == Shared Handle ==
/// A cache store shared across fetch controllers. Reads take the write lock
/// because `get` promotes the entry it returns.
pub type SharedCache<T> = Arc<RwLock<CacheStore<T>>>;

/// Builds a [`SharedCache`] around a fresh store.
pub fn shared_store<T: Clone>(capacity: usize, ttl: Duration) -> SharedCache<T> {
    Arc::new(RwLock::new(CacheStore::new(capacity, ttl)))
}
