//! ipmeta - Client-side IP metadata lookup layer
//!
//! Combines a bounded TTL+LRU cache, cancellable single-flight fetches with
//! observable state, and a reference-counted shared clock.

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;

pub use cache::{shared_store, CacheStore, SharedCache};
pub use clock::{format_time, SharedClock};
pub use config::Config;
pub use error::{LookupError, Result};
pub use fetch::{FetchController, FetchStatus, HttpTransport, Transport};
pub use models::{is_valid_ip, IpMetadata};
