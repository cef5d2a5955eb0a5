//! Configuration Module
//!
//! Handles loading the lookup layer's tunables from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::{shared_store, SharedCache, DEFAULT_CAPACITY, DEFAULT_TTL};
use crate::clock::{SharedClock, TICK_PERIOD};
use crate::error::Result;
use crate::fetch::{HttpTransport, DEFAULT_REQUEST_TIMEOUT};

/// Lookup layer configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of cached responses
    pub cache_capacity: usize,
    /// Time-to-live for cached responses
    pub cache_ttl: Duration,
    /// Outbound HTTP request timeout
    pub request_timeout: Duration,
    /// Shared clock tick period
    pub clock_period: Duration,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cached responses (default: 100)
    /// - `CACHE_TTL_MS` - Cache TTL in milliseconds (default: 300000)
    /// - `REQUEST_TIMEOUT_MS` - HTTP timeout in milliseconds (default: 30000)
    /// - `CLOCK_PERIOD_MS` - Clock tick period in milliseconds (default: 1000)
    pub fn from_env() -> Self {
        Self {
            cache_capacity: env::var("CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CAPACITY),
            cache_ttl: env::var("CACHE_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_TTL),
            request_timeout: env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            clock_period: env::var("CLOCK_PERIOD_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(TICK_PERIOD),
        }
    }

    // == Builders ==
    /// Builds the shared cache handle this configuration describes.
    pub fn build_store<T: Clone>(&self) -> SharedCache<T> {
        shared_store(self.cache_capacity, self.cache_ttl)
    }

    /// Builds the production HTTP transport with the configured timeout.
    pub fn build_transport(&self) -> Result<HttpTransport> {
        HttpTransport::new(self.request_timeout)
    }

    /// Builds a shared clock with the configured tick period.
    pub fn build_clock(&self) -> SharedClock {
        SharedClock::with_period(self.clock_period)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CAPACITY,
            cache_ttl: DEFAULT_TTL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            clock_period: TICK_PERIOD,
        }
    }
}
