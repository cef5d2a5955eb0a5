//! Fetch Controller Module
//!
//! Drives one lookup at a time: probes the cache, runs the transport with a
//! cancellation token, and publishes every state transition through a watch
//! channel. Starting a new lookup supersedes the previous one; a superseded
//! or aborted attempt can never touch the published state again.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use crate::cache::SharedCache;
use crate::error::{LookupError, Result};
use crate::fetch::{CancelToken, FetchState, FetchStatus, Transport};

// == Flight Tracking ==
/// Bookkeeping for the at-most-one attempt currently in flight.
///
/// Every write to the state channel happens while this lock is held, so
/// published transitions are totally ordered with generation changes.
#[derive(Debug, Default)]
struct Flight {
    /// Monotonic attempt counter. A settlement compares the generation it
    /// was started under against the current one and applies only on match.
    generation: u64,
    /// Token for the in-flight attempt, if any
    cancel: Option<CancelToken>,
}

impl Flight {
    /// Cancels the current attempt and advances the generation, so any late
    /// settlement from it is discarded.
    fn retire(&mut self) {
        if let Some(token) = self.cancel.take() {
            token.cancel();
        }
        self.generation = self.generation.wrapping_add(1);
    }
}

// == Fetch Controller ==
/// Cancellable single-flight fetcher with an optional read-through cache.
///
/// Each controller owns its state channel and flight bookkeeping; callers
/// that want a shared cache pass the same [`SharedCache`] handle to several
/// controllers. All methods take `&self`, so a controller is typically held
/// in an [`Arc`] and driven from multiple tasks.
pub struct FetchController<T> {
    transport: Arc<dyn Transport>,
    cache: Option<SharedCache<T>>,
    state_tx: watch::Sender<FetchState<T>>,
    flight: Mutex<Flight>,
}

impl<T> FetchController<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    // == Constructors ==
    /// Creates a controller that always goes to the network.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::build(transport, None)
    }

    /// Creates a controller that consults `cache` before the network and
    /// writes every successful payload back to it.
    pub fn with_cache(transport: Arc<dyn Transport>, cache: SharedCache<T>) -> Self {
        Self::build(transport, Some(cache))
    }

    fn build(transport: Arc<dyn Transport>, cache: Option<SharedCache<T>>) -> Self {
        let (state_tx, _rx) = watch::channel(FetchState::default());
        Self {
            transport,
            cache,
            state_tx,
            flight: Mutex::new(Flight::default()),
        }
    }

    // == Execute ==
    /// Runs a lookup for `key`, publishing transitions as it goes.
    ///
    /// A blank key is a no-op. A live cached value settles the lookup as
    /// `Success` without any network activity. Otherwise the previous
    /// attempt (if any) is cancelled, state moves to `Loading`, and the
    /// transport outcome decides the final transition: `Success` with the
    /// parsed payload, `Error` with a message, or back to `Idle` when the
    /// attempt was cancelled underneath us.
    ///
    /// Failures surface through the published state rather than a return
    /// value, mirroring how consumers observe the controller.
    #[instrument(skip(self))]
    pub async fn execute(&self, key: &str) {
        let key = key.trim();
        if key.is_empty() {
            return;
        }

        if let Some(cache) = &self.cache {
            let hit = cache.write().await.get(key);
            if let Some(value) = hit {
                debug!(key, "serving lookup from cache");
                self.adopt_cached(value);
                return;
            }
            debug!(key, "cache miss, fetching");
        }

        let (generation, cancel) = self.begin_flight();
        let outcome = self.request_and_parse(key, cancel).await;
        self.settle(generation, key, outcome).await;
    }

    // == Abort ==
    /// Cancels any in-flight attempt and resets status to `Idle`.
    ///
    /// Safe to call at any time, including when nothing is running; the
    /// last adopted value is kept.
    pub fn abort(&self) {
        let mut flight = self.flight.lock();
        flight.retire();
        self.state_tx.send_modify(|state| {
            state.status = FetchStatus::Idle;
            state.error = None;
        });
    }

    // == State Accessors ==
    /// Subscribes to state transitions.
    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.state_tx.subscribe()
    }

    /// Returns a snapshot of the current state.
    pub fn state(&self) -> FetchState<T> {
        self.state_tx.borrow().clone()
    }

    /// Returns the current status.
    pub fn status(&self) -> FetchStatus {
        self.state_tx.borrow().status
    }

    /// Returns the last adopted value, if any.
    pub fn value(&self) -> Option<T> {
        self.state_tx.borrow().value.clone()
    }

    /// Returns the current error message, if any.
    pub fn error_message(&self) -> Option<String> {
        self.state_tx.borrow().error.clone()
    }

    /// True when the controller was built with a cache handle.
    pub fn caching_enabled(&self) -> bool {
        self.cache.is_some()
    }

    // == Flight Management ==
    /// Adopts a cached value as the settled result. The in-flight attempt,
    /// if any, is retired so its late settlement cannot overwrite the
    /// adoption.
    fn adopt_cached(&self, value: T) {
        let mut flight = self.flight.lock();
        flight.retire();
        self.state_tx.send_modify(|state| {
            state.value = Some(value);
            state.status = FetchStatus::Success;
            state.error = None;
        });
    }

    /// Retires the previous attempt, registers a new one, and publishes the
    /// loading state in the same step.
    fn begin_flight(&self) -> (u64, CancelToken) {
        let mut flight = self.flight.lock();
        flight.retire();
        let token = CancelToken::new();
        flight.cancel = Some(token.clone());
        self.state_tx.send_modify(|state| {
            state.status = FetchStatus::Loading;
            state.error = None;
        });
        (flight.generation, token)
    }

    async fn request_and_parse(&self, key: &str, cancel: CancelToken) -> Result<T> {
        let response = self.transport.request(key, cancel).await?;
        if !response.ok {
            return Err(LookupError::HttpStatus(response.status_code));
        }
        Ok(serde_json::from_str(&response.body)?)
    }

    // == Settlement ==
    /// Applies the outcome of the attempt started under `generation`, or
    /// discards it if a newer attempt has taken over since.
    async fn settle(&self, generation: u64, key: &str, outcome: Result<T>) {
        match outcome {
            Ok(value) => {
                // The cache lock is taken before the flight lock so the
                // generation check, cache write, and state publish happen
                // as one step with respect to abort and later executes
                let mut cache_guard = match &self.cache {
                    Some(cache) => Some(cache.write().await),
                    None => None,
                };
                let mut flight = self.flight.lock();
                if flight.generation != generation {
                    debug!(key, "discarding superseded lookup result");
                    return;
                }
                flight.cancel = None;
                if let Some(store) = cache_guard.as_deref_mut() {
                    store.put(key.to_string(), value.clone());
                }
                debug!(key, "lookup settled successfully");
                self.state_tx.send_modify(|state| {
                    state.value = Some(value);
                    state.status = FetchStatus::Success;
                    state.error = None;
                });
            }
            Err(err) if err.is_cancelled() => {
                let mut flight = self.flight.lock();
                if flight.generation != generation {
                    return;
                }
                flight.cancel = None;
                debug!(key, "lookup cancelled");
                self.state_tx.send_modify(|state| {
                    state.status = FetchStatus::Idle;
                    state.error = None;
                });
            }
            Err(err) => {
                let mut flight = self.flight.lock();
                if flight.generation != generation {
                    debug!(key, "discarding superseded lookup failure");
                    return;
                }
                flight.cancel = None;
                warn!(key, error = %err, "lookup failed");
                self.state_tx.send_modify(|state| {
                    state.status = FetchStatus::Error;
                    state.error = Some(err.to_string());
                });
            }
        }
    }
}

impl<T> fmt::Debug for FetchController<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchController")
            .field("status", &self.state_tx.borrow().status)
            .field("caching", &self.cache.is_some())
            .finish()
    }
}
