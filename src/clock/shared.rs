//! Shared Clock Module
//!
//! A reference-counted wall clock. The ticker task exists only while at
//! least one subscription is attached: the first attach spawns it, the last
//! detach aborts it, and a later attach starts a fresh one. All
//! subscriptions read the same watch channel, so every consumer sees the
//! identical timestamp.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::clock::{format_time, TICK_PERIOD};

// == Lifecycle ==
/// Subscriber count and ticker handle, guarded together so attach and
/// detach observe a consistent pair.
#[derive(Debug, Default)]
struct Lifecycle {
    subscribers: usize,
    ticker: Option<JoinHandle<()>>,
}

#[derive(Debug)]
struct ClockInner {
    tx: watch::Sender<DateTime<Utc>>,
    period: Duration,
    lifecycle: Mutex<Lifecycle>,
}

impl ClockInner {
    /// Drops one subscriber, stopping the ticker when the last one leaves.
    /// The count never goes below zero, even on unbalanced calls.
    fn detach_one(&self) {
        let mut lifecycle = self.lifecycle.lock();
        lifecycle.subscribers = lifecycle.subscribers.saturating_sub(1);
        if lifecycle.subscribers == 0 {
            if let Some(ticker) = lifecycle.ticker.take() {
                ticker.abort();
                debug!("clock ticker stopped");
            }
        }
    }
}

// == Shared Clock ==
/// Handle to a shared ticking clock. Clones refer to the same clock.
///
/// [`attach`] must be called from within a Tokio runtime, since the first
/// subscriber spawns the ticker task.
///
/// [`attach`]: SharedClock::attach
#[derive(Debug, Clone)]
pub struct SharedClock {
    inner: Arc<ClockInner>,
}

impl SharedClock {
    // == Constructors ==
    /// Creates a clock that ticks once per second while subscribed to.
    pub fn new() -> Self {
        Self::with_period(TICK_PERIOD)
    }

    /// Creates a clock with a custom tick period.
    pub fn with_period(period: Duration) -> Self {
        let (tx, _rx) = watch::channel(Utc::now());
        Self {
            inner: Arc::new(ClockInner {
                tx,
                period,
                lifecycle: Mutex::new(Lifecycle::default()),
            }),
        }
    }

    // == Attach ==
    /// Registers a subscriber and returns its subscription handle.
    ///
    /// The first subscriber refreshes the shared timestamp and starts the
    /// ticker; later subscribers just join it. Dropping the returned
    /// handle detaches.
    pub fn attach(&self) -> ClockSubscription {
        let mut lifecycle = self.inner.lifecycle.lock();
        lifecycle.subscribers += 1;
        if lifecycle.ticker.is_none() {
            // A restarted ticker begins from a current timestamp and a
            // full period, not the remainder of a stopped one
            self.inner.tx.send_replace(Utc::now());
            let tx = self.inner.tx.clone();
            let period = self.inner.period;
            lifecycle.ticker = Some(tokio::spawn(async move {
                debug!(period_ms = period.as_millis() as u64, "clock ticker started");
                loop {
                    tokio::time::sleep(period).await;
                    tx.send_replace(Utc::now());
                }
            }));
        }
        drop(lifecycle);

        ClockSubscription {
            inner: Arc::clone(&self.inner),
            rx: self.inner.tx.subscribe(),
        }
    }

    // == Introspection ==
    /// Returns the shared timestamp as of the last tick.
    pub fn now(&self) -> DateTime<Utc> {
        *self.inner.tx.borrow()
    }

    /// Returns the number of attached subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.lifecycle.lock().subscribers
    }

    /// True while the ticker task is running.
    pub fn is_ticking(&self) -> bool {
        self.inner.lifecycle.lock().ticker.is_some()
    }

    /// Returns the configured tick period.
    pub fn period(&self) -> Duration {
        self.inner.period
    }
}

impl Default for SharedClock {
    fn default() -> Self {
        Self::new()
    }
}

// == Clock Subscription ==
/// One attached consumer of a [`SharedClock`].
///
/// Detaches on drop; [`detach`] exists for call sites that want the
/// teardown to be explicit.
///
/// [`detach`]: ClockSubscription::detach
#[derive(Debug)]
pub struct ClockSubscription {
    inner: Arc<ClockInner>,
    rx: watch::Receiver<DateTime<Utc>>,
}

impl ClockSubscription {
    /// Returns the shared timestamp as of the last tick.
    pub fn now(&self) -> DateTime<Utc> {
        *self.rx.borrow()
    }

    /// Waits for the next tick.
    pub async fn changed(&mut self) {
        // The sender lives in inner, which self keeps alive
        let _ = self.rx.changed().await;
    }

    /// Renders the shared timestamp as `HH:MM:SS` in the given zone; see
    /// [`format_time`] for the zone-handling rules.
    pub fn zone_time(&self, timezone: Option<&str>) -> String {
        format_time(self.now(), timezone)
    }

    /// Detaches this subscription. Equivalent to dropping it.
    pub fn detach(self) {}
}

impl Drop for ClockSubscription {
    fn drop(&mut self) {
        self.inner.detach_one();
    }
}
