//! Cancellation Module
//!
//! Cooperative cancellation for in-flight lookups. The token is backed by a
//! watch channel so a pending transport future can be woken the moment
//! `cancel` is called, rather than noticing a flag on its next poll.

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::{LookupError, Result};

// == Cancel Token ==
/// Handle for signalling that an in-flight operation should stop.
///
/// Clones share the same underlying signal: cancelling any clone cancels
/// them all. Cancellation is sticky; a token is never reused across
/// attempts.
#[derive(Debug, Clone)]
pub struct CancelToken {
    signal: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    // == Constructor ==
    /// Creates a new, un-cancelled token.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            signal: Arc::new(tx),
        }
    }

    // == Cancel ==
    /// Signals cancellation, waking every task awaiting [`cancelled`].
    ///
    /// [`cancelled`]: CancelToken::cancelled
    pub fn cancel(&self) {
        self.signal.send_replace(true);
    }

    // == Is Cancelled ==
    /// Returns true once `cancel` has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        *self.signal.borrow()
    }

    // == Cancelled ==
    /// Resolves once the token is cancelled; resolves immediately if it
    /// already was.
    pub async fn cancelled(&self) {
        let mut rx = self.signal.subscribe();
        // The sender lives in self, so this only returns on a true signal
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }

    // == Check ==
    /// Early-exit helper for transports: `Err(Cancelled)` once cancelled.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(LookupError::Cancelled)
        } else {
            Ok(())
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
