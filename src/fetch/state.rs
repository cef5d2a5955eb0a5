//! Fetch State Module
//!
//! The observable state of a fetch controller: a status discriminant plus
//! the last adopted value and last error message.

use std::fmt;

use serde::{Deserialize, Serialize};

// == Fetch Status ==
/// Lifecycle phase of a controller's most recent operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    /// No operation running and no settled outcome to report. Also the
    /// state after an abort or a cancelled operation.
    #[default]
    Idle,
    /// An operation is in flight.
    Loading,
    /// The most recent operation settled with a value.
    Success,
    /// The most recent operation settled with an error.
    Error,
}

impl FetchStatus {
    /// Returns the lowercase wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchStatus::Idle => "idle",
            FetchStatus::Loading => "loading",
            FetchStatus::Success => "success",
            FetchStatus::Error => "error",
        }
    }
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Fetch State ==
/// Snapshot published by a [`FetchController`] after every transition.
///
/// `value` holds the last successfully adopted payload and survives later
/// failures and aborts, so a consumer can keep rendering stale data while
/// showing the newer error. `error` is only `Some` while `status` is
/// [`FetchStatus::Error`].
///
/// [`FetchController`]: crate::fetch::FetchController
#[derive(Debug, Clone)]
pub struct FetchState<T> {
    pub status: FetchStatus,
    pub value: Option<T>,
    pub error: Option<String>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            status: FetchStatus::Idle,
            value: None,
            error: None,
        }
    }
}

impl<T> FetchState<T> {
    /// True while an operation is in flight.
    pub fn is_loading(&self) -> bool {
        self.status == FetchStatus::Loading
    }
}
