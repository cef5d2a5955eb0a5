//! Fetch Module
//!
//! Cancellable single-flight lookups with observable state. The
//! [`FetchController`] drives one request at a time through a pluggable
//! [`Transport`], consults an optional shared cache first, and publishes
//! every `idle -> loading -> success | error` transition over a watch
//! channel. [`CancelToken`] carries the cooperative cancellation signal.

mod cancel;
mod controller;
mod state;
mod transport;

pub use cancel::CancelToken;
pub use controller::FetchController;
pub use state::{FetchState, FetchStatus};
pub use transport::{
    lookup_url, HttpTransport, Transport, TransportResponse, DEFAULT_ENDPOINT,
    DEFAULT_REQUEST_TIMEOUT,
};
