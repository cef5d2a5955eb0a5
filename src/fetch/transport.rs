//! Transport Module
//!
//! The boundary between the fetch controller and the network. Controllers
//! talk to a [`Transport`] trait object, so tests substitute scripted
//! responses and production wires in [`HttpTransport`] over reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::{LookupError, Result};
use crate::fetch::CancelToken;

// == Constants ==
/// Public metadata endpoint queried for each address.
pub const DEFAULT_ENDPOINT: &str = "https://ipwho.is";

/// Outer bound on a single HTTP request, connect and body included.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// == URL Construction ==
/// Builds the lookup URL for an address.
///
/// # Arguments
/// * `address` - IP address to look up; surrounding whitespace is ignored
///
/// # Returns
/// * `String` - Full request URL
pub fn lookup_url(address: &str) -> String {
    format!("{}/{}", DEFAULT_ENDPOINT, address.trim())
}

// == Transport Response ==
/// Raw settlement of one transport request, before payload parsing.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// True for a 2xx status
    pub ok: bool,
    /// HTTP status code
    pub status_code: u16,
    /// Response body as text
    pub body: String,
}

// == Transport Trait ==
/// One cancellable request for an address key. How the key maps to an
/// actual endpoint is the implementation's business; [`HttpTransport`] uses
/// [`lookup_url`], test doubles usually script replies per key.
///
/// Implementations must settle with [`LookupError::Cancelled`] when the
/// token fires before the response arrives, and must not treat non-2xx
/// statuses as transport errors; those are reported through `ok` and
/// `status_code` so the controller can classify them.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, key: &str, cancel: CancelToken) -> Result<TransportResponse>;
}

// == HTTP Transport ==
/// Production transport over a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport whose requests time out after `timeout`.
    ///
    /// # Arguments
    /// * `timeout` - Outer bound on each request
    ///
    /// # Returns
    /// * `Result<Self>` - Transport, or an error if the client cannot be built
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ipmeta/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LookupError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    async fn fetch(&self, url: &str) -> Result<TransportResponse> {
        debug!(url, "sending lookup request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        Ok(TransportResponse {
            ok: status.is_success(),
            status_code: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, key: &str, cancel: CancelToken) -> Result<TransportResponse> {
        cancel.check()?;

        let url = lookup_url(key);
        tokio::select! {
            _ = cancel.cancelled() => Err(LookupError::Cancelled),
            outcome = self.fetch(&url) => outcome,
        }
    }
}
