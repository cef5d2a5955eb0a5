//! Error types for the lookup layer
//!
//! Provides unified error handling using thiserror. Every failure mode of a
//! lookup lands here; the fetch controller turns these into observable state
//! rather than letting them escape.

use thiserror::Error;

// == Lookup Error Enum ==
/// Unified error type for lookup operations.
#[derive(Error, Debug)]
pub enum LookupError {
    /// Response arrived with a non-success status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),

    /// The transport could not complete the request
    #[error("Request failed: {0}")]
    Transport(String),

    /// Response body did not parse as the expected payload
    #[error("Invalid response payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// The in-flight operation was cancelled before settling
    #[error("Request cancelled")]
    Cancelled,
}

impl LookupError {
    // == Classification ==
    /// True for the cooperative-cancellation marker, which maps to the idle
    /// state instead of an error state.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, LookupError::Cancelled)
    }

    /// True for failures that a retry of the same key could resolve.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, LookupError::HttpStatus(_) | LookupError::Transport(_))
    }

    /// Returns the HTTP status code for status-derived errors.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            LookupError::HttpStatus(code) => Some(*code),
            _ => None,
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the lookup layer.
pub type Result<T> = std::result::Result<T, LookupError>;
