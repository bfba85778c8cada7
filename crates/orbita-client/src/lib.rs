//! Orbita content client
//!
//! This crate provides the data-fetching core of Orbita Explorer: the HTTP
//! fetch wrapper, envelope unwrapping, the cursor pager and the
//! full-collection aggregator that the content services are built on.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aggregate;
pub mod config;
pub mod envelope;
pub mod fetch;
pub mod pager;
pub mod retry;
pub mod telemetry;

#[cfg(test)]
mod test_utils;

pub use aggregate::{fetch_all, Aggregator};
pub use config::ClientConfig;
pub use envelope::EnvelopeLayout;
pub use fetch::{FetchRequest, HttpFetcher};
pub use pager::{CursorPager, HttpPager, Page};
pub use retry::{network_retry, RetryPolicy};
pub use telemetry::{init_tracing, RecordingTelemetry, Telemetry, TracingTelemetry};
pub use tokio_util::sync::CancellationToken;

/// Result type for content fetching operations
pub type Result<T> = std::result::Result<T, FetchError>;

/// Discriminant of a [`FetchError`], for callers that branch on the kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Transport failure (DNS, connection refused, reset)
    Network,
    /// Non-success HTTP status
    Http,
    /// Body was not valid JSON
    MalformedResponse,
    /// Valid JSON without the expected envelope fields
    InvalidShape,
    /// Request exceeded its deadline
    Timeout,
    /// Caller cancelled the operation
    Cancelled,
    /// Caller supplied an invalid argument
    InvalidInput,
}

/// Error types for content fetching operations
///
/// Errors travel unchanged from the fetch wrapper through the pager and the
/// aggregator, so callers can match on the variant they care about.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status with the raw response body
    #[error("HTTP error ({status}): {body}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Raw response body, kept for diagnostics
        body: String,
    },

    /// Response body is not valid JSON
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Response is JSON but not the expected envelope
    #[error("Invalid response shape: {0}")]
    InvalidShape(String),

    /// Request deadline expired
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Operation cancelled before completion
    #[error("Operation cancelled")]
    Cancelled,

    /// Invalid argument
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl FetchError {
    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Network(_) => ErrorKind::Network,
            FetchError::Http { .. } => ErrorKind::Http,
            FetchError::MalformedResponse(_) => ErrorKind::MalformedResponse,
            FetchError::InvalidShape(_) => ErrorKind::InvalidShape,
            FetchError::Timeout(_) => ErrorKind::Timeout,
            FetchError::Cancelled => ErrorKind::Cancelled,
            FetchError::InvalidInput(_) => ErrorKind::InvalidInput,
        }
    }

    /// Check if this is a connectivity failure
    ///
    /// Timeouts count as network failures.
    pub fn is_network_error(&self) -> bool {
        matches!(self, FetchError::Network(_) | FetchError::Timeout(_))
    }

    /// HTTP status code, if the backend answered with one
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Classify a transport error from `reqwest`
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}
