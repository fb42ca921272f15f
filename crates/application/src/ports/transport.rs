//! HTTP transport port

use std::future::Future;
use std::pin::Pin;

use quay_domain::{ApiRequest, ApiResponse};
use thiserror::Error;

/// Failures that happen before a response is received.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The base URL and path do not form a valid URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// No response within the configured timeout.
    #[error("request timed out after {timeout_ms} ms")]
    Timeout {
        /// Timeout that elapsed.
        timeout_ms: u64,
    },

    /// The server refused the connection.
    #[error("connection refused by {host}")]
    ConnectionRefused {
        /// Target host.
        host: String,
    },

    /// Connecting failed for another reason (DNS, TLS, reset).
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The request body could not be built.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// Anything else reported by the HTTP stack.
    #[error("{0}")]
    Other(String),
}

/// Boxed future returned by [`Transport::send`].
pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ApiResponse, TransportError>> + Send + 'a>>;

/// Port for sending a single HTTP request.
///
/// Implementations send exactly what they are given: authentication and
/// retries are the dispatcher's job.
pub trait Transport: Send + Sync {
    /// Sends the request and returns the response, whatever its status.
    fn send(&self, request: &ApiRequest) -> TransportFuture<'_>;
}
