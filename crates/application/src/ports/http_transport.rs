//! HTTP transport port
//!
//! The core never performs network I/O itself; it hands a fully built
//! request to whatever transport the host injects. The adapter in the
//! infrastructure crate implements this trait with reqwest.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use relay_domain::HttpMethod;

/// A fully built outgoing request.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute target URL.
    pub url: String,
    /// Flat header list.
    pub headers: Vec<(String, String)>,
    /// Request payload.
    pub body: TransportBody,
    /// Cancellation deadline for this call.
    pub timeout: Duration,
}

impl TransportRequest {
    /// Creates a bodyless request.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: TransportBody::Empty,
            timeout,
        }
    }

    /// Returns the first header value matching `key` (case-insensitive).
    #[must_use]
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// Request payload handed to the transport.
///
/// Multipart carries text fields only; the adapter owns boundary and
/// content-type handling for it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TransportBody {
    /// No body.
    #[default]
    Empty,
    /// Text payload (JSON, plain text, urlencoded, raw).
    Text(String),
    /// Multipart form fields.
    Multipart(Vec<(String, String)>),
}

/// A received response with its body fully read.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers in arrival order.
    pub headers: Vec<(String, String)>,
    /// Raw body bytes.
    pub body: Vec<u8>,
}

/// Transport-level failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The call exceeded its deadline.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// The deadline that was exceeded, in milliseconds.
        timeout_ms: u64,
    },

    /// DNS resolution failed.
    #[error("DNS resolution failed for {host}: {message}")]
    Dns {
        /// The host that could not be resolved.
        host: String,
        /// Resolver error detail.
        message: String,
    },

    /// The remote host refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// The connection failed for another reason.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The request URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

/// Port for executing HTTP requests.
///
/// This trait abstracts the HTTP client implementation, allowing the
/// application layer to be independent of specific HTTP libraries.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Executes a request and returns the response with its body read.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when no response could be obtained
    /// (network failure, timeout, malformed URL). A non-2xx status is a
    /// normal response, not an error.
    async fn call(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}
