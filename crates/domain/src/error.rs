//! Domain error types

use thiserror::Error;

/// Errors produced by domain-level validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    /// A request configuration is missing its target URL.
    #[error("request URL is required")]
    MissingUrl,

    /// A JSON body failed to parse.
    #[error("invalid JSON body: {0}")]
    InvalidJsonBody(String),

    /// An HTTP method string could not be recognized.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// A generic validation failure.
    #[error("validation error: {0}")]
    Validation(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
