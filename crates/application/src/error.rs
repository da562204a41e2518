//! Application error types

use thiserror::Error;

use crate::ports::TransportError;
use relay_domain::DomainError;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// The network transport failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
