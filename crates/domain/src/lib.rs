//! Relay Domain - Core types for the outbound HTTP subsystem
//!
//! This crate defines the domain model for Relay: configuration for the
//! remote API and its optional forward proxy, the declarative request
//! description consumed by the generic executor, the uniform outcome
//! record, and the decoded-value model produced by the value decoder.
//! All types here are pure Rust with no I/O dependencies.

pub mod api;
pub mod auth;
pub mod error;
pub mod proxy;
pub mod request;
pub mod response;
pub mod value;

pub use api::{ApiConfig, ApiConfigPatch, Protocol};
pub use auth::AuthConfig;
pub use error::{DomainError, DomainResult};
pub use proxy::{ProxyAuth, ProxyConfig, ProxyPatch};
pub use request::{BodyType, Header, Headers, HttpMethod, QueryParam, QueryParams, RequestConfig};
pub use response::{RequestOutcome, StatusCode};
pub use value::{DecodedValue, ParseResult};
