//! Declarative request description

use serde::{Deserialize, Serialize};

use super::{BodyType, Headers, HttpMethod, QueryParams};
use crate::auth::AuthConfig;
use crate::error::{DomainError, DomainResult};

/// Complete declarative description of one ad-hoc HTTP request.
///
/// This is the input of the generic request executor: everything needed
/// to build and run a single call (method, headers, query params, typed
/// body, auth). Disabled header/param entries are ignored at build time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestConfig {
    /// Human-readable name
    #[serde(default)]
    pub name: String,
    /// Target URL
    pub url: String,
    /// HTTP method
    pub method: HttpMethod,
    /// HTTP headers
    #[serde(default)]
    pub headers: Headers,
    /// Query parameters
    #[serde(default)]
    pub params: QueryParams,
    /// Raw body content
    #[serde(default)]
    pub body: String,
    /// How the body content is interpreted
    #[serde(default)]
    pub body_type: BodyType,
    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,
}

impl RequestConfig {
    /// Creates a new request description with default values.
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            method,
            headers: Headers::new(),
            params: QueryParams::new(),
            body: String::new(),
            body_type: BodyType::default(),
            auth: AuthConfig::default(),
        }
    }

    /// Creates a GET request with the given URL.
    #[must_use]
    pub fn get(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(name, url, HttpMethod::Get)
    }

    /// Validates the description before any network activity.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MissingUrl`] when the URL is empty, and
    /// [`DomainError::InvalidJsonBody`] when a JSON-typed body is
    /// non-blank but fails to parse.
    pub fn validate(&self) -> DomainResult<()> {
        if self.url.trim().is_empty() {
            return Err(DomainError::MissingUrl);
        }

        if self.body_type == BodyType::Json && !self.body.trim().is_empty() {
            serde_json::from_str::<serde_json::Value>(&self.body)
                .map_err(|e| DomainError::InvalidJsonBody(e.to_string()))?;
        }

        Ok(())
    }
}
