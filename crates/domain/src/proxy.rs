//! Forward proxy configuration.
//!
//! Holds whether and how outgoing calls are routed through a forward
//! proxy. The dispatch layer reads this state on every call; updates are
//! shallow field merges applied through [`ProxyPatch`].

use std::collections::HashMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

/// Default proxy timeout in milliseconds.
pub const DEFAULT_PROXY_TIMEOUT_MS: u64 = 30_000;

/// Credentials for proxy basic authentication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProxyAuth {
    /// Proxy username.
    pub username: String,
    /// Proxy password.
    pub password: String,
}

/// Proxy configuration for outgoing requests.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Whether to route calls through the proxy.
    #[serde(default)]
    pub enabled: bool,
    /// Proxy endpoint URL (e.g., "<http://localhost:3001>").
    #[serde(default)]
    pub url: String,
    /// Proxy authentication credentials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<ProxyAuth>,
    /// Request timeout in milliseconds when routed through the proxy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

/// Partial update for [`ProxyConfig`]; `None` fields are left untouched.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ProxyPatch {
    /// New enabled state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// New proxy URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// New credentials. `Some(None)` is not expressible; credentials are
    /// replaced, never cleared, by a patch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<ProxyAuth>,
    /// New timeout in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl ProxyConfig {
    /// Creates a disabled proxy configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an enabled proxy configuration pointing at `url`.
    #[must_use]
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            enabled: true,
            url: url.into(),
            ..Self::default()
        }
    }

    /// Sets authentication credentials.
    #[must_use]
    pub fn with_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some(ProxyAuth {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    /// Applies a shallow field merge.
    pub fn update(&mut self, patch: ProxyPatch) {
        if let Some(enabled) = patch.enabled {
            self.enabled = enabled;
        }
        if let Some(url) = patch.url {
            self.url = url;
        }
        if let Some(auth) = patch.auth {
            self.auth = Some(auth);
        }
        if let Some(timeout_ms) = patch.timeout_ms {
            self.timeout_ms = Some(timeout_ms);
        }
    }

    /// Returns a copy of this configuration with a patch applied.
    #[must_use]
    pub fn patched(&self, patch: ProxyPatch) -> Self {
        let mut copy = self.clone();
        copy.update(patch);
        copy
    }

    /// Returns true only when the proxy is enabled and has a URL.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled && !self.url.is_empty()
    }

    /// Returns the proxy authentication headers.
    ///
    /// Empty unless credentials are configured, in which case a single
    /// `Proxy-Authorization` basic-auth header is produced.
    #[must_use]
    pub fn auth_headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        if let Some(auth) = &self.auth {
            let credentials = BASE64.encode(format!("{}:{}", auth.username, auth.password));
            headers.insert(
                "Proxy-Authorization".to_string(),
                format!("Basic {credentials}"),
            );
        }
        headers
    }

    /// Returns the proxy endpoint URL.
    ///
    /// No well-formedness check is performed here; a malformed URL
    /// surfaces as a transport failure at call time.
    #[must_use]
    pub fn proxy_url(&self) -> &str {
        &self.url
    }

    /// Returns the configured timeout in milliseconds, defaulting to
    /// [`DEFAULT_PROXY_TIMEOUT_MS`].
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms.unwrap_or(DEFAULT_PROXY_TIMEOUT_MS)
    }
}
