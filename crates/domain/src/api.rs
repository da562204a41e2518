//! Remote API endpoint configuration.
//!
//! The dispatch layer reads the base URL fresh from this object on every
//! call, so updates pushed by the host are immediately visible.

use serde::{Deserialize, Serialize};

use crate::proxy::ProxyConfig;

/// URL scheme used to reach the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Plain HTTP.
    #[default]
    Http,
    /// HTTP over TLS.
    Https,
}

impl Protocol {
    /// Returns the scheme as a static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

/// Configuration for the remote control-panel API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    /// Remote host name or address.
    pub host: String,
    /// Remote port.
    pub port: u16,
    /// URL scheme.
    #[serde(default)]
    pub protocol: Protocol,
    /// Optional forward proxy settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxyConfig>,
}

/// Partial update for [`ApiConfig`]; `None` fields are left untouched.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ApiConfigPatch {
    /// New host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// New port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// New protocol.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,
    /// New proxy block (replaces the whole block).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxyConfig>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 26538,
            protocol: Protocol::Http,
            proxy: None,
        }
    }
}

impl ApiConfig {
    /// Creates a configuration with the built-in defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the base URL, e.g. `http://127.0.0.1:26538`.
    #[must_use]
    pub fn full_url(&self) -> String {
        format!("{}://{}:{}", self.protocol.as_str(), self.host, self.port)
    }

    /// Applies a shallow field merge.
    pub fn update(&mut self, patch: ApiConfigPatch) {
        if let Some(host) = patch.host {
            self.host = host;
        }
        if let Some(port) = patch.port {
            self.port = port;
        }
        if let Some(protocol) = patch.protocol {
            self.protocol = protocol;
        }
        if let Some(proxy) = patch.proxy {
            self.proxy = Some(proxy);
        }
    }
}
