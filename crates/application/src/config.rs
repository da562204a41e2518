//! Seeding the API configuration from the host settings store

use relay_domain::{ApiConfig, ProxyConfig};

use crate::ports::SettingsStore;

/// Keys under which the host persists connection settings.
pub mod keys {
    /// Remote API host.
    pub const API_URL: &str = "apiURL";
    /// Remote API port.
    pub const API_PORT: &str = "apiPORT";
    /// Proxy enabled switch.
    pub const PROXY_ENABLED: &str = "proxyEnabled";
    /// Proxy endpoint URL.
    pub const PROXY_URL: &str = "proxyURL";
}

/// Proxy endpoint used when the store has none.
pub const DEFAULT_PROXY_URL: &str = "http://localhost:3001";

/// Builds an [`ApiConfig`] seeded from the settings store.
///
/// Missing or empty entries fall back to the built-in defaults; a
/// malformed port is ignored. The proxy block is always present, with
/// `enabled` defaulting to true when the store has no opinion.
pub fn load_api_config(store: &dyn SettingsStore) -> ApiConfig {
    let mut config = ApiConfig::default();

    if let Some(host) = store.get(keys::API_URL)
        && !host.is_empty()
    {
        config.host = host;
    }
    if let Some(port) = store.get(keys::API_PORT) {
        match port.parse() {
            Ok(port) => config.port = port,
            Err(_) => tracing::warn!(port, "ignoring malformed stored port"),
        }
    }

    let enabled = store
        .get(keys::PROXY_ENABLED)
        .map_or(true, |v| v.eq_ignore_ascii_case("true") || v == "1");
    let url = store
        .get(keys::PROXY_URL)
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_PROXY_URL.to_string());
    config.proxy = Some(ProxyConfig {
        enabled,
        url,
        auth: None,
        timeout_ms: None,
    });

    config
}
