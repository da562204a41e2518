//! In-memory settings store.
//!
//! Backs the `SettingsStore` port with a plain map. Hosts seed it with
//! their persisted values; tests use it directly.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use relay_application::ports::SettingsStore;

/// A thread-safe, map-backed settings store.
#[derive(Debug, Default)]
pub struct MemorySettings {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySettings {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded from an iterator of key/value pairs.
    pub fn seeded<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Inserts or replaces a value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
    }

    /// Removes a value, returning it if present.
    pub fn unset(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_set_get_unset() {
        let store = MemorySettings::new();
        assert_eq!(store.get("apiURL"), None);

        store.set("apiURL", "panel.local");
        assert_eq!(store.get("apiURL"), Some("panel.local".to_string()));

        assert_eq!(store.unset("apiURL"), Some("panel.local".to_string()));
        assert_eq!(store.get("apiURL"), None);
    }

    #[test]
    fn test_seeded() {
        let store = MemorySettings::seeded([("proxyEnabled", "false")]);
        assert_eq!(store.get("proxyEnabled"), Some("false".to_string()));
    }
}
