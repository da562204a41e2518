//! Settings store port
//!
//! Read-only capability over the host's key/value store. Configuration
//! changes are pushed into the subsystem by the host; the core never
//! watches or writes the store.

/// Port for reading host-persisted settings.
pub trait SettingsStore: Send + Sync {
    /// Returns the stored value for `key`, if any.
    fn get(&self, key: &str) -> Option<String>;
}
