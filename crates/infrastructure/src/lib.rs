//! Relay Infrastructure - adapters for external systems
//!
//! Implements the application layer's ports: the reqwest-backed HTTP
//! transport and an in-memory settings store for hosts and tests.

pub mod adapters;

pub use adapters::{MemorySettings, ReqwestTransport};
