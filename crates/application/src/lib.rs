//! Relay Application - services for resilient outbound HTTP
//!
//! This crate contains the subsystem's behavior: the proxy-aware dispatch
//! layer, the generic request executor, the rate-limited request queue,
//! the value decoder, and the ports that abstract the host environment
//! (network transport, key/value settings).

pub mod config;
pub mod decoder;
pub mod dispatch;
pub mod error;
pub mod executor;
pub mod ports;
pub mod queue;

pub use decoder::{Strategy, StrategyKind, ValueDecoder};
pub use dispatch::{CallOptions, DispatchBody, DispatchPath, DispatchResult, Dispatcher};
pub use error::{ApplicationError, ApplicationResult};
pub use executor::RequestExecutor;
pub use queue::{RequestQueue, UpdateDebouncer};
