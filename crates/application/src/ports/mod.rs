//! Ports (interfaces) for external dependencies

mod http_transport;
mod settings;

pub use http_transport::{
    HttpTransport, TransportBody, TransportError, TransportRequest, TransportResponse,
};
pub use settings::SettingsStore;
