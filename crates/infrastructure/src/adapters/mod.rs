//! Adapter implementations of the application ports

mod memory_settings;
mod reqwest_transport;

pub use memory_settings::MemorySettings;
pub use reqwest_transport::ReqwestTransport;
