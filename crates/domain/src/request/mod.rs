//! Request model types

mod body;
mod header;
mod method;
mod query;
mod spec;

pub use body::BodyType;
pub use header::{Header, Headers};
pub use method::HttpMethod;
pub use query::{QueryParam, QueryParams};
pub use spec::RequestConfig;
