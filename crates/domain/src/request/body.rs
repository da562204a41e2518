//! Request body typing

use serde::{Deserialize, Serialize};

/// How the raw body string of a [`super::RequestConfig`] is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BodyType {
    /// JSON content; the body must parse and is re-serialized canonically.
    #[default]
    Json,
    /// Plain text passed through verbatim.
    Text,
    /// Newline-separated `key=value` pairs sent as a multipart form.
    Form,
    /// URL-encoded form content.
    UrlEncoded,
    /// Untyped content passed through as-is, no content type inferred.
    Raw,
}

impl BodyType {
    /// Returns the content type injected for this body kind, if any.
    ///
    /// `Form` returns `None`: the transport sets the multipart content
    /// type itself so the boundary is correct. `Raw` infers nothing.
    #[must_use]
    pub const fn content_type(self) -> Option<&'static str> {
        match self {
            Self::Json => Some("application/json"),
            Self::Text => Some("text/plain"),
            Self::UrlEncoded => Some("application/x-www-form-urlencoded"),
            Self::Form | Self::Raw => None,
        }
    }
}
