//! Decoded value model
//!
//! The value decoder turns raw response text into a best-guess typed
//! value. This module holds the value representation and the detailed
//! parse result reported for diagnostics.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use serde::Serialize;
use url::Url;

/// A typed value inferred from raw text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodedValue {
    /// Explicit absence (`null`, `undefined`, `none`, or an empty 204 body).
    Null,
    /// A boolean-like token.
    Bool(bool),
    /// A numeric literal.
    Number(serde_json::Number),
    /// Plain text (also the fallback when no strategy matches).
    Text(String),
    /// Structured JSON data.
    Json(serde_json::Value),
    /// An ISO-8601 date or date-time.
    DateTime(DateTime<Utc>),
    /// A well-formed absolute URL.
    Url(Url),
    /// A comma-separated list, elements decoded recursively.
    List(Vec<DecodedValue>),
    /// Opaque binary payload.
    Bytes(Vec<u8>),
}

impl DecodedValue {
    /// Returns true for [`DecodedValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the boolean value, if this is one.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the text content, if this is plain text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the numeric value as an `i64`, if it fits.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// Returns the numeric value as an `f64`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Returns the structured JSON value, if this is one.
    #[must_use]
    pub const fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(v) => Some(v),
            _ => None,
        }
    }

    /// Byte length of the payload: 0 for null, natural length for
    /// text/bytes, plain serialized length for everything else.
    ///
    /// The measurement covers the payload alone, never the variant tag,
    /// so `{"a":1}` reports 7 bytes whichever way it was decoded.
    #[must_use]
    pub fn byte_size(&self) -> usize {
        match self {
            Self::Null => 0,
            Self::Text(s) => s.len(),
            Self::Bytes(b) => b.len(),
            other => other.to_json_value().to_string().len(),
        }
    }

    /// Renders the payload as plain JSON, without the variant tag.
    ///
    /// Dates become RFC 3339 strings, URLs their text form, and binary
    /// payloads base64 text.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => serde_json::Value::Number(n.clone()),
            Self::Text(s) => serde_json::Value::String(s.clone()),
            Self::Json(v) => v.clone(),
            Self::DateTime(dt) => serde_json::Value::String(dt.to_rfc3339()),
            Self::Url(u) => serde_json::Value::String(u.to_string()),
            Self::List(items) => {
                serde_json::Value::Array(items.iter().map(Self::to_json_value).collect())
            }
            Self::Bytes(b) => serde_json::Value::String(BASE64.encode(b)),
        }
    }
}

/// Outcome of a decode attempt, including which strategy produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseResult {
    /// Whether decoding produced a usable value (always true; kept for
    /// shape uniformity with the outcome record).
    pub success: bool,
    /// The decoded value.
    pub value: DecodedValue,
    /// Name of the strategy that produced the value, or `"string"` for
    /// the pass-through fallback.
    pub strategy: String,
    /// Last strategy error observed before falling through, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ParseResult {
    /// Creates a successful result from a strategy.
    #[must_use]
    pub fn matched(value: DecodedValue, strategy: impl Into<String>) -> Self {
        Self {
            success: true,
            value,
            strategy: strategy.into(),
            error: None,
        }
    }

    /// Creates the pass-through string fallback result.
    #[must_use]
    pub fn fallback(text: impl Into<String>, error: Option<String>) -> Self {
        Self {
            success: true,
            value: DecodedValue::Text(text.into()),
            strategy: "string".to_string(),
            error,
        }
    }
}
