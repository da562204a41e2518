//! Uniform request outcome record
//!
//! Every executor call resolves to a [`RequestOutcome`], success or not,
//! so callers never need a separate error channel for ordinary remote
//! failures.

use std::collections::HashMap;

use serde::Serialize;

use crate::value::DecodedValue;

/// HTTP status code with semantic helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatusCode(pub u16);

impl StatusCode {
    /// Creates a new `StatusCode`.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric status code.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Returns true if this is a 2xx success status.
    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Returns the canonical reason phrase for common status codes.
    #[must_use]
    pub const fn reason_phrase(self) -> &'static str {
        match self.0 {
            200 => "OK",
            201 => "Created",
            202 => "Accepted",
            204 => "No Content",
            301 => "Moved Permanently",
            302 => "Found",
            304 => "Not Modified",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            408 => "Request Timeout",
            409 => "Conflict",
            422 => "Unprocessable Entity",
            429 => "Too Many Requests",
            500 => "Internal Server Error",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            504 => "Gateway Timeout",
            _ => "Unknown",
        }
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.0, self.reason_phrase())
    }
}

/// Normalized result of one executed request.
///
/// `success` derives from the transport-level status, never from the
/// payload. `data` and `error` are both always present for shape
/// uniformity; exactly one of them is meaningful.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestOutcome {
    /// Whether the transport reported a 2xx status.
    pub success: bool,
    /// HTTP status code; 0 when no response was obtained.
    pub status: u16,
    /// Reason phrase, or `"Error"` when no response was obtained.
    pub status_text: String,
    /// Flattened response headers.
    pub headers: HashMap<String, String>,
    /// Decoded payload; [`DecodedValue::Null`] on the failure path.
    pub data: DecodedValue,
    /// Failure description; `None` on the success path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall-clock duration in whole milliseconds.
    pub duration_ms: u64,
    /// Payload size in bytes.
    pub size: usize,
}

impl RequestOutcome {
    /// Builds an outcome from a received response.
    #[must_use]
    pub fn from_response(
        status: impl Into<StatusCode>,
        headers: HashMap<String, String>,
        data: DecodedValue,
        duration_ms: u64,
    ) -> Self {
        let status = status.into();
        let size = data.byte_size();
        Self {
            success: status.is_success(),
            status: status.as_u16(),
            status_text: status.reason_phrase().to_string(),
            headers,
            data,
            error: None,
            duration_ms,
            size,
        }
    }

    /// Builds the uniform failure shape used when no response was
    /// obtained (validation, transport, or timeout failure).
    #[must_use]
    pub fn failure(error: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            success: false,
            status: 0,
            status_text: "Error".to_string(),
            headers: HashMap::new(),
            data: DecodedValue::Null,
            error: Some(error.into()),
            duration_ms,
            size: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_helpers() {
        assert!(StatusCode::new(204).is_success());
        assert!(!StatusCode::new(404).is_success());
        assert_eq!(StatusCode::new(200).to_string(), "200 OK");
        assert_eq!(StatusCode::new(404).to_string(), "404 Not Found");
    }

    #[test]
    fn test_outcome_from_response() {
        let outcome = RequestOutcome::from_response(
            200,
            HashMap::new(),
            DecodedValue::Text("ok".into()),
            12,
        );
        assert!(outcome.success);
        assert_eq!(outcome.status_text, "OK");
        assert_eq!(outcome.size, 2);
        assert_eq!(outcome.error, None);
    }

    #[test]
    fn test_outcome_failure_shape() {
        let outcome = RequestOutcome::failure("boom", 3);
        assert!(!outcome.success);
        assert_eq!(outcome.status, 0);
        assert_eq!(outcome.data, DecodedValue::Null);
        assert_eq!(outcome.error, Some("boom".to_string()));
        assert_eq!(outcome.size, 0);
    }

    #[test]
    fn test_non_2xx_is_not_a_failure_shape() {
        let outcome = RequestOutcome::from_response(
            404,
            HashMap::new(),
            DecodedValue::Text("missing".into()),
            5,
        );
        assert!(!outcome.success);
        // Still a normal response outcome: data present, no error.
        assert_eq!(outcome.error, None);
        assert_eq!(outcome.status_text, "Not Found");
    }
}
