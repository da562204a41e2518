//! Declarative request execution
//!
//! Takes a [`RequestConfig`] and turns it into a transport call:
//! validation, URL assembly from enabled params, header assembly with
//! auth injection, body encoding per body type, then response decoding
//! into a [`RequestOutcome`]. Execution never returns an error; every
//! failure becomes an outcome with `success == false`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use relay_domain::{BodyType, DecodedValue, RequestConfig, RequestOutcome};

use crate::ports::{HttpTransport, TransportBody, TransportError, TransportRequest};

const DEFAULT_EXECUTE_TIMEOUT: Duration = Duration::from_secs(30);

/// Executes declarative request configurations over a transport.
pub struct RequestExecutor<T: HttpTransport> {
    transport: Arc<T>,
    default_timeout: Duration,
}

impl<T: HttpTransport> Clone for RequestExecutor<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            default_timeout: self.default_timeout,
        }
    }
}

impl<T: HttpTransport + 'static> RequestExecutor<T> {
    /// Creates an executor over `transport` with a 30s default timeout.
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            default_timeout: DEFAULT_EXECUTE_TIMEOUT,
        }
    }

    /// Creates an executor with a custom default timeout.
    pub const fn with_timeout(transport: Arc<T>, default_timeout: Duration) -> Self {
        Self {
            transport,
            default_timeout,
        }
    }

    /// Executes one request configuration.
    ///
    /// Validation failures, transport failures and timeouts all come
    /// back as a failure outcome; a non-2xx status is a normal outcome.
    pub async fn execute(
        &self,
        config: &RequestConfig,
        timeout: Option<Duration>,
    ) -> RequestOutcome {
        let started = Instant::now();
        let elapsed_ms = |started: Instant| u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        if let Err(error) = config.validate() {
            return RequestOutcome::failure(error.to_string(), elapsed_ms(started));
        }

        let url = build_effective_url(config);
        let (body, body_content_type) = build_body(config);
        let headers = build_headers(config, body_content_type);

        let timeout = timeout.unwrap_or(self.default_timeout);
        let mut request = TransportRequest::new(config.method, url, timeout);
        request.headers = headers;
        request.body = body;

        tracing::debug!(method = %config.method, url = %request.url, "executing request");

        match self.transport.call(request).await {
            Ok(response) => {
                let duration_ms = elapsed_ms(started);
                let headers: HashMap<String, String> = response.headers.into_iter().collect();
                let data = decode_response_body(response.status, &headers, &response.body);
                RequestOutcome::from_response(response.status, headers, data, duration_ms)
            }
            Err(error) => {
                let message = match error {
                    TransportError::Timeout { timeout_ms } => {
                        format!("Request timed out after {timeout_ms}ms")
                    }
                    other => other.to_string(),
                };
                RequestOutcome::failure(message, elapsed_ms(started))
            }
        }
    }

    /// Executes several configurations concurrently.
    ///
    /// Outcomes are returned in input order, and one request panicking
    /// or failing never disturbs its siblings.
    pub async fn execute_multiple(&self, configs: Vec<RequestConfig>) -> Vec<RequestOutcome> {
        let handles: Vec<_> = configs
            .into_iter()
            .map(|config| {
                let executor = self.clone();
                tokio::spawn(async move { executor.execute(&config, None).await })
            })
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(join_error) => {
                    outcomes.push(RequestOutcome::failure(join_error.to_string(), 0));
                }
            }
        }
        outcomes
    }
}

/// Appends enabled, non-blank query params to the configured URL.
///
/// Keys are trimmed; values are kept verbatim. An unparseable base URL
/// is passed through untouched and left for the transport to reject.
fn build_effective_url(config: &RequestConfig) -> String {
    let enabled: Vec<_> = config
        .params
        .enabled()
        .filter(|p| !p.key.trim().is_empty())
        .collect();
    if enabled.is_empty() {
        return config.url.clone();
    }

    match url::Url::parse(&config.url) {
        Ok(mut url) => {
            {
                let mut pairs = url.query_pairs_mut();
                for param in enabled {
                    pairs.append_pair(param.key.trim(), &param.value);
                }
            }
            url.into()
        }
        Err(error) => {
            tracing::warn!(%error, url = %config.url, "could not parse URL, sending as-is");
            config.url.clone()
        }
    }
}

/// Collects enabled headers, injects the auth header and the body's
/// content type. Caller-provided headers win: injection only happens
/// when the header is absent (checked case-insensitively).
fn build_headers(
    config: &RequestConfig,
    body_content_type: Option<&'static str>,
) -> Vec<(String, String)> {
    let mut headers: Vec<(String, String)> = config
        .headers
        .enabled()
        .filter(|h| !h.key.trim().is_empty())
        .map(|h| (h.key.trim().to_string(), h.value.clone()))
        .collect();

    let has = |headers: &[(String, String)], key: &str| {
        headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(key))
    };

    if let Some(auth) = config.auth.authorization_value()
        && !has(&headers, "authorization")
    {
        headers.push(("Authorization".to_string(), auth));
    }
    if let Some(content_type) = body_content_type
        && !has(&headers, "content-type")
    {
        headers.push(("Content-Type".to_string(), content_type.to_string()));
    }

    headers
}

/// Encodes the configured body per its body type.
///
/// Returns the transport body and the content type to inject. Bodyless
/// methods and blank bodies produce an empty body with no content type.
fn build_body(config: &RequestConfig) -> (TransportBody, Option<&'static str>) {
    if !config.method.allows_body() || config.body.trim().is_empty() {
        return (TransportBody::Empty, None);
    }

    match config.body_type {
        BodyType::Json => {
            // validate() already proved this parses.
            match serde_json::from_str::<serde_json::Value>(&config.body) {
                Ok(value) => (
                    TransportBody::Text(value.to_string()),
                    Some(BodyType::Json.content_type().unwrap_or("application/json")),
                ),
                Err(_) => (TransportBody::Text(config.body.clone()), None),
            }
        }
        BodyType::Text => (
            TransportBody::Text(config.body.clone()),
            BodyType::Text.content_type(),
        ),
        BodyType::Form => (TransportBody::Multipart(parse_line_pairs(&config.body)), None),
        BodyType::UrlEncoded => (
            TransportBody::Text(encode_urlencoded(&config.body)),
            BodyType::UrlEncoded.content_type(),
        ),
        BodyType::Raw => (TransportBody::Text(config.body.clone()), None),
    }
}

/// Splits a `key=value`-per-line body into pairs. Keys are trimmed and
/// blank keys dropped; lines without `=` are ignored.
fn parse_line_pairs(body: &str) -> Vec<(String, String)> {
    body.lines()
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), value.to_string()))
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

/// Encodes an urlencoded body.
///
/// A single-line body with `=` and no spaces is treated as already
/// urlencoded and re-encoded pair-wise; anything else is read as
/// `key=value` lines and percent-encoded.
fn encode_urlencoded(body: &str) -> String {
    let trimmed = body.trim();
    let pairs: Vec<(String, String)> =
        if trimmed.contains('=') && !trimmed.contains('\n') && !trimmed.contains(' ') {
            url::form_urlencoded::parse(trimmed.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect()
        } else {
            parse_line_pairs(trimmed)
        };
    serde_urlencoded::to_string(&pairs).unwrap_or_else(|_| trimmed.to_string())
}

/// Decodes the response body according to its content type.
fn decode_response_body(
    status: u16,
    headers: &HashMap<String, String>,
    body: &[u8],
) -> DecodedValue {
    if status == 204 && body.is_empty() {
        return DecodedValue::Null;
    }

    let header = |key: &str| {
        headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.to_ascii_lowercase())
    };
    let content_type = header("content-type").unwrap_or_default();

    if content_type.contains("application/json") {
        return match serde_json::from_slice(body) {
            Ok(value) => DecodedValue::Json(value),
            Err(_) => DecodedValue::Text(String::from_utf8_lossy(body).into_owned()),
        };
    }
    if content_type.starts_with("text/") {
        return DecodedValue::Text(String::from_utf8_lossy(body).into_owned());
    }

    let is_binary = content_type.contains("application/octet-stream")
        || content_type.starts_with("image/")
        || content_type.starts_with("audio/")
        || content_type.starts_with("video/")
        || header("content-disposition").is_some_and(|v| v.contains("attachment"));
    if is_binary {
        return DecodedValue::Bytes(body.to_vec());
    }

    DecodedValue::Text(String::from_utf8_lossy(body).into_owned())
}
