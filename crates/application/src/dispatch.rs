//! Proxy-aware request dispatch
//!
//! The dispatcher is the convenience surface for internal API calls:
//! verb helpers build a transport request, route it through the proxy
//! when one is enabled, and fall back to a direct call when the proxied
//! attempt fails. The result is tagged with the path actually taken so
//! callers can see whether the fallback fired.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use relay_domain::{DecodedValue, HttpMethod, ProxyConfig, ProxyPatch};

use crate::decoder::ValueDecoder;
use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::{HttpTransport, TransportBody, TransportRequest, TransportResponse};

/// Header carrying the url-encoded original target through the proxy.
pub const PROXY_TARGET_HEADER: &str = "X-Proxy-Target";

const DEFAULT_DISPATCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-call options for a dispatched request.
#[derive(Debug, Default)]
pub struct CallOptions {
    /// Extra headers; they override the dispatcher's own defaults.
    pub headers: HashMap<String, String>,
    /// Forces the routing decision; `None` follows the proxy config.
    pub use_proxy: Option<bool>,
    /// Overlay applied to the proxy config for this call only.
    pub proxy_override: Option<ProxyPatch>,
}

impl CallOptions {
    /// Options that bypass the proxy regardless of configuration.
    #[must_use]
    pub fn direct() -> Self {
        Self {
            use_proxy: Some(false),
            ..Self::default()
        }
    }
}

/// Payload for a dispatched request.
#[derive(Debug, Clone)]
pub enum DispatchBody {
    /// JSON value, serialized and sent as `application/json`.
    Json(serde_json::Value),
    /// Multipart form fields; the transport sets the content type.
    Form(Vec<(String, String)>),
}

/// Which route ultimately produced the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchPath {
    /// Sent straight to the target.
    Direct,
    /// Sent through the proxy.
    Proxied,
    /// The proxied attempt failed; the direct retry answered.
    ProxiedThenDirect,
}

/// Outcome of a successful dispatch.
#[derive(Debug)]
pub struct DispatchResult {
    /// HTTP status of the answering response.
    pub status: u16,
    /// Decoded body; `None` for 204 or an empty body.
    pub value: Option<DecodedValue>,
    /// The route that produced this response.
    pub path: DispatchPath,
}

/// Routes internal API calls directly or through the configured proxy.
pub struct Dispatcher<T: HttpTransport> {
    transport: Arc<T>,
    proxy: Arc<RwLock<ProxyConfig>>,
    decoder: ValueDecoder,
    default_timeout: Duration,
}

impl<T: HttpTransport> Dispatcher<T> {
    /// Creates a dispatcher over `transport` with the given proxy config.
    pub fn new(transport: Arc<T>, proxy: ProxyConfig) -> Self {
        Self {
            transport,
            proxy: Arc::new(RwLock::new(proxy)),
            decoder: ValueDecoder::new(),
            default_timeout: DEFAULT_DISPATCH_TIMEOUT,
        }
    }

    /// Replaces the proxy configuration for subsequent calls.
    pub fn set_proxy(&self, proxy: ProxyConfig) {
        *self
            .proxy
            .write()
            .unwrap_or_else(PoisonError::into_inner) = proxy;
    }

    /// Returns a snapshot of the current proxy configuration.
    #[must_use]
    pub fn proxy_config(&self) -> ProxyConfig {
        self.proxy
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Dispatches a GET request.
    ///
    /// # Errors
    ///
    /// Fails when neither the proxied nor the direct attempt produced a
    /// response, or when the body is not valid UTF-8.
    pub async fn get(&self, url: &str, options: CallOptions) -> ApplicationResult<DispatchResult> {
        self.dispatch(HttpMethod::Get, url, None, options).await
    }

    /// Dispatches a DELETE request.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Dispatcher::get`].
    pub async fn delete(
        &self,
        url: &str,
        options: CallOptions,
    ) -> ApplicationResult<DispatchResult> {
        self.dispatch(HttpMethod::Delete, url, None, options).await
    }

    /// Dispatches a POST request with a body.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Dispatcher::get`].
    pub async fn post(
        &self,
        url: &str,
        body: DispatchBody,
        options: CallOptions,
    ) -> ApplicationResult<DispatchResult> {
        self.dispatch(HttpMethod::Post, url, Some(body), options)
            .await
    }

    /// Dispatches a PUT request with a body.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Dispatcher::get`].
    pub async fn put(
        &self,
        url: &str,
        body: DispatchBody,
        options: CallOptions,
    ) -> ApplicationResult<DispatchResult> {
        self.dispatch(HttpMethod::Put, url, Some(body), options)
            .await
    }

    /// Dispatches a PATCH request with a body.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Dispatcher::get`].
    pub async fn patch(
        &self,
        url: &str,
        body: DispatchBody,
        options: CallOptions,
    ) -> ApplicationResult<DispatchResult> {
        self.dispatch(HttpMethod::Patch, url, Some(body), options)
            .await
    }

    async fn dispatch(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<DispatchBody>,
        options: CallOptions,
    ) -> ApplicationResult<DispatchResult> {
        let (transport_body, mut headers) = build_body(body);
        match &transport_body {
            TransportBody::Multipart(_) => {
                // The transport owns the multipart boundary; a caller
                // Content-Type would corrupt it.
                headers.extend(
                    options
                        .headers
                        .into_iter()
                        .filter(|(k, _)| !k.eq_ignore_ascii_case("content-type")),
                );
            }
            _ => headers.extend(options.headers),
        }

        let snapshot = self.proxy_config();
        let effective = match options.proxy_override {
            Some(overlay) => snapshot.patched(overlay),
            None => snapshot,
        };
        let use_proxy = options.use_proxy.unwrap_or_else(|| effective.is_enabled());

        if !use_proxy || !effective.is_enabled() {
            let request = self.build_request(method, url.to_string(), &headers, &transport_body);
            let response = self.transport.call(request).await?;
            return self.finish(response, DispatchPath::Direct);
        }

        let proxied = self.build_proxied_request(method, url, &headers, &transport_body, &effective);
        // A proxied reply that cannot be read counts as a proxy failure
        // too, so the whole attempt sits inside the fallback.
        let proxy_error = match self.transport.call(proxied).await {
            Ok(response) => match self.finish(response, DispatchPath::Proxied) {
                Ok(result) => return Ok(result),
                Err(error) => error,
            },
            Err(error) => error.into(),
        };
        tracing::warn!(%proxy_error, url, "proxy attempt failed, retrying direct");
        let request = self.build_request(method, url.to_string(), &headers, &transport_body);
        let response = self.transport.call(request).await?;
        self.finish(response, DispatchPath::ProxiedThenDirect)
    }

    fn build_request(
        &self,
        method: HttpMethod,
        url: String,
        headers: &[(String, String)],
        body: &TransportBody,
    ) -> TransportRequest {
        let mut request = TransportRequest::new(method, url, self.default_timeout);
        request.headers = headers.to_vec();
        request.body = body.clone();
        request
    }

    fn build_proxied_request(
        &self,
        method: HttpMethod,
        original_url: &str,
        headers: &[(String, String)],
        body: &TransportBody,
        proxy: &ProxyConfig,
    ) -> TransportRequest {
        let mut request = self.build_request(method, proxy.proxy_url().to_string(), headers, body);
        request.timeout = Duration::from_millis(proxy.timeout_ms());
        for (key, value) in proxy.auth_headers() {
            request.headers.push((key, value));
        }
        request
            .headers
            .push((PROXY_TARGET_HEADER.to_string(), encode_target(original_url)));
        request
    }

    fn finish(
        &self,
        response: TransportResponse,
        path: DispatchPath,
    ) -> ApplicationResult<DispatchResult> {
        let status = response.status;
        if status == 204 || response.body.is_empty() {
            return Ok(DispatchResult {
                status,
                value: None,
                path,
            });
        }
        let text = String::from_utf8(response.body)
            .map_err(|e| ApplicationError::Decode(format!("response body is not UTF-8: {e}")))?;
        Ok(DispatchResult {
            status,
            value: Some(self.decoder.decode(&text)),
            path,
        })
    }
}

fn build_body(body: Option<DispatchBody>) -> (TransportBody, Vec<(String, String)>) {
    match body {
        None => (TransportBody::Empty, Vec::new()),
        Some(DispatchBody::Json(value)) => (
            TransportBody::Text(value.to_string()),
            vec![("Content-Type".to_string(), "application/json".to_string())],
        ),
        Some(DispatchBody::Form(fields)) => (TransportBody::Multipart(fields), Vec::new()),
    }
}

/// Url-encodes the original target for the proxy target header.
fn encode_target(url: &str) -> String {
    url::form_urlencoded::byte_serialize(url.as_bytes()).collect()
}
