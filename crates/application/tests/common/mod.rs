//! Shared test doubles for the application integration tests.

// Each test binary uses a different subset of the mock's helpers.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use relay_application::ports::{
    HttpTransport, TransportError, TransportRequest, TransportResponse,
};

/// Scripted transport: returns queued results in order and records
/// every request it receives. Routes registered per URL take priority
/// over the queue, so concurrent callers each get their own reply.
pub struct MockTransport {
    script: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
    routes: Mutex<HashMap<String, Result<TransportResponse, TransportError>>>,
    seen: Mutex<Vec<TransportRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            routes: Mutex::new(HashMap::new()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn push_ok(&self, status: u16, content_type: &str, body: &[u8]) {
        let headers = if content_type.is_empty() {
            Vec::new()
        } else {
            vec![("content-type".to_string(), content_type.to_string())]
        };
        self.push(Ok(TransportResponse {
            status,
            headers,
            body: body.to_vec(),
        }));
    }

    pub fn push_err(&self, error: TransportError) {
        self.push(Err(error));
    }

    pub fn push(&self, result: Result<TransportResponse, TransportError>) {
        self.script.lock().unwrap().push_back(result);
    }

    pub fn route_ok(&self, url: &str, status: u16, content_type: &str, body: &[u8]) {
        let headers = if content_type.is_empty() {
            Vec::new()
        } else {
            vec![("content-type".to_string(), content_type.to_string())]
        };
        self.routes.lock().unwrap().insert(
            url.to_string(),
            Ok(TransportResponse {
                status,
                headers,
                body: body.to_vec(),
            }),
        );
    }

    pub fn route_err(&self, url: &str, error: TransportError) {
        self.routes.lock().unwrap().insert(url.to_string(), Err(error));
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn call(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let routed = self.routes.lock().unwrap().get(&request.url).cloned();
        self.seen.lock().unwrap().push(request);
        if let Some(result) = routed {
            return result;
        }
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Other("script exhausted".to_string())))
    }
}
