//! Integration tests for the reqwest transport against a local mock server.

use std::time::Duration;

use pretty_assertions::assert_eq;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use relay_application::ports::{HttpTransport, TransportBody, TransportError, TransportRequest};
use relay_domain::HttpMethod;

fn transport() -> relay_infrastructure::ReqwestTransport {
    relay_infrastructure::ReqwestTransport::new().expect("client builds")
}

#[tokio::test]
async fn get_returns_status_headers_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/json")
                .set_body_raw(r#"{"pong":true}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let request = TransportRequest::new(
        HttpMethod::Get,
        format!("{}/ping", server.uri()),
        Duration::from_secs(5),
    );
    let response = transport().call(request).await.expect("response");

    assert_eq!(response.status, 200);
    assert_eq!(response.body, br#"{"pong":true}"#.to_vec());
    let content_type = response
        .headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
        .map(|(_, v)| v.as_str());
    assert_eq!(content_type, Some("application/json"));
}

#[tokio::test]
async fn post_sends_headers_and_text_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/items"))
        .and(header("content-type", "application/json"))
        .and(body_string(r#"{"name":"one"}"#))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let mut request = TransportRequest::new(
        HttpMethod::Post,
        format!("{}/items", server.uri()),
        Duration::from_secs(5),
    );
    request
        .headers
        .push(("Content-Type".to_string(), "application/json".to_string()));
    request.body = TransportBody::Text(r#"{"name":"one"}"#.to_string());

    let response = transport().call(request).await.expect("response");
    assert_eq!(response.status, 201);
}

#[tokio::test]
async fn multipart_body_is_sent_as_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let mut request = TransportRequest::new(
        HttpMethod::Post,
        format!("{}/upload", server.uri()),
        Duration::from_secs(5),
    );
    request.body = TransportBody::Multipart(vec![("field".to_string(), "value".to_string())]);

    let response = transport().call(request).await.expect("response");
    assert_eq!(response.status, 200);

    let received = &server.received_requests().await.expect("requests")[0];
    let content_type = received
        .headers
        .get("content-type")
        .map(|v| v.to_str().unwrap_or_default().to_string())
        .unwrap_or_default();
    assert!(content_type.starts_with("multipart/form-data"));
}

#[tokio::test]
async fn timeout_maps_to_timeout_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let request = TransportRequest::new(
        HttpMethod::Get,
        format!("{}/slow", server.uri()),
        Duration::from_millis(100),
    );
    let error = transport().call(request).await.expect_err("should time out");

    assert_eq!(error, TransportError::Timeout { timeout_ms: 100 });
}

#[tokio::test]
async fn invalid_url_is_rejected_before_sending() {
    let request = TransportRequest::new(
        HttpMethod::Get,
        "not a url",
        Duration::from_secs(1),
    );
    let error = transport().call(request).await.expect_err("invalid url");
    assert!(matches!(error, TransportError::InvalidUrl(_)));
}

#[tokio::test]
async fn non_2xx_status_is_a_normal_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&server)
        .await;

    let request = TransportRequest::new(
        HttpMethod::Get,
        format!("{}/missing", server.uri()),
        Duration::from_secs(5),
    );
    let response = transport().call(request).await.expect("response");

    assert_eq!(response.status, 404);
    assert_eq!(response.body, b"not here".to_vec());
}
