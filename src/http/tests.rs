//! Tests for the HTTP client module

use super::*;
use crate::error::Error;
use crate::types::Method;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, prefix: &str) -> HttpClient {
    let config = HttpClientConfig::builder()
        .base_url(format!("{}{prefix}", server.uri()))
        .timeout(Duration::from_secs(5))
        .build();
    HttpClient::with_config(config).unwrap()
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.base_url, "https://api.spacexdata.com/v4/");
    assert!(config.user_agent.starts_with("bronze-loader/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .base_url("https://api.example.com")
        .timeout(Duration::from_secs(60))
        .header("X-Custom", "value")
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(config.base_url, "https://api.example.com");
    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(
        config.default_headers.get("X-Custom"),
        Some(&"value".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");
}

#[test]
fn test_invalid_base_url() {
    let config = HttpClientConfig::builder().base_url("::nope").build();
    let err = HttpClient::with_config(config).unwrap_err();
    assert!(matches!(err, Error::InvalidUrl(_)));
}

#[test]
fn test_build_url_keeps_base_path() {
    let with_slash = HttpClient::with_config(
        HttpClientConfig::builder()
            .base_url("https://api.spacexdata.com/v4/")
            .build(),
    )
    .unwrap();
    let without_slash = HttpClient::with_config(
        HttpClientConfig::builder()
            .base_url("https://api.spacexdata.com/v4")
            .build(),
    )
    .unwrap();

    for client in [&with_slash, &without_slash] {
        assert_eq!(
            client.build_url("launches/query").unwrap().as_str(),
            "https://api.spacexdata.com/v4/launches/query"
        );
        assert_eq!(
            client.build_url("/cores/query").unwrap().as_str(),
            "https://api.spacexdata.com/v4/cores/query"
        );
    }

    assert_eq!(
        with_slash
            .build_url("http://other.example/x")
            .unwrap()
            .as_str(),
        "http://other.example/x"
    );
}

#[tokio::test]
async fn test_post_json_sends_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v4/launches/query"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"query": {}, "options": {"page": 1}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "docs": [{"id": "a"}],
            "hasNextPage": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "/v4/");
    let response = client
        .post_json("launches/query", &json!({"query": {}, "options": {"page": 1}}))
        .await
        .unwrap();

    assert_eq!(response["docs"][0]["id"], "a");
    assert_eq!(response["hasNextPage"], false);
}

#[tokio::test]
async fn test_get_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/rockets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "r"}])))
        .mount(&server)
        .await;

    let client = client_for(&server, "/v4");
    let response = client
        .send(Method::GET, "rockets", &json!({}))
        .await
        .unwrap();
    assert_eq!(response, json!([{"id": "r"}]));
}

#[tokio::test]
async fn test_default_headers_sent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("X-Api-Key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .header("X-Api-Key", "secret")
        .build();
    let client = HttpClient::with_config(config).unwrap();
    client.post_json("ships/query", &json!({})).await.unwrap();
}

#[tokio::test]
async fn test_error_status_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "/");
    let err = client
        .post_json("launches/query", &json!({}))
        .await
        .unwrap_err();

    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_client_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;

    let client = client_for(&server, "/");
    let err = client
        .post_json("capsules/query", &json!({}))
        .await
        .unwrap_err();
    assert!(err.is_transport_error());
    assert_eq!(err.to_string(), "HTTP 404: Not Found");
}

#[tokio::test]
async fn test_invalid_json_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let client = client_for(&server, "/");
    let err = client.post_json("x", &json!({})).await.unwrap_err();
    assert!(matches!(err, Error::JsonParse(_)));
}

#[tokio::test]
async fn test_transport_through_arc() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let transport: std::sync::Arc<dyn Transport> = std::sync::Arc::new(client_for(&server, "/"));
    let response = transport.post_json("x", &json!({})).await.unwrap();
    assert_eq!(response["ok"], true);
}
