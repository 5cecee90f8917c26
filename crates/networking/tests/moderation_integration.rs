//! Integration tests for the moderation client against a mock HTTP server

use networking::{
    ModerationClient, ModerationClientConfig, ModerationService, RetryConfig, ServiceError,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_retry(max_retries: usize) -> RetryConfig {
    RetryConfig::new(max_retries)
        .with_initial_delay(Duration::from_millis(5))
        .with_max_delay(Duration::from_millis(20))
}

fn client_for(server: &MockServer, retry: RetryConfig) -> ModerationClient {
    let config = ModerationClientConfig::new(server.uri())
        .with_timeout(Duration::from_millis(500))
        .with_retry(retry);
    ModerationClient::new(config).unwrap()
}

#[tokio::test]
async fn test_flagged_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/moderate"))
        .and(body_json(json!({ "content": "you are terrible" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "flagged": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, fast_retry(0));
    assert!(client.moderate("you are terrible").await.unwrap());
}

#[tokio::test]
async fn test_clean_content_through_trait() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/moderate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "flagged": false, "attributeScores": {} })),
        )
        .mount(&server)
        .await;

    let service: Box<dyn ModerationService> = Box::new(client_for(&server, fast_retry(0)));
    assert!(!service.is_flagged("Have a nice day").await.unwrap());
}

#[tokio::test]
async fn test_default_headers_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/moderate"))
        .and(header("x-api-key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "flagged": false })))
        .expect(1)
        .mount(&server)
        .await;

    let config = ModerationClientConfig::new(server.uri())
        .with_header("x-api-key", "secret")
        .with_retry(RetryConfig::none());
    let client = ModerationClient::new(config).unwrap();

    assert!(!client.moderate("hello").await.unwrap());
}

#[tokio::test]
async fn test_transient_failure_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/moderate"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/moderate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "flagged": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, fast_retry(2));
    assert!(client.moderate("retry me").await.unwrap());
}

#[tokio::test]
async fn test_retries_exhausted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/moderate"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .expect(3)
        .mount(&server)
        .await;

    let client = client_for(&server, fast_retry(2));
    let err = client.moderate("anything").await.unwrap_err();

    assert!(matches!(err, ServiceError::Api { status: 502, .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/moderate"))
        .respond_with(ResponseTemplate::new(400).set_body_string("content is required"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, fast_retry(3));
    let err = client.moderate("").await.unwrap_err();

    match err {
        ServiceError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "content is required");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_response_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/moderate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, fast_retry(2));
    let err = client.moderate("hello").await.unwrap_err();

    assert!(matches!(err, ServiceError::Parse(_)));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/moderate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "flagged": false }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = ModerationClientConfig::new(server.uri())
        .with_timeout(Duration::from_millis(100))
        .with_retry(RetryConfig::none());
    let client = ModerationClient::new(config).unwrap();

    let err = client.moderate("slow").await.unwrap_err();
    assert!(matches!(err, ServiceError::Timeout));
}

#[tokio::test]
async fn test_unreachable_service() {
    // Nothing listens on the discard port
    let config = ModerationClientConfig::new("http://127.0.0.1:9")
        .with_timeout(Duration::from_millis(500))
        .with_retry(RetryConfig::none());
    let client = ModerationClient::new(config).unwrap();

    let err = client.moderate("hello").await.unwrap_err();
    assert!(err.is_retryable());
}
