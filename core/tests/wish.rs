//! Wish service tests. None of these reach the real API; HTTP
//! responses come from a local mock server.

use luckybag_core::{
    config::WishConfig,
    error::GameError,
    wish::{WishService, EMPTY_FALLBACK_WISH, ERROR_FALLBACK_WISH},
};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/gemini-3-flash-preview:generateContent";

/// A configured service pointed at the mock server.
fn mocked_service(server: &MockServer) -> WishService {
    let config = WishConfig {
        base_url: format!("{}/v1beta/models", server.uri()),
        ..WishConfig::default()
    };
    WishService::new(config).unwrap().with_api_key("test-key")
}

async fn mount_reply(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(query_param("key", "test-key"))
        .respond_with(template)
        .expect(1)
        .mount(server)
        .await;
}

async fn sent_body(server: &MockServer) -> Value {
    let requests = server.received_requests().await.expect("request recording");
    assert_eq!(requests.len(), 1, "Expected exactly one request");
    serde_json::from_slice(&requests[0].body).expect("request body is JSON")
}

#[tokio::test]
async fn successful_reply_joins_and_trims_parts() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [
                { "content": { "role": "model", "parts": [
                    { "text": "  Năm mới " },
                    { "text": "phát tài!\n" }
                ] } },
                { "content": { "parts": [{ "text": "second candidate" }] } }
            ]
        })),
    )
    .await;

    let wish = mocked_service(&server).generate_wish(50_000).await;
    assert!(!wish.fallback);
    assert_eq!(wish.text, "Năm mới phát tài!");

    let body = sent_body(&server).await;
    assert_eq!(body["generationConfig"]["topP"], 0.95);
    assert_eq!(body["generationConfig"]["temperature"], 0.8);
    assert_eq!(body["contents"][0]["role"], "user");
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("50.000 VNĐ"), "prompt: {prompt}");
}

#[tokio::test]
async fn empty_reply_uses_empty_fallback() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "   " }] } }]
        })),
    )
    .await;

    let service = mocked_service(&server);
    assert_eq!(service.request_wish(10_000).await.unwrap().trim(), "");

    let server = MockServer::start().await;
    mount_reply(&server, ResponseTemplate::new(200).set_body_json(json!({}))).await;
    let wish = mocked_service(&server).generate_wish(10_000).await;
    assert!(wish.fallback);
    assert_eq!(wish.text, EMPTY_FALLBACK_WISH);
}

#[tokio::test]
async fn error_status_uses_error_fallback() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT" }
        })),
    )
    .await;

    let service = mocked_service(&server);
    let err = service.request_wish(20_000).await.unwrap_err();
    match err {
        GameError::WishUnavailable(msg) => {
            assert!(msg.contains("400"), "message: {msg}");
            assert!(msg.contains("API key not valid"), "message: {msg}");
        }
        other => panic!("Expected WishUnavailable, got {other:?}"),
    }

    let server = MockServer::start().await;
    mount_reply(&server, ResponseTemplate::new(503).set_body_string("overloaded")).await;
    let wish = mocked_service(&server).generate_wish(20_000).await;
    assert!(wish.fallback);
    assert_eq!(wish.text, ERROR_FALLBACK_WISH);
}

#[tokio::test]
async fn malformed_reply_uses_error_fallback() {
    let server = MockServer::start().await;
    mount_reply(&server, ResponseTemplate::new(200).set_body_string("not json")).await;

    let wish = mocked_service(&server).generate_wish(30_000).await;
    assert!(wish.fallback);
    assert_eq!(wish.text, ERROR_FALLBACK_WISH);
}

#[tokio::test]
async fn missing_key_falls_back() {
    let service = WishService::new(WishConfig::default()).unwrap();
    assert!(!service.is_configured());

    let err = service.request_wish(20_000).await.unwrap_err();
    assert!(matches!(err, GameError::WishUnavailable(_)), "got {err:?}");

    let wish = service.generate_wish(20_000).await;
    assert!(wish.fallback);
    assert_eq!(wish.text, ERROR_FALLBACK_WISH);
}

#[tokio::test]
async fn disabled_service_falls_back() {
    let config = WishConfig { enabled: false, ..WishConfig::default() };
    let service = WishService::new(config).unwrap().with_api_key("secret");
    assert!(!service.is_configured());

    let wish = service.generate_wish(10_000).await;
    assert!(wish.fallback);
    assert_eq!(wish.text, ERROR_FALLBACK_WISH);
}

#[test]
fn blank_key_counts_as_missing() {
    let service = WishService::new(WishConfig::default()).unwrap().with_api_key("   ");
    assert!(!service.is_configured());
}

/// Nothing listens on port 9 locally; the transport error falls back.
#[tokio::test]
async fn unreachable_endpoint_falls_back() {
    let config = WishConfig {
        base_url: "http://127.0.0.1:9/v1beta/models".into(),
        timeout_secs: 2,
        ..WishConfig::default()
    };
    let service = WishService::new(config).unwrap().with_api_key("test-key");
    assert!(service.is_configured());

    let wish = service.generate_wish(50_000).await;
    assert!(wish.fallback);
    assert_eq!(wish.text, ERROR_FALLBACK_WISH);
}

#[test]
fn from_env_reads_the_named_variable() {
    let config = WishConfig {
        api_key_env: "LUCKYBAG_TEST_WISH_KEY_UNSET".into(),
        ..WishConfig::default()
    };
    let service = WishService::from_env(config).unwrap();
    assert!(!service.is_configured());
}
