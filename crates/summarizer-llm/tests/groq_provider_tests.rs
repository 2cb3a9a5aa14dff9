use std::time::Duration;

use serde_json::json;
use summarizer_llm::{GroqConfig, GroqProvider, LLMError, TextGenerator};
use wiremock::{
    matchers::{body_partial_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "mixtral-8x7b-32768",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

fn provider_for(server: &MockServer, max_retries: u32) -> GroqProvider {
    let config = GroqConfig::new("gsk_test_key")
        .with_base_url(server.uri())
        .with_timeout(Duration::from_secs(5))
        .with_max_retries(max_retries)
        .with_backoff(Duration::from_millis(1), Duration::from_millis(5));
    GroqProvider::new(config).expect("provider")
}

#[tokio::test]
async fn sends_prompt_as_single_user_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer gsk_test_key"))
        .and(body_partial_json(json!({
            "model": "mixtral-8x7b-32768",
            "stream": false,
            "messages": [{ "role": "user", "content": "Summarize: hello" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("A short summary.")))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server, 0);
    let output = provider.generate("Summarize: hello").await.unwrap();

    assert_eq!(output, "A short summary.");
}

#[tokio::test]
async fn api_errors_carry_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let err = provider_for(&server, 0).generate("prompt").await.unwrap_err();

    match err {
        LLMError::Api { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "invalid api key");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn rate_limit_is_reported_after_retries() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .expect(3)
        .mount(&server)
        .await;

    let err = provider_for(&server, 2).generate("prompt").await.unwrap_err();

    assert!(matches!(err, LLMError::RateLimited(ref body) if body == "slow down"));
}

#[tokio::test]
async fn transient_server_error_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Recovered output.")))
        .expect(1)
        .mount(&server)
        .await;

    let output = provider_for(&server, 1).generate("prompt").await.unwrap();
    assert_eq!(output, "Recovered output.");
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = provider_for(&server, 0).generate("prompt").await.unwrap_err();
    assert!(matches!(err, LLMError::MalformedResponse(_)));
}

#[tokio::test]
async fn missing_choices_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let err = provider_for(&server, 0).generate("prompt").await.unwrap_err();
    assert!(matches!(err, LLMError::MalformedResponse(_)));
}

#[tokio::test]
async fn blank_completion_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("   ")))
        .mount(&server)
        .await;

    let err = provider_for(&server, 0).generate("prompt").await.unwrap_err();
    assert!(matches!(err, LLMError::EmptyCompletion));
}

#[tokio::test]
async fn slow_service_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("too late"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = GroqConfig::new("gsk_test_key")
        .with_base_url(server.uri())
        .with_timeout(Duration::from_millis(200))
        .with_max_retries(0);
    let provider = GroqProvider::new(config).unwrap();

    let err = provider.generate("prompt").await.unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got {err:?}");
}

#[tokio::test]
async fn timeout_survives_default_retries() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("too late"))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = GroqConfig::new("gsk_test_key")
        .with_base_url(server.uri())
        .with_timeout(Duration::from_millis(200))
        .with_backoff(Duration::from_millis(1), Duration::from_millis(5));
    assert_eq!(config.max_retries, 2);
    let provider = GroqProvider::new(config).unwrap();

    let err = provider.generate("prompt").await.unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got {err:?}");
}

#[tokio::test]
async fn server_error_after_retries_keeps_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("over capacity"))
        .expect(3)
        .mount(&server)
        .await;

    let err = provider_for(&server, 2).generate("prompt").await.unwrap_err();
    assert!(
        matches!(err, LLMError::Api { status: 503, .. }),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn unreachable_service_is_an_http_error() {
    let config = GroqConfig::new("gsk_test_key")
        .with_base_url("http://127.0.0.1:9")
        .with_timeout(Duration::from_secs(2))
        .with_max_retries(0);
    let provider = GroqProvider::new(config).unwrap();

    let err = provider.generate("prompt").await.unwrap_err();
    assert!(
        matches!(err, LLMError::Http(_) | LLMError::Timeout(_)),
        "unexpected error: {err:?}"
    );
}
