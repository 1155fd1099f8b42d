use axum::{
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use jazzy_llm::{
    CompletionProvider, CompletionRequest, LlmConfig, OpenAiClient, PromptMessage, PromptRole,
    UpstreamError,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Starts a local stand-in for the completions API and returns its base URL.
async fn spawn_mock(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/v1", addr)
}

fn client_for(base_url: String) -> OpenAiClient {
    let mut config = LlmConfig::new("sk-test");
    config.base_url = base_url;
    config.timeout_seconds = 5;
    OpenAiClient::new(config).unwrap()
}

fn sample_request() -> CompletionRequest {
    CompletionRequest {
        messages: vec![
            PromptMessage::new(PromptRole::System, "persona"),
            PromptMessage::new(PromptRole::User, "hi"),
        ],
        temperature: 0.4,
    }
}

#[tokio::test]
async fn test_completion_round_trip() {
    let captured: Arc<Mutex<Option<(HeaderMap, Value)>>> = Arc::new(Mutex::new(None));
    let sink = captured.clone();

    let router = Router::new().route(
        "/v1/chat/completions",
        post(move |headers: HeaderMap, Json(body): Json<Value>| {
            let sink = sink.clone();
            async move {
                *sink.lock().unwrap() = Some((headers, body));
                Json(json!({
                    "choices": [
                        { "message": { "role": "assistant", "content": "{\"reply\":\"Hey!\"}" } }
                    ]
                }))
            }
        }),
    );

    let client = client_for(spawn_mock(router).await);
    let text = client.complete(&sample_request()).await.unwrap();
    assert_eq!(text, r#"{"reply":"Hey!"}"#);

    let (headers, body) = captured.lock().unwrap().take().unwrap();
    assert_eq!(headers["authorization"], "Bearer sk-test");
    assert_eq!(body["model"], "gpt-4.1-mini");
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["content"], "hi");
    assert!((body["temperature"].as_f64().unwrap() - 0.4).abs() < 1e-6);
}

#[tokio::test]
async fn test_error_status_is_upstream_error() {
    let router = Router::new().route(
        "/v1/chat/completions",
        post(|| async {
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({ "error": { "message": "rate limited" } })),
            )
        }),
    );

    let client = client_for(spawn_mock(router).await);
    match client.complete(&sample_request()).await {
        Err(UpstreamError::Status { status, body }) => {
            assert_eq!(status, 429);
            assert!(body.contains("rate limited"));
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_choices_is_upstream_error() {
    let router = Router::new().route(
        "/v1/chat/completions",
        post(|| async { Json(json!({ "choices": [] })) }),
    );

    let client = client_for(spawn_mock(router).await);
    let result = client.complete(&sample_request()).await;
    assert!(matches!(result, Err(UpstreamError::NoChoices)));
}

#[tokio::test]
async fn test_null_content_is_empty_text() {
    let router = Router::new().route(
        "/v1/chat/completions",
        post(|| async { Json(json!({ "choices": [{ "message": { "content": null } }] })) }),
    );

    let client = client_for(spawn_mock(router).await);
    let text = client.complete(&sample_request()).await.unwrap();
    assert!(text.is_empty());
}

#[tokio::test]
async fn test_missing_api_key_fails_without_request() {
    let mut config = LlmConfig::default();
    // Nothing listens here; the key check must short-circuit first.
    config.base_url = "http://127.0.0.1:9/v1".to_string();
    let client = OpenAiClient::new(config).unwrap();

    let result = client.complete(&sample_request()).await;
    assert!(matches!(result, Err(UpstreamError::MissingApiKey)));
}
