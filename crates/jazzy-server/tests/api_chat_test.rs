use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use jazzy_actions::{ActionContext, ActionDispatcher, ActionError, ActionHandler};
use jazzy_llm::{ChatPipeline, CompletionProvider, CompletionRequest, PromptRole, UpstreamError};
use jazzy_server::{app, AppState};
use jazzy_types::{Action, Source, FALLBACK_REPLY};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

struct StubProvider {
    answer: Result<String, String>,
    seen: Mutex<Vec<CompletionRequest>>,
}

impl StubProvider {
    fn answering(text: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: Ok(text.to_string()),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            answer: Err("connection refused".to_string()),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn call_count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionProvider for StubProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, UpstreamError> {
        self.seen.lock().unwrap().push(request.clone());
        self.answer.clone().map_err(UpstreamError::Provider)
    }
}

/// Records the actions it receives, optionally failing every call.
#[derive(Default)]
struct RecordingHandler {
    seen: Mutex<Vec<(String, Source)>>,
    fail: bool,
}

#[async_trait]
impl ActionHandler for RecordingHandler {
    async fn handle(&self, action: &Action, ctx: &ActionContext) -> Result<(), ActionError> {
        self.seen
            .lock()
            .unwrap()
            .push((action.kind.as_str().to_string(), ctx.source));
        if self.fail {
            Err(ActionError::Webhook("hook unreachable".to_string()))
        } else {
            Ok(())
        }
    }
}

fn build_app(provider: Arc<StubProvider>, dispatcher: ActionDispatcher) -> Router {
    let state = AppState::new(
        ChatPipeline::new(provider),
        dispatcher,
        "https://agent.digitalboxes.net/jazzy-chat",
    );
    app(state)
}

fn post_chat(body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/jazzy-chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_raw(body: &'static str, content_type: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::POST).uri("/api/jazzy-chat");
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder.body(Body::from(body)).unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_greeting_returns_reply() {
    let stub = StubProvider::answering(r#"{"reply":"Hey! How can I help?","actions":[]}"#);
    let app = build_app(stub.clone(), ActionDispatcher::new());

    let response = app
        .oneshot(post_chat(json!({ "message": "hi", "history": [] })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json, json!({ "reply": "Hey! How can I help?", "actions": [] }));
    assert_eq!(stub.call_count(), 1);
}

#[tokio::test]
async fn test_malformed_model_output_uses_fallback() {
    let stub = StubProvider::answering("not json");
    let app = build_app(stub, ActionDispatcher::new());

    let response = app
        .oneshot(post_chat(json!({ "message": "hello" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["reply"], FALLBACK_REPLY);
    assert_eq!(json["actions"], json!([]));
}

#[tokio::test]
async fn test_empty_message_is_rejected_without_upstream_call() {
    for body in [
        json!({ "message": "" }),
        json!({ "message": "   " }),
        json!({ "history": [] }),
    ] {
        let stub = StubProvider::answering(r#"{"reply":"unused"}"#);
        let app = build_app(stub.clone(), ActionDispatcher::new());

        let response = app.oneshot(post_chat(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = read_json(response).await;
        assert_eq!(json["error"], "Message is required");
        assert_eq!(stub.call_count(), 0);
    }
}

#[tokio::test]
async fn test_other_methods_are_not_allowed() {
    for method in [Method::GET, Method::PUT, Method::DELETE] {
        let stub = StubProvider::answering(r#"{"reply":"unused"}"#);
        let app = build_app(stub.clone(), ActionDispatcher::new());

        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri("/api/jazzy-chat")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let json = read_json(response).await;
        assert_eq!(json["error"], "Method not allowed");
        assert_eq!(stub.call_count(), 0);
    }
}

#[tokio::test]
async fn test_invalid_json_body_is_bad_request() {
    let stub = StubProvider::answering(r#"{"reply":"unused"}"#);
    let app = build_app(stub.clone(), ActionDispatcher::new());

    let response = app
        .oneshot(post_raw("{not json", Some("application/json")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = read_json(response).await;
    let error = json["error"].as_str().unwrap();
    assert!(error.starts_with("invalid JSON body"));
    assert_ne!(error, "Message is required");
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn test_null_message_is_rejected_as_missing() {
    let stub = StubProvider::answering(r#"{"reply":"unused"}"#);
    let app = build_app(stub.clone(), ActionDispatcher::new());

    let response = app
        .oneshot(post_chat(json!({ "message": null })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = read_json(response).await;
    assert_eq!(json["error"], "Message is required");
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn test_blank_bodies_are_rejected_as_missing_message() {
    let cases = [
        ("", Some("application/json")),
        ("", None),
        ("  \n", Some("application/json")),
        ("null", Some("application/json")),
    ];

    for (body, content_type) in cases {
        let stub = StubProvider::answering(r#"{"reply":"unused"}"#);
        let app = build_app(stub.clone(), ActionDispatcher::new());

        let response = app.oneshot(post_raw(body, content_type)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {:?}", body);
        let json = read_json(response).await;
        assert_eq!(json["error"], "Message is required");
        assert_eq!(stub.call_count(), 0);
    }
}

#[tokio::test]
async fn test_body_without_content_type_is_accepted() {
    let stub = StubProvider::answering(r#"{"reply":"Hi there"}"#);
    let app = build_app(stub.clone(), ActionDispatcher::new());

    let response = app
        .oneshot(post_raw(r#"{"message":"hi"}"#, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["reply"], "Hi there");
    assert_eq!(stub.call_count(), 1);
}

#[tokio::test]
async fn test_upstream_failure_is_generic_500() {
    let stub = StubProvider::failing();
    let app = build_app(stub, ActionDispatcher::new());

    let response = app
        .oneshot(post_chat(json!({ "message": "hi" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = read_json(response).await;
    assert_eq!(json["error"], "Upstream AI provider error");
}

#[tokio::test]
async fn test_actions_are_returned_and_dispatched() {
    let stub = StubProvider::answering(
        r#"{"reply":"Great, I'll pass this along.","actions":[{"type":"log_lead","payload":{"name":"Ana","email":"ana@example.com"}},{"type":"mark_urgent"}]}"#,
    );
    let handler = Arc::new(RecordingHandler::default());
    let mut dispatcher = ActionDispatcher::new();
    dispatcher.register("log_lead", handler.clone());

    let app = build_app(stub, dispatcher);
    let response = app
        .oneshot(post_chat(json!({
            "message": "I'm Ana, ana@example.com, need a site ASAP",
            "history": [{ "role": "user", "content": "hi" }, { "role": "assistant", "content": "Hey!" }]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["reply"], "Great, I'll pass this along.");
    assert_eq!(json["actions"][0]["type"], "log_lead");
    assert_eq!(json["actions"][0]["payload"]["name"], "Ana");
    assert_eq!(json["actions"][1]["type"], "mark_urgent");

    let seen = handler.seen.lock().unwrap();
    assert_eq!(*seen, vec![("log_lead".to_string(), Source::Chat)]);
}

#[tokio::test]
async fn test_failing_action_does_not_change_response() {
    let stub = StubProvider::answering(
        r#"{"reply":"On it.","actions":[{"type":"mark_urgent","payload":{}}]}"#,
    );
    let handler = Arc::new(RecordingHandler {
        fail: true,
        ..RecordingHandler::default()
    });
    let mut dispatcher = ActionDispatcher::new();
    dispatcher.register("mark_urgent", handler.clone());

    let response = build_app(stub, dispatcher)
        .oneshot(post_chat(json!({ "message": "site is down!" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["reply"], "On it.");
    assert_eq!(handler.seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_email_source_wraps_message() {
    let stub = StubProvider::answering(
        r#"{"reply":"Dear Sam, thanks for reaching out...","actions":[{"type":"prepare_email_reply","payload":{"subject":"Re: Quote"}}]}"#,
    );
    let handler = Arc::new(RecordingHandler::default());
    let mut dispatcher = ActionDispatcher::new();
    dispatcher.register("prepare_email_reply", handler.clone());

    let response = build_app(stub.clone(), dispatcher)
        .oneshot(post_chat(json!({
            "message": "Can you send me a quote?",
            "source": "email"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let seen = stub.seen.lock().unwrap();
    let last = seen[0].messages.last().unwrap();
    assert_eq!(last.role, PromptRole::User);
    assert_eq!(
        last.content,
        "EMAIL RECEIVED: Can you send me a quote?\nWrite a full reply email."
    );
    assert_eq!(
        *handler.seen.lock().unwrap(),
        vec![("prepare_email_reply".to_string(), Source::Email)]
    );
}

#[tokio::test]
async fn test_chat_source_is_not_wrapped() {
    let stub = StubProvider::answering(r#"{"reply":"ok"}"#);
    build_app(stub.clone(), ActionDispatcher::new())
        .oneshot(post_chat(json!({ "message": "hello", "source": "sms" })))
        .await
        .unwrap();

    let seen = stub.seen.lock().unwrap();
    assert_eq!(seen[0].messages.last().unwrap().content, "hello");
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let stub = StubProvider::answering(r#"{"reply":"unused"}"#);
    let app = build_app(stub.clone(), ActionDispatcher::new());

    let huge = "a".repeat(128 * 1024);
    let response = app
        .oneshot(post_chat(json!({ "message": huge })))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn test_health_check_returns_ok() {
    let stub = StubProvider::answering("{}");
    let response = build_app(stub, ActionDispatcher::new())
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}
