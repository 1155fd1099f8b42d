//! Jazzy chat server library logic.

pub mod api;
pub mod config;
pub mod widget;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Json, Router,
};
use jazzy_actions::ActionDispatcher;
use jazzy_llm::ChatPipeline;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Chat turn pipeline with its completion provider.
    pub pipeline: Arc<ChatPipeline>,
    /// Side effects for the actions a reply requests.
    pub dispatcher: Arc<ActionDispatcher>,
    /// Rendered `/widget.js` body.
    pub widget_script: String,
}

impl AppState {
    pub fn new(pipeline: ChatPipeline, dispatcher: ActionDispatcher, frame_url: &str) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            dispatcher: Arc::new(dispatcher),
            widget_script: widget::render_snippet(frame_url),
        }
    }
}

/// Maximum request body size (64 KiB).
const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/jazzy-chat",
            post(api::chat_handler).fallback(api::method_not_allowed),
        )
        .route("/widget.js", get(widget::widget_handler))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
