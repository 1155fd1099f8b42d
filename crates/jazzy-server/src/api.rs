//! Chat API handlers.

use crate::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Extension, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use jazzy_actions::ActionContext;
use jazzy_llm::PipelineError;
use jazzy_types::{ChatRequest, PipelineResult};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Message returned to callers when the completion provider fails.
pub const UPSTREAM_ERROR_MESSAGE: &str = "Upstream AI provider error";

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("{0}")]
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(serde_json::json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Validation(msg) => ApiError::BadRequest(msg),
            PipelineError::Upstream(e) => {
                tracing::error!("completion provider failed: {}", e);
                ApiError::InternalServerError(UPSTREAM_ERROR_MESSAGE.to_string())
            }
        }
    }
}

/// Decodes a chat request body.
///
/// The content type is not checked. An empty body or a JSON `null` is an
/// empty request, so it fails validation with the missing-message error.
pub fn decode_chat_request(body: &[u8]) -> Result<ChatRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ChatRequest::default());
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {}", e)))?;
    if value.is_null() {
        return Ok(ChatRequest::default());
    }

    serde_json::from_value(value)
        .map_err(|e| ApiError::BadRequest(format!("invalid chat request: {}", e)))
}

/// Handler for `POST /api/jazzy-chat`.
///
/// Runs the pipeline, then dispatches the returned actions. Dispatch
/// failures are logged by the dispatcher and never change the response.
pub async fn chat_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<PipelineResult>, ApiError> {
    let body = body.map_err(|rejection| {
        tracing::debug!("rejected chat body: {}", rejection.body_text());
        ApiError::BadRequest(rejection.body_text())
    })?;
    let request = decode_chat_request(&body)?;

    let result = state.pipeline.run(&request).await?;

    if !result.actions.is_empty() {
        let ctx = ActionContext::new(request.message.as_str(), request.source);
        let report = state.dispatcher.dispatch(&result.actions, &ctx).await;
        tracing::debug!(
            executed = report.executed,
            failed = report.failed,
            skipped = report.skipped,
            "dispatched actions"
        );
    }

    Ok(Json(result))
}

/// Fallback for any method other than `POST` on the chat route.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
