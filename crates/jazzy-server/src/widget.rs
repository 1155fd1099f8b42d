//! Embeddable `<script>` snippet that adds the chat button to a host page.

use crate::AppState;
use axum::{
    extract::Extension,
    http::header,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

const TEMPLATE: &str = include_str!("../assets/widget.js");
const FRAME_URL_PLACEHOLDER: &str = "__JAZZY_FRAME_URL__";

/// Renders the snippet for a hosted chat page.
///
/// The URL is embedded as a JSON string literal, which is also a valid
/// JavaScript string literal.
pub fn render_snippet(frame_url: &str) -> String {
    let literal = serde_json::Value::String(frame_url.to_string()).to_string();
    TEMPLATE.replace(FRAME_URL_PLACEHOLDER, &literal)
}

/// Handler for `GET /widget.js`.
pub async fn widget_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/javascript; charset=utf-8"),
            (header::CACHE_CONTROL, "public, max-age=300"),
        ],
        state.widget_script.clone(),
    )
        .into_response()
}
