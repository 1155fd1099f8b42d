//! Parsing of the model's JSON answer.

use crate::error::MalformedReplyError;
use jazzy_types::{Action, PipelineResult};
use serde_json::Value;

/// The usable parts of a model answer.
///
/// `reply` is `None` when the field is missing, empty, or not a string.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedReply {
    pub reply: Option<String>,
    pub actions: Vec<Action>,
}

impl ParsedReply {
    /// Converts into a pipeline result, substituting `fallback` for a missing reply.
    pub fn into_result(self, fallback: &str) -> PipelineResult {
        let reply = match self.reply {
            Some(reply) => reply,
            None => {
                tracing::warn!("model answer has no reply field, using fallback");
                fallback.to_string()
            }
        };
        PipelineResult {
            reply,
            actions: self.actions,
        }
    }
}

/// Removes a surrounding Markdown code fence, if any.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line.
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    body.trim_end().trim_end_matches("```").trim()
}

/// Parses model output into a reply and the structurally valid actions.
///
/// An empty completion is treated as `{}`. Elements of `actions` that are not
/// objects with a string `type` are dropped; a non-array `actions` yields no
/// actions.
///
/// # Errors
///
/// Returns [`MalformedReplyError`] when the text is not a JSON object.
pub fn parse_reply(raw: &str) -> Result<ParsedReply, MalformedReplyError> {
    let text = strip_code_fence(raw);
    let text = if text.is_empty() { "{}" } else { text };

    let value: Value = serde_json::from_str(text)?;
    let Value::Object(mut object) = value else {
        return Err(MalformedReplyError::NotAnObject);
    };

    let reply = match object.remove("reply") {
        Some(Value::String(reply)) if !reply.trim().is_empty() => Some(reply),
        _ => None,
    };

    let actions = match object.remove("actions") {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<Action>(item) {
                Ok(action) => Some(action),
                Err(e) => {
                    tracing::warn!("dropping malformed action from model answer: {}", e);
                    None
                }
            })
            .collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => {
            tracing::warn!(kind = json_kind(&other), "model answer actions is not an array");
            Vec::new()
        }
    };

    Ok(ParsedReply { reply, actions })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
