//! Actions the model can request alongside its reply.
//!
//! The set of action names is open: the model may emit names this build does
//! not know about. Known names map to dedicated [`ActionKind`] variants;
//! anything else is kept verbatim in [`ActionKind::Unknown`] so it can be
//! echoed back to the caller and ignored by the dispatcher.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Name of a requested side effect.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionKind {
    /// Record a sales lead (name, email, project).
    LogLead,
    /// Flag the originating message as urgent.
    MarkUrgent,
    /// Stage an email reply draft.
    PrepareEmailReply,
    /// Explicit "nothing to do".
    None,
    /// Any name not listed above.
    Unknown(String),
}

impl ActionKind {
    /// Returns the wire name of this action kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::LogLead => "log_lead",
            Self::MarkUrgent => "mark_urgent",
            Self::PrepareEmailReply => "prepare_email_reply",
            Self::None => "none",
            Self::Unknown(name) => name,
        }
    }
}

impl From<String> for ActionKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "log_lead" => Self::LogLead,
            "mark_urgent" => Self::MarkUrgent,
            "prepare_email_reply" => Self::PrepareEmailReply,
            "none" => Self::None,
            _ => Self::Unknown(name),
        }
    }
}

impl From<&str> for ActionKind {
    fn from(name: &str) -> Self {
        Self::from(name.to_string())
    }
}

impl From<ActionKind> for String {
    fn from(kind: ActionKind) -> Self {
        match kind {
            ActionKind::Unknown(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A requested side effect with its opaque payload.
///
/// The payload is passed through exactly as the model produced it. Handlers
/// decode the parts they need with [`Action::decode_payload`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl Action {
    pub fn new(kind: impl Into<ActionKind>, payload: Option<Value>) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }

    /// Decodes the payload into a typed view.
    ///
    /// A missing payload decodes as an empty object, so views whose fields
    /// are all optional always succeed on it.
    pub fn decode_payload<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        let value = self
            .payload
            .clone()
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()));
        serde_json::from_value(value)
    }
}

/// Reads an optional text field without failing on other JSON types.
///
/// Numbers and booleans keep their text form. Arrays and objects read as
/// absent; callers keep the raw payload for those.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

/// Typed view of a `log_lead` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadDetails {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub project: Option<String>,
}

/// Typed view of a `prepare_email_reply` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDraft {
    #[serde(default, deserialize_with = "lenient_text")]
    pub to: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub subject: Option<String>,
    #[serde(
        default,
        alias = "reply",
        alias = "content",
        deserialize_with = "lenient_text"
    )]
    pub body: Option<String>,
}
