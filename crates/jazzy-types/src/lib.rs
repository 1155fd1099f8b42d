//! Shared types for the Jazzy support-chat service.
//!
//! This crate holds the conversation data model used on both sides of the
//! `/api/jazzy-chat` endpoint: turns and their roles, the chat request, the
//! pipeline result, and the actions the model may ask the server to perform.
//!
//! Nothing here performs I/O. The server, the pipeline, the action dispatcher
//! and the conversation view all depend on this crate so that the wire shapes
//! are defined exactly once.

use serde::{Deserialize, Deserializer, Serialize};

mod action;
pub use action::{Action, ActionKind, EmailDraft, LeadDetails};

/// The sentence shown to the user whenever no usable reply is available.
///
/// Used by the pipeline when the model output cannot be parsed and by the
/// conversation view when a response carries no reply.
pub const FALLBACK_REPLY: &str = "I'm sorry, something seems off. Can you rephrase that?";

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person using the widget.
    User,
    /// The assistant persona.
    Assistant,
}

impl Role {
    /// Returns the wire label for this role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One message exchanged in the conversation.
///
/// Turns are immutable once created. The `id` is opaque; it is generated for
/// turns created locally and may be absent on turns received over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    id: String,
    role: Role,
    content: String,
}

impl Turn {
    /// Creates a turn with a freshly generated id.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content: content.into(),
        }
    }

    /// Creates a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates an assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Channel the message arrived through.
///
/// Unrecognised or missing values are treated as [`Source::Chat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Live chat in the widget: short conversational replies.
    #[default]
    Chat,
    /// An inbound email: the model drafts a full reply email.
    Email,
}

impl Source {
    /// Parses a wire label, falling back to [`Source::Chat`].
    pub fn from_label(label: &str) -> Self {
        match label {
            "email" => Self::Email,
            _ => Self::Chat,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Email => "email",
        }
    }
}

impl<'de> Deserialize<'de> for Source {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(value.as_str().map(Source::from_label).unwrap_or_default())
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single chat turn request as sent to `POST /api/jazzy-chat`.
///
/// `history` holds the earlier turns in chronological order and never
/// contains `message` itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// A missing or `null` message decodes as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
    #[serde(default)]
    pub history: Vec<Turn>,
    #[serde(default)]
    pub source: Source,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl ChatRequest {
    /// Creates a chat-sourced request.
    pub fn new(message: impl Into<String>, history: Vec<Turn>) -> Self {
        Self {
            message: message.into(),
            history,
            source: Source::Chat,
        }
    }

    /// Sets the request source.
    pub fn with_source(mut self, source: Source) -> Self {
        self.source = source;
        self
    }
}

/// Output of one pipeline run: the reply text and the requested actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub reply: String,
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl PipelineResult {
    /// The result used when the model output is unusable.
    pub fn fallback() -> Self {
        Self {
            reply: FALLBACK_REPLY.to_string(),
            actions: Vec::new(),
        }
    }
}
