//! Prompt assembly for a single chat turn.

use crate::persona::email_instruction;
use jazzy_types::{ChatRequest, Role, Source};
use serde::{Deserialize, Serialize};

/// Role of a message in the provider prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    System,
    User,
    Assistant,
}

impl From<Role> for PromptRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => Self::User,
            Role::Assistant => Self::Assistant,
        }
    }
}

/// One entry in the prompt sequence sent upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub content: String,
}

impl PromptMessage {
    pub fn new(role: PromptRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Builds the ordered prompt: persona, then history, then the new message.
///
/// Email-sourced messages are wrapped so the model writes a full reply email.
pub fn build_prompt(persona: &str, request: &ChatRequest) -> Vec<PromptMessage> {
    let mut messages = Vec::with_capacity(request.history.len() + 2);
    messages.push(PromptMessage::new(PromptRole::System, persona));

    messages.extend(
        request
            .history
            .iter()
            .map(|turn| PromptMessage::new(turn.role().into(), turn.content())),
    );

    let content = match request.source {
        Source::Email => email_instruction(&request.message),
        Source::Chat => request.message.clone(),
    };
    messages.push(PromptMessage::new(PromptRole::User, content));

    messages
}
