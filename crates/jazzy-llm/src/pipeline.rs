use crate::error::PipelineError;
use crate::persona::PERSONA_PROMPT;
use crate::prompt::build_prompt;
use crate::provider::{CompletionProvider, CompletionRequest};
use crate::reply::parse_reply;
use jazzy_types::{ChatRequest, PipelineResult, FALLBACK_REPLY};
use std::sync::Arc;

/// Message returned for an empty or missing chat message.
pub const MESSAGE_REQUIRED: &str = "Message is required";

const DEFAULT_TEMPERATURE: f32 = 0.4;

/// Produces a reply and actions for one chat turn.
///
/// Holds no per-conversation state: history arrives with every request.
#[derive(Clone)]
pub struct ChatPipeline {
    provider: Arc<dyn CompletionProvider>,
    persona: String,
    temperature: f32,
    fallback_reply: String,
}

impl std::fmt::Debug for ChatPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatPipeline")
            .field("persona_len", &self.persona.len())
            .field("temperature", &self.temperature)
            .field("fallback_reply", &self.fallback_reply)
            .finish_non_exhaustive()
    }
}

impl ChatPipeline {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider,
            persona: PERSONA_PROMPT.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            fallback_reply: FALLBACK_REPLY.to_string(),
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = persona.into();
        self
    }

    pub fn with_fallback_reply(mut self, fallback: impl Into<String>) -> Self {
        self.fallback_reply = fallback.into();
        self
    }

    pub fn fallback_reply(&self) -> &str {
        &self.fallback_reply
    }

    /// Runs one chat turn.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Validation`] if the message is empty; the provider
    ///   is not called.
    /// - [`PipelineError::Upstream`] if the provider fails.
    ///
    /// Malformed model output is not an error: it yields the fallback reply
    /// and no actions.
    pub async fn run(&self, request: &ChatRequest) -> Result<PipelineResult, PipelineError> {
        if request.message.trim().is_empty() {
            return Err(PipelineError::Validation(MESSAGE_REQUIRED.to_string()));
        }

        let completion = CompletionRequest {
            messages: build_prompt(&self.persona, request),
            temperature: self.temperature,
        };

        let raw = self.provider.complete(&completion).await?;

        let result = match parse_reply(&raw) {
            Ok(parsed) => parsed.into_result(&self.fallback_reply),
            Err(e) => {
                tracing::warn!(raw_len = raw.len(), "failed to parse model answer: {}", e);
                tracing::debug!(raw = %raw, "unparsed model answer");
                PipelineResult {
                    reply: self.fallback_reply.clone(),
                    actions: Vec::new(),
                }
            }
        };

        tracing::info!(
            source = %request.source,
            history = request.history.len(),
            actions = result.actions.len(),
            "chat turn completed"
        );

        Ok(result)
    }
}
