use crate::error::UpstreamError;
use crate::prompt::PromptMessage;
use async_trait::async_trait;

/// A single completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<PromptMessage>,
    pub temperature: f32,
}

/// Anything that can turn a prompt sequence into one text completion.
///
/// Implementations return the raw completion text; an empty string means the
/// provider produced no content.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, UpstreamError>;
}
