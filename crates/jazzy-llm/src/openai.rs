use crate::config::LlmConfig;
use crate::error::UpstreamError;
use crate::prompt::PromptMessage;
use crate::provider::{CompletionProvider, CompletionRequest};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Longest slice of an error body kept for logs.
const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [PromptMessage],
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible `chat/completions` endpoint.
///
/// Built once at startup and shared; the underlying `reqwest::Client` pools
/// connections across requests.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    config: LlmConfig,
}

impl OpenAiClient {
    pub fn new(config: LlmConfig) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("jazzy/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    async fn complete_inner(&self, request: &CompletionRequest) -> Result<String, UpstreamError> {
        if !self.config.has_api_key() {
            return Err(UpstreamError::MissingApiKey);
        }

        let body = ChatCompletionBody {
            model: &self.config.model,
            messages: &request.messages,
            temperature: request.temperature,
        };

        tracing::debug!(
            model = %self.config.model,
            messages = request.messages.len(),
            "sending completion request"
        );

        let resp = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let body: String = text.chars().take(MAX_ERROR_BODY_CHARS).collect();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = resp.json().await?;
        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or(UpstreamError::NoChoices)?;

        Ok(choice.message.content.unwrap_or_default())
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, UpstreamError> {
        self.complete_inner(request).await
    }
}
