use crate::error::WidgetError;
use async_trait::async_trait;
use jazzy_types::{Action, ChatRequest, PipelineResult};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Where the view sends chat turns.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Sends one turn. An empty `reply` in the result means the server
    /// answered without one.
    async fn send(&self, request: &ChatRequest) -> Result<PipelineResult, WidgetError>;
}

#[derive(Deserialize)]
struct ReplyBody {
    #[serde(default)]
    reply: Option<String>,
    #[serde(default)]
    actions: Vec<Value>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Posts chat turns to a `/api/jazzy-chat` endpoint.
#[derive(Debug, Clone)]
pub struct HttpChatBackend {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpChatBackend {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, WidgetError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(&self, request: &ChatRequest) -> Result<PipelineResult, WidgetError> {
        let resp = self.http.post(&self.endpoint).json(request).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = match resp.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => status.canonical_reason().unwrap_or("unknown").to_string(),
            };
            return Err(WidgetError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: ReplyBody = resp.json().await?;
        let actions = body
            .actions
            .into_iter()
            .filter_map(|value| serde_json::from_value::<Action>(value).ok())
            .collect();

        Ok(PipelineResult {
            reply: body.reply.unwrap_or_default(),
            actions,
        })
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn send(&self, request: &ChatRequest) -> Result<PipelineResult, WidgetError> {
        self.post(request).await
    }
}
