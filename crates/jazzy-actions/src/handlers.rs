//! Built-in handlers for the action names the persona prompt advertises.

use crate::dispatcher::{ActionContext, ActionHandler};
use crate::error::ActionError;
use async_trait::async_trait;
use jazzy_types::{Action, EmailDraft, LeadDetails};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Decodes the typed view of a payload, falling back to an empty view.
///
/// The raw payload is still stored with every record, so nothing the model
/// sent is lost when the view cannot be read.
fn decode_or_default<T: serde::de::DeserializeOwned + Default>(action: &Action) -> T {
    action.decode_payload().unwrap_or_else(|e| {
        tracing::warn!(action = %action.kind, "unreadable payload, keeping it raw: {}", e);
        T::default()
    })
}

// ---------------------------------------------------------------------------
// log_lead
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct LeadRecord<'a> {
    name: Option<&'a str>,
    email: Option<&'a str>,
    project: Option<&'a str>,
    payload: Option<&'a Value>,
    source: &'a str,
    created_at: String,
}

/// Records a sales lead, optionally appending it to a JSON-lines file.
#[derive(Debug, Clone, Default)]
pub struct LeadLogHandler {
    path: Option<PathBuf>,
}

impl LeadLogHandler {
    pub fn new<P: AsRef<Path>>(path: Option<P>) -> Self {
        Self {
            path: path.map(|p| p.as_ref().to_path_buf()),
        }
    }

    /// A handler that only logs.
    pub fn log_only() -> Self {
        Self::default()
    }

    async fn record(&self, action: &Action, ctx: &ActionContext) -> Result<(), ActionError> {
        let lead: LeadDetails = decode_or_default(action);

        tracing::info!(
            name = lead.name.as_deref().unwrap_or("-"),
            email = lead.email.as_deref().unwrap_or("-"),
            project = lead.project.as_deref().unwrap_or("-"),
            source = %ctx.source,
            "logging lead"
        );

        let Some(path) = &self.path else {
            return Ok(());
        };

        let record = LeadRecord {
            name: lead.name.as_deref(),
            email: lead.email.as_deref(),
            project: lead.project.as_deref(),
            payload: action.payload.as_ref(),
            source: ctx.source.as_str(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        let mut line = serde_json::to_string(&record)
            .map_err(|e| ActionError::InvalidPayload(e.to_string()))?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl ActionHandler for LeadLogHandler {
    async fn handle(&self, action: &Action, ctx: &ActionContext) -> Result<(), ActionError> {
        self.record(action, ctx).await
    }
}

// ---------------------------------------------------------------------------
// mark_urgent
// ---------------------------------------------------------------------------

/// Flags the originating message, optionally notifying an incoming webhook.
#[derive(Debug, Clone, Default)]
pub struct UrgentHandler {
    webhook_url: Option<String>,
    http: reqwest::Client,
}

impl UrgentHandler {
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            webhook_url: webhook_url.filter(|url| !url.trim().is_empty()),
            http: reqwest::Client::new(),
        }
    }

    async fn flag(&self, ctx: &ActionContext) -> Result<(), ActionError> {
        tracing::warn!(source = %ctx.source, message = %ctx.message, "urgent message detected");

        let Some(url) = &self.webhook_url else {
            return Ok(());
        };

        let body = serde_json::json!({
            "text": format!("Urgent {} message: {}", ctx.source, ctx.message),
            "source": ctx.source.as_str(),
        });

        let resp = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ActionError::Webhook(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ActionError::Webhook(format!(
                "webhook returned status {}",
                resp.status()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ActionHandler for UrgentHandler {
    async fn handle(&self, _action: &Action, ctx: &ActionContext) -> Result<(), ActionError> {
        self.flag(ctx).await
    }
}

// ---------------------------------------------------------------------------
// prepare_email_reply
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct DraftRecord<'a> {
    id: &'a str,
    to: Option<&'a str>,
    subject: Option<&'a str>,
    body: Option<&'a str>,
    original_message: &'a str,
    source: &'a str,
    payload: Option<&'a Value>,
    created_at: String,
}

/// Stages an email reply draft, optionally writing it to a directory.
#[derive(Debug, Clone, Default)]
pub struct EmailDraftHandler {
    dir: Option<PathBuf>,
}

impl EmailDraftHandler {
    pub fn new<P: AsRef<Path>>(dir: Option<P>) -> Self {
        Self {
            dir: dir.map(|p| p.as_ref().to_path_buf()),
        }
    }

    /// A handler that only logs.
    pub fn log_only() -> Self {
        Self::default()
    }

    async fn stage(&self, action: &Action, ctx: &ActionContext) -> Result<(), ActionError> {
        let draft: EmailDraft = decode_or_default(action);

        tracing::info!(
            subject = draft.subject.as_deref().unwrap_or("-"),
            body_len = draft.body.as_deref().map(str::len).unwrap_or(0),
            "email reply prepared"
        );

        let Some(dir) = &self.dir else {
            return Ok(());
        };

        let id = uuid::Uuid::new_v4().to_string();
        let record = DraftRecord {
            id: &id,
            to: draft.to.as_deref(),
            subject: draft.subject.as_deref(),
            body: draft.body.as_deref(),
            original_message: &ctx.message,
            source: ctx.source.as_str(),
            payload: action.payload.as_ref(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        let json = serde_json::to_vec_pretty(&record)
            .map_err(|e| ActionError::InvalidPayload(e.to_string()))?;

        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(dir.join(format!("{}.json", id)), json).await?;
        Ok(())
    }
}

#[async_trait]
impl ActionHandler for EmailDraftHandler {
    async fn handle(&self, action: &Action, ctx: &ActionContext) -> Result<(), ActionError> {
        self.stage(action, ctx).await
    }
}
