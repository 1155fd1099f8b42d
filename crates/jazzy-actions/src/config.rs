use serde::Deserialize;

fn default_timeout_seconds() -> u64 {
    10
}

/// Optional sinks for the built-in action handlers.
///
/// Every sink is off by default; the handlers then only log.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionsConfig {
    /// JSON-lines file that receives one record per `log_lead`.
    #[serde(default)]
    pub lead_log_path: Option<String>,

    /// Incoming-webhook URL notified on `mark_urgent`.
    #[serde(default)]
    pub urgent_webhook_url: Option<String>,

    /// Directory where `prepare_email_reply` drafts are written.
    #[serde(default)]
    pub email_draft_dir: Option<String>,

    /// Upper bound for a single handler invocation.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            lead_log_path: None,
            urgent_webhook_url: None,
            email_draft_dir: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}
