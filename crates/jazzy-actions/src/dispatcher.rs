use crate::config::ActionsConfig;
use crate::error::ActionError;
use crate::handlers::{EmailDraftHandler, LeadLogHandler, UrgentHandler};
use async_trait::async_trait;
use futures_util::FutureExt;
use jazzy_types::{Action, ActionKind, Source};
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_ACTION_TIMEOUT: Duration = Duration::from_secs(10);

/// The chat turn an action originated from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionContext {
    pub message: String,
    pub source: Source,
}

impl ActionContext {
    pub fn new(message: impl Into<String>, source: Source) -> Self {
        Self {
            message: message.into(),
            source,
        }
    }
}

/// A named side effect.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    async fn handle(&self, action: &Action, ctx: &ActionContext) -> Result<(), ActionError>;
}

/// Outcome counts of one [`ActionDispatcher::dispatch`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Handlers that completed successfully.
    pub executed: usize,
    /// Handlers that errored, timed out or panicked.
    pub failed: usize,
    /// Actions with no registered handler.
    pub skipped: usize,
}

/// Registry of action handlers keyed by action name.
#[derive(Clone)]
pub struct ActionDispatcher {
    handlers: HashMap<String, Arc<dyn ActionHandler>>,
    timeout: Duration,
}

impl Default for ActionDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ActionDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.handlers.keys().collect();
        names.sort();
        f.debug_struct("ActionDispatcher")
            .field("handlers", &names)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ActionDispatcher {
    /// Creates a dispatcher with no handlers.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            timeout: DEFAULT_ACTION_TIMEOUT,
        }
    }

    /// Creates a dispatcher with the built-in handlers wired to `config`.
    pub fn with_builtin_handlers(config: &ActionsConfig) -> Self {
        let mut dispatcher =
            Self::new().with_timeout(Duration::from_secs(config.timeout_seconds));

        dispatcher.register(
            ActionKind::LogLead.as_str(),
            Arc::new(LeadLogHandler::new(config.lead_log_path.as_ref())),
        );
        dispatcher.register(
            ActionKind::MarkUrgent.as_str(),
            Arc::new(UrgentHandler::new(config.urgent_webhook_url.clone())),
        );
        dispatcher.register(
            ActionKind::PrepareEmailReply.as_str(),
            Arc::new(EmailDraftHandler::new(config.email_draft_dir.as_ref())),
        );

        dispatcher
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Registers `handler` under `name`, returning the handler it replaced.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        handler: Arc<dyn ActionHandler>,
    ) -> Option<Arc<dyn ActionHandler>> {
        self.handlers.insert(name.into(), handler)
    }

    /// Returns `true` if a handler is registered for `name`.
    pub fn handles(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Runs every action once, in order.
    ///
    /// Never fails: handler errors are logged and counted.
    pub async fn dispatch(&self, actions: &[Action], ctx: &ActionContext) -> DispatchReport {
        let mut report = DispatchReport::default();

        for action in actions {
            let name = action.kind.as_str();
            let Some(handler) = self.handlers.get(name) else {
                tracing::debug!(action = name, "no handler registered, skipping action");
                report.skipped += 1;
                continue;
            };

            match self.run_one(handler.as_ref(), action, ctx).await {
                Ok(()) => {
                    tracing::debug!(action = name, "action executed");
                    report.executed += 1;
                }
                Err(e) => {
                    tracing::error!(action = name, "action execution failed: {}", e);
                    report.failed += 1;
                }
            }
        }

        report
    }

    async fn run_one(
        &self,
        handler: &dyn ActionHandler,
        action: &Action,
        ctx: &ActionContext,
    ) -> Result<(), ActionError> {
        let guarded = AssertUnwindSafe(handler.handle(action, ctx)).catch_unwind();
        match tokio::time::timeout(self.timeout, guarded).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(ActionError::Panicked),
            Err(_) => Err(ActionError::Timeout(self.timeout.as_secs())),
        }
    }
}
