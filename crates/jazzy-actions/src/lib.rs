//! Side-effect dispatch for actions requested by the assistant.
//!
//! After a chat turn completes, the model's answer may name zero or more
//! actions (`log_lead`, `mark_urgent`, `prepare_email_reply`, ...). The
//! [`ActionDispatcher`] runs each one exactly once, in order, through a
//! registry of named [`ActionHandler`]s.
//!
//! Dispatch is best-effort. A handler that errors, times out or panics is
//! logged and counted in the [`DispatchReport`]; the remaining actions still
//! run and nothing is propagated to the caller. Names without a registered
//! handler (including `none`) are skipped.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod handlers;

pub use config::ActionsConfig;
pub use dispatcher::{ActionContext, ActionDispatcher, ActionHandler, DispatchReport};
pub use error::ActionError;
pub use handlers::{EmailDraftHandler, LeadLogHandler, UrgentHandler};
