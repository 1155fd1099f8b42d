use thiserror::Error;

#[derive(Error, Debug)]
pub enum ActionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("webhook error: {0}")]
    Webhook(String),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("action timed out after {0} seconds")]
    Timeout(u64),

    #[error("action handler panicked")]
    Panicked,
}
