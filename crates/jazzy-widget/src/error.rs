use thiserror::Error;

#[derive(Error, Debug)]
pub enum WidgetError {
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("chat backend error: {0}")]
    Backend(String),
}
