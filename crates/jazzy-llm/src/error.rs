use thiserror::Error;

/// Errors surfaced by [`ChatPipeline::run`](crate::ChatPipeline::run).
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The request was rejected before any upstream call.
    #[error("{0}")]
    Validation(String),

    /// The completion provider failed.
    #[error("upstream provider error: {0}")]
    Upstream(#[from] UpstreamError),
}

/// Failures talking to the completion provider.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("provider returned no choices")]
    NoChoices,

    #[error("API key is not configured")]
    MissingApiKey,

    #[error("provider error: {0}")]
    Provider(String),
}

/// Model output that does not have the expected `{reply, actions}` shape.
///
/// Never leaves the pipeline; it is logged and replaced with the fallback
/// reply.
#[derive(Error, Debug)]
pub enum MalformedReplyError {
    #[error("reply is not valid JSON: {0}")]
    NotJson(#[from] serde_json::Error),

    #[error("reply JSON is not an object")]
    NotAnObject,
}
