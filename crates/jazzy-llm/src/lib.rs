//! Chat turn pipeline for the Jazzy support assistant.
//!
//! Turns a [`ChatRequest`](jazzy_types::ChatRequest) into a
//! [`PipelineResult`](jazzy_types::PipelineResult): the persona prompt and the
//! caller-supplied history are sent to a text-completion provider, and the
//! provider's JSON answer is parsed into a reply plus a list of actions.
//!
//! The provider sits behind the [`CompletionProvider`] trait. Production code
//! uses [`OpenAiClient`], constructed once at startup and shared by `Arc`;
//! tests substitute a stub.
//!
//! Model output that is not the expected JSON never fails the turn: the
//! pipeline substitutes the fallback reply and an empty action list.

pub mod config;
pub mod error;
pub mod openai;
pub mod persona;
pub mod pipeline;
pub mod prompt;
pub mod provider;
pub mod reply;

pub use config::LlmConfig;
pub use error::{MalformedReplyError, PipelineError, UpstreamError};
pub use openai::OpenAiClient;
pub use pipeline::{ChatPipeline, MESSAGE_REQUIRED};
pub use prompt::{build_prompt, PromptMessage, PromptRole};
pub use provider::{CompletionProvider, CompletionRequest};
pub use reply::{parse_reply, ParsedReply};
