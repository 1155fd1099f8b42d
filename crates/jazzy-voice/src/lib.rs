//! Speech input and output for the Jazzy chat client.
//!
//! The conversation view talks to speech through the [`SpeechIo`] capability
//! instead of probing the platform at every call site. Two implementations
//! ship here:
//!
//! - [`NoopSpeech`] for platforms without speech support. Listening reports
//!   [`VoiceError::Unsupported`] and speaking does nothing.
//! - [`ProcessSpeech`], which records one utterance with a recorder command,
//!   transcribes it with a whisper.cpp-compatible binary ([`SttService`]),
//!   and speaks replies through espeak-ng or piper ([`TtsService`]) piped into
//!   a player command.
//!
//! Listening results arrive as [`SpeechEvent`]s on a channel. Every listening
//! session ends with [`SpeechEvent::End`], whether or not a transcript was
//! produced.

pub mod adapter;
pub mod config;
pub mod error;
mod process;
pub mod stt;
pub mod tts;

pub use adapter::{NoopSpeech, ProcessSpeech, SpeechEvent, SpeechIo};
pub use config::{SpeechConfig, TtsEngine};
pub use error::VoiceError;
pub use stt::SttService;
pub use tts::TtsService;
