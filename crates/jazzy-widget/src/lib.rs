//! Client side of the Jazzy chat: conversation state and the chat backend.
//!
//! [`ConversationView`] owns the turns of one session and the flags the UI
//! renders (panel open, "thinking", microphone active). It talks to the
//! server through a [`ChatBackend`] and to the platform's speech through an
//! injected [`SpeechIo`](jazzy_voice::SpeechIo).
//!
//! Nothing is persisted: dropping the view discards the conversation.

pub mod backend;
pub mod error;
pub mod view;

pub use backend::{ChatBackend, HttpChatBackend};
pub use error::WidgetError;
pub use view::{ConversationView, ViewSnapshot};
