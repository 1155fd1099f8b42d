use crate::backend::ChatBackend;
use crate::error::WidgetError;
use jazzy_types::{ChatRequest, PipelineResult, Source, Turn, FALLBACK_REPLY};
use jazzy_voice::{SpeechEvent, SpeechIo, VoiceError};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Render model of the view at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot<'a> {
    pub open: bool,
    pub turns: &'a [Turn],
    pub input: &'a str,
    /// Show the "Jazzy is thinking…" indicator.
    pub thinking: bool,
    pub send_enabled: bool,
    pub mic_available: bool,
    pub mic_active: bool,
}

/// State of one chat session.
///
/// Turns are append-only. At most one send is in flight: while `pending`,
/// [`ConversationView::begin_send`] refuses new submissions.
pub struct ConversationView {
    turns: Vec<Turn>,
    input: String,
    open: bool,
    pending: bool,
    listening: bool,
    backend: Arc<dyn ChatBackend>,
    speech: Arc<dyn SpeechIo>,
    speech_tx: mpsc::UnboundedSender<SpeechEvent>,
    speech_rx: mpsc::UnboundedReceiver<SpeechEvent>,
}

impl std::fmt::Debug for ConversationView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationView")
            .field("turns", &self.turns.len())
            .field("open", &self.open)
            .field("pending", &self.pending)
            .field("listening", &self.listening)
            .finish_non_exhaustive()
    }
}

impl ConversationView {
    pub fn new(backend: Arc<dyn ChatBackend>, speech: Arc<dyn SpeechIo>) -> Self {
        let (speech_tx, speech_rx) = mpsc::unbounded_channel();
        Self {
            turns: Vec::new(),
            input: String::new(),
            open: false,
            pending: false,
            listening: false,
            backend,
            speech,
            speech_tx,
            speech_rx,
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Opens or closes the chat panel.
    pub fn toggle_open(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    pub fn snapshot(&self) -> ViewSnapshot<'_> {
        ViewSnapshot {
            open: self.open,
            turns: &self.turns,
            input: &self.input,
            thinking: self.pending,
            send_enabled: !self.pending,
            mic_available: self.speech.is_supported(),
            mic_active: self.listening,
        }
    }

    /// Starts a submission.
    ///
    /// Returns `None` when the trimmed input is empty or a send is already
    /// pending. Otherwise the user turn is appended immediately, the input
    /// is cleared, and the request to send is returned. Its history holds
    /// every turn before the new one.
    pub fn begin_send(&mut self) -> Option<ChatRequest> {
        if self.pending {
            return None;
        }
        let text = self.input.trim().to_string();
        if text.is_empty() {
            return None;
        }

        let history = self.turns.clone();
        self.turns.push(Turn::user(text.as_str()));
        self.input.clear();
        self.pending = true;

        Some(ChatRequest::new(text, history).with_source(Source::Chat))
    }

    /// Completes the submission started by [`begin_send`](Self::begin_send).
    ///
    /// On success appends and speaks the assistant turn. On failure the
    /// error is logged and no turn is added.
    pub fn finish_send(&mut self, result: Result<PipelineResult, WidgetError>) -> Option<&Turn> {
        self.pending = false;

        match result {
            Ok(result) => {
                let reply = if result.reply.trim().is_empty() {
                    FALLBACK_REPLY.to_string()
                } else {
                    result.reply
                };
                self.speech.speak(&reply);
                self.turns.push(Turn::assistant(reply));
                self.turns.last()
            }
            Err(e) => {
                tracing::error!("chat request failed: {}", e);
                None
            }
        }
    }

    /// Sends the current input and waits for the reply.
    pub async fn send(&mut self) -> Option<Turn> {
        let request = self.begin_send()?;
        let backend = self.backend.clone();
        let result = backend.send(&request).await;
        self.finish_send(result).cloned()
    }

    /// Starts or stops listening for one spoken utterance.
    ///
    /// Returns the new listening state.
    pub fn toggle_mic(&mut self) -> bool {
        if self.listening {
            self.speech.stop_listening();
            self.listening = false;
            return false;
        }

        match self.speech.start_listening(self.speech_tx.clone()) {
            Ok(()) => self.listening = true,
            Err(VoiceError::Unsupported) => {
                tracing::debug!("speech input not available");
            }
            Err(e) => {
                tracing::warn!("failed to start listening: {}", e);
            }
        }
        self.listening
    }

    /// Applies one speech event to the view.
    pub fn apply_speech_event(&mut self, event: SpeechEvent) {
        match event {
            SpeechEvent::Transcript(text) => {
                self.input = text;
                self.listening = false;
            }
            SpeechEvent::Error(msg) => {
                tracing::debug!("speech recognition error: {}", msg);
                self.listening = false;
            }
            SpeechEvent::End => self.listening = false,
        }
    }

    /// Applies every speech event that has already arrived.
    pub fn poll_speech(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.speech_rx.try_recv() {
            self.apply_speech_event(event);
            applied += 1;
        }
        applied
    }

    /// Waits for the next speech event and applies it.
    pub async fn next_speech_event(&mut self) -> Option<SpeechEvent> {
        let event = self.speech_rx.recv().await?;
        self.apply_speech_event(event.clone());
        Some(event)
    }
}
