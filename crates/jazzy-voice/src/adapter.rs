use crate::config::{SpeechConfig, TtsEngine};
use crate::error::VoiceError;
use crate::process::{command_from, run_piped};
use crate::stt::SttService;
use crate::tts::TtsService;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Upper bound for recording a single utterance.
const RECORD_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound for playing back a reply.
const PLAYBACK_TIMEOUT: Duration = Duration::from_secs(120);

/// Outcome of a listening session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    /// Final transcript of the captured utterance.
    Transcript(String),
    /// Capture or recognition failed.
    Error(String),
    /// The session is over. Always the last event.
    End,
}

/// Speech capability injected into the conversation view.
pub trait SpeechIo: Send + Sync {
    /// Whether listening and speaking do anything on this platform.
    fn is_supported(&self) -> bool;

    /// Starts capturing one utterance. Results are sent on `events`.
    fn start_listening(&self, events: mpsc::UnboundedSender<SpeechEvent>)
        -> Result<(), VoiceError>;

    /// Abandons the current listening session, if any.
    fn stop_listening(&self);

    /// Speaks `text` once without waiting for playback to finish.
    fn speak(&self, text: &str);
}

/// Speech for platforms that have none.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSpeech;

impl SpeechIo for NoopSpeech {
    fn is_supported(&self) -> bool {
        false
    }

    fn start_listening(
        &self,
        _events: mpsc::UnboundedSender<SpeechEvent>,
    ) -> Result<(), VoiceError> {
        Err(VoiceError::Unsupported)
    }

    fn stop_listening(&self) {}

    fn speak(&self, _text: &str) {}
}

/// Speech backed by local recorder, recognizer, synthesizer and player programs.
#[derive(Debug)]
pub struct ProcessSpeech {
    recorder: Vec<String>,
    player: Vec<String>,
    stt: Arc<SttService>,
    tts: Arc<TtsService>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl ProcessSpeech {
    pub fn new(
        recorder: Vec<String>,
        player: Vec<String>,
        stt: SttService,
        tts: TtsService,
    ) -> Result<Self, VoiceError> {
        if recorder.is_empty() {
            return Err(VoiceError::Config("recorder command is empty".to_string()));
        }
        if player.is_empty() {
            return Err(VoiceError::Config("player command is empty".to_string()));
        }
        Ok(Self {
            recorder,
            player,
            stt: Arc::new(stt),
            tts: Arc::new(tts),
            listener: Mutex::new(None),
        })
    }

    pub fn from_config(config: &SpeechConfig) -> Result<Self, VoiceError> {
        let stt = SttService::new(&config.stt_model, &config.stt_binary);
        let tts = match config.tts_engine {
            TtsEngine::Espeak => TtsService::espeak(),
            TtsEngine::Piper => {
                let model = config.piper_model.as_ref().ok_or_else(|| {
                    VoiceError::Config("piper_model must be set for the piper engine".to_string())
                })?;
                TtsService::piper(&config.piper_binary, model)
            }
        }
        .with_speed(config.speed);

        Self::new(
            config.recorder_command.clone(),
            config.player_command.clone(),
            stt,
            tts,
        )
    }

    fn listener(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        match self.listener.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::error!("speech listener lock poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }
}

impl SpeechIo for ProcessSpeech {
    fn is_supported(&self) -> bool {
        true
    }

    fn start_listening(
        &self,
        events: mpsc::UnboundedSender<SpeechEvent>,
    ) -> Result<(), VoiceError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|_| VoiceError::Config("no async runtime available".to_string()))?;

        let mut slot = self.listener();
        if let Some(previous) = slot.take() {
            previous.abort();
        }

        let recorder = self.recorder.clone();
        let stt = self.stt.clone();
        *slot = Some(runtime.spawn(async move {
            match listen_once(&recorder, &stt).await {
                Ok(text) if !text.is_empty() => {
                    let _ = events.send(SpeechEvent::Transcript(text));
                }
                Ok(_) => tracing::debug!("no speech recognized"),
                Err(e) => {
                    tracing::warn!("speech recognition failed: {}", e);
                    let _ = events.send(SpeechEvent::Error(e.to_string()));
                }
            }
            let _ = events.send(SpeechEvent::End);
        }));

        Ok(())
    }

    fn stop_listening(&self) {
        if let Some(handle) = self.listener().take() {
            handle.abort();
        }
    }

    fn speak(&self, text: &str) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("no async runtime available, not speaking reply");
            return;
        };

        let tts = self.tts.clone();
        let player = self.player.clone();
        let text = text.to_string();
        runtime.spawn(async move {
            let result = match tts.synthesize(&text).await {
                Ok(audio) => play(&player, audio).await,
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                tracing::warn!("failed to speak reply: {}", e);
            }
        });
    }
}

async fn listen_once(recorder: &[String], stt: &SttService) -> Result<String, VoiceError> {
    let audio = record(recorder).await?;
    stt.transcribe(&audio).await
}

async fn record(recorder: &[String]) -> Result<Vec<u8>, VoiceError> {
    let command = command_from(recorder, VoiceError::Capture)?;
    run_piped(command, None, RECORD_TIMEOUT, "recorder", VoiceError::Capture).await
}

async fn play(player: &[String], audio: Vec<u8>) -> Result<(), VoiceError> {
    let command = command_from(player, VoiceError::Playback)?;
    run_piped(command, Some(audio), PLAYBACK_TIMEOUT, "player", VoiceError::Playback).await?;
    Ok(())
}
