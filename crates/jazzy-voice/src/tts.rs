use crate::config::TtsEngine;
use crate::error::VoiceError;
use crate::process::run_piped;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;

/// Longest reply text handed to a synthesizer (64 KiB).
const MAX_TEXT_BYTES: usize = 64 * 1024;

const SYNTH_TIMEOUT: Duration = Duration::from_secs(60);

/// Renders reply text to audio bytes.
///
/// espeak-ng yields a WAV stream; piper yields raw s16le PCM.
#[derive(Debug, Clone)]
pub struct TtsService {
    engine: TtsEngine,
    espeak_binary: PathBuf,
    piper_binary: PathBuf,
    piper_model: Option<PathBuf>,
    speed: f32,
}

impl TtsService {
    /// An espeak-ng service using the binary found on `PATH`.
    pub fn espeak() -> Self {
        Self {
            engine: TtsEngine::Espeak,
            espeak_binary: PathBuf::from("espeak-ng"),
            piper_binary: PathBuf::from("piper"),
            piper_model: None,
            speed: 1.0,
        }
    }

    /// A piper service using `binary` and the voice model at `model`.
    pub fn piper(binary: impl Into<PathBuf>, model: impl Into<PathBuf>) -> Self {
        Self {
            engine: TtsEngine::Piper,
            piper_binary: binary.into(),
            piper_model: Some(model.into()),
            ..Self::espeak()
        }
    }

    pub fn with_espeak_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.espeak_binary = binary.into();
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn engine(&self) -> TtsEngine {
        self.engine
    }

    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>, VoiceError> {
        if text.trim().is_empty() {
            return Err(VoiceError::Tts("nothing to speak".to_string()));
        }
        if text.len() > MAX_TEXT_BYTES {
            return Err(VoiceError::Tts(format!(
                "reply is {} bytes, limit is {}",
                text.len(),
                MAX_TEXT_BYTES
            )));
        }
        if !(0.1..=10.0).contains(&self.speed) {
            return Err(VoiceError::Config(format!(
                "speed {} is outside 0.1..=10.0",
                self.speed
            )));
        }

        match self.engine {
            TtsEngine::Espeak => self.synthesize_espeak(text).await,
            TtsEngine::Piper => self.synthesize_piper(text).await,
        }
    }

    async fn synthesize_espeak(&self, text: &str) -> Result<Vec<u8>, VoiceError> {
        // espeak-ng's default rate is 175 words per minute.
        let rate = (175.0 * self.speed).round() as u32;

        // The reply goes on stdin so text starting with `-` is never an option.
        let mut command = Command::new(&self.espeak_binary);
        command
            .arg("--stdout")
            .arg("-s")
            .arg(rate.to_string())
            .arg("--stdin");

        run_piped(
            command,
            Some(text.as_bytes().to_vec()),
            SYNTH_TIMEOUT,
            "espeak-ng",
            VoiceError::Tts,
        )
        .await
    }

    async fn synthesize_piper(&self, text: &str) -> Result<Vec<u8>, VoiceError> {
        let model = self.piper_model.as_ref().ok_or_else(|| {
            VoiceError::Config("piper_model must be set for the piper engine".to_string())
        })?;
        if !model.exists() {
            return Err(VoiceError::Tts(format!("Model file not found: {:?}", model)));
        }

        // piper slows down as the length scale grows.
        let mut command = Command::new(&self.piper_binary);
        command
            .arg("--model")
            .arg(model)
            .arg("--output_raw")
            .arg("--length_scale")
            .arg((1.0 / self.speed).to_string());

        run_piped(
            command,
            Some(text.as_bytes().to_vec()),
            SYNTH_TIMEOUT,
            "piper",
            VoiceError::Tts,
        )
        .await
    }
}
