use crate::error::VoiceError;
use crate::process::run_piped;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;

/// Largest recording handed to the recognizer (10 MiB).
const MAX_AUDIO_BYTES: usize = 10 * 1024 * 1024;

const TRANSCRIBE_TIMEOUT: Duration = Duration::from_secs(60);

/// Speech-to-text through a whisper.cpp-compatible program.
///
/// The recording is streamed on stdin and the transcript is read from stdout.
#[derive(Debug, Clone)]
pub struct SttService {
    model: PathBuf,
    binary: PathBuf,
}

impl SttService {
    pub fn new(model: impl Into<PathBuf>, binary: impl Into<PathBuf>) -> Self {
        Self {
            model: model.into(),
            binary: binary.into(),
        }
    }

    /// Transcribes one utterance and returns the trimmed text.
    pub async fn transcribe(&self, audio: &[u8]) -> Result<String, VoiceError> {
        if audio.is_empty() {
            return Err(VoiceError::Stt("no audio captured".to_string()));
        }
        if audio.len() > MAX_AUDIO_BYTES {
            return Err(VoiceError::Stt(format!(
                "recording is {} bytes, limit is {}",
                audio.len(),
                MAX_AUDIO_BYTES
            )));
        }

        // `-nt` suppresses timestamps so stdout holds only the transcript.
        let mut command = Command::new(&self.binary);
        command.arg("-m").arg(&self.model).args(["-f", "-", "-nt"]);

        let stdout = run_piped(
            command,
            Some(audio.to_vec()),
            TRANSCRIBE_TIMEOUT,
            "recognizer",
            VoiceError::Stt,
        )
        .await?;

        let transcript = String::from_utf8_lossy(&stdout).trim().to_string();
        tracing::debug!(chars = transcript.len(), "transcribed utterance");
        Ok(transcript)
    }
}
