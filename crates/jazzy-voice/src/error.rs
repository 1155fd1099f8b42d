use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("speech is not supported on this platform")]
    Unsupported,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Capture error: {0}")]
    Capture(String),

    #[error("TTS error: {0}")]
    Tts(String),

    #[error("STT error: {0}")]
    Stt(String),

    #[error("Playback error: {0}")]
    Playback(String),
}
