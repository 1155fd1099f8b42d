use serde::Deserialize;

/// Synthesis backend for spoken replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TtsEngine {
    /// espeak-ng, writes a WAV stream to stdout.
    #[default]
    Espeak,
    /// Piper (ONNX voices), writes raw s16le PCM to stdout.
    Piper,
}

fn default_recorder_command() -> Vec<String> {
    [
        "arecord", "-q", "-f", "S16_LE", "-r", "16000", "-c", "1", "-d", "6", "-t", "wav",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_player_command() -> Vec<String> {
    vec!["aplay".to_string(), "-q".to_string()]
}

fn default_stt_binary() -> String {
    "whisper-cli".to_string()
}

fn default_stt_model() -> String {
    "models/ggml-base.en.bin".to_string()
}

fn default_piper_binary() -> String {
    "piper".to_string()
}

fn default_speed() -> f32 {
    1.0
}

/// Settings for [`ProcessSpeech`](crate::ProcessSpeech).
#[derive(Debug, Clone, Deserialize)]
pub struct SpeechConfig {
    /// When false the client uses [`NoopSpeech`](crate::NoopSpeech).
    #[serde(default)]
    pub enabled: bool,

    /// Program and arguments that record one utterance to stdout.
    #[serde(default = "default_recorder_command")]
    pub recorder_command: Vec<String>,

    /// Program and arguments that play audio read from stdin.
    #[serde(default = "default_player_command")]
    pub player_command: Vec<String>,

    /// whisper.cpp-compatible binary.
    #[serde(default = "default_stt_binary")]
    pub stt_binary: String,

    /// GGML model passed to the STT binary.
    #[serde(default = "default_stt_model")]
    pub stt_model: String,

    #[serde(default)]
    pub tts_engine: TtsEngine,

    #[serde(default = "default_piper_binary")]
    pub piper_binary: String,

    /// Piper voice model; required when `tts_engine = "piper"`.
    #[serde(default)]
    pub piper_model: Option<String>,

    /// Speech rate multiplier (1.0 is normal).
    #[serde(default = "default_speed")]
    pub speed: f32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            recorder_command: default_recorder_command(),
            player_command: default_player_command(),
            stt_binary: default_stt_binary(),
            stt_model: default_stt_model(),
            tts_engine: TtsEngine::default(),
            piper_binary: default_piper_binary(),
            piper_model: None,
            speed: default_speed(),
        }
    }
}
