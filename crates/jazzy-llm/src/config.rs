use serde::Deserialize;
use std::fmt;

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_temperature() -> f32 {
    0.4
}

fn default_timeout_seconds() -> u64 {
    30
}

/// Connection settings for the OpenAI-compatible completion API.
#[derive(Clone, Deserialize)]
pub struct LlmConfig {
    /// Bearer token. Usually supplied through `OPENAI_API_KEY`.
    #[serde(default)]
    pub api_key: String,
    /// Base URL up to and including the API version segment.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature. Kept low so the JSON shape stays stable.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Whole-request timeout for a completion call.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl LlmConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Returns `true` when an API key is present.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_api_key() {
        let config = LlmConfig::new("sk-very-secret");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("sk-very-secret"));
        assert!(rendered.contains("[REDACTED]"));
        assert!(rendered.contains("gpt-4.1-mini"));
    }

    #[test]
    fn blank_key_is_not_configured() {
        assert!(!LlmConfig::new("   ").has_api_key());
        assert!(LlmConfig::new("sk-1").has_api_key());
    }
}
