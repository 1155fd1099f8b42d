//! Server configuration loading from file and environment variables.

use jazzy_actions::ActionsConfig;
use jazzy_llm::LlmConfig;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Completion API settings.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Action handler sinks.
    #[serde(default)]
    pub actions: ActionsConfig,

    /// Embeddable snippet settings.
    #[serde(default)]
    pub widget: WidgetConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "jazzy_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WidgetConfig {
    /// Hosted chat page loaded into the snippet's iframe.
    #[serde(default = "default_frame_url")]
    pub frame_url: String,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_frame_url() -> String {
    "https://agent.digitalboxes.net/jazzy-chat".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            frame_url: default_frame_url(),
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// File read when neither the command line nor the environment names one.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Where the configuration file path came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLocation {
    /// First command-line argument.
    Argument(String),
    /// `JAZZY_CONFIG_PATH`.
    Environment(String),
    /// [`DEFAULT_CONFIG_FILE`] in the working directory.
    Default,
}

impl ConfigLocation {
    /// Picks the config path: argument first, then `JAZZY_CONFIG_PATH`.
    /// Blank values are skipped.
    pub fn resolve<F>(argument: Option<String>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = argument.and_then(non_empty) {
            Self::Argument(path)
        } else if let Some(path) = lookup("JAZZY_CONFIG_PATH").and_then(non_empty) {
            Self::Environment(path)
        } else {
            Self::Default
        }
    }

    /// Resolves from the process arguments and environment.
    pub fn from_process() -> Self {
        Self::resolve(std::env::args().nth(1), |key| std::env::var(key).ok())
    }

    pub fn path(&self) -> &str {
        match self {
            Self::Argument(path) | Self::Environment(path) => path,
            Self::Default => DEFAULT_CONFIG_FILE,
        }
    }

    /// Short label for startup logs.
    pub fn origin(&self) -> &'static str {
        match self {
            Self::Argument(_) => "argument",
            Self::Environment(_) => "environment",
            Self::Default => "default",
        }
    }
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `JAZZY_HOST` overrides `server.host`
/// - `JAZZY_PORT` overrides `server.port`
/// - `JAZZY_LOG_LEVEL` overrides `logging.level`
/// - `JAZZY_LOG_JSON` overrides `logging.json` (set to "true" to enable)
/// - `OPENAI_API_KEY` overrides `llm.api_key`
/// - `JAZZY_LLM_BASE_URL` overrides `llm.base_url`
/// - `JAZZY_LLM_MODEL` overrides `llm.model`
/// - `JAZZY_LEAD_LOG_PATH` overrides `actions.lead_log_path`
/// - `JAZZY_URGENT_WEBHOOK_URL` overrides `actions.urgent_webhook_url`
/// - `JAZZY_EMAIL_DRAFT_DIR` overrides `actions.email_draft_dir`
/// - `JAZZY_WIDGET_FRAME_URL` overrides `widget.frame_url`
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    Ok(config)
}

/// Applies environment overrides read through `lookup`.
///
/// Empty values for optional sinks leave them unset.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup("JAZZY_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Some(port) = lookup("JAZZY_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Some(level) = lookup("JAZZY_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = lookup("JAZZY_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }

    if let Some(key) = lookup("OPENAI_API_KEY") {
        config.llm.api_key = key;
    }
    if let Some(base_url) = lookup("JAZZY_LLM_BASE_URL") {
        config.llm.base_url = base_url;
    }
    if let Some(model) = lookup("JAZZY_LLM_MODEL") {
        config.llm.model = model;
    }

    if let Some(path) = lookup("JAZZY_LEAD_LOG_PATH") {
        config.actions.lead_log_path = non_empty(path);
    }
    if let Some(url) = lookup("JAZZY_URGENT_WEBHOOK_URL") {
        config.actions.urgent_webhook_url = non_empty(url);
    }
    if let Some(dir) = lookup("JAZZY_EMAIL_DRAFT_DIR") {
        config.actions.email_draft_dir = non_empty(dir);
    }

    if let Some(url) = lookup("JAZZY_WIDGET_FRAME_URL") {
        if !url.trim().is_empty() {
            config.widget.frame_url = url;
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
