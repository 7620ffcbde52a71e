use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;

/// Top-level configuration for the Medinet assistant.
///
/// Loaded from `~/.medinet/config.toml` by default. Every section falls back
/// to its defaults when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MedinetConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

impl MedinetConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: MedinetConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Conversational webhook settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Webhook receiving free-text messages.
    pub webhook_url: String,
    /// Webhook receiving `tool_call` actions. Empty means "same as `webhook_url`".
    pub tool_webhook_url: String,
    /// Maximum accepted length of a user message, in characters.
    pub max_message_length: usize,
    /// Per-request timeout for webhook calls.
    pub request_timeout_secs: u64,
}

impl ChatConfig {
    /// The URL tool calls are posted to.
    pub fn tool_url(&self) -> &str {
        if self.tool_webhook_url.is_empty() {
            &self.webhook_url
        } else {
            &self.tool_webhook_url
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            webhook_url: "http://localhost:5678/webhook/chat".to_string(),
            tool_webhook_url: String::new(),
            max_message_length: 2000,
            request_timeout_secs: 30,
        }
    }
}

/// Vector search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Full URL of the vector-search endpoint.
    pub endpoint: String,
    /// Minimum similarity sent with every search.
    pub threshold: f64,
    /// Maximum number of results requested.
    pub limit: u32,
    /// Per-request timeout for search calls.
    pub request_timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3000/api/vector-search".to_string(),
            threshold: 0.5,
            limit: 12,
            request_timeout_secs: 15,
        }
    }
}
