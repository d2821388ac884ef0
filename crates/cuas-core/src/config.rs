use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{CuasError, Result};

/// Environment variable that overrides `backend.api_key`.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Placeholder values shipped in sample configs. Treated as "no key".
const PLACEHOLDER_KEYS: &[&str] = &[
    "your_gemini_api_key_here",
    "your_development_gemini_api_key_here",
    "your_production_gemini_api_key_here",
];

/// Top-level configuration for the C-UAS assistant.
///
/// Loaded from `~/.cuas/config.toml` by default. Every section falls back to
/// its defaults when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CuasConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

impl CuasConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: CuasConfig = toml::from_str(&content)?;
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
        let content =
            toml::to_string_pretty(self).map_err(|e| CuasError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Overlay values taken from the process environment.
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.backend.api_key = key;
            }
        }
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

/// Where the product knowledge base comes from and how long to wait for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// File path or `http(s)://` URL of the knowledge base document.
    pub source: String,
    /// Timeout for fetching the document over HTTP, in seconds.
    pub timeout_secs: u64,
    /// How long a question waits for the knowledge base before giving up, in milliseconds.
    pub readiness_timeout_ms: u64,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            source: "assets/data/knowledge-base.json".to_string(),
            timeout_secs: 30,
            readiness_timeout_ms: 10_000,
        }
    }
}

/// Text-generation backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Generative model name.
    pub model: String,
    /// API root, without the `/v1beta` suffix.
    pub base_url: String,
    /// API key. Prefer the `GEMINI_API_KEY` environment variable.
    pub api_key: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl BackendConfig {
    /// Whether a usable (non-empty, non-placeholder) key is configured.
    pub fn has_api_key(&self) -> bool {
        let key = self.api_key.trim();
        !key.is_empty() && !PLACEHOLDER_KEYS.contains(&key)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key: String::new(),
            request_timeout_secs: 60,
        }
    }
}

/// Conversation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Number of prior messages replayed into each prompt.
    pub history_window: usize,
    /// Maximum accepted message length in characters.
    pub max_message_length: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_window: 10,
            max_message_length: 2000,
        }
    }
}
