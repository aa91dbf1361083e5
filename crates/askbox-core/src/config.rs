use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{AskboxError, Result};

/// Top-level configuration for the askbox client.
///
/// Loaded from `~/.askbox/config.toml` by default. Each section covers one
/// concern: the answer service endpoint, the conversation texts, and the
/// speech adapters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AskboxConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
}

impl AskboxConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AskboxConfig = toml::from_str(&content)?;
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
            toml::to_string_pretty(self).map_err(|e| AskboxError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// Answer service endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the answer service (no trailing slash required).
    pub base_url: String,
    /// Timeout for an `/ask` round-trip, in seconds.
    pub request_timeout_secs: u64,
    /// Timeout for the page-teardown `/clear` beacon, in seconds.
    /// Kept short so teardown is never held up by a dead backend.
    pub beacon_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8090".to_string(),
            request_timeout_secs: 30,
            beacon_timeout_secs: 2,
        }
    }
}

/// Conversation texts and input limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Agent message seeded into every fresh session.
    pub greeting: String,
    /// Agent message appended when a request fails for any reason.
    pub fallback_reply: String,
    /// Agent message used when the service replies without an answer field.
    pub missing_answer_reply: String,
    /// Maximum accepted question length in characters.
    pub max_question_chars: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            greeting: "Hello! Please ask a question.".to_string(),
            fallback_reply: "Sorry, something went wrong. Please try again.".to_string(),
            missing_answer_reply: "I don't have an answer for that.".to_string(),
            max_question_chars: 2000,
        }
    }
}

/// Speech recognition and synthesis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Whether the speech adapters are wired up at all.
    pub enabled: bool,
    /// BCP 47 locale tag for both recognition and synthesis.
    pub locale: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            locale: "en-US".to_string(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AskboxConfig::default();
        assert_eq!(config.service.base_url, "http://127.0.0.1:8090");
        assert_eq!(config.service.request_timeout_secs, 30);
        assert_eq!(config.service.beacon_timeout_secs, 2);
        assert_eq!(config.chat.greeting, "Hello! Please ask a question.");
        assert_eq!(
            config.chat.fallback_reply,
            "Sorry, something went wrong. Please try again."
        );
        assert_eq!(config.chat.max_question_chars, 2000);
        assert!(config.speech.enabled);
        assert_eq!(config.speech.locale, "en-US");
    }

    #[test]
    fn test_load_missing_file_errors() {
        let result = AskboxConfig::load(Path::new("/nonexistent/askbox.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AskboxConfig::load_or_default(Path::new("/nonexistent/askbox.toml"));
        assert_eq!(config.service.base_url, "http://127.0.0.1:8090");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = AskboxConfig::default();
        config.service.base_url = "https://answers.example.com".to_string();
        config.speech.enabled = false;
        config.save(&path).unwrap();

        let loaded = AskboxConfig::load(&path).unwrap();
        assert_eq!(loaded.service.base_url, "https://answers.example.com");
        assert!(!loaded.speech.enabled);
        // Untouched sections keep their defaults.
        assert_eq!(loaded.chat.greeting, "Hello! Please ask a question.");
    }

    #[test]
    fn test_partial_toml_takes_defaults() {
        let config: AskboxConfig = toml::from_str(
            r#"
            [service]
            base_url = "https://qa.example.com"
            "#,
        )
        .unwrap();
        assert_eq!(config.service.base_url, "https://qa.example.com");
        // Unspecified fields in a present section still default.
        assert_eq!(config.service.request_timeout_secs, 30);
        // Absent sections default entirely.
        assert_eq!(config.speech.locale, "en-US");
    }

    #[test]
    fn test_invalid_toml_errors() {
        let result = toml::from_str::<AskboxConfig>("service = \"not a table\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("dir").join("config.toml");
        AskboxConfig::default().save(&path).unwrap();
        assert!(path.exists());
    }
}
