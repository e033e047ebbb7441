use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::llm::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::llm::OpenAiConfig;
use crate::theme::ThemeMode;

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_max_tokens() -> u32 {
    1500
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_region() -> String {
    "India".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Dark or light palette (toggled from the UI)
    #[serde(default)]
    pub theme: ThemeMode,

    /// Optional accent color override, `#RRGGBB`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,

    /// Completion model
    #[serde(default = "default_model")]
    pub model: String,

    /// OpenAI-compatible API root
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Seconds before a completion request is abandoned
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Audience region written into the prompt
    #[serde(default = "default_region")]
    pub region: String,

    /// Desktop notification when content is ready
    #[serde(default)]
    pub notifications: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            theme: ThemeMode::default(),
            accent: None,
            model: default_model(),
            base_url: default_base_url(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            region: default_region(),
            notifications: false,
        }
    }
}

impl AppConfig {
    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("linkpost");

        if let Err(e) = std::fs::create_dir_all(&config_dir) {
            tracing::warn!("Could not create config directory: {}", e);
        }

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from the default location, or fall back to defaults
    pub fn load() -> Self {
        match Self::config_path() {
            Ok(path) => Self::load_from(&path),
            Err(e) => {
                tracing::warn!("{}", e);
                AppConfig::default()
            }
        }
    }

    /// Load config from `path`; missing or broken files yield defaults
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!("Failed to parse config: {}", e),
                },
                Err(e) => tracing::warn!("Failed to read config: {}", e),
            }
        }
        AppConfig::default()
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let mut clean_config = self.clone();

        // Blank accent means no override
        if clean_config.accent.as_ref().is_some_and(|a| a.trim().is_empty()) {
            clean_config.accent = None;
        }

        let content = toml::to_string_pretty(&clean_config)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Settings for the completion client
    pub fn openai(&self) -> OpenAiConfig {
        OpenAiConfig {
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("linkpost-{}-{}.toml", name, std::process::id()))
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig {
            theme: ThemeMode::Light,
            accent: Some("#ff8000".to_string()),
            model: "gpt-4o".to_string(),
            region: "Germany".to_string(),
            notifications: true,
            ..AppConfig::default()
        };

        let serialized = toml::to_string_pretty(&config).unwrap();
        assert!(serialized.contains("theme = \"light\""));

        let deserialized: AppConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: AppConfig = toml::from_str("theme = \"light\"\n").unwrap();
        assert_eq!(config.theme, ThemeMode::Light);
        assert_eq!(config.model, "gpt-4");
        assert_eq!(config.max_tokens, 1500);
        assert_eq!(config.region, "India");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let path = temp_path("roundtrip");
        let config = AppConfig {
            theme: ThemeMode::Light,
            accent: Some("  ".to_string()),
            ..AppConfig::default()
        };
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path);
        assert_eq!(loaded.theme, ThemeMode::Light);
        assert_eq!(loaded.accent, None);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_broken_file_falls_back() {
        let path = temp_path("broken");
        std::fs::write(&path, "theme = [not toml").unwrap();
        assert_eq!(AppConfig::load_from(&path), AppConfig::default());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_openai_settings() {
        let config = AppConfig {
            timeout_secs: 5,
            ..AppConfig::default()
        };
        let openai = config.openai();
        assert_eq!(openai.timeout, Duration::from_secs(5));
        assert_eq!(openai.model, "gpt-4");
    }
}
