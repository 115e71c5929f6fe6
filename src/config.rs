use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ai::GeminiGateway;

/// Environment variables checked, in order, for the Gemini API key.
pub const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

/// Top-level configuration.
///
/// # Loading
///
/// ```rust,no_run
/// use nutri_ai::config::Config;
///
/// // From a JSON file
/// let config = Config::load(Some("config.json".as_ref())).unwrap();
///
/// // Or use defaults and customize
/// let mut config = Config::default();
/// config.gemini.api_key = "AIza...".into();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Gemini endpoint and credential.
    pub gemini: GeminiConfig,
    /// Output behavior.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Google Gemini configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// May be left empty and supplied through [`API_KEY_ENV_VARS`] instead.
    pub api_key: String,
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// If `true`, print results as JSON instead of tables.
    pub json: bool,
}

fn default_base_url() -> String {
    crate::ai::DEFAULT_BASE_URL.to_string()
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-2.5-flash".to_string(),
            base_url: default_base_url(),
        }
    }
}

impl Config {
    /// Resolve the config file path — same directory as the executable.
    pub fn config_path() -> Result<PathBuf> {
        let exe_path = std::env::current_exe().context("Failed to get executable path")?;
        let exe_dir = exe_path
            .parent()
            .context("Failed to get executable directory")?;
        Ok(exe_dir.join("config.json"))
    }

    /// Load config from the given path, or from the default location.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            log::warn!(
                "Config file not found at {}. Using defaults.",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;
        let config: Config =
            serde_json::from_str(&contents).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Save config to the given path, or to the default location.
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, contents).context("Failed to write config file")?;
        log::info!("Config saved to {}", config_path.display());
        Ok(())
    }

    /// The API key to use: the first non-empty environment variable from
    /// [`API_KEY_ENV_VARS`], else the configured value.
    pub fn api_key(&self) -> Option<String> {
        self.api_key_from(|name| std::env::var(name).ok())
    }

    fn api_key_from(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty())
            .or_else(|| {
                let key = self.gemini.api_key.trim();
                (!key.is_empty()).then(|| key.to_string())
            })
    }

    /// Construct the gateway from this config. Fails if no API key is available.
    pub fn build_gateway(&self) -> Result<GeminiGateway> {
        let api_key = self.api_key().context(
            "No Gemini API key configured. Set GEMINI_API_KEY or add it to config.json (see --init).",
        )?;
        Ok(GeminiGateway::with_base_url(
            api_key,
            self.gemini.model.clone(),
            self.gemini.base_url.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // ── load / save ──────────────────────────────────────────────────

    #[test]
    fn load_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(Some(&dir.path().join("config.json"))).unwrap();
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
        assert_eq!(config.gemini.base_url, "https://generativelanguage.googleapis.com");
        assert!(!config.output.json);
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let mut config = Config::default();
        config.gemini.api_key = "AIza-test".into();
        config.gemini.model = "gemini-2.0-flash".into();
        config.output.json = true;
        config.save(Some(&path)).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.gemini.api_key, "AIza-test");
        assert_eq!(loaded.gemini.model, "gemini-2.0-flash");
        assert!(loaded.output.json);
    }

    #[test]
    fn load_fills_optional_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"gemini":{"api_key":"k","model":"m"}}"#).unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.gemini.base_url, "https://generativelanguage.googleapis.com");
        assert!(!config.output.json);
    }

    #[test]
    fn load_invalid_json_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ nope").unwrap();
        assert!(Config::load(Some(&path)).is_err());
    }

    // ── api key resolution ───────────────────────────────────────────

    #[test]
    fn env_key_overrides_file_key() {
        let mut config = Config::default();
        config.gemini.api_key = "from-file".into();

        let key = config.api_key_from(|name| (name == "API_KEY").then(|| "from-env".to_string()));
        assert_eq!(key.as_deref(), Some("from-env"));

        let key = config.api_key_from(|name| match name {
            "GEMINI_API_KEY" => Some("gemini".to_string()),
            "API_KEY" => Some("generic".to_string()),
            _ => None,
        });
        assert_eq!(key.as_deref(), Some("gemini"));
    }

    #[test]
    fn blank_env_falls_back_to_file() {
        let mut config = Config::default();
        config.gemini.api_key = " from-file ".into();
        let key = config.api_key_from(|_| Some("  ".to_string()));
        assert_eq!(key.as_deref(), Some("from-file"));
    }

    #[test]
    fn no_key_anywhere() {
        let config = Config::default();
        assert!(config.api_key_from(|_| None).is_none());
    }
}
