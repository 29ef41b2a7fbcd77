use anyhow::{Context, Result};
use llmchat_core::AdapterConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::constants::CONFIG_FILE_NAME;

#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Enable vim mode in interactive chat
    pub vi_mode: bool,
    /// Provider endpoints; `*_BASE_URL` variables take precedence
    pub providers: AdapterConfig,
}

impl Config {
    pub fn load(base_path: &Path) -> Result<Config> {
        let config_path = base_path.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            let default_config = Config::default();
            default_config.save(base_path)?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", config_path.display()))?;

        Ok(config)
    }

    pub fn save(&self, base_path: &Path) -> Result<()> {
        let config_path = base_path.join(CONFIG_FILE_NAME);

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(config_path, content)?;
        Ok(())
    }

    /// Endpoint settings after environment overrides, validated
    pub fn adapter_config(&self) -> Result<AdapterConfig> {
        self.providers
            .clone()
            .with_env_overrides()
            .context("Invalid provider configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_creates_default_file() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path()).unwrap();

        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.vi_mode = true;
        config.providers.anthropic.max_tokens = 1024;
        config.save(dir.path()).unwrap();

        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[providers.openai]\nbase_url = \"http://localhost:8080\"\n",
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert!(!config.vi_mode);
        assert_eq!(config.providers.openai.base_url, "http://localhost:8080");
        assert_eq!(
            config.providers.anthropic,
            AdapterConfig::default().anthropic
        );
    }

    #[test]
    fn test_provider_table_without_base_url() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[providers.gemini]\n\n[providers.anthropic]\nmax_tokens = 256\n",
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(
            config.providers.gemini.base_url,
            llmchat_core::config::GEMINI_BASE_URL
        );
        assert_eq!(config.providers.anthropic.max_tokens, 256);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "vi_mode = \"yes\"").unwrap();

        let err = Config::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
    }
}
