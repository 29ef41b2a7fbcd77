use anyhow::{Context, Result};
use clap::Parser;
use etcetera::BaseStrategy;
use llmchat_core::{ConversationStore, Dispatcher, FileSecretStore};
use std::path::{Path, PathBuf};

use crate::commands::Commands;
use crate::config::Config;
use crate::constants::{BINARY_NAME, CONVERSATIONS_FILE_NAME, KEYS_FILE_NAME};

const CLI_EXAMPLES: &str = r#"EXAMPLES:
  llmchat keys set openai                        # Save an OpenAI API key (prompted)
  llmchat models add openai gpt-4o               # Remember a model for OpenAI
  llmchat chat -p openai -m gpt-4o               # Start a new conversation
  llmchat chat -p anthropic                      # Use the first saved Anthropic model
  llmchat history list                           # Show saved conversations
  llmchat chat --resume 3f2a...                  # Continue a saved conversation"#;

#[derive(Parser)]
#[command(author, version, long_about = None)]
#[command(about = "Chat with Gemini, OpenAI, Anthropic and Grok from the terminal")]
#[command(name = BINARY_NAME)]
#[command(after_long_help = CLI_EXAMPLES)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output (debug logs)
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Quiet output (only show errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Paths and persistent state shared by every sub-command
pub struct CliConfig {
    pub config_base_path: PathBuf,
    pub data_base_path: PathBuf,
    pub config: Config,
    pub secrets: FileSecretStore,
}

impl CliConfig {
    /// Load from the platform config and data directories
    pub fn load() -> Result<Self> {
        let strategy =
            etcetera::choose_base_strategy().context("Could not determine home directory")?;

        Self::load_from(
            strategy.config_dir().join(BINARY_NAME),
            strategy.data_dir().join(BINARY_NAME),
        )
    }

    pub fn load_from(config_base_path: PathBuf, data_base_path: PathBuf) -> Result<Self> {
        tracing::debug!(
            config = %config_base_path.display(),
            data = %data_base_path.display(),
            "loading CLI state"
        );

        let config = Config::load(&config_base_path)?;
        let secrets = FileSecretStore::open(data_base_path.join(KEYS_FILE_NAME))
            .context("Failed to open key store")?;

        Ok(Self {
            config_base_path,
            data_base_path,
            config,
            secrets,
        })
    }

    pub fn keys_path(&self) -> &Path {
        self.secrets.path()
    }

    pub fn conversations_path(&self) -> PathBuf {
        self.data_base_path.join(CONVERSATIONS_FILE_NAME)
    }

    pub fn load_conversations(&self) -> Result<ConversationStore> {
        ConversationStore::load(self.conversations_path()).context("Failed to load conversations")
    }

    pub fn save_conversations(&self, store: &ConversationStore) -> Result<()> {
        store
            .save(self.conversations_path())
            .context("Failed to save conversations")
    }

    /// Dispatcher with every provider, using the configured endpoints
    pub fn dispatcher(&self) -> Result<Dispatcher> {
        let adapter_config = self.config.adapter_config()?;
        Ok(Dispatcher::with_config(&adapter_config)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use llmchat_core::ChatMessage;
    use tempfile::TempDir;

    fn temp_config(dir: &TempDir) -> CliConfig {
        CliConfig::load_from(dir.path().join("config"), dir.path().join("data")).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["llmchat", "history", "list", "--quiet"]).unwrap();
        assert!(cli.quiet);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_load_from_empty_directories() {
        let dir = TempDir::new().unwrap();
        let cli_config = temp_config(&dir);

        assert!(dir.path().join("config").join("config.toml").exists());
        assert_eq!(
            cli_config.keys_path(),
            dir.path().join("data").join(KEYS_FILE_NAME)
        );
        assert!(cli_config.load_conversations().unwrap().is_empty());
    }

    #[test]
    fn test_conversations_persist_between_loads() {
        let dir = TempDir::new().unwrap();
        let cli_config = temp_config(&dir);

        let store = cli_config.load_conversations().unwrap();
        let id = store.create("Gemini", "gemini-1.5-flash").id;
        store.append(&id, ChatMessage::user("hello"));
        cli_config.save_conversations(&store).unwrap();

        let reloaded = temp_config(&dir).load_conversations().unwrap();
        assert_eq!(reloaded.get(&id).unwrap().title, "hello");
    }

    #[test]
    fn test_dispatcher_registers_all_providers() {
        let dir = TempDir::new().unwrap();
        let dispatcher = temp_config(&dir).dispatcher().unwrap();
        for provider in llmchat_core::PROVIDERS {
            assert!(dispatcher.is_registered(provider.name));
        }
    }
}
