use anyhow::Result;
use clap::Args;
use llmchat_core::PROVIDERS;
use llmchat_core::secrets::{self, CredentialSource};

use crate::{args::CliConfig, constants::*, output, output::OutputLevel};

#[derive(Args)]
pub struct InfoArgs {
    // Info command has no arguments
}

impl InfoArgs {
    pub async fn run(&self, output_level: OutputLevel, cli_config: &CliConfig) -> Result<()> {
        let config_path = cli_config.config_base_path.join(CONFIG_FILE_NAME);
        let history_path = cli_config.data_base_path.join(HISTORY_FILE_NAME);

        output::note(
            &format!("config file: {}", config_path.display()),
            output_level,
        );
        output::note(
            &format!("keys file: {}", cli_config.keys_path().display()),
            output_level,
        );
        output::note(
            &format!(
                "conversations file: {}",
                cli_config.conversations_path().display()
            ),
            output_level,
        );
        output::note(
            &format!("prompt history file: {}", history_path.display()),
            output_level,
        );

        output::heading("\nProviders:", output_level);
        for provider in &PROVIDERS {
            let key = match secrets::credential_with_source(&cli_config.secrets, provider) {
                Some((_, CredentialSource::Stored)) => "stored".to_string(),
                Some((_, CredentialSource::Env(var))) => format!("env ({var})"),
                None => format!("missing (set {} or run keys set)", provider.env_key),
            };
            let models = secrets::saved_models(&cli_config.secrets, provider).len();
            output::note(
                &format!(
                    "{}: key {key}, {models}/{} saved models, {}",
                    output::format_provider(provider.name),
                    secrets::MAX_SAVED_MODELS,
                    cli_config.config.providers.base_url(provider.kind),
                ),
                output_level,
            );
        }

        output::heading("\nVersion info:", output_level);
        output::note(
            &format!("version: {}", env!("CARGO_PKG_VERSION")),
            output_level,
        );

        Ok(())
    }
}
