use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use llmchat_core::secrets::{self, CredentialSource};
use llmchat_core::{PROVIDERS, SecretStore};
use std::io::{self, BufRead, Write};

use crate::args::CliConfig;
use crate::output::{self, OutputLevel};
use crate::provider::Provider;

#[derive(Args)]
pub struct KeysArgs {
    #[command(subcommand)]
    pub action: KeysAction,
}

#[derive(Subcommand)]
pub enum KeysAction {
    /// Set an API key for a provider
    Set {
        /// Provider name (gemini, openai, anthropic, grok)
        #[arg(ignore_case = true)]
        provider: Provider,
        /// API key (if not provided, will read from stdin)
        #[arg(short, long)]
        key: Option<String>,
    },
    /// Delete an API key for a provider
    Delete {
        /// Provider name (gemini, openai, anthropic, grok)
        #[arg(ignore_case = true)]
        provider: Provider,
    },
    /// List which providers have API keys set
    List,
}

impl KeysArgs {
    pub async fn run(&self, output_level: OutputLevel, cli_config: &CliConfig) -> Result<()> {
        let store = &cli_config.secrets;

        match &self.action {
            KeysAction::Set { provider, key } => {
                let api_key = match key {
                    Some(key) => key.clone(),
                    None => {
                        print!("Enter API key for {provider}: ");
                        io::stdout().flush()?;
                        read_key(io::stdin().lock())?
                    }
                };

                set_key(store, *provider, &api_key)?;
                output::success(
                    &format!("API key for {provider} has been saved"),
                    output_level,
                );
            }
            KeysAction::Delete { provider } => {
                secrets::delete_credential(store, provider.descriptor())?;
                output::success(
                    &format!("API key for {provider} has been deleted"),
                    output_level,
                );
            }
            KeysAction::List => {
                for (provider, source) in key_sources(store) {
                    let source = match source {
                        Some(CredentialSource::Stored) => "stored".to_string(),
                        Some(CredentialSource::Env(var)) => format!("env ({var})"),
                        None => "none".to_string(),
                    };
                    output::note(
                        &format!("{}: {source}", output::format_provider(provider)),
                        output_level,
                    );
                }
            }
        }
        Ok(())
    }
}

fn read_key(mut input: impl BufRead) -> Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn set_key(store: &dyn SecretStore, provider: Provider, api_key: &str) -> Result<()> {
    if api_key.trim().is_empty() {
        bail!("API key cannot be empty");
    }
    secrets::save_credential(store, provider.descriptor(), api_key)?;
    Ok(())
}

/// Where each provider's key comes from, in display order
fn key_sources(store: &dyn SecretStore) -> Vec<(&'static str, Option<CredentialSource>)> {
    PROVIDERS
        .iter()
        .map(|p| {
            let source = secrets::credential_with_source(store, p).map(|(_, source)| source);
            (p.name, source)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use llmchat_core::{MemorySecretStore, ProviderKind};

    #[test]
    fn test_read_key_trims_newline() {
        let key = read_key("  sk-test \n".as_bytes()).unwrap();
        assert_eq!(key, "sk-test");
    }

    #[test]
    fn test_set_key_rejects_blank() {
        let store = MemorySecretStore::new();
        let err = set_key(&store, Provider(ProviderKind::OpenAI), "   ").unwrap_err();
        assert_eq!(err.to_string(), "API key cannot be empty");
        assert_eq!(store.get("openai_api_key"), None);
    }

    #[test]
    fn test_set_key_stores_under_alias() {
        let store = MemorySecretStore::new();
        set_key(&store, Provider(ProviderKind::Grok), "gsk-123").unwrap();
        assert_eq!(store.get("grok_api_key").as_deref(), Some("gsk-123"));

        let sources = key_sources(&store);
        assert_eq!(sources.len(), 4);
        assert!(sources.contains(&("Grok", Some(CredentialSource::Stored))));
    }
}
