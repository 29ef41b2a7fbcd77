use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use llmchat_core::PROVIDERS;
use llmchat_core::secrets::{self, AddModelOutcome, MAX_SAVED_MODELS};

use crate::args::CliConfig;
use crate::output::{self, OutputLevel};
use crate::provider::Provider;

#[derive(Args)]
pub struct ModelsArgs {
    #[command(subcommand)]
    pub action: ModelsAction,
}

#[derive(Subcommand)]
pub enum ModelsAction {
    /// Save a model id for a provider
    Add {
        #[arg(ignore_case = true)]
        provider: Provider,
        /// Model id as the provider's API expects it (e.g., gpt-4o)
        model: String,
    },
    /// Forget a saved model id
    Remove {
        #[arg(ignore_case = true)]
        provider: Provider,
        model: String,
    },
    /// List saved models, for one provider or all
    List {
        #[arg(ignore_case = true)]
        provider: Option<Provider>,
    },
}

impl ModelsArgs {
    pub async fn run(&self, output_level: OutputLevel, cli_config: &CliConfig) -> Result<()> {
        let store = &cli_config.secrets;

        match &self.action {
            ModelsAction::Add { provider, model } => {
                match secrets::add_model(store, provider.descriptor(), model)? {
                    AddModelOutcome::Added => output::success(
                        &format!("Saved {} for {provider}", model.trim()),
                        output_level,
                    ),
                    AddModelOutcome::Duplicate => output::warning(
                        &format!("{} is already saved for {provider}", model.trim()),
                        output_level,
                    ),
                    AddModelOutcome::Invalid => {
                        bail!("Model id must be non-empty and cannot contain ','")
                    }
                    AddModelOutcome::Full => {
                        output::hint(
                            &format!(
                                "Remove one first with {}",
                                output::format_command(&format!(
                                    "llmchat models remove {} <MODEL>",
                                    provider.name().to_ascii_lowercase()
                                ))
                            ),
                            output_level,
                        );
                        bail!("{provider} already has {MAX_SAVED_MODELS} saved models");
                    }
                }
            }
            ModelsAction::Remove { provider, model } => {
                if secrets::remove_model(store, provider.descriptor(), model)? {
                    output::success(
                        &format!("Removed {} from {provider}", model.trim()),
                        output_level,
                    );
                } else {
                    output::warning(
                        &format!("{} is not saved for {provider}", model.trim()),
                        output_level,
                    );
                }
            }
            ModelsAction::List { provider } => {
                let descriptors: Vec<_> = match provider {
                    Some(p) => vec![p.descriptor()],
                    None => PROVIDERS.iter().collect(),
                };

                for descriptor in descriptors {
                    output::heading(&format!("{}:", descriptor.name), output_level);
                    let models = secrets::saved_models(store, descriptor);
                    if models.is_empty() {
                        output::note("  (none)", output_level);
                    }
                    for model in models {
                        println!("  {}", output::format_model(&model));
                    }
                }
            }
        }
        Ok(())
    }
}
