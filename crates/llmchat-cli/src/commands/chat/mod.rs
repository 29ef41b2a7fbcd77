mod interactive;
mod prompt;

use anyhow::{Context, Result, bail};
use clap::Args;
use llmchat_core::{ChatError, ChatSession, ConversationStore, SecretStore, secrets};
use reedline::{
    DefaultHinter, EditCommand, Emacs, FileBackedHistory, KeyCode, KeyModifiers, Reedline,
    ReedlineEvent, Vi, default_emacs_keybindings, default_vi_insert_keybindings,
    default_vi_normal_keybindings,
};
use std::path::Path;

use crate::args::CliConfig;
use crate::constants::HISTORY_FILE_NAME;
use crate::output::{self, OutputLevel};
use crate::provider::Provider;

pub use interactive::run_interactive_chat;
pub use prompt::ChatPrompt;

const PROMPT_HISTORY_SIZE: usize = 500;

#[derive(Args)]
pub struct ChatArgs {
    /// Provider for a new conversation (gemini, openai, anthropic, grok)
    #[arg(short, long, ignore_case = true, required_unless_present = "resume")]
    pub provider: Option<Provider>,

    /// Model id; defaults to the provider's first saved model
    #[arg(short, long, requires = "provider")]
    pub model: Option<String>,

    /// Continue a saved conversation by id
    #[arg(long, value_name = "ID", conflicts_with_all = ["provider", "model"])]
    pub resume: Option<String>,
}

impl ChatArgs {
    pub async fn run(&self, output_level: OutputLevel, cli_config: &CliConfig) -> Result<()> {
        let store = cli_config.load_conversations()?;

        let conversation_id = match (&self.resume, self.provider) {
            (Some(id), _) => id.clone(),
            (None, Some(provider)) => {
                let model = resolve_model(&cli_config.secrets, provider, self.model.as_deref())?;
                let id = store.create(provider.name(), &model).id;
                cli_config.save_conversations(&store)?;
                tracing::debug!(%id, provider = provider.name(), %model, "created conversation");
                id
            }
            (None, None) => bail!("Either --provider or --resume is required"),
        };

        let session = open_session(cli_config, &store, &conversation_id, output_level)?;
        run_interactive_chat(&session, &store, cli_config, output_level).await
    }
}

/// Model for a new conversation: the explicit one, else the first saved one
fn resolve_model(
    store: &dyn SecretStore,
    provider: Provider,
    explicit: Option<&str>,
) -> Result<String> {
    if let Some(model) = explicit {
        let model = model.trim();
        if model.is_empty() {
            bail!("Model id cannot be empty");
        }
        return Ok(model.to_string());
    }

    secrets::saved_models(store, provider.descriptor())
        .into_iter()
        .next()
        .with_context(|| {
            format!(
                "No model given and none saved for {provider}; pass -m or run `llmchat models add {} <MODEL>`",
                provider.name().to_ascii_lowercase()
            )
        })
}

fn open_session(
    cli_config: &CliConfig,
    store: &ConversationStore,
    conversation_id: &str,
    output_level: OutputLevel,
) -> Result<ChatSession> {
    let dispatcher = cli_config.dispatcher()?;

    match ChatSession::open(
        store.clone(),
        dispatcher,
        &cli_config.secrets,
        conversation_id,
    ) {
        Ok(session) => Ok(session),
        Err(err @ ChatError::MissingCredential { .. }) => {
            let provider = err.provider().unwrap_or_default().to_ascii_lowercase();
            output::hint(
                &format!(
                    "Run {} to save one",
                    output::format_command(&format!("llmchat keys set {provider}"))
                ),
                output_level,
            );
            Err(err.into())
        }
        Err(err @ ChatError::ConversationNotFound { .. }) => {
            output::hint(
                &format!(
                    "Run {} to see saved conversations",
                    output::format_command("llmchat history list")
                ),
                output_level,
            );
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}

fn add_common_keybindings(keybindings: &mut reedline::Keybindings) {
    keybindings.add_binding(
        KeyModifiers::ALT,
        KeyCode::Enter,
        ReedlineEvent::Edit(vec![EditCommand::InsertNewline]),
    );
}

fn setup_reedline(vi_mode: bool, data_path: &Path) -> Result<Reedline> {
    let edit_mode: Box<dyn reedline::EditMode> = if vi_mode {
        let mut vi_insert_keybindings = default_vi_insert_keybindings();
        let mut vi_normal_keybindings = default_vi_normal_keybindings();
        add_common_keybindings(&mut vi_insert_keybindings);
        add_common_keybindings(&mut vi_normal_keybindings);
        Box::new(Vi::new(vi_insert_keybindings, vi_normal_keybindings))
    } else {
        let mut emacs_keybindings = default_emacs_keybindings();
        add_common_keybindings(&mut emacs_keybindings);
        Box::new(Emacs::new(emacs_keybindings))
    };

    let history = Box::new(
        FileBackedHistory::with_file(PROMPT_HISTORY_SIZE, data_path.join(HISTORY_FILE_NAME))
            .context("Error configuring prompt history")?,
    );

    Ok(Reedline::create()
        .with_hinter(Box::new(DefaultHinter::default()))
        .with_history(history)
        .with_edit_mode(edit_mode))
}
