use anyhow::Result;
use chrono::Local;
use clap::{Args, Subcommand};
use llmchat_core::Conversation;

use crate::args::CliConfig;
use crate::output::{self, OutputLevel};

#[derive(Args)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub action: HistoryAction,
}

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List saved conversations, most recently updated first
    List,
    /// Delete one or more conversations by id
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Delete every saved conversation
    Clear,
}

impl HistoryArgs {
    pub async fn run(&self, output_level: OutputLevel, cli_config: &CliConfig) -> Result<()> {
        let store = cli_config.load_conversations()?;

        match &self.action {
            HistoryAction::List => {
                let conversations = store.list();
                if conversations.is_empty() {
                    output::note("No saved conversations.", output_level);
                }
                for conversation in &conversations {
                    println!("{}", summary_line(conversation));
                }
            }
            HistoryAction::Delete { ids } => {
                let removed = store.delete_many(ids.iter().map(String::as_str));
                cli_config.save_conversations(&store)?;

                if removed < ids.len() {
                    output::warning(
                        &format!("{} id(s) did not match a conversation", ids.len() - removed),
                        output_level,
                    );
                }
                output::success(&format!("Deleted {removed} conversation(s)"), output_level);
            }
            HistoryAction::Clear => {
                let count = store.len();
                store.clear();
                cli_config.save_conversations(&store)?;
                output::success(&format!("Deleted {count} conversation(s)"), output_level);
            }
        }
        Ok(())
    }
}

fn summary_line(conversation: &Conversation) -> String {
    format!(
        "{}  {}  {}/{}  {} ({} messages)",
        conversation.id,
        conversation
            .last_updated
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M"),
        output::format_provider(&conversation.provider_name),
        output::format_model(&conversation.model_id),
        conversation.title,
        conversation.messages.len(),
    )
}
