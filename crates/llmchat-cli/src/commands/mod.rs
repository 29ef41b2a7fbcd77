use clap::Subcommand;

pub mod chat;
pub mod history;
pub mod info;
pub mod keys;
pub mod models;

pub use chat::ChatArgs;
pub use history::HistoryArgs;
pub use info::InfoArgs;
pub use keys::KeysArgs;
pub use models::ModelsArgs;

const CHAT_EXAMPLES: &str = r#"EXAMPLES:
  llmchat chat -p openai -m gpt-4o                 # New conversation with GPT-4o
  llmchat chat -p gemini -m gemini-1.5-flash       # New conversation with Gemini
  llmchat chat -p anthropic                        # First saved Anthropic model
  llmchat chat --resume <ID>                       # Continue a saved conversation"#;

const MODELS_EXAMPLES: &str = r#"EXAMPLES:
  llmchat models list                              # Saved models for every provider
  llmchat models list grok                         # Saved models for Grok
  llmchat models add anthropic claude-3-5-sonnet-latest
  llmchat models remove openai gpt-4o"#;

const KEYS_EXAMPLES: &str = r#"EXAMPLES:
  llmchat keys set openai                          # Set OpenAI API key (prompted)
  llmchat keys set anthropic -k sk-ant-...         # Set Anthropic key directly
  llmchat keys list                                # Show which providers have keys
  llmchat keys delete gemini                       # Remove Gemini API key"#;

const HISTORY_EXAMPLES: &str = r#"EXAMPLES:
  llmchat history list                             # Conversations, newest first
  llmchat history delete <ID> <ID>                 # Delete selected conversations
  llmchat history clear                            # Delete every conversation"#;

const INFO_EXAMPLES: &str = r#"EXAMPLES:
  llmchat info                                     # Show file paths and API key status"#;

#[derive(Subcommand)]
pub enum Commands {
    /// Start or resume an interactive conversation
    #[command(after_long_help = CHAT_EXAMPLES)]
    Chat(ChatArgs),
    /// Manage saved model ids per provider
    #[command(after_long_help = MODELS_EXAMPLES)]
    Models(ModelsArgs),
    /// Manage API keys
    #[command(after_long_help = KEYS_EXAMPLES)]
    Keys(KeysArgs),
    /// List or delete saved conversations
    #[command(after_long_help = HISTORY_EXAMPLES)]
    History(HistoryArgs),
    /// Show configuration and system information
    #[command(after_long_help = INFO_EXAMPLES)]
    Info(InfoArgs),
}
