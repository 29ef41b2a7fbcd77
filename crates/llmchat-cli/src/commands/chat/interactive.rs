use anyhow::Result;
use llmchat_core::{ChatMessage, ChatSession, ConversationStore, SendOutcome, Sender};
use owo_colors::OwoColorize;
use reedline::Signal;
use std::time::{Duration, Instant};

use crate::args::CliConfig;
use crate::output::{self, OutputLevel};
use crate::spinner::Spinner;

use super::{ChatPrompt, setup_reedline};

const DOUBLE_CTRL_C_TIMEOUT: Duration = Duration::from_secs(2);

/// Read lines until exit, sending each one through `session`.
///
/// The conversation file is rewritten after every turn.
pub async fn run_interactive_chat(
    session: &ChatSession,
    store: &ConversationStore,
    config: &CliConfig,
    output_level: OutputLevel,
) -> Result<()> {
    let colored = !output::colors_disabled();
    let conversation = session.conversation()?;

    if output_level.show_user() {
        println!(
            "{} {}/{}",
            "Interactive chat with".green(),
            session.provider().name.blue().bold(),
            session.model_id().blue().bold(),
        );
        println!("{} {}", "Conversation:".green(), conversation.id.dimmed());
        println!(
            "{} Type {} or {} to exit.",
            "Tip:".green(),
            "exit".yellow(),
            "quit".yellow()
        );
        println!();
    }

    for message in &conversation.messages {
        println!("{}", render_message(message, colored));
    }

    let mut line_editor = setup_reedline(config.config.vi_mode, &config.data_base_path)?;
    let prompt = ChatPrompt::new(colored);
    let mut last_ctrl_c: Option<Instant> = None;

    loop {
        match line_editor.read_line(&prompt)? {
            Signal::Success(input) => {
                last_ctrl_c = None;
                let input = input.trim();
                if input.is_empty() {
                    continue;
                }
                if is_exit_command(input) {
                    println!("{}", "Goodbye!".green());
                    break;
                }

                let spinner = Spinner::start("Assistant:", colored);
                let outcome = session.send_message(input).await?;
                match &outcome {
                    SendOutcome::Replied(reply) | SendOutcome::Failed(reply) => {
                        spinner
                            .finish(&format!("{}\n", render_message(reply, colored)))
                            .await;
                    }
                    SendOutcome::Ignored => spinner.finish("").await,
                }

                config.save_conversations(store)?;
            }
            Signal::CtrlC => {
                let now = Instant::now();
                if let Some(last_time) = last_ctrl_c {
                    if now.duration_since(last_time) <= DOUBLE_CTRL_C_TIMEOUT {
                        println!("{}", "Goodbye!".green());
                        break;
                    }
                }
                last_ctrl_c = Some(now);
                println!(
                    "{}",
                    "(To exit, press Ctrl+C again or Ctrl+D or enter \"exit\")".dimmed()
                );
            }
            Signal::CtrlD => {
                println!("\n{}", "Goodbye!".green());
                break;
            }
        }
    }

    Ok(())
}

fn is_exit_command(input: &str) -> bool {
    matches!(input.to_ascii_lowercase().as_str(), "exit" | "quit")
}

/// Error-tagged messages already carry their `Error:` prefix
fn render_message(message: &ChatMessage, colored: bool) -> String {
    match (message.sender, colored) {
        (Sender::Error, false) => message.text.clone(),
        (Sender::Error, true) => message.text.red().to_string(),
        (Sender::User, false) => format!("You: {}", message.text),
        (Sender::User, true) => format!("{} {}", "You:".green().bold(), message.text),
        (Sender::Model, false) => format!("Assistant: {}", message.text),
        (Sender::Model, true) => format!("{} {}", "Assistant:".blue().bold(), message.text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_commands() {
        assert!(is_exit_command("exit"));
        assert!(is_exit_command("QUIT"));
        assert!(!is_exit_command("exit now"));
    }

    #[test]
    fn test_render_message_plain() {
        assert_eq!(
            render_message(&ChatMessage::model("Paris."), false),
            "Assistant: Paris."
        );
        assert_eq!(
            render_message(&ChatMessage::error("Error: API Error 401: nope"), false),
            "Error: API Error 401: nope"
        );
    }
}
