//! # llmchat-core
//!
//! Provider-agnostic chat with Gemini, OpenAI, Anthropic and Grok.
//!
//! A conversation is a list of [`ChatMessage`]s tagged User, Model or Error.
//! An [`Adapter`] turns that list into one vendor's request, performs a single
//! HTTP POST and maps the first generated text back into a Model message.
//! [`Dispatcher`] picks the adapter by provider name, and [`ChatSession`]
//! drives a stored [`Conversation`] turn by turn.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use llmchat_core::{ChatMessage, Dispatcher};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dispatcher = Dispatcher::new();
//!     let history = vec![ChatMessage::user("What is the capital of France?")];
//!     let reply = dispatcher
//!         .generate("OpenAI", "your-api-key", "gpt-4o", &history)
//!         .await?;
//!     println!("{}", reply.text);
//!     Ok(())
//! }
//! ```
//!
//! ## Sessions
//!
//! ```rust,no_run
//! use llmchat_core::{ChatSession, ConversationStore, Dispatcher, MemorySecretStore, SecretStore};
//!
//! # async fn example() -> Result<(), llmchat_core::ChatError> {
//! let store = ConversationStore::new();
//! let secrets = MemorySecretStore::new();
//! secrets.save("anthropic_api_key", "sk-ant-...")?;
//!
//! let conversation = store.create("Anthropic", "claude-3-5-sonnet-latest");
//! let session = ChatSession::open(store.clone(), Dispatcher::new(), &secrets, &conversation.id)?;
//! session.send_message("Hello!").await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Adapters return [`ChatError`]; a session never surfaces provider failures
//! as `Err`, it appends them to the conversation as Error-tagged messages:
//!
//! ```rust,no_run
//! use llmchat_core::{ChatError, ChatMessage, Dispatcher};
//!
//! # async fn example() {
//! let dispatcher = Dispatcher::new();
//! match dispatcher.generate("Gemini", "key", "gemini-1.5-flash", &[ChatMessage::user("hi")]).await {
//!     Ok(reply) => println!("{}", reply.text),
//!     Err(ChatError::Api { status, body, .. }) => println!("HTTP {status}: {body}"),
//!     Err(ChatError::EmptyResponse { .. }) => println!("No candidates"),
//!     Err(e) => println!("Other error: {e}"),
//! }
//! # }
//! ```

pub mod config;
pub mod conversation;
pub mod dispatch;
pub mod error;
pub mod message;
pub mod providers;
pub mod registry;
pub mod secrets;
pub mod session;
pub mod utils;


pub use config::{AdapterConfig, AnthropicConfig, EndpointConfig};
pub use conversation::{Conversation, ConversationStore};
pub use dispatch::Dispatcher;
pub use error::ChatError;
pub use message::{ChatMessage, Sender};
pub use providers::Adapter;
pub use registry::{PROVIDERS, ProviderDescriptor, ProviderKind};
pub use secrets::{FileSecretStore, MemorySecretStore, SecretStore};
pub use session::{ChatSession, SendOutcome};
