//! Per-provider adapters.
//!
//! Each adapter maps the provider-agnostic history to one vendor schema,
//! performs a single POST and extracts the first generated text fragment.
//! [`Adapter`] is the closed set of them.

pub mod anthropic;
pub mod gemini;
pub mod openai;

pub use anthropic::AnthropicClient;
pub use gemini::GeminiClient;
pub use openai::{OpenAIClient, ProviderIdentity, identities};

use reqwest::{Client, Response};
use serde::de::{Deserialize, DeserializeOwned, Deserializer};

use crate::config::AdapterConfig;
use crate::error::ChatError;
use crate::message::ChatMessage;
use crate::registry::ProviderKind;

/// One adapter per supported provider
#[derive(Clone, Debug)]
pub enum Adapter {
    Gemini(GeminiClient),
    OpenAI(OpenAIClient),
    Anthropic(AnthropicClient),
    /// OpenAI schema against Grok's endpoint
    Grok(OpenAIClient),
}

impl Adapter {
    /// Build the adapter for `kind`, sharing the given HTTP client
    pub fn new(kind: ProviderKind, config: &AdapterConfig, client: Client) -> Self {
        match kind {
            ProviderKind::Gemini => Adapter::Gemini(GeminiClient::new(&config.gemini, client)),
            ProviderKind::OpenAI => Adapter::OpenAI(OpenAIClient::openai(&config.openai, client)),
            ProviderKind::Anthropic => {
                Adapter::Anthropic(AnthropicClient::new(&config.anthropic, client))
            }
            ProviderKind::Grok => Adapter::Grok(OpenAIClient::grok(&config.grok, client)),
        }
    }

    pub fn kind(&self) -> ProviderKind {
        match self {
            Adapter::Gemini(_) => ProviderKind::Gemini,
            Adapter::OpenAI(_) => ProviderKind::OpenAI,
            Adapter::Anthropic(_) => ProviderKind::Anthropic,
            Adapter::Grok(_) => ProviderKind::Grok,
        }
    }

    /// Ask the provider for the next model turn.
    ///
    /// Error-tagged messages in `history` are never sent.
    pub async fn generate(
        &self,
        credential: &str,
        model_id: &str,
        history: &[ChatMessage],
    ) -> Result<ChatMessage, ChatError> {
        match self {
            Adapter::Gemini(c) => c.generate(credential, model_id, history).await,
            Adapter::OpenAI(c) | Adapter::Grok(c) => {
                c.generate(credential, model_id, history).await
            }
            Adapter::Anthropic(c) => c.generate(credential, model_id, history).await,
        }
    }
}

/// Turn an HTTP response into `T`, or into [`ChatError::Api`] on non-2xx.
pub(crate) async fn read_json<T: DeserializeOwned>(
    provider: &str,
    response: Response,
) -> Result<T, ChatError> {
    let status = response.status();

    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        log::warn!("{provider} returned {status}");
        return Err(ChatError::api(provider, status.as_u16(), body));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ChatError::transport(provider, e))
}

/// Read a list that a provider may send as `null`
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
