use super::types::*;
use crate::config::{EndpointConfig, trim_base};
use crate::error::ChatError;
use crate::message::ChatMessage;
use crate::providers::read_json;
use reqwest::Client;

/// Provider identity metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderIdentity {
    /// Name reported in errors and logs
    pub name: &'static str,
    /// Path appended to the base URL
    pub chat_path: &'static str,
}

/// Predefined identities for OpenAI-compatible APIs
pub mod identities {
    use super::ProviderIdentity;

    pub const OPENAI: ProviderIdentity = ProviderIdentity {
        name: "OpenAI",
        chat_path: "/v1/chat/completions",
    };

    pub const GROK: ProviderIdentity = ProviderIdentity {
        name: "Grok",
        chat_path: "/openai/v1/chat/completions",
    };
}

/// Client for the chat completions schema, bearer-authenticated
#[derive(Clone, Debug)]
pub struct OpenAIClient {
    client: Client,
    base_url: String,
    identity: ProviderIdentity,
}

impl OpenAIClient {
    pub fn new(config: &EndpointConfig, identity: ProviderIdentity, client: Client) -> Self {
        Self {
            client,
            base_url: trim_base(&config.base_url).to_string(),
            identity,
        }
    }

    pub fn openai(config: &EndpointConfig, client: Client) -> Self {
        Self::new(config, identities::OPENAI, client)
    }

    pub fn grok(config: &EndpointConfig, client: Client) -> Self {
        Self::new(config, identities::GROK, client)
    }

    pub fn identity(&self) -> ProviderIdentity {
        self.identity
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, self.identity.chat_path)
    }

    pub async fn generate(
        &self,
        credential: &str,
        model_id: &str,
        history: &[ChatMessage],
    ) -> Result<ChatMessage, ChatError> {
        let provider = self.identity.name;
        let url = self.endpoint();
        let request = ChatCompletionRequest::from_history(model_id, history);
        log::debug!(
            "POST {url} ({provider}, model {model_id}, {} messages)",
            request.messages.len()
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(credential)
            .json(&request)
            .send()
            .await
            .map_err(|e| ChatError::transport(provider, e))?;

        let body: ChatCompletionResponse = read_json(provider, response).await?;
        body.first_text()
            .map(ChatMessage::model)
            .ok_or_else(|| ChatError::empty_response(provider))
    }
}
