use super::types::*;
use crate::config::{AnthropicConfig, trim_base};
use crate::error::ChatError;
use crate::message::ChatMessage;
use crate::providers::read_json;
use reqwest::Client;

const PROVIDER: &str = "Anthropic";

/// Anthropic client with Messages API support
#[derive(Clone, Debug)]
pub struct AnthropicClient {
    client: Client,
    base_url: String,
    api_version: String,
    max_tokens: u32,
}

impl AnthropicClient {
    pub fn new(config: &AnthropicConfig, client: Client) -> Self {
        Self {
            client,
            base_url: trim_base(&config.base_url).to_string(),
            api_version: config.api_version.clone(),
            max_tokens: config.max_tokens,
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }

    pub async fn generate(
        &self,
        credential: &str,
        model_id: &str,
        history: &[ChatMessage],
    ) -> Result<ChatMessage, ChatError> {
        let url = self.endpoint();
        let request = MessagesRequest::from_history(model_id, history, self.max_tokens);
        log::debug!(
            "POST {url} ({PROVIDER}, model {model_id}, max_tokens {})",
            self.max_tokens
        );

        let response = self
            .client
            .post(&url)
            .header("x-api-key", credential)
            .header("anthropic-version", &self.api_version)
            .json(&request)
            .send()
            .await
            .map_err(|e| ChatError::transport(PROVIDER, e))?;

        let body: MessagesResponse = read_json(PROVIDER, response).await?;
        body.first_text()
            .map(ChatMessage::model)
            .ok_or_else(|| ChatError::empty_response(PROVIDER))
    }
}
