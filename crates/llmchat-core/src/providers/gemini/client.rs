use super::types::*;
use crate::config::{EndpointConfig, trim_base};
use crate::error::ChatError;
use crate::message::ChatMessage;
use crate::providers::read_json;
use reqwest::{Client, Url};

const PROVIDER: &str = "Gemini";

/// Gemini client; the API key travels as the `key` query parameter
#[derive(Clone, Debug)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: &EndpointConfig, client: Client) -> Self {
        Self {
            client,
            base_url: trim_base(&config.base_url).to_string(),
        }
    }

    /// Endpoint for a model, without the key. The model id stays a single
    /// path segment, so `/`, `?` and `#` in it are percent-encoded.
    pub fn endpoint(&self, model_id: &str) -> Result<Url, ChatError> {
        let mut url = Url::parse(&format!("{}/v1beta/models/", self.base_url))
            .map_err(|e| ChatError::configuration(format!("Invalid {PROVIDER} base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| {
                ChatError::configuration(format!("{PROVIDER} base URL cannot take a path"))
            })?
            .pop_if_empty()
            .push(&format!("{model_id}:generateContent"));
        Ok(url)
    }

    pub async fn generate(
        &self,
        credential: &str,
        model_id: &str,
        history: &[ChatMessage],
    ) -> Result<ChatMessage, ChatError> {
        let url = self.endpoint(model_id)?;
        let request = GenerateContentRequest::from_history(history);
        log::debug!(
            "POST {url} ({PROVIDER}, {} turns)",
            request.contents.len()
        );

        let response = self
            .client
            .post(url)
            .query(&[("key", credential)])
            .json(&request)
            .send()
            .await
            .map_err(|e| ChatError::transport(PROVIDER, e))?;

        let body: GenerateContentResponse = read_json(PROVIDER, response).await?;
        body.first_text()
            .map(ChatMessage::model)
            .ok_or_else(|| ChatError::empty_response(PROVIDER))
    }
}
