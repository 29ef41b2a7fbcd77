//! Anthropic Messages API wire types.

use serde::{Deserialize, Serialize};

use crate::message::ChatMessage;
use crate::providers::null_as_empty;
use crate::providers::openai::{Message, to_messages};

/// Messages request; `max_tokens` is mandatory for this API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessagesRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
}

impl MessagesRequest {
    pub fn from_history(model_id: &str, history: &[ChatMessage], max_tokens: u32) -> Self {
        Self {
            model: model_id.to_string(),
            messages: to_messages(history),
            max_tokens,
        }
    }
}

/// Messages response
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: Vec<ContentBlock>,
}

/// A block of content; only text blocks carry `text`
#[derive(Debug, Clone, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type", default)]
    pub block_type: String,
    pub text: Option<String>,
}

impl MessagesResponse {
    pub fn first_text(self) -> Option<String> {
        self.content.into_iter().next()?.text
    }
}
