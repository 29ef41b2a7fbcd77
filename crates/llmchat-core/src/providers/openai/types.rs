//! OpenAI chat completions wire types, also spoken by Grok.

use serde::{Deserialize, Serialize};

use crate::message::{ChatMessage, outgoing};
use crate::providers::null_as_empty;

/// Chat completion request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
}

/// A role/content pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl ChatCompletionRequest {
    pub fn from_history(model_id: &str, history: &[ChatMessage]) -> Self {
        Self {
            model: model_id.to_string(),
            messages: to_messages(history),
        }
    }
}

/// Map turns to `{role, content}`, dropping Error-tagged ones
pub fn to_messages(history: &[ChatMessage]) -> Vec<Message> {
    outgoing(history)
        .filter_map(|m| {
            m.sender.role().map(|role| Message {
                role: role.to_string(),
                content: m.text.clone(),
            })
        })
        .collect()
}

/// Chat completion response
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: Option<ResponseMessage>,
}

/// Response message; `content` is null for refusals and tool calls
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    pub fn first_text(self) -> Option<String> {
        self.choices.into_iter().next()?.message?.content
    }
}
