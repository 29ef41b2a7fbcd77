//! Gemini `generateContent` wire types.

use serde::{Deserialize, Serialize};

use crate::message::{ChatMessage, outgoing};
use crate::providers::null_as_empty;

/// Generate content request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

/// Content block made of parts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl GenerateContentRequest {
    /// One content block per non-error turn, each with a single text part
    pub fn from_history(history: &[ChatMessage]) -> Self {
        Self {
            contents: outgoing(history)
                .map(|m| Content {
                    parts: vec![Part {
                        text: Some(m.text.clone()),
                    }],
                })
                .collect(),
        }
    }
}

/// Generate content response
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate
    pub fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}
