use serde::{Deserialize, Serialize};

/// Who produced a chat turn
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    #[default]
    User,
    Model,
    /// Local failure notice; never sent to a provider
    Error,
}

impl Sender {
    /// Wire role shared by the OpenAI-style and Anthropic schemas.
    ///
    /// `None` for [`Sender::Error`], which is never part of a request.
    pub fn role(&self) -> Option<&'static str> {
        match self {
            Sender::User => Some("user"),
            Sender::Model => Some("assistant"),
            Sender::Error => None,
        }
    }
}

/// A single provider-agnostic chat turn
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub text: String,
    #[serde(default)]
    pub sender: Sender,
    #[serde(default)]
    pub pending: bool,
}

impl ChatMessage {
    pub fn new(text: impl Into<String>, sender: Sender) -> Self {
        Self {
            text: text.into(),
            sender,
            pending: false,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, Sender::User)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(text, Sender::Model)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, Sender::Error)
    }

    /// Mark the message as awaiting a model response
    pub fn pending(mut self) -> Self {
        self.pending = true;
        self
    }

    /// Clear the pending flag once the response arrived
    pub fn settled(mut self) -> Self {
        self.pending = false;
        self
    }

    pub fn is_error(&self) -> bool {
        self.sender == Sender::Error
    }
}

/// Messages eligible for a provider request, in order.
///
/// Drops every Error-tagged turn; the rest keep their relative order.
pub fn outgoing(history: &[ChatMessage]) -> impl Iterator<Item = &ChatMessage> {
    history.iter().filter(|m| !m.is_error())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_user_turn() {
        let msg = ChatMessage {
            text: "hi".to_string(),
            ..Default::default()
        };
        assert_eq!(msg.sender, Sender::User);
        assert!(!msg.pending);
    }

    #[test]
    fn test_role_mapping() {
        assert_eq!(Sender::User.role(), Some("user"));
        assert_eq!(Sender::Model.role(), Some("assistant"));
        assert_eq!(Sender::Error.role(), None);
    }

    #[test]
    fn test_outgoing_skips_errors() {
        let history = vec![
            ChatMessage::user("one"),
            ChatMessage::error("Error: boom"),
            ChatMessage::model("two"),
            ChatMessage::user("three"),
        ];
        let texts: Vec<&str> = outgoing(&history).map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_pending_transitions() {
        let msg = ChatMessage::user("wait").pending();
        assert!(msg.pending);
        assert!(!msg.settled().pending);
    }
}
