//! Conversations and the store that owns them.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::ChatError;
use crate::message::{ChatMessage, Sender};

/// A single conversation session with one provider and model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Conversation {
    pub id: String,
    pub provider_name: String,
    pub model_id: String,
    /// Starts as "New Chat with {model}", then becomes the first user message
    pub title: String,
    pub messages: Vec<ChatMessage>,
    pub last_updated: DateTime<Utc>,
}

impl Conversation {
    pub fn new(provider_name: impl Into<String>, model_id: impl Into<String>) -> Self {
        let model_id = model_id.into();
        Self {
            id: new_id(),
            provider_name: provider_name.into(),
            title: format!("New Chat with {model_id}"),
            model_id,
            messages: Vec::new(),
            last_updated: Utc::now(),
        }
    }

    fn push(&mut self, message: ChatMessage) {
        if self.messages.is_empty() && message.sender == Sender::User {
            self.title = message.text.clone();
        }
        self.messages.push(message);
        self.last_updated = Utc::now();
    }
}

fn new_id() -> String {
    format!("{:032x}", rand::random::<u128>())
}

/// Shared handle to every conversation of a process or session.
///
/// Cloning the handle shares the underlying map.
#[derive(Clone, Debug, Default)]
pub struct ConversationStore {
    inner: Arc<RwLock<HashMap<String, Conversation>>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, provider_name: &str, model_id: &str) -> Conversation {
        let conversation = Conversation::new(provider_name, model_id);
        self.inner
            .write()
            .insert(conversation.id.clone(), conversation.clone());
        log::debug!("created conversation {}", conversation.id);
        conversation
    }

    /// Snapshot of a conversation
    pub fn get(&self, id: &str) -> Option<Conversation> {
        self.inner.read().get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.read().contains_key(id)
    }

    /// Append a message; returns `false` when the conversation does not exist
    pub fn append(&self, id: &str, message: ChatMessage) -> bool {
        match self.inner.write().get_mut(id) {
            Some(conversation) => {
                conversation.push(message);
                true
            }
            None => false,
        }
    }

    pub fn delete(&self, id: &str) -> bool {
        self.inner.write().remove(id).is_some()
    }

    /// Delete several conversations, returning how many existed
    pub fn delete_many<'a>(&self, ids: impl IntoIterator<Item = &'a str>) -> usize {
        let mut map = self.inner.write();
        ids.into_iter().filter(|id| map.remove(*id).is_some()).count()
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// All conversations, most recently updated first
    pub fn list(&self) -> Vec<Conversation> {
        let mut conversations: Vec<Conversation> = self.inner.read().values().cloned().collect();
        conversations.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));
        conversations
    }

    /// Load conversations from a JSON file; a missing or empty file is an empty store
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ChatError> {
        let path = path.as_ref();
        let store = Self::new();

        if !path.exists() {
            return Ok(store);
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            ChatError::storage_with_source(format!("Failed to read {}", path.display()), e)
        })?;

        if content.trim().is_empty() {
            return Ok(store);
        }

        let conversations: Vec<Conversation> = serde_json::from_str(&content).map_err(|e| {
            ChatError::storage_with_source(format!("Failed to parse {}", path.display()), e)
        })?;

        {
            let mut map = store.inner.write();
            for conversation in conversations {
                map.insert(conversation.id.clone(), conversation);
            }
        }

        Ok(store)
    }

    /// Write every conversation to a JSON file, newest first
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ChatError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ChatError::storage_with_source("Failed to create data directory", e)
            })?;
        }

        let content = serde_json::to_string_pretty(&self.list())
            .map_err(|e| ChatError::storage_with_source("Failed to serialize conversations", e))?;

        std::fs::write(path, content).map_err(|e| {
            ChatError::storage_with_source(format!("Failed to write {}", path.display()), e)
        })
    }
}
