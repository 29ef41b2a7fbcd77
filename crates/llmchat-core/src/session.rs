//! One conversation's send loop.
//!
//! A send appends the user turn, asks the conversation's provider for a reply
//! and appends either the reply or an Error-tagged notice. Only one request
//! per session is in flight; sends made meanwhile are ignored.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::conversation::{Conversation, ConversationStore};
use crate::dispatch::Dispatcher;
use crate::error::ChatError;
use crate::message::ChatMessage;
use crate::registry::{self, ProviderDescriptor};
use crate::secrets::{self, SecretStore};

/// What happened to a [`ChatSession::send_message`] call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input or a request already pending; nothing was appended
    Ignored,
    /// The model replied; the reply was appended
    Replied(ChatMessage),
    /// The request failed; this Error-tagged message was appended
    Failed(ChatMessage),
}

/// A conversation bound to its adapter and credential.
///
/// The pending flag belongs to the session, not to the conversation: two
/// sessions opened on the same conversation id can each have a request in
/// flight.
pub struct ChatSession {
    store: ConversationStore,
    dispatcher: Dispatcher,
    conversation_id: String,
    provider: &'static ProviderDescriptor,
    credential: String,
    model_id: String,
    loading: AtomicBool,
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("conversation_id", &self.conversation_id)
            .field("provider", &self.provider.name)
            .field("model_id", &self.model_id)
            .field("loading", &self.is_loading())
            .finish_non_exhaustive()
    }
}

impl ChatSession {
    /// Bind a session to an existing conversation.
    ///
    /// Fails when the conversation is unknown, or when its provider has no
    /// usable API key.
    pub fn open(
        store: ConversationStore,
        dispatcher: Dispatcher,
        secret_store: &dyn SecretStore,
        conversation_id: &str,
    ) -> Result<Self, ChatError> {
        let conversation = store
            .get(conversation_id)
            .ok_or_else(|| ChatError::conversation_not_found(conversation_id))?;

        let provider = registry::find(&conversation.provider_name)
            .ok_or_else(|| ChatError::missing_credential(&conversation.provider_name))?;
        let credential = secrets::credential(secret_store, provider)
            .ok_or_else(|| ChatError::missing_credential(provider.name))?;

        Ok(Self {
            store,
            dispatcher,
            conversation_id: conversation.id,
            provider,
            credential,
            model_id: conversation.model_id,
            loading: AtomicBool::new(false),
        })
    }

    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    pub fn provider(&self) -> &'static ProviderDescriptor {
        self.provider
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// True while a request is in flight
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Current snapshot of the conversation
    pub fn conversation(&self) -> Result<Conversation, ChatError> {
        self.store
            .get(&self.conversation_id)
            .ok_or_else(|| ChatError::conversation_not_found(&self.conversation_id))
    }

    /// Send a user message and wait for the model's turn.
    ///
    /// Provider failures are not returned as `Err`: they become an
    /// Error-tagged message in the conversation. `Err` means the conversation
    /// itself disappeared.
    pub async fn send_message(&self, text: &str) -> Result<SendOutcome, ChatError> {
        if text.trim().is_empty() {
            return Ok(SendOutcome::Ignored);
        }

        let Some(_pending) = PendingGuard::acquire(&self.loading) else {
            log::debug!("send ignored, request pending for {}", self.conversation_id);
            return Ok(SendOutcome::Ignored);
        };

        if !self
            .store
            .append(&self.conversation_id, ChatMessage::user(text))
        {
            return Err(ChatError::conversation_not_found(&self.conversation_id));
        }

        let history = self.conversation()?.messages;
        let result = self
            .dispatcher
            .generate(
                self.provider.name,
                &self.credential,
                self.model_id.trim(),
                &history,
            )
            .await;

        let outcome = match result {
            Ok(reply) => {
                let reply = reply.settled();
                self.store.append(&self.conversation_id, reply.clone());
                SendOutcome::Replied(reply)
            }
            Err(err) => {
                log::warn!("{} request failed: {err}", self.provider.name);
                let notice = ChatMessage::error(format!("Error: {err}"));
                self.store.append(&self.conversation_id, notice.clone());
                SendOutcome::Failed(notice)
            }
        };

        Ok(outcome)
    }
}

/// Holds the loading flag; releases it on drop, including cancellation
struct PendingGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> PendingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::MemorySecretStore;

    fn store_with_key(provider: &str, key: &str) -> MemorySecretStore {
        let secrets = MemorySecretStore::new();
        let descriptor = registry::find(provider).unwrap();
        secrets.save(descriptor.credential_alias, key).unwrap();
        secrets
    }

    #[test]
    fn test_open_unknown_conversation() {
        let secrets = MemorySecretStore::new();
        let err = ChatSession::open(
            ConversationStore::new(),
            Dispatcher::new(),
            &secrets,
            "missing",
        )
        .unwrap_err();
        assert!(matches!(err, ChatError::ConversationNotFound { .. }));
    }

    #[test]
    fn test_open_requires_key_for_registered_provider() {
        let store = ConversationStore::new();
        let id = store.create("Anthropic", "claude-3-haiku").id;
        let secrets = store_with_key("Anthropic", "  ");

        // A blank stored key only passes if the environment provides one
        if std::env::var("ANTHROPIC_API_KEY").is_err() {
            let err = ChatSession::open(store, Dispatcher::new(), &secrets, &id).unwrap_err();
            assert_eq!(err.to_string(), "API Key for 'Anthropic' not found.");
        }
    }

    #[test]
    fn test_open_unregistered_provider() {
        let store = ConversationStore::new();
        let id = store.create("Mistral", "mistral-large").id;
        let secrets = MemorySecretStore::new();
        let err = ChatSession::open(store, Dispatcher::new(), &secrets, &id).unwrap_err();
        assert_eq!(err.to_string(), "API Key for 'Mistral' not found.");
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let store = ConversationStore::new();
        let id = store.create("OpenAI", "gpt-4o").id;
        let secrets = store_with_key("OpenAI", "sk-test");
        let session = ChatSession::open(store.clone(), Dispatcher::new(), &secrets, &id).unwrap();

        assert_eq!(session.send_message("   ").await.unwrap(), SendOutcome::Ignored);
        assert!(store.get(&id).unwrap().messages.is_empty());
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_missing_adapter_becomes_error_message() {
        let store = ConversationStore::new();
        let id = store.create("OpenAI", "gpt-4o").id;
        let secrets = store_with_key("OpenAI", "sk-test");
        let session =
            ChatSession::open(store.clone(), Dispatcher::empty(), &secrets, &id).unwrap();

        let outcome = session.send_message("hi").await.unwrap();
        let expected = ChatMessage::error("Error: No chat implementation for OpenAI.");
        assert_eq!(outcome, SendOutcome::Failed(expected.clone()));

        let conversation = store.get(&id).unwrap();
        assert_eq!(conversation.title, "hi");
        assert_eq!(conversation.messages, vec![ChatMessage::user("hi"), expected]);
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_pending_flag_is_per_session() {
        let store = ConversationStore::new();
        let id = store.create("OpenAI", "gpt-4o").id;
        let secrets = store_with_key("OpenAI", "sk-test");
        let busy = ChatSession::open(store.clone(), Dispatcher::empty(), &secrets, &id).unwrap();
        let other = ChatSession::open(store.clone(), Dispatcher::empty(), &secrets, &id).unwrap();

        busy.loading.store(true, Ordering::SeqCst);
        assert_eq!(busy.send_message("one").await.unwrap(), SendOutcome::Ignored);
        assert!(matches!(
            other.send_message("two").await.unwrap(),
            SendOutcome::Failed(_)
        ));
        assert_eq!(store.get(&id).unwrap().messages[0], ChatMessage::user("two"));
    }

    #[tokio::test]
    async fn test_deleted_conversation_is_an_error() {
        let store = ConversationStore::new();
        let id = store.create("OpenAI", "gpt-4o").id;
        let secrets = store_with_key("OpenAI", "sk-test");
        let session =
            ChatSession::open(store.clone(), Dispatcher::empty(), &secrets, &id).unwrap();

        store.delete(&id);
        assert!(matches!(
            session.send_message("hi").await,
            Err(ChatError::ConversationNotFound { .. })
        ));
        assert!(!session.is_loading());
    }

    #[test]
    fn test_pending_guard_is_exclusive() {
        let flag = AtomicBool::new(false);
        let guard = PendingGuard::acquire(&flag).unwrap();
        assert!(PendingGuard::acquire(&flag).is_none());
        drop(guard);
        assert!(PendingGuard::acquire(&flag).is_some());
    }
}
