use crate::registry::ProviderKind;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for the chat library
#[derive(Error, Debug)]
pub enum ChatError {
    /// The provider answered 2xx but carried no usable text
    #[error("Received an empty but successful response{}.", empty_suffix(.provider))]
    EmptyResponse { provider: String },

    /// Non-2xx answer from the provider, with the raw error body
    #[error("{}API Error {status}: {body}", api_prefix(.provider))]
    Api {
        provider: String,
        status: u16,
        body: String,
    },

    /// Network or (de)serialization failure while talking to a provider
    #[error("{provider} request failed: {source}")]
    Transport {
        provider: String,
        #[source]
        source: BoxError,
    },

    /// Dispatch found no adapter for the provider name
    #[error("No chat implementation for {provider}.")]
    NoImplementation { provider: String },

    /// No usable API key stored for the provider
    #[error("API Key for '{provider}' not found.")]
    MissingCredential { provider: String },

    #[error("Conversation not found: {id}")]
    ConversationNotFound { id: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Reading or writing local state failed
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

/// Grok errors name the provider; the other providers keep the bare wording
fn names_provider(provider: &str) -> bool {
    provider == ProviderKind::Grok.name()
}

fn api_prefix(provider: &str) -> String {
    if names_provider(provider) {
        format!("{provider} ")
    } else {
        String::new()
    }
}

fn empty_suffix(provider: &str) -> String {
    if names_provider(provider) {
        format!(" from {provider}")
    } else {
        String::new()
    }
}

impl ChatError {
    /// Create an empty response error
    pub fn empty_response(provider: impl Into<String>) -> Self {
        Self::EmptyResponse {
            provider: provider.into(),
        }
    }

    /// Create an API error
    pub fn api(provider: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            provider: provider.into(),
            status,
            body: body.into(),
        }
    }

    /// Create a transport error wrapping the underlying cause
    pub fn transport(provider: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Transport {
            provider: provider.into(),
            source: source.into(),
        }
    }

    pub fn no_implementation(provider: impl Into<String>) -> Self {
        Self::NoImplementation {
            provider: provider.into(),
        }
    }

    pub fn missing_credential(provider: impl Into<String>) -> Self {
        Self::MissingCredential {
            provider: provider.into(),
        }
    }

    pub fn conversation_not_found(id: impl Into<String>) -> Self {
        Self::ConversationNotFound { id: id.into() }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            source: None,
        }
    }

    /// Create a storage error with source
    pub fn storage_with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Storage {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Provider the error originated from, if it came out of an adapter
    pub fn provider(&self) -> Option<&str> {
        match self {
            ChatError::EmptyResponse { provider }
            | ChatError::Api { provider, .. }
            | ChatError::Transport { provider, .. }
            | ChatError::NoImplementation { provider }
            | ChatError::MissingCredential { provider } => Some(provider),
            _ => None,
        }
    }

    /// HTTP status for API errors
    pub fn status(&self) -> Option<u16> {
        match self {
            ChatError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
