//! Provider name to adapter routing.

use std::collections::HashMap;

use reqwest::Client;
use strum::IntoEnumIterator;

use crate::config::AdapterConfig;
use crate::error::ChatError;
use crate::message::ChatMessage;
use crate::providers::Adapter;
use crate::registry::ProviderKind;

/// Adapters keyed by provider display name
#[derive(Clone, Debug, Default)]
pub struct Dispatcher {
    adapters: HashMap<&'static str, Adapter>,
}

impl Dispatcher {
    /// A dispatcher with nothing registered
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every registry provider, default endpoints
    pub fn new() -> Self {
        Self::build(&AdapterConfig::default())
    }

    /// Every registry provider, configured endpoints
    pub fn with_config(config: &AdapterConfig) -> Result<Self, ChatError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: &AdapterConfig) -> Self {
        let client = Client::new();
        let mut dispatcher = Self::empty();
        for kind in ProviderKind::iter() {
            dispatcher.register(Adapter::new(kind, config, client.clone()));
        }
        dispatcher
    }

    /// Register an adapter, replacing any previous one for the same provider
    pub fn register(&mut self, adapter: Adapter) {
        self.adapters.insert(adapter.kind().name(), adapter);
    }

    pub fn is_registered(&self, provider_name: &str) -> bool {
        self.adapters.contains_key(provider_name)
    }

    /// Adapter for a provider display name
    pub fn adapter(&self, provider_name: &str) -> Result<&Adapter, ChatError> {
        self.adapters
            .get(provider_name)
            .ok_or_else(|| ChatError::no_implementation(provider_name))
    }

    /// Route one generate call to the adapter registered for `provider_name`
    pub async fn generate(
        &self,
        provider_name: &str,
        credential: &str,
        model_id: &str,
        history: &[ChatMessage],
    ) -> Result<ChatMessage, ChatError> {
        let adapter = self.adapter(provider_name)?;
        adapter.generate(credential, model_id, history).await
    }
}
