//! Static list of supported providers.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

/// Supported LLM providers
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr, Serialize, Deserialize,
)]
pub enum ProviderKind {
    Gemini,
    OpenAI,
    Anthropic,
    Grok,
}

/// Provider metadata: display name and the storage keys it owns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderDescriptor {
    pub kind: ProviderKind,
    /// Display name, also the name conversations are tagged with
    pub name: &'static str,
    /// Secret store key holding the API key
    pub credential_alias: &'static str,
    /// Secret store key holding the comma-joined saved model list
    pub model_list_alias: &'static str,
    /// Environment fallback for the API key
    pub env_key: &'static str,
}

pub const PROVIDERS: [ProviderDescriptor; 4] = [
    ProviderDescriptor {
        kind: ProviderKind::Gemini,
        name: "Gemini",
        credential_alias: "gemini_api_key",
        model_list_alias: "gemini_models_list",
        env_key: "GEMINI_API_KEY",
    },
    ProviderDescriptor {
        kind: ProviderKind::OpenAI,
        name: "OpenAI",
        credential_alias: "openai_api_key",
        model_list_alias: "openai_models_list",
        env_key: "OPENAI_API_KEY",
    },
    ProviderDescriptor {
        kind: ProviderKind::Anthropic,
        name: "Anthropic",
        credential_alias: "anthropic_api_key",
        model_list_alias: "anthropic_models_list",
        env_key: "ANTHROPIC_API_KEY",
    },
    ProviderDescriptor {
        kind: ProviderKind::Grok,
        name: "Grok",
        credential_alias: "grok_api_key",
        model_list_alias: "grok_models_list",
        env_key: "GROK_API_KEY",
    },
];

impl ProviderKind {
    pub fn descriptor(&self) -> &'static ProviderDescriptor {
        match self {
            ProviderKind::Gemini => &PROVIDERS[0],
            ProviderKind::OpenAI => &PROVIDERS[1],
            ProviderKind::Anthropic => &PROVIDERS[2],
            ProviderKind::Grok => &PROVIDERS[3],
        }
    }

    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Case-insensitive lookup, for user input
    pub fn from_alias(alias: &str) -> Option<ProviderKind> {
        ProviderKind::iter().find(|p| p.name().eq_ignore_ascii_case(alias.trim()))
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// All providers in display order
pub fn providers() -> &'static [ProviderDescriptor] {
    &PROVIDERS
}

/// Exact lookup by display name, as stored on a conversation
pub fn find(name: &str) -> Option<&'static ProviderDescriptor> {
    PROVIDERS.iter().find(|p| p.name == name)
}
