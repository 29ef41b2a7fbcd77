use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::error::ChatError;
use crate::registry::ProviderKind;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
pub const GROK_BASE_URL: &str = "https://api.groq.com";

pub const ANTHROPIC_API_VERSION: &str = "2023-06-01";
pub const ANTHROPIC_DEFAULT_MAX_TOKENS: u32 = 2048;

/// Per-provider endpoint configuration.
///
/// Every field is optional in TOML so a partially written config file still
/// loads with defaults for the rest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "AdapterConfigFile")]
pub struct AdapterConfig {
    pub gemini: EndpointConfig,
    pub openai: EndpointConfig,
    pub anthropic: AnthropicConfig,
    pub grok: EndpointConfig,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            gemini: EndpointConfig::new(GEMINI_BASE_URL),
            openai: EndpointConfig::new(OPENAI_BASE_URL),
            anthropic: AnthropicConfig::default(),
            grok: EndpointConfig::new(GROK_BASE_URL),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EndpointConfig {
    pub base_url: String,
}

impl EndpointConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

/// On-disk shape of [`AdapterConfig`]; missing tables and keys fall back to
/// the built-in endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AdapterConfigFile {
    gemini: EndpointFile,
    openai: EndpointFile,
    anthropic: AnthropicConfig,
    grok: EndpointFile,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EndpointFile {
    base_url: Option<String>,
}

impl EndpointFile {
    fn or_default(self, base_url: &str) -> EndpointConfig {
        EndpointConfig::new(self.base_url.unwrap_or_else(|| base_url.to_string()))
    }
}

impl From<AdapterConfigFile> for AdapterConfig {
    fn from(file: AdapterConfigFile) -> Self {
        Self {
            gemini: file.gemini.or_default(GEMINI_BASE_URL),
            openai: file.openai.or_default(OPENAI_BASE_URL),
            anthropic: file.anthropic,
            grok: file.grok.or_default(GROK_BASE_URL),
        }
    }
}

/// Anthropic-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnthropicConfig {
    pub base_url: String,
    pub api_version: String,
    /// Upper bound on generated tokens; the Messages API requires one
    pub max_tokens: u32,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            base_url: ANTHROPIC_BASE_URL.to_string(),
            api_version: ANTHROPIC_API_VERSION.to_string(),
            max_tokens: ANTHROPIC_DEFAULT_MAX_TOKENS,
        }
    }
}

impl AdapterConfig {
    /// Defaults, with base URLs overridden from `*_BASE_URL` variables
    pub fn from_env() -> Result<Self, ChatError> {
        Self::default().with_env_overrides()
    }

    /// Replace base URLs with any `*_BASE_URL` variables that are set
    pub fn with_env_overrides(mut self) -> Result<Self, ChatError> {
        for kind in ProviderKind::iter() {
            let var = format!("{}_BASE_URL", kind.name().to_ascii_uppercase());
            if let Ok(base_url) = std::env::var(&var) {
                log::debug!("{kind} base URL overridden by {var}");
                *self.base_url_mut(kind) = base_url;
            }
        }

        self.validate()?;
        Ok(self)
    }

    /// Point every provider at the same host, e.g. a local mock server
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            gemini: EndpointConfig::new(base_url.clone()),
            openai: EndpointConfig::new(base_url.clone()),
            anthropic: AnthropicConfig {
                base_url: base_url.clone(),
                ..AnthropicConfig::default()
            },
            grok: EndpointConfig::new(base_url),
        }
    }

    pub fn base_url(&self, kind: ProviderKind) -> &str {
        match kind {
            ProviderKind::Gemini => &self.gemini.base_url,
            ProviderKind::OpenAI => &self.openai.base_url,
            ProviderKind::Anthropic => &self.anthropic.base_url,
            ProviderKind::Grok => &self.grok.base_url,
        }
    }

    fn base_url_mut(&mut self, kind: ProviderKind) -> &mut String {
        match kind {
            ProviderKind::Gemini => &mut self.gemini.base_url,
            ProviderKind::OpenAI => &mut self.openai.base_url,
            ProviderKind::Anthropic => &mut self.anthropic.base_url,
            ProviderKind::Grok => &mut self.grok.base_url,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ChatError> {
        for kind in ProviderKind::iter() {
            let base_url = self.base_url(kind);
            if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                return Err(ChatError::configuration(format!(
                    "{kind} base URL must be a valid HTTP/HTTPS URL, got '{base_url}'"
                )));
            }
        }

        if self.anthropic.max_tokens == 0 {
            return Err(ChatError::configuration(
                "Anthropic max_tokens must be greater than zero",
            ));
        }

        if self.anthropic.api_version.trim().is_empty() {
            return Err(ChatError::configuration(
                "Anthropic API version is required",
            ));
        }

        Ok(())
    }
}

/// Strip trailing slashes so `{base}/v1/...` never doubles them
pub(crate) fn trim_base(base_url: &str) -> &str {
    base_url.trim_end_matches('/')
}
