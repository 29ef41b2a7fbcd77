use clap::{ValueEnum, builder::PossibleValue};
use llmchat_core::{ProviderDescriptor, ProviderKind};

/// Provider argument; declare with `ignore_case = true`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Provider(pub ProviderKind);

impl Provider {
    pub fn descriptor(&self) -> &'static ProviderDescriptor {
        self.0.descriptor()
    }

    pub fn name(&self) -> &'static str {
        self.0.name()
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl ValueEnum for Provider {
    fn value_variants<'a>() -> &'a [Self] {
        &[
            Self(ProviderKind::Gemini),
            Self(ProviderKind::OpenAI),
            Self(ProviderKind::Anthropic),
            Self(ProviderKind::Grok),
        ]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        let value = match self.0 {
            ProviderKind::Gemini => PossibleValue::new("gemini").alias("google"),
            ProviderKind::OpenAI => PossibleValue::new("openai"),
            ProviderKind::Anthropic => PossibleValue::new("anthropic").alias("claude"),
            ProviderKind::Grok => PossibleValue::new("grok").alias("groq"),
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            <Provider as ValueEnum>::from_str("OpenAI", true).unwrap(),
            Provider(ProviderKind::OpenAI)
        );
        assert_eq!(
            <Provider as ValueEnum>::from_str("GEMINI", true).unwrap(),
            Provider(ProviderKind::Gemini)
        );
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(
            <Provider as ValueEnum>::from_str("claude", true).unwrap(),
            Provider(ProviderKind::Anthropic)
        );
        assert_eq!(
            <Provider as ValueEnum>::from_str("groq", true).unwrap(),
            Provider(ProviderKind::Grok)
        );
    }

    #[test]
    fn test_parse_unknown() {
        assert!(<Provider as ValueEnum>::from_str("mistral", true).is_err());
    }

    #[test]
    fn test_display_uses_stored_name() {
        assert_eq!(Provider(ProviderKind::Grok).to_string(), "Grok");
        assert_eq!(
            Provider(ProviderKind::Anthropic).descriptor().credential_alias,
            "anthropic_api_key"
        );
    }
}
