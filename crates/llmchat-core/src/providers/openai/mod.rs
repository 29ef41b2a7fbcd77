//! OpenAI chat completions adapter
//!
//! The same client serves Grok: only the [`ProviderIdentity`] (name and
//! endpoint path) differs, the request and response schema are shared.

pub mod client;
pub mod types;

pub use client::{OpenAIClient, ProviderIdentity, identities};
pub use types::*;
