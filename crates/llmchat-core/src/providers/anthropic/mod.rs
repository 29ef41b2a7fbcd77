//! Anthropic Messages API adapter
//!
//! Authenticates with `x-api-key` plus a pinned `anthropic-version` header and
//! always sends an explicit `max_tokens`.

pub mod client;
pub mod types;

pub use client::AnthropicClient;
pub use types::*;
