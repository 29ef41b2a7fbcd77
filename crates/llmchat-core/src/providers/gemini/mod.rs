//! Google Gemini adapter
//!
//! Sends the history as `contents[].parts[].text` to
//! `v1beta/models/{model}:generateContent` and reads back the first part of
//! the first candidate.

pub mod client;
pub mod types;

pub use client::GeminiClient;
pub use types::*;
