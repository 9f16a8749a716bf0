#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! The character chat service whose log stream the extractor observes.
//!
//! This is the host side of the seam: it announces turn-starts to registered
//! collectors, produces replies through a [`ChatProvider`], and emits every
//! raw model response through a swappable [`xtract_core::SharedSink`] at
//! debug level with the `model response: ` prefix.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod service;
pub mod sink;

pub use service::{CharacterOptions, CharacterService};
pub use sink::TracingSink;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct ChatReply {
    pub content: String,
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Copy)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Sampling parameters forwarded to the provider on every chat call.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatParams {
    pub model: String,
    pub max_tokens: usize,
    pub temperature: f32,
}

#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn chat(&self, messages: &[ChatMessage], params: &ChatParams)
    -> anyhow::Result<ChatReply>;
    fn default_model(&self) -> &str;
}
