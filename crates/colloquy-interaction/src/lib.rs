//! AI-backend collaborators for Colloquy.
//!
//! The generation pipeline talks to a chat-completion service through the
//! [`ChatBackend`] trait; [`DifyClient`] is the REST implementation. Every
//! transport detail stays behind the trait; the pipelines see one uniform
//! reply shape and the shared error kinds.

pub mod dify;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use colloquy_core::Result;

pub use dify::DifyClient;

/// Token accounting reported by the backend, when available.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: Option<u64>,
    #[serde(default)]
    pub completion_tokens: Option<u64>,
    #[serde(default)]
    pub total_tokens: Option<u64>,
    /// Price as reported by the backend (string to preserve precision)
    #[serde(default)]
    pub total_price: Option<String>,
}

/// Uniform successful reply from a chat-completion backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    /// The generated reply text
    pub content: String,
    /// Backend-side conversation identity, when the call was part of one
    pub conversation_id: Option<String>,
    /// Backend-side message identity
    pub message_id: Option<String>,
    /// Usage accounting, when the backend reports it
    pub usage: Option<TokenUsage>,
}

/// A chat-completion backend.
///
/// Failures surface as the `BackendTimeout` / `BackendUnavailable` /
/// `BackendUnknown` error kinds; the caller decides how to present them.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Sends a user query within an ongoing conversation.
    ///
    /// `conversation_id` is `None` on first contact; the reply carries the
    /// id the backend assigned so the caller can reuse it.
    async fn chat(&self, query: &str, conversation_id: Option<&str>) -> Result<ChatReply>;

    /// One-shot generation outside any conversation (copywriting).
    async fn generate(&self, prompt: &str) -> Result<ChatReply>;

    /// Probes backend reachability. Informational only, never fails.
    async fn check_connection(&self) -> bool;
}
