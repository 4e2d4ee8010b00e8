//! Copywriting use case: one-shot marketing copy generation.
//!
//! Unlike the chat loop, copy generation is stateless: every prompt is an
//! independent call with no conversation identity and no review slot.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use colloquy_core::input::clean_text_input;
use colloquy_core::{ColloquyError, Result};
use colloquy_interaction::{ChatBackend, TokenUsage};

/// A generated marketing-copy document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CopyDraft {
    /// The generated copy text
    pub content: String,
    /// Usage accounting, when the backend reports it
    pub usage: Option<TokenUsage>,
    /// When the draft was produced
    pub generated_at: DateTime<Utc>,
}

/// Generates marketing copy from a free-form prompt.
pub struct CopyUseCase {
    backend: Arc<dyn ChatBackend>,
}

impl CopyUseCase {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self { backend }
    }

    /// Produces a copy draft for the given prompt.
    ///
    /// # Errors
    ///
    /// `Validation` for an empty prompt (the backend is not invoked); the
    /// `Backend*` kinds when generation fails.
    pub async fn generate(&self, prompt: &str) -> Result<CopyDraft> {
        let prompt = clean_text_input(prompt);
        if prompt.is_empty() {
            return Err(ColloquyError::validation("copy prompt must not be empty"));
        }

        let reply = self.backend.generate(&prompt).await.inspect_err(|err| {
            tracing::error!(%err, "copy generation failed");
        })?;

        tracing::info!(message_id = ?reply.message_id, "copy draft generated");

        Ok(CopyDraft {
            content: reply.content,
            usage: reply.usage,
            generated_at: Utc::now(),
        })
    }
}
