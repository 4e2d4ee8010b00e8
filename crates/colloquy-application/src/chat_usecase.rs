//! Chat use case: the generation and decision pipelines.
//!
//! `ChatUseCase` is the command surface the rendering collaborator drives.
//! The generation side turns validated user input into a review candidate;
//! the decision side releases or discards that candidate. All session
//! mutation funnels through here; the collaborator only reads.

use std::sync::Arc;

use colloquy_core::config::ChatConfig;
use colloquy_core::input::{clean_text_input, validate_message_content};
use colloquy_core::{
    ColloquyError, ConversationPhase, ConversationSession, Message, Result, ReviewCandidate,
};
use colloquy_interaction::ChatBackend;

/// Drives one conversation through the submit → review → decide loop.
///
/// Invocations must be serialized per conversation (cooperative
/// single-driver model); the mutating methods take `&mut self`, so a second
/// in-flight `submit` on the same use case cannot be expressed.
pub struct ChatUseCase {
    backend: Arc<dyn ChatBackend>,
    config: ChatConfig,
    session: ConversationSession,
}

impl ChatUseCase {
    /// Creates a use case over a fresh session.
    pub fn new(backend: Arc<dyn ChatBackend>, config: ChatConfig) -> Self {
        Self {
            backend,
            config,
            session: ConversationSession::new(),
        }
    }

    // --- generation pipeline ---

    /// Accepts a user turn and produces a review candidate.
    ///
    /// Cleans and validates the input, appends the user message, then calls
    /// the backend with the session's conversation id. On success the
    /// candidate is opened and returned; on failure the error is returned
    /// and the already-appended user message stays in the log so the
    /// operator can see what was asked and retry.
    ///
    /// # Errors
    ///
    /// `Validation` before any mutation; `InvariantViolation` when a
    /// candidate is already awaiting review; the `Backend*` kinds when the
    /// AI call fails.
    pub async fn submit(&mut self, raw_input: &str) -> Result<ReviewCandidate> {
        let text = clean_text_input(raw_input);
        validate_message_content(&text, &self.config)?;

        if self.session.pending_review().is_some() {
            return Err(ColloquyError::invariant(
                "cannot submit while a candidate awaits review",
            ));
        }

        let user_message = self.session.append_user_message(&text)?;
        tracing::info!(message_id = %user_message.id, chars = text.chars().count(), "user message accepted");

        self.session.set_typing(true);
        let conversation_id = self.session.conversation_id().map(str::to_owned);
        let outcome = self.backend.chat(&text, conversation_id.as_deref()).await;
        self.session.set_typing(false);

        match outcome {
            Ok(reply) => {
                if let Some(id) = &reply.conversation_id {
                    self.session.adopt_conversation_id(id);
                }
                let candidate = self.session.open_review(reply.content, &user_message.id)?;
                tracing::info!(candidate_id = %candidate.id, "reply drafted, awaiting review");
                Ok(candidate)
            }
            Err(err) => {
                tracing::error!(%err, "reply generation failed");
                Err(err)
            }
        }
    }

    // --- decision pipeline ---

    /// Replaces the working copy of the pending candidate.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no candidate is open.
    pub fn edit_candidate(&mut self, new_text: &str) -> Result<()> {
        self.session.edit_pending(new_text)
    }

    /// Releases the pending candidate as an assistant message.
    ///
    /// `final_content` is used verbatim when given; otherwise the
    /// candidate's working copy is released.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no candidate is open.
    pub fn approve(&mut self, final_content: Option<String>) -> Result<Message> {
        let message = self.session.approve(final_content)?;
        tracing::info!(message_id = %message.id, "candidate approved and released");
        Ok(message)
    }

    /// Discards the pending candidate. Idempotent on an empty slot.
    pub fn reject(&mut self) {
        if self.session.pending_review().is_some() {
            tracing::info!("candidate rejected");
        }
        self.session.reject();
    }

    /// Resets the conversation: history, pending candidate, backend
    /// conversation identity.
    pub fn clear(&mut self) {
        self.session.clear();
        tracing::info!("conversation cleared");
    }

    /// Probes the backend and records the result on the session.
    pub async fn refresh_connection(&mut self) -> bool {
        let connected = self.backend.check_connection().await;
        self.session.set_api_connected(connected);
        connected
    }

    // --- read surface for the rendering collaborator ---

    /// Snapshot of the finalized conversation history.
    pub fn messages(&self) -> Vec<Message> {
        self.session.messages()
    }

    /// The candidate awaiting review, if any.
    pub fn pending_review(&self) -> Option<&ReviewCandidate> {
        self.session.pending_review()
    }

    /// True while a backend call is outstanding.
    pub fn is_typing(&self) -> bool {
        self.session.is_typing()
    }

    /// Number of finalized messages.
    pub fn message_count(&self) -> usize {
        self.session.message_count()
    }

    /// 1 when a candidate is open, 0 otherwise.
    pub fn pending_count(&self) -> usize {
        self.session.pending_count()
    }

    /// Last recorded backend health.
    pub fn is_api_connected(&self) -> bool {
        self.session.is_api_connected()
    }

    /// Backend conversation identity, if assigned.
    pub fn conversation_id(&self) -> Option<&str> {
        self.session.conversation_id()
    }

    /// Derived conversation phase.
    pub fn phase(&self) -> ConversationPhase {
        self.session.phase()
    }
}
