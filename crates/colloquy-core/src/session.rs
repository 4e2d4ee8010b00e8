//! Conversation session aggregate.
//!
//! The session binds one message log, one review slot, and the backend
//! conversation identity for a single logical conversation. The pipelines
//! are its only writers; rendering collaborators read it and issue pipeline
//! commands, never mutating the session directly.

use serde::{Deserialize, Serialize};

use crate::error::{ColloquyError, Result};
use crate::message::Message;
use crate::review::{ReviewCandidate, ReviewSlot};
use crate::store::MessageStore;

/// The resting/working phase of a conversation, derived from session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversationPhase {
    /// No turn in flight, slot empty.
    Idle,
    /// A user turn was accepted, the backend call is outstanding.
    AwaitingAi,
    /// A candidate is open and waiting on the supervisor.
    AwaitingReview,
}

/// Aggregate state of one logical conversation.
///
/// The session exclusively owns its [`MessageStore`] and [`ReviewSlot`].
/// Callers are expected to serialize invocations per conversation (one
/// driving collaborator at a time); the mutating methods take `&mut self`,
/// so overlapping turns on the same session cannot compile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationSession {
    /// Backend-assigned conversation identity, set on first successful call
    conversation_id: Option<String>,
    /// True from an accepted user turn until a candidate lands or fails
    typing: bool,
    /// Last known backend health, informational only
    api_connected: bool,
    store: MessageStore,
    slot: ReviewSlot,
}

impl ConversationSession {
    /// Creates a fresh session with an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    // --- reads for the rendering collaborator ---

    /// Snapshot of all finalized messages in order.
    pub fn messages(&self) -> Vec<Message> {
        self.store.all()
    }

    /// The most recently finalized message, if any.
    pub fn last_message(&self) -> Option<&Message> {
        self.store.last()
    }

    /// Number of finalized messages.
    pub fn message_count(&self) -> usize {
        self.store.count()
    }

    /// The open review candidate, if any.
    pub fn pending_review(&self) -> Option<&ReviewCandidate> {
        self.slot.current()
    }

    /// 1 when a candidate is open, 0 otherwise.
    pub fn pending_count(&self) -> usize {
        usize::from(self.slot.is_open())
    }

    /// True while a backend call is outstanding.
    pub fn is_typing(&self) -> bool {
        self.typing
    }

    /// Backend conversation identity, if one was ever assigned.
    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    /// Last known backend health.
    pub fn is_api_connected(&self) -> bool {
        self.api_connected
    }

    /// Derived conversation phase.
    pub fn phase(&self) -> ConversationPhase {
        if self.typing {
            ConversationPhase::AwaitingAi
        } else if self.slot.is_open() {
            ConversationPhase::AwaitingReview
        } else {
            ConversationPhase::Idle
        }
    }

    // --- generation-side mutations ---

    /// Appends a finalized user message and returns it.
    pub fn append_user_message(&mut self, content: impl Into<String>) -> Result<Message> {
        let message = Message::user(content);
        self.store.append(message.clone())?;
        Ok(message)
    }

    /// Marks a backend call as outstanding or settled.
    pub fn set_typing(&mut self, typing: bool) {
        self.typing = typing;
    }

    /// Adopts the backend's conversation id on first contact.
    ///
    /// Once set, the id is kept so the backend can maintain its own context.
    pub fn adopt_conversation_id(&mut self, conversation_id: impl Into<String>) {
        if self.conversation_id.is_none() {
            self.conversation_id = Some(conversation_id.into());
        }
    }

    /// Records the backend health probe result.
    pub fn set_api_connected(&mut self, connected: bool) {
        self.api_connected = connected;
    }

    /// Opens a review candidate for freshly generated content.
    ///
    /// The source message id must reference a message already in the log.
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` if a candidate is already open.
    pub fn open_review(
        &mut self,
        content: impl Into<String>,
        source_message_id: impl Into<String>,
    ) -> Result<ReviewCandidate> {
        let candidate = ReviewCandidate::new(content, source_message_id);
        self.slot.open(candidate.clone())?;
        Ok(candidate)
    }

    /// Replaces the working copy of the open candidate.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no candidate is open.
    pub fn edit_pending(&mut self, new_text: impl Into<String>) -> Result<()> {
        self.slot.edit(new_text)
    }

    // --- decision-side mutations ---

    /// Releases the open candidate as an assistant message.
    ///
    /// With `final_content` the given text is used verbatim; otherwise the
    /// candidate's current working copy is used. The released message gets a
    /// fresh id; candidate ids and message ids are independent.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no candidate is open. The log is untouched in
    /// that case.
    pub fn approve(&mut self, final_content: Option<String>) -> Result<Message> {
        let candidate = self
            .slot
            .current()
            .ok_or_else(|| ColloquyError::not_found("review candidate"))?;

        let content = final_content.unwrap_or_else(|| candidate.edited_content.clone());
        let message = Message::assistant(content);
        self.store.append(message.clone())?;
        self.slot.close();
        self.typing = false;
        Ok(message)
    }

    /// Discards the open candidate, leaving the log untouched.
    ///
    /// Idempotent: rejecting with an empty slot is a no-op, so a double
    /// click cannot fail.
    pub fn reject(&mut self) {
        self.slot.close();
        self.typing = false;
    }

    /// Resets the session: empties the log, drops any open candidate, and
    /// forgets the backend conversation identity.
    pub fn clear(&mut self) {
        self.store.clear();
        self.slot.close();
        self.typing = false;
        self.conversation_id = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageRole;

    #[test]
    fn test_fresh_session_is_idle() {
        let session = ConversationSession::new();
        assert_eq!(session.phase(), ConversationPhase::Idle);
        assert_eq!(session.message_count(), 0);
        assert_eq!(session.pending_count(), 0);
        assert!(session.conversation_id().is_none());
    }

    #[test]
    fn test_phase_follows_typing_and_slot() {
        let mut session = ConversationSession::new();
        let user = session.append_user_message("Hello").unwrap();

        session.set_typing(true);
        assert_eq!(session.phase(), ConversationPhase::AwaitingAi);

        session.open_review("Hi there", &user.id).unwrap();
        session.set_typing(false);
        assert_eq!(session.phase(), ConversationPhase::AwaitingReview);

        session.reject();
        assert_eq!(session.phase(), ConversationPhase::Idle);
    }

    #[test]
    fn test_approve_with_explicit_content() {
        let mut session = ConversationSession::new();
        let user = session.append_user_message("Hello").unwrap();
        let candidate = session.open_review("Hi there", &user.id).unwrap();

        let released = session.approve(Some("Hello from support".to_string())).unwrap();

        assert_eq!(released.role, MessageRole::Assistant);
        assert_eq!(released.content, "Hello from support");
        assert_ne!(released.id, candidate.id);
        assert!(session.pending_review().is_none());
        assert_eq!(session.message_count(), 2);
        assert_eq!(session.last_message().unwrap().content, "Hello from support");
    }

    #[test]
    fn test_approve_defaults_to_edited_content() {
        let mut session = ConversationSession::new();
        let user = session.append_user_message("Hello").unwrap();
        session.open_review("draft reply", &user.id).unwrap();
        session.edit_pending("polished reply").unwrap();

        let released = session.approve(None).unwrap();
        assert_eq!(released.content, "polished reply");
        assert_eq!(
            session.pending_review(),
            None,
            "slot must be empty after approval"
        );
    }

    #[test]
    fn test_approve_on_empty_slot_is_not_found_and_leaves_log_alone() {
        let mut session = ConversationSession::new();
        session.append_user_message("Hello").unwrap();

        let err = session.approve(None).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(session.message_count(), 1);
    }

    #[test]
    fn test_reject_twice_equals_reject_once() {
        let mut session = ConversationSession::new();
        let user = session.append_user_message("Hello").unwrap();
        session.open_review("draft", &user.id).unwrap();

        session.reject();
        let after_first = session.clone();
        session.reject();

        assert_eq!(session, after_first);
        assert_eq!(session.message_count(), 1);
    }

    #[test]
    fn test_adopt_conversation_id_only_once() {
        let mut session = ConversationSession::new();
        session.adopt_conversation_id("conv-1");
        session.adopt_conversation_id("conv-2");
        assert_eq!(session.conversation_id(), Some("conv-1"));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut session = ConversationSession::new();
        let user = session.append_user_message("Hello").unwrap();
        session.open_review("draft", &user.id).unwrap();
        session.adopt_conversation_id("conv-1");
        session.set_typing(true);

        session.clear();

        assert_eq!(session.message_count(), 0);
        assert!(session.pending_review().is_none());
        assert!(session.conversation_id().is_none());
        assert_eq!(session.phase(), ConversationPhase::Idle);
    }
}
