//! The review slot: at most one AI-generated candidate awaiting a decision.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ColloquyError, Result};

/// An AI-generated reply held for supervisor review.
///
/// The candidate keeps the backend's unedited output alongside a working
/// copy the supervisor may rewrite. Its id is independent of the id of the
/// message an approval will eventually produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewCandidate {
    /// Candidate identifier (UUID format)
    pub id: String,
    /// The backend's unedited output, immutable
    pub original_content: String,
    /// Supervisor-mutable working copy, starts equal to the original
    pub edited_content: String,
    /// Timestamp when the candidate was created
    pub timestamp: DateTime<Utc>,
    /// Id of the user message that triggered this candidate
    pub source_message_id: String,
}

impl ReviewCandidate {
    /// Creates a candidate from freshly generated backend output.
    pub fn new(content: impl Into<String>, source_message_id: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            id: Uuid::new_v4().to_string(),
            original_content: content.clone(),
            edited_content: content,
            timestamp: Utc::now(),
            source_message_id: source_message_id.into(),
        }
    }

    /// True when the supervisor has changed the working copy.
    pub fn is_edited(&self) -> bool {
        self.edited_content != self.original_content
    }
}

/// Holds at most one outstanding [`ReviewCandidate`].
///
/// The generation pipeline opens the slot, the decision pipeline drains it.
/// Opening an already-occupied slot is a caller-protocol bug; closing an
/// empty slot is not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewSlot {
    candidate: Option<ReviewCandidate>,
}

impl ReviewSlot {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a candidate into the slot.
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` if a candidate is already open.
    pub fn open(&mut self, candidate: ReviewCandidate) -> Result<()> {
        if self.candidate.is_some() {
            return Err(ColloquyError::invariant(
                "a review candidate is already open",
            ));
        }
        self.candidate = Some(candidate);
        Ok(())
    }

    /// Replaces the working copy of the open candidate.
    ///
    /// The original content is never touched.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no candidate is open.
    pub fn edit(&mut self, new_text: impl Into<String>) -> Result<()> {
        match self.candidate.as_mut() {
            Some(candidate) => {
                candidate.edited_content = new_text.into();
                Ok(())
            }
            None => Err(ColloquyError::not_found("review candidate")),
        }
    }

    /// Returns the open candidate, if any.
    pub fn current(&self) -> Option<&ReviewCandidate> {
        self.candidate.as_ref()
    }

    /// Clears the slot and returns the prior candidate.
    ///
    /// Idempotent on an empty slot: returns `None` without error.
    pub fn close(&mut self) -> Option<ReviewCandidate> {
        self.candidate.take()
    }

    /// True when a candidate is awaiting a decision.
    pub fn is_open(&self) -> bool {
        self.candidate.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_starts_with_matching_copies() {
        let candidate = ReviewCandidate::new("Hi there", "msg-1");
        assert_eq!(candidate.original_content, "Hi there");
        assert_eq!(candidate.edited_content, "Hi there");
        assert!(!candidate.is_edited());
        assert_eq!(candidate.source_message_id, "msg-1");
    }

    #[test]
    fn test_double_open_is_an_invariant_violation() {
        let mut slot = ReviewSlot::new();
        slot.open(ReviewCandidate::new("first", "msg-1")).unwrap();

        let err = slot
            .open(ReviewCandidate::new("second", "msg-2"))
            .unwrap_err();
        assert!(err.is_invariant_violation());
        assert_eq!(slot.current().unwrap().original_content, "first");
    }

    #[test]
    fn test_edit_touches_only_the_working_copy() {
        let mut slot = ReviewSlot::new();
        slot.open(ReviewCandidate::new("draft", "msg-1")).unwrap();
        slot.edit("polished").unwrap();

        let candidate = slot.current().unwrap();
        assert_eq!(candidate.original_content, "draft");
        assert_eq!(candidate.edited_content, "polished");
        assert!(candidate.is_edited());
    }

    #[test]
    fn test_edit_without_candidate_is_not_found() {
        let mut slot = ReviewSlot::new();
        let err = slot.edit("anything").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_close_is_idempotent_on_empty_slot() {
        let mut slot = ReviewSlot::new();
        slot.open(ReviewCandidate::new("draft", "msg-1")).unwrap();

        let closed = slot.close();
        assert_eq!(closed.unwrap().original_content, "draft");
        assert!(slot.close().is_none());
        assert!(!slot.is_open());
    }

    #[test]
    fn test_slot_reopens_after_close() {
        let mut slot = ReviewSlot::new();
        slot.open(ReviewCandidate::new("first", "msg-1")).unwrap();
        slot.close();
        slot.open(ReviewCandidate::new("second", "msg-2")).unwrap();
        assert_eq!(slot.current().unwrap().original_content, "second");
    }
}
