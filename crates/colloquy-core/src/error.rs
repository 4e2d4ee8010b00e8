//! Error types for the Colloquy application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Colloquy application.
///
/// Validation and backend failures are recoverable result values: the
/// pipelines return them to the caller without touching already-committed
/// state. `InvariantViolation` signals a caller-protocol bug and fails the
/// offending operation without corrupting the message log.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColloquyError {
    /// User input rejected before any mutation (empty, too long, denylisted)
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The AI backend did not answer within the configured timeout
    #[error("The AI backend timed out, please try again later")]
    BackendTimeout,

    /// The AI backend could not be reached or answered with an error status
    #[error("The AI backend is unavailable: {0}")]
    BackendUnavailable(String),

    /// Unexpected backend failure (malformed response, unclassified error)
    #[error("The AI backend failed unexpectedly: {0}")]
    BackendUnknown(String),

    /// Caller-protocol bug (double-open of the review slot, appending a
    /// non-sent message)
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Entity not found (approve or edit with no open candidate)
    #[error("No {entity_type} found")]
    NotFound { entity_type: String },
}

impl ColloquyError {
    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a BackendUnavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::BackendUnavailable(message.into())
    }

    /// Creates a BackendUnknown error
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::BackendUnknown(message.into())
    }

    /// Creates an InvariantViolation error
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
        }
    }

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is any of the backend failure kinds
    pub fn is_backend(&self) -> bool {
        matches!(
            self,
            Self::BackendTimeout | Self::BackendUnavailable(_) | Self::BackendUnknown(_)
        )
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an InvariantViolation error
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::InvariantViolation(_))
    }
}

/// Convenience Result type alias using ColloquyError
pub type Result<T> = std::result::Result<T, ColloquyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_predicate_covers_all_backend_kinds() {
        assert!(ColloquyError::BackendTimeout.is_backend());
        assert!(ColloquyError::unavailable("connection refused").is_backend());
        assert!(ColloquyError::unknown("bad payload").is_backend());
        assert!(!ColloquyError::validation("empty").is_backend());
    }

    #[test]
    fn test_display_messages_are_user_presentable() {
        let err = ColloquyError::validation("message is empty");
        assert_eq!(err.to_string(), "Invalid input: message is empty");

        let err = ColloquyError::not_found("review candidate");
        assert_eq!(err.to_string(), "No review candidate found");
    }
}
