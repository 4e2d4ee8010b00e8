//! Append-only message log.

use serde::{Deserialize, Serialize};

use crate::error::{ColloquyError, Result};
use crate::message::{Message, MessageStatus};

/// An append-only, insertion-ordered log of finalized messages.
///
/// Entries are immutable once appended and are never reordered or removed
/// individually; the store as a whole can be cleared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageStore {
    messages: Vec<Message>,
}

impl MessageStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message to the end of the log.
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` if the message status is not `Sent`;
    /// pending and failed states never reach the log.
    pub fn append(&mut self, message: Message) -> Result<()> {
        if message.status != MessageStatus::Sent {
            return Err(ColloquyError::invariant(format!(
                "only sent messages may enter the log, got {:?}",
                message.status
            )));
        }
        self.messages.push(message);
        Ok(())
    }

    /// Returns a snapshot of all messages in insertion order.
    pub fn all(&self) -> Vec<Message> {
        self.messages.clone()
    }

    /// Returns the most recently appended message, if any.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Empties the store. Irreversible.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Number of messages in the log.
    pub fn count(&self) -> usize {
        self.messages.len()
    }

    /// True when the log holds no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
