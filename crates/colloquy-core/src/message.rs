//! Conversation message types.
//!
//! This module contains types for representing finalized messages in a
//! conversation, including roles, delivery status, and the message itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from the user.
    User,
    /// Message from the AI assistant, released by the supervisor.
    Assistant,
    /// System-generated message.
    System,
}

impl MessageRole {
    /// Human-readable label used in transcripts and the terminal UI.
    pub fn label(&self) -> &'static str {
        match self {
            MessageRole::User => "User",
            MessageRole::Assistant => "Assistant",
            MessageRole::System => "System",
        }
    }
}

/// Delivery status of a message.
///
/// Only `Sent` messages are ever persisted into the message store; the other
/// states describe transient review or error conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    /// Finalized and visible to both sides of the conversation.
    Sent,
    /// Produced but not yet released by the supervisor.
    Pending,
    /// Generation or delivery failed.
    Failed,
}

/// A single finalized message in a conversation history.
///
/// Messages are immutable once created: the store appends them and never
/// rewrites an entry. Ids are minted at creation and never reused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier (UUID format)
    pub id: String,
    /// The content of the message
    pub content: String,
    /// The role of the message sender
    pub role: MessageRole,
    /// Timestamp when the message was created
    pub timestamp: DateTime<Utc>,
    /// Delivery status
    pub status: MessageStatus,
}

impl Message {
    /// Creates a new sent message with a fresh id.
    pub fn new(content: impl Into<String>, role: MessageRole) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            role,
            timestamp: Utc::now(),
            status: MessageStatus::Sent,
        }
    }

    /// Creates a sent user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(content, MessageRole::User)
    }

    /// Creates a sent assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(content, MessageRole::Assistant)
    }

    /// Creates a sent system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(content, MessageRole::System)
    }
}
