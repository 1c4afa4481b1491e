//! Conversation and message records.
//!
//! Wire format: the collection is stored as one JSON array. Conversation
//! field names are camelCase and timestamps are ISO-8601 strings, matching
//! the blob format the web client writes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{ConversationId, MessageId};

/// Title given to a conversation before one is derived from its content.
pub const DEFAULT_TITLE: &str = "New Conversation";

/// Author of a message.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// End-user input.
    User,
    /// Model response.
    Assistant,
    /// Injected system content.
    System,
}

/// A single role-tagged utterance.
///
/// Immutable once created; owned by exactly one [`Conversation`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier.
    pub id: MessageId,
    /// Author role.
    pub role: Role,
    /// Message body.
    pub content: String,
    /// Creation instant.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message stamped with the current time.
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// An ordered, titled collection of messages.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    /// Unique identifier within the stored collection.
    pub id: ConversationId,
    /// Display title.
    pub title: String,
    /// Messages in insertion order. Append-only; insertion order is
    /// chronological order.
    pub messages: Vec<Message>,
    /// Creation instant; set once.
    pub created_at: DateTime<Utc>,
    /// Last mutation instant; never earlier than `created_at`.
    pub last_updated: DateTime<Utc>,
}

impl Conversation {
    /// Create an empty conversation titled [`DEFAULT_TITLE`].
    #[must_use]
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: ConversationId::new(),
            title: DEFAULT_TITLE.to_string(),
            messages: Vec::new(),
            created_at: now,
            last_updated: now,
        }
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}
