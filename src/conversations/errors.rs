//! Error types for the conversation store.

use thiserror::Error;

use super::ids::ConversationId;

/// Conversation store error type.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No conversation with the given id exists in the collection.
    #[error("conversation not found: {0}")]
    NotFound(ConversationId),
    /// The collection blob could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// The storage medium failed to read or write the slot.
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
