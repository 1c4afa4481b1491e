//! Conversation collection store.
//!
//! Owns the collection in memory behind a single-writer lock and treats the
//! storage backend purely as a durability sink: every confirmed mutation
//! serializes the full collection and replaces the slot payload. There is
//! no partial update and no indexing; every operation is O(n) over the
//! collection.
//!
//! Known limitation: writers in other processes sharing the same slot are
//! not coordinated. Each performs its own load and save, so the last
//! writer wins.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use super::backend::StorageBackend;
use super::errors::{StoreError, StoreResult};
use super::ids::ConversationId;
use super::title::derive_title;
use super::types::{Conversation, Message, Role};

/// CRUD-style access to the conversation collection.
pub struct ConversationStore {
    backend: Arc<dyn StorageBackend>,
    conversations: RwLock<Vec<Conversation>>,
}

impl ConversationStore {
    /// Open the store, loading the collection from the backend slot.
    ///
    /// An absent slot yields an empty collection. A corrupt payload is
    /// logged and treated as empty rather than fatal.
    ///
    /// # Errors
    /// Returns an error only when the medium itself cannot be read.
    pub async fn open(backend: Arc<dyn StorageBackend>) -> StoreResult<Self> {
        let conversations = match backend.load().await? {
            None => Vec::new(),
            Some(payload) => match serde_json::from_str(&payload) {
                Ok(parsed) => parsed,
                Err(err) => {
                    tracing::warn!("discarding corrupt conversation blob: {err}");
                    Vec::new()
                }
            },
        };

        Ok(Self {
            backend,
            conversations: RwLock::new(conversations),
        })
    }

    /// Create a new empty conversation and prepend it to the collection.
    ///
    /// # Errors
    /// Returns an error when the collection cannot be persisted.
    pub async fn create(&self) -> StoreResult<Conversation> {
        let conversation = Conversation::new();

        let mut conversations = self.conversations.write().await;
        conversations.insert(0, conversation.clone());
        self.persist(&conversations).await?;

        Ok(conversation)
    }

    /// Snapshot of the whole collection, most recently created first.
    pub async fn get_all(&self) -> Vec<Conversation> {
        self.conversations.read().await.clone()
    }

    /// Look up a single conversation by id.
    pub async fn get(&self, id: ConversationId) -> Option<Conversation> {
        self.conversations
            .read()
            .await
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }

    /// Append a message to a conversation and bump `last_updated`.
    ///
    /// When the appended message is the conversation's first and its role
    /// is [`Role::User`], the title is derived from its content.
    ///
    /// # Errors
    /// [`StoreError::NotFound`] when no conversation has the given id; the
    /// collection is left unchanged.
    pub async fn add_message(
        &self,
        id: ConversationId,
        message: Message,
    ) -> StoreResult<Conversation> {
        let mut conversations = self.conversations.write().await;
        let conversation = conversations
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::NotFound(id))?;

        if conversation.messages.is_empty() && message.role == Role::User {
            conversation.title = derive_title(&message.content);
        }
        conversation.messages.push(message);
        conversation.last_updated = Utc::now();

        let updated = conversation.clone();
        self.persist(&conversations).await?;
        Ok(updated)
    }

    /// Replace a conversation's title and bump `last_updated`.
    ///
    /// # Errors
    /// [`StoreError::NotFound`] when no conversation has the given id; the
    /// collection is left unchanged.
    pub async fn update_title(
        &self,
        id: ConversationId,
        title: &str,
    ) -> StoreResult<Conversation> {
        let mut conversations = self.conversations.write().await;
        let conversation = conversations
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::NotFound(id))?;

        conversation.title = title.to_string();
        conversation.last_updated = Utc::now();

        let updated = conversation.clone();
        self.persist(&conversations).await?;
        Ok(updated)
    }

    /// Remove a conversation from the collection.
    ///
    /// # Errors
    /// [`StoreError::NotFound`] when no conversation has the given id; the
    /// collection is left unchanged.
    pub async fn delete(&self, id: ConversationId) -> StoreResult<()> {
        let mut conversations = self.conversations.write().await;
        let before = conversations.len();
        conversations.retain(|c| c.id != id);
        if conversations.len() == before {
            return Err(StoreError::NotFound(id));
        }

        self.persist(&conversations).await
    }

    /// Serialize the full collection and replace the slot payload.
    async fn persist(&self, conversations: &[Conversation]) -> StoreResult<()> {
        let payload = serde_json::to_string(conversations)?;
        self.backend.save(&payload).await
    }
}
