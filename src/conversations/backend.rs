//! Storage media for the serialized conversation collection.
//!
//! The entire collection lives under one fixed slot; a backend only knows
//! how to load and replace that slot's payload. Interpretation of the
//! payload belongs to the store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::errors::StoreResult;

/// File name of the persistent slot inside the data directory.
pub const STORAGE_FILE: &str = "conversations.json";

/// A key/value slot holding the serialized conversation collection.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Read the slot payload. `None` when the slot has never been written.
    ///
    /// # Errors
    /// Returns an error when the medium cannot be read at all; an absent
    /// slot is not an error.
    async fn load(&self) -> StoreResult<Option<String>>;

    /// Replace the slot payload.
    ///
    /// # Errors
    /// Returns an error when the medium rejects the write.
    async fn save(&self, payload: &str) -> StoreResult<()>;
}

/// Backend persisting the slot as one JSON file on disk.
///
/// Writes land in a temporary sibling first and are renamed into place, so
/// a crash mid-write never leaves a truncated blob behind.
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Create a backend rooted at `data_dir`; the slot file is
    /// [`STORAGE_FILE`] inside it.
    #[must_use]
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(STORAGE_FILE),
        }
    }

    /// Path of the slot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StorageBackend for FileBackend {
    async fn load(&self) -> StoreResult<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(payload) => Ok(Some(payload)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn save(&self, payload: &str) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, payload).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

/// In-process backend for tests and ephemeral setups.
#[derive(Default)]
pub struct MemoryBackend {
    slot: Mutex<Option<String>>,
}

impl MemoryBackend {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot pre-filled with `payload`.
    #[must_use]
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(payload.into())),
        }
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn load(&self) -> StoreResult<Option<String>> {
        Ok(self.slot.lock().await.clone())
    }

    async fn save(&self, payload: &str) -> StoreResult<()> {
        *self.slot.lock().await = Some(payload.to_string());
        Ok(())
    }
}
