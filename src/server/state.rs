//! Application state shared across all request handlers.

use std::sync::Arc;

use crate::compute::ComputeClient;
use crate::config::Settings;
use crate::conversations::ConversationStore;
use crate::conversations::backend::FileBackend;
use crate::conversations::errors::StoreResult;

/// Shared application state.
pub struct AppState {
    /// Conversation collection store.
    pub store: ConversationStore,
    /// Client for the code-execution backend.
    pub compute: ComputeClient,
}

impl AppState {
    /// Build state from validated settings.
    ///
    /// Opens the conversation slot under the configured data directory and
    /// wires the compute client with the configured endpoint and credential.
    ///
    /// # Errors
    /// Returns an error when the conversation slot cannot be read.
    pub async fn new(settings: &Settings) -> StoreResult<Arc<Self>> {
        let backend = Arc::new(FileBackend::new(&settings.data_dir));
        let store = ConversationStore::open(backend).await?;
        let compute = ComputeClient::new(
            settings.compute_url.clone(),
            settings.compute_api_key.clone(),
        );

        Ok(Arc::new(Self { store, compute }))
    }
}
