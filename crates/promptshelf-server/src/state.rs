//! Shared application state.

use crate::config::Config;
use promptshelf_core::{JsonFileStorage, PromptStore};
use tokio::sync::Mutex;

/// Shared application state.
///
/// The store sits behind one lock, so requests are applied one at a time and
/// each completes its durable write before the next begins.
pub struct AppState {
    pub store: Mutex<PromptStore>,
}

impl AppState {
    /// Open the store backed by the configured data file.
    pub fn new(config: &Config) -> promptshelf_core::Result<Self> {
        let storage = JsonFileStorage::new(&config.data_file);
        tracing::info!(target: "promptshelf::startup", "Using prompt data file {}", storage.path().display());
        Ok(Self::with_store(PromptStore::open(storage)?))
    }

    pub fn with_store(store: PromptStore) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }
}
