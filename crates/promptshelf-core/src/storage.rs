//! Durable storage for the prompt collection.
//!
//! The whole collection is written as one JSON array on every mutation.

use crate::{PromptShelfError, Result};
use promptshelf_types::PromptRecord;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Backend that loads and saves the full prompt collection.
pub trait PromptStorage: Send {
    /// Load the persisted collection. Missing storage yields an empty one.
    fn load(&self) -> Result<Vec<PromptRecord>>;

    /// Replace the persisted collection with `prompts`.
    fn save(&self, prompts: &[PromptRecord]) -> Result<()>;
}

/// Stores the collection as a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("prompts.json");
        self.path.with_file_name(format!(".{}.tmp", file_name))
    }

    fn io_error(&self, source: std::io::Error) -> PromptShelfError {
        PromptShelfError::PersistenceIo {
            path: self.path.clone(),
            source,
        }
    }
}

impl PromptStorage for JsonFileStorage {
    fn load(&self) -> Result<Vec<PromptRecord>> {
        if !self.path.exists() {
            debug!(target: "promptshelf::storage", "No data file at {}, starting empty", self.path.display());
            return Ok(Vec::new());
        }

        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) => {
                warn!(target: "promptshelf::storage", "Failed to read {}: {}, starting empty", self.path.display(), e);
                return Ok(Vec::new());
            }
        };

        match serde_json::from_str::<Vec<PromptRecord>>(&content) {
            Ok(prompts) => {
                debug!(target: "promptshelf::storage", "Loaded {} prompts from {}", prompts.len(), self.path.display());
                Ok(prompts)
            }
            Err(e) => {
                warn!(target: "promptshelf::storage", "Failed to parse {}: {}, starting empty", self.path.display(), e);
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, prompts: &[PromptRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let json = serde_json::to_string_pretty(prompts)?;
        let tmp_path = self.temp_path();
        std::fs::write(&tmp_path, json).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp_path, &self.path).map_err(|e| self.io_error(e))?;

        debug!(target: "promptshelf::storage", "Saved {} prompts to {}", prompts.len(), self.path.display());
        Ok(())
    }
}

/// In-memory backend. Clones share the same contents, which lets a caller
/// inspect what was saved or make subsequent writes fail.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    prompts: Arc<Mutex<Vec<PromptRecord>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prompts(prompts: Vec<PromptRecord>) -> Self {
        Self {
            prompts: Arc::new(Mutex::new(prompts)),
            fail_writes: Arc::default(),
        }
    }

    /// Make every following `save` fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// The most recently saved collection.
    pub fn saved(&self) -> Vec<PromptRecord> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl PromptStorage for MemoryStorage {
    fn load(&self) -> Result<Vec<PromptRecord>> {
        let prompts = self
            .prompts
            .lock()
            .map_err(|_| PromptShelfError::Persistence("memory storage lock poisoned".into()))?;
        Ok(prompts.clone())
    }

    fn save(&self, prompts: &[PromptRecord]) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PromptShelfError::Persistence("write rejected".into()));
        }
        let mut stored = self
            .prompts
            .lock()
            .map_err(|_| PromptShelfError::Persistence("memory storage lock poisoned".into()))?;
        *stored = prompts.to_vec();
        Ok(())
    }
}
