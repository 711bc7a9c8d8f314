//! The prompt record store.
//!
//! `PromptStore` owns the in-memory collection and mirrors it to a
//! [`PromptStorage`] backend after every mutation. Each mutation runs against
//! a staged copy of the state; the copy only replaces the live state once it
//! has been saved, so a failed write leaves memory and disk in agreement.

use crate::search;
use crate::storage::PromptStorage;
use crate::version::VersionClock;
use crate::{PromptShelfError, Result};
use chrono::Utc;
use promptshelf_types::{
    ExportedPrompt, HistoryEntry, ImportSummary, NewPrompt, PromptPatch, PromptRecord, SearchQuery,
};
use serde_json::Value;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default)]
struct StoreState {
    prompts: Vec<PromptRecord>,
    /// Next id to hand out. Only ever grows, so deleted ids aren't reused.
    next_id: u64,
    clock: VersionClock,
}

impl StoreState {
    fn from_prompts(prompts: Vec<PromptRecord>) -> Self {
        let next_id = prompts.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let mut clock = VersionClock::new();
        for entry in prompts.iter().flat_map(|p| &p.history) {
            clock.observe(&entry.version_id);
        }
        Self {
            prompts,
            next_id,
            clock,
        }
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Authoritative prompt collection with write-through persistence.
pub struct PromptStore {
    storage: Box<dyn PromptStorage>,
    state: StoreState,
}

impl PromptStore {
    /// Load the collection from `storage`.
    pub fn open(storage: impl PromptStorage + 'static) -> Result<Self> {
        Self::open_boxed(Box::new(storage))
    }

    pub fn open_boxed(storage: Box<dyn PromptStorage>) -> Result<Self> {
        let prompts = storage.load()?;
        info!(target: "promptshelf::store", "Opened prompt store with {} prompts", prompts.len());
        Ok(Self {
            storage,
            state: StoreState::from_prompts(prompts),
        })
    }

    /// Discard the in-memory state and load it again from storage.
    pub fn reload(&mut self) -> Result<()> {
        let prompts = self.storage.load()?;
        let mut state = StoreState::from_prompts(prompts);
        // Keep ids monotonic across reloads within this process.
        state.next_id = state.next_id.max(self.state.next_id);
        self.state = state;
        Ok(())
    }

    /// Write the current collection to storage.
    pub fn flush(&self) -> Result<()> {
        self.storage.save(&self.state.prompts)
    }

    /// Run `f` against a staged copy of the state and commit it once saved.
    fn transact<T>(&mut self, f: impl FnOnce(&mut StoreState) -> Result<T>) -> Result<T> {
        let mut staged = self.state.clone();
        let value = f(&mut staged)?;
        if let Err(e) = self.storage.save(&staged.prompts) {
            warn!(target: "promptshelf::store", "Persisting prompts failed, change rolled back: {}", e);
            return Err(e);
        }
        self.state = staged;
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.state.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.prompts.is_empty()
    }

    /// All prompts in stored order.
    pub fn list(&self) -> Vec<PromptRecord> {
        self.state.prompts.clone()
    }

    pub fn get(&self, id: u64) -> Result<PromptRecord> {
        find(&self.state.prompts, id).cloned()
    }

    /// Create a prompt with a fresh id.
    pub fn create(&mut self, new: NewPrompt) -> Result<PromptRecord> {
        validate_text(&new.text)?;

        let record = self.transact(|state| {
            let record = PromptRecord::new(
                state.allocate_id(),
                new.text,
                new.tool.unwrap_or_default(),
                new.tags.unwrap_or_default(),
                new.favorite.unwrap_or(false),
            );
            state.prompts.push(record.clone());
            Ok(record)
        })?;

        info!(target: "promptshelf::store", "Created prompt {}", record.id);
        Ok(record)
    }

    /// Apply a partial update, recording the previous content in history.
    pub fn update(&mut self, id: u64, patch: PromptPatch) -> Result<PromptRecord> {
        let record = self.transact(|state| {
            let record = find_mut(&mut state.prompts, id)?;
            if let Some(text) = &patch.text {
                validate_text(text)?;
            }
            record.push_history(state.clock.entry(record.snapshot()));
            record.apply(patch);
            Ok(record.clone())
        })?;

        debug!(
            target: "promptshelf::store",
            "Updated prompt {} ({} history entries)",
            id,
            record.history.len()
        );
        Ok(record)
    }

    /// Flip the favorite flag. Recorded in history like any other update.
    pub fn toggle_favorite(&mut self, id: u64) -> Result<PromptRecord> {
        let favorite = find(&self.state.prompts, id)?.favorite;
        self.update(id, PromptPatch::favorite(!favorite))
    }

    /// Remove a prompt permanently, returning it.
    pub fn delete(&mut self, id: u64) -> Result<PromptRecord> {
        let removed = self.transact(|state| {
            let index = state
                .prompts
                .iter()
                .position(|p| p.id == id)
                .ok_or(PromptShelfError::PromptNotFound(id))?;
            Ok(state.prompts.remove(index))
        })?;

        info!(target: "promptshelf::store", "Deleted prompt {}", id);
        Ok(removed)
    }

    /// History of a prompt, most recent first.
    pub fn history(&self, id: u64) -> Result<Vec<HistoryEntry>> {
        Ok(find(&self.state.prompts, id)?.history.clone())
    }

    /// Restore content from a history entry.
    ///
    /// The current content is snapshotted first, so a revert can itself be
    /// reverted. Favorite status and usage statistics are left unchanged.
    pub fn revert(&mut self, id: u64, version_id: &str) -> Result<PromptRecord> {
        let record = self.transact(|state| {
            let record = find_mut(&mut state.prompts, id)?;
            let target = record
                .version(version_id)
                .map(|entry| entry.prompt_data.clone())
                .ok_or_else(|| PromptShelfError::VersionNotFound {
                    id,
                    version_id: version_id.to_string(),
                })?;

            record.push_history(state.clock.entry(record.snapshot()));
            record.restore(&target);
            Ok(record.clone())
        })?;

        info!(target: "promptshelf::store", "Reverted prompt {} to version {}", id, version_id);
        Ok(record)
    }

    /// Count a use of the prompt. Does not touch history.
    pub fn log_usage(&mut self, id: u64) -> Result<PromptRecord> {
        let record = self.transact(|state| {
            let record = find_mut(&mut state.prompts, id)?;
            record.usage_count += 1;
            record.last_used = Some(Utc::now());
            Ok(record.clone())
        })?;

        debug!(target: "promptshelf::store", "Prompt {} used {} times", id, record.usage_count);
        Ok(record)
    }

    /// Prompts matching every criterion in `query`, in stored order.
    pub fn search(&self, query: &SearchQuery) -> Vec<PromptRecord> {
        search::search(&self.state.prompts, query)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Content-only copy of the collection.
    pub fn export(&self) -> Vec<ExportedPrompt> {
        self.state.prompts.iter().map(ExportedPrompt::from).collect()
    }

    /// Create prompts from a JSON array of `{text, tool?, tags?}` objects.
    ///
    /// Elements without usable text are skipped rather than failing the
    /// batch. Only a non-array payload is an error.
    pub fn import(&mut self, payload: &Value) -> Result<ImportSummary> {
        let items = payload.as_array().ok_or_else(|| {
            PromptShelfError::Format("import payload must be a JSON array".to_string())
        })?;

        let mut summary = ImportSummary::default();
        let mut accepted = Vec::new();
        for (index, item) in items.iter().enumerate() {
            match parse_import_item(item) {
                Some(new) => accepted.push(new),
                None => {
                    debug!(target: "promptshelf::store", "Skipping import item {}: missing or empty text", index);
                    summary.skipped_count += 1;
                }
            }
        }

        if accepted.is_empty() {
            return Ok(summary);
        }

        summary.imported_count = accepted.len();
        self.transact(|state| {
            for (text, tool, tags) in accepted {
                let id = state.allocate_id();
                state.prompts.push(PromptRecord::new(id, text, tool, tags, false));
            }
            Ok(())
        })?;

        info!(
            target: "promptshelf::store",
            "Imported {} prompts ({} skipped)",
            summary.imported_count,
            summary.skipped_count
        );
        Ok(summary)
    }
}

fn validate_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(PromptShelfError::Validation(
            "prompt text must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn find(prompts: &[PromptRecord], id: u64) -> Result<&PromptRecord> {
    prompts
        .iter()
        .find(|p| p.id == id)
        .ok_or(PromptShelfError::PromptNotFound(id))
}

fn find_mut(prompts: &mut [PromptRecord], id: u64) -> Result<&mut PromptRecord> {
    prompts
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or(PromptShelfError::PromptNotFound(id))
}

/// Extract `(text, tool, tags)` from one import element.
fn parse_import_item(item: &Value) -> Option<(String, String, Vec<String>)> {
    let text = item.get("text")?.as_str()?;
    if text.trim().is_empty() {
        return None;
    }
    let tool = item
        .get("tool")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let tags = item
        .get("tags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    Some((text.to_string(), tool, tags))
}
