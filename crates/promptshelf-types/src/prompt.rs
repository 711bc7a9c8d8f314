//! Prompt library types.
//!
//! Records, their version history, and the input/output shapes the store
//! accepts and returns. Field names serialize in camelCase to match the
//! persisted JSON document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of history entries retained per prompt.
pub const HISTORY_CAPACITY: usize = 10;

/// A saved prompt and its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRecord {
    /// Unique, immutable identifier.
    pub id: u64,
    /// Prompt body.
    pub text: String,
    /// Free-form tool label (e.g. "GPT-4"), may be empty.
    #[serde(default)]
    pub tool: String,
    /// Tags in insertion order.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub favorite: bool,
    /// Number of times the prompt was marked as used.
    #[serde(default)]
    pub usage_count: u64,
    /// When the prompt was last marked as used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,
    /// Prior versions, most recent first.
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl PromptRecord {
    /// Create a fresh record with no usage and no history.
    pub fn new(id: u64, text: String, tool: String, tags: Vec<String>, favorite: bool) -> Self {
        Self {
            id,
            text,
            tool,
            tags,
            favorite,
            usage_count: 0,
            last_used: None,
            history: Vec::new(),
        }
    }

    /// Copy the versioned content fields.
    pub fn snapshot(&self) -> PromptSnapshot {
        PromptSnapshot {
            text: self.text.clone(),
            tool: self.tool.clone(),
            tags: self.tags.clone(),
            favorite: self.favorite,
        }
    }

    /// Prepend a history entry, dropping the oldest beyond [`HISTORY_CAPACITY`].
    pub fn push_history(&mut self, entry: HistoryEntry) {
        self.history.insert(0, entry);
        self.history.truncate(HISTORY_CAPACITY);
    }

    /// Find a history entry by its version id.
    pub fn version(&self, version_id: &str) -> Option<&HistoryEntry> {
        self.history.iter().find(|e| e.version_id == version_id)
    }

    /// Apply the fields present in `patch`, leaving the rest untouched.
    pub fn apply(&mut self, patch: PromptPatch) {
        if let Some(text) = patch.text {
            self.text = text;
        }
        if let Some(tool) = patch.tool {
            self.tool = tool;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(favorite) = patch.favorite {
            self.favorite = favorite;
        }
    }

    /// Overwrite the content fields from a snapshot.
    ///
    /// `favorite` and usage statistics are not part of content versioning and
    /// are left as they are.
    pub fn restore(&mut self, snapshot: &PromptSnapshot) {
        self.text = snapshot.text.clone();
        self.tool = snapshot.tool.clone();
        self.tags = snapshot.tags.clone();
    }
}

/// A prior state of a prompt, captured immediately before a change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Key of this entry within its prompt's history.
    pub version_id: String,
    /// When the snapshot was taken.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// The content as it was before the change.
    pub prompt_data: PromptSnapshot,
}

/// The content fields of a prompt. Never carries history itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptSnapshot {
    pub text: String,
    #[serde(default)]
    pub tool: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub favorite: bool,
}

/// Input for creating a prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPrompt {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub tool: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub favorite: Option<bool>,
}

impl NewPrompt {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = Some(tool.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_favorite(mut self, favorite: bool) -> Self {
        self.favorite = Some(favorite);
        self
    }
}

/// A partial update. Absent fields keep their current values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,
}

impl PromptPatch {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn favorite(favorite: bool) -> Self {
        Self {
            favorite: Some(favorite),
            ..Self::default()
        }
    }
}

/// Portable, content-only form of a prompt used by export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedPrompt {
    pub text: String,
    pub tool: String,
    pub tags: Vec<String>,
}

impl From<&PromptRecord> for ExportedPrompt {
    fn from(record: &PromptRecord) -> Self {
        Self {
            text: record.text.clone(),
            tool: record.tool.clone(),
            tags: record.tags.clone(),
        }
    }
}

/// Outcome of a bulk import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    /// Records created.
    pub imported_count: usize,
    /// Input elements ignored for missing or blank text.
    pub skipped_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(version_id: &str, text: &str) -> HistoryEntry {
        HistoryEntry {
            version_id: version_id.to_string(),
            created_at: None,
            prompt_data: PromptSnapshot {
                text: text.to_string(),
                tool: String::new(),
                tags: Vec::new(),
                favorite: false,
            },
        }
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = PromptRecord::new(1, "Explain X".into(), "GPT-4".into(), vec!["edu".into()], false);
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["usageCount"], 0);
        assert!(value.get("lastUsed").is_none());
        assert_eq!(value["history"], serde_json::json!([]));
    }

    #[test]
    fn test_record_loads_with_missing_fields() {
        let record: PromptRecord =
            serde_json::from_str(r#"{"id": 4, "text": "old prompt"}"#).unwrap();

        assert_eq!(record.id, 4);
        assert_eq!(record.tool, "");
        assert!(record.tags.is_empty());
        assert!(!record.favorite);
        assert_eq!(record.usage_count, 0);
        assert!(record.history.is_empty());
    }

    #[test]
    fn test_push_history_enforces_capacity() {
        let mut record = PromptRecord::new(1, "t".into(), String::new(), Vec::new(), false);
        for i in 0..12 {
            record.push_history(entry(&format!("v{}", i), &format!("text {}", i)));
        }

        assert_eq!(record.history.len(), HISTORY_CAPACITY);
        assert_eq!(record.history[0].version_id, "v11");
        assert_eq!(record.history[9].version_id, "v2");
        assert!(record.version("v1").is_none());
    }

    #[test]
    fn test_apply_patch_merges() {
        let mut record = PromptRecord::new(1, "a".into(), "GPT-4".into(), vec!["x".into()], false);
        record.apply(PromptPatch {
            tags: Some(vec!["y".into(), "z".into()]),
            ..PromptPatch::default()
        });

        assert_eq!(record.text, "a");
        assert_eq!(record.tool, "GPT-4");
        assert_eq!(record.tags, vec!["y", "z"]);
    }

    #[test]
    fn test_restore_keeps_favorite() {
        let mut record = PromptRecord::new(1, "new".into(), "Claude".into(), Vec::new(), true);
        let snapshot = PromptSnapshot {
            text: "old".into(),
            tool: "GPT-4".into(),
            tags: vec!["t".into()],
            favorite: false,
        };
        record.restore(&snapshot);

        assert_eq!(record.text, "old");
        assert_eq!(record.tool, "GPT-4");
        assert!(record.favorite);
    }

    #[test]
    fn test_exported_prompt_has_content_only() {
        let mut record = PromptRecord::new(3, "a".into(), "b".into(), vec!["c".into()], true);
        record.usage_count = 5;
        let value = serde_json::to_value(ExportedPrompt::from(&record)).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();

        assert_eq!(keys.len(), 3);
        for key in ["id", "favorite", "history", "usageCount", "lastUsed"] {
            assert!(value.get(key).is_none(), "unexpected key {}", key);
        }
    }

    #[test]
    fn test_patch_deserializes_partial_json() {
        let patch: PromptPatch = serde_json::from_str(r#"{"favorite": true}"#).unwrap();
        assert_eq!(patch, PromptPatch::favorite(true));
        assert!(patch.text.is_none() && patch.tags.is_none());
    }
}
