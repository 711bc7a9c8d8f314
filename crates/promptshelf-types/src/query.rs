//! Search query types.

use serde::{Deserialize, Serialize};

/// Criteria for filtering the prompt collection.
///
/// All three criteria are optional and combine with AND. The serde names
/// match the HTTP query parameters (`q`, `tag`, `tool`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Case-insensitive substring matched against text, tool and tags.
    #[serde(default, rename = "q", skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    /// Comma-separated tags; a prompt matches if it has any of them.
    #[serde(default, rename = "tag", skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    /// Exact, case-insensitive tool label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
}

impl SearchQuery {
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self {
            keyword: Some(keyword.into()),
            ..Self::default()
        }
    }

    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = Some(tool.into());
        self
    }
}
