//! Keyword, tag and tool filtering over the prompt collection.
//!
//! Matching rules:
//! - keyword: case-insensitive substring of the text, the tool, or any tag
//! - tags: the filter is a comma-separated list; a prompt matches when any of
//!   its tags equals any listed tag, ignoring case
//! - tool: case-insensitive equality with the prompt's tool
//!
//! Empty criteria always match. Results keep collection order.

use promptshelf_types::{PromptRecord, SearchQuery};

/// Split a comma-separated tag filter into trimmed, non-empty tags.
pub fn parse_tag_filter(filter: &str) -> Vec<String> {
    filter
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Filter `records` by all criteria in `query`.
pub fn search<'a>(records: &'a [PromptRecord], query: &SearchQuery) -> Vec<&'a PromptRecord> {
    let matcher = Matcher::new(query);
    records.iter().filter(|r| matcher.matches(r)).collect()
}

/// A query with its criteria normalised once up front.
struct Matcher {
    keyword: String,
    tags: Vec<String>,
    tool: String,
}

impl Matcher {
    fn new(query: &SearchQuery) -> Self {
        let keyword = query.keyword.as_deref().unwrap_or_default().to_lowercase();
        let tags = query
            .tags
            .as_deref()
            .map(parse_tag_filter)
            .unwrap_or_default()
            .into_iter()
            .map(|t| t.to_lowercase())
            .collect();
        let tool = query.tool.as_deref().unwrap_or_default().trim().to_lowercase();

        Self { keyword, tags, tool }
    }

    fn matches(&self, record: &PromptRecord) -> bool {
        self.keyword_matches(record) && self.tags_match(record) && self.tool_matches(record)
    }

    fn keyword_matches(&self, record: &PromptRecord) -> bool {
        if self.keyword.is_empty() {
            return true;
        }
        record.text.to_lowercase().contains(&self.keyword)
            || record.tool.to_lowercase().contains(&self.keyword)
            || record
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&self.keyword))
    }

    fn tags_match(&self, record: &PromptRecord) -> bool {
        if self.tags.is_empty() {
            return true;
        }
        record
            .tags
            .iter()
            .any(|tag| self.tags.contains(&tag.to_lowercase()))
    }

    fn tool_matches(&self, record: &PromptRecord) -> bool {
        self.tool.is_empty() || record.tool.to_lowercase() == self.tool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, text: &str, tool: &str, tags: &[&str]) -> PromptRecord {
        PromptRecord::new(
            id,
            text.to_string(),
            tool.to_string(),
            tags.iter().map(|t| t.to_string()).collect(),
            false,
        )
    }

    fn collection() -> Vec<PromptRecord> {
        vec![
            record(1, "Explain closures", "GPT-4", &["js", "react"]),
            record(2, "Draw a lighthouse", "Midjourney", &["art"]),
            record(3, "Refactor this module", "gpt-4-turbo", &["python", "Refactoring"]),
        ]
    }

    fn ids(results: &[&PromptRecord]) -> Vec<u64> {
        results.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_empty_query_returns_everything() {
        let records = collection();
        assert_eq!(ids(&search(&records, &SearchQuery::default())), vec![1, 2, 3]);

        let blank = SearchQuery::keyword("").with_tags(" , ").with_tool("  ");
        assert_eq!(ids(&search(&records, &blank)), vec![1, 2, 3]);
    }

    #[test]
    fn test_keyword_matches_text_tool_and_tags() {
        let records = collection();

        assert_eq!(ids(&search(&records, &SearchQuery::keyword("EXPLAIN"))), vec![1]);
        assert_eq!(ids(&search(&records, &SearchQuery::keyword("journey"))), vec![2]);
        assert_eq!(ids(&search(&records, &SearchQuery::keyword("factor"))), vec![3]);
        assert_eq!(ids(&search(&records, &SearchQuery::keyword("gpt-4"))), vec![1, 3]);
        assert!(search(&records, &SearchQuery::keyword("nothing")).is_empty());
    }

    #[test]
    fn test_tag_filter_is_any_of() {
        let records = collection();
        let query = SearchQuery::default().with_tags("react,python");

        assert_eq!(ids(&search(&records, &query)), vec![1, 3]);
    }

    #[test]
    fn test_tag_filter_is_exact_and_case_insensitive() {
        let records = collection();

        let query = SearchQuery::default().with_tags(" REFACTORING ");
        assert_eq!(ids(&search(&records, &query)), vec![3]);

        let partial = SearchQuery::default().with_tags("reac");
        assert!(search(&records, &partial).is_empty());
    }

    #[test]
    fn test_tool_filter_is_equality_not_substring() {
        let records = collection();

        let query = SearchQuery::default().with_tool("gpt-4");
        assert_eq!(ids(&search(&records, &query)), vec![1]);
    }

    #[test]
    fn test_criteria_combine_with_and() {
        let records = collection();
        let query = SearchQuery::keyword("e").with_tags("js,art").with_tool("midjourney");

        assert_eq!(ids(&search(&records, &query)), vec![2]);
    }

    #[test]
    fn test_parse_tag_filter() {
        assert_eq!(parse_tag_filter("tag1,tag2, tag3 "), vec!["tag1", "tag2", "tag3"]);
        assert!(parse_tag_filter(" , ,").is_empty());
    }
}
