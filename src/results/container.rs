//! Ordered result container with URL deduplication

use super::types::SearchResult;
use std::collections::HashSet;

/// Accumulates results in arrival order, keeping the first result seen for each URL
#[derive(Debug, Clone, Default)]
pub struct ResultContainer {
    results: Vec<SearchResult>,
    seen: HashSet<String>,
}

impl ResultContainer {
    /// Create a new empty result container
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a result. Returns false when it was dropped as blank or duplicate.
    pub fn add_result(&mut self, result: SearchResult) -> bool {
        let key = result.url.trim();
        if key.is_empty() || self.seen.contains(key) {
            return false;
        }
        self.seen.insert(key.to_string());
        self.results.push(result);
        true
    }

    /// Add multiple results
    pub fn extend_results(&mut self, results: impl IntoIterator<Item = SearchResult>) {
        for result in results {
            self.add_result(result);
        }
    }

    /// Get total result count
    pub fn result_count(&self) -> usize {
        self.results.len()
    }

    /// Consume the container, keeping at most `limit` results
    pub fn into_results(mut self, limit: usize) -> Vec<SearchResult> {
        self.results.truncate(limit);
        self.results
    }
}

/// Drop blank and repeated URLs, preserving first-seen order
pub fn dedupe_results(results: impl IntoIterator<Item = SearchResult>) -> Vec<SearchResult> {
    let mut container = ResultContainer::new();
    container.extend_results(results);
    container.results
}
