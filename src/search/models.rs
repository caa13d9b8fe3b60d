//! Search query model

use serde::{Deserialize, Serialize};

/// Hard ceiling on results per aggregated search
pub const MAX_RESULTS: usize = 10;

/// A normalized search request: trimmed text and a bounded result count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// The search query string, trimmed
    pub query: String,
    /// Requested result count, clamped to `1..=max`
    pub max_results: usize,
}

impl SearchQuery {
    /// Normalize raw input, clamping the result count to `[1, upper]`.
    /// `upper` itself is held within `[1, MAX_RESULTS]`.
    pub fn new(query: &str, max_results: usize, upper: usize) -> Self {
        Self {
            query: query.trim().to_string(),
            max_results: max_results.clamp(1, upper.clamp(1, MAX_RESULTS)),
        }
    }

    /// Check if query is empty
    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }
}
