//! Result type definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Backend a result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Serper,
    Tavily,
    Ddg,
    /// Fixed URL injected by the evidence collector
    Seed,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Serper => "serper",
            Self::Tavily => "tavily",
            Self::Ddg => "ddg",
            Self::Seed => "seed",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single normalized search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The title of the result
    pub title: String,
    /// The URL of the result, unique within a deduplicated list
    pub url: String,
    /// Content snippet, empty when the backend gave none
    pub snippet: String,
    /// Backend that returned this result
    pub provider: Provider,
}

impl SearchResult {
    /// Create a new result
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
        provider: Provider,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
            provider,
        }
    }

    /// Pseudo-result for a fixed URL, with no snippet
    pub fn seed(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(title, url, "", Provider::Seed)
    }

    /// Lowercased host of the URL, if it parses
    pub fn hostname(&self) -> Option<String> {
        Url::parse(self.url.trim())
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
    }
}
