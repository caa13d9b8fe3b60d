//! Keyword-centered excerpt extraction

use crate::config::EvidenceSettings;

/// Cuts a window of page text around the first matching keyword.
///
/// Keywords are tried in configured order and matched case-insensitively.
/// All offsets count characters, not bytes.
#[derive(Debug, Clone)]
pub struct ExcerptExtractor {
    keywords: Vec<Vec<char>>,
    before: usize,
    after: usize,
    fallback: usize,
}

impl ExcerptExtractor {
    pub fn new(keywords: &[String], before: usize, after: usize, fallback: usize) -> Self {
        Self {
            keywords: keywords
                .iter()
                .map(|k| k.chars().map(fold_case).collect::<Vec<_>>())
                .filter(|k| !k.is_empty())
                .collect(),
            before,
            after,
            fallback,
        }
    }

    pub fn from_settings(settings: &EvidenceSettings) -> Self {
        Self::new(
            &settings.keywords,
            settings.excerpt_before,
            settings.excerpt_after,
            settings.fallback_excerpt,
        )
    }

    /// Window `[match - before, match + after)` clipped to the text, or the
    /// leading `fallback` characters when no keyword occurs.
    pub fn extract(&self, text: &str) -> String {
        let chars: Vec<char> = text.chars().collect();
        let folded: Vec<char> = chars.iter().copied().map(fold_case).collect();

        for keyword in &self.keywords {
            if let Some(idx) = find(&folded, keyword) {
                let start = idx.saturating_sub(self.before);
                let end = idx.saturating_add(self.after).min(chars.len());
                return chars[start..end].iter().collect();
            }
        }

        chars.iter().take(self.fallback).collect()
    }
}

impl Default for ExcerptExtractor {
    fn default() -> Self {
        Self::from_settings(&EvidenceSettings::default())
    }
}

/// Single-character lowercase so folded text keeps the original indices
fn fold_case(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn find(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
