//! Evidence assembly for fact extraction
//!
//! Runs the configured queries through the search aggregator, adds seed
//! URLs, ranks everything by domain priority, fetches the top pages and
//! concatenates result blocks and page excerpts into one text document.

mod collector;
mod excerpt;
mod ranking;

pub use collector::{format_query_block, EvidenceCollector, EvidenceSource};
pub use excerpt::ExcerptExtractor;
pub use ranking::DomainRanker;
