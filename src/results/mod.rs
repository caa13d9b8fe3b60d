//! Result types and container for search results
//!
//! Every provider normalizes its output into [`SearchResult`]; the
//! container deduplicates by URL while keeping arrival order.

mod container;
mod types;

pub use container::{dedupe_results, ResultContainer};
pub use types::*;
