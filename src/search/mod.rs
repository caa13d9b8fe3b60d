//! Search aggregation module
//!
//! Fans a query out to every provider in priority order, merges the
//! results, deduplicates by URL and truncates to the requested count.

mod executor;
mod models;

pub use executor::Search;
pub use models::*;
