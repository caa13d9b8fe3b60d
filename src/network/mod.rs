//! HTTP networking module
//!
//! Provides the shared HTTP client used by search providers and the page
//! fetcher that turns target pages into plain text.

mod client;
mod fetcher;
mod html;
mod user_agent;

pub use client::HttpClient;
pub use fetcher::{PageFetcher, PageSource, DEFAULT_MAX_PAGE_CHARS};
pub use html::{collapse_whitespace, html_to_text, truncate_chars};
pub use user_agent::{accept_json, generate_user_agent};
