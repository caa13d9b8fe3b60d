//! Job Agent: evidence-backed job application drafting
//!
//! Searches the web for a company's founders, fetches and excerpts the most
//! relevant pages, has a language model pick the recipient and draft the
//! email, and optionally sends it over SMTP.

pub mod agent;
pub mod config;
pub mod engines;
pub mod error;
pub mod evidence;
pub mod llm;
pub mod mail;
pub mod network;
pub mod results;
pub mod search;
pub mod web;

pub use agent::{Agent, ApplicantDetails};
pub use config::Settings;
pub use engines::Engine;
pub use error::AgentError;
pub use results::{ResultContainer, SearchResult};
pub use search::{Search, SearchQuery};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
