//! Search provider module
//!
//! Defines the Engine trait and the ordered registry of provider adapters.

mod loader;
mod registry;
mod traits;

// Engine implementations
pub mod duckduckgo;
pub mod serper;
pub mod tavily;

pub use loader::EngineLoader;
pub use registry::EngineRegistry;
pub use traits::*;
