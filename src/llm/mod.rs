//! Generative-language model access

mod gemini;

pub use gemini::GeminiClient;

use crate::error::Result;
use async_trait::async_trait;

/// A text-in, text-out language model
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate a completion for `user_content` under `system_prompt`
    async fn generate(&self, system_prompt: &str, user_content: &str) -> Result<String>;
}
