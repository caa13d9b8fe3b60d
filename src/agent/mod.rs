//! Application drafting agent
//!
//! Collects evidence, has the language model pick the founder whose name
//! contains "pr", then asks for a draft in a fixed four-section format and
//! re-prompts a bounded number of times until the draft validates.

mod draft;
mod founder;
mod prompts;
mod runner;

pub use draft::{has_disallowed_phrases, is_valid_email_draft, EmailDraft};
pub use founder::{extract_first_json_object, founder_email, identify_target_founder, Founder};
pub use prompts::{ApplicantDetails, EXTRACTOR_PROMPT, SYSTEM_PROMPT};
pub use runner::{compose_prompt, Agent};

#[cfg(test)]
pub(crate) mod testing {
    use crate::error::{AgentError, Result};
    use crate::evidence::EvidenceSource;
    use crate::llm::LanguageModel;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Model replaying canned replies and recording its prompts
    pub struct ScriptedModel {
        replies: Mutex<VecDeque<Result<String>>>,
        prompts: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedModel {
        pub fn new<'a>(replies: impl IntoIterator<Item = &'a str>) -> Self {
            Self::from_results(replies.into_iter().map(|r| Ok(r.to_string())).collect())
        }

        pub fn failing(err: AgentError) -> Self {
            Self::from_results(VecDeque::from([Err(err)]))
        }

        fn from_results(replies: VecDeque<Result<String>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn prompts(&self) -> Vec<(String, String)> {
            self.prompts.lock().unwrap().clone()
        }

        pub fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        async fn generate(&self, system_prompt: &str, user_content: &str) -> Result<String> {
            self.prompts
                .lock()
                .unwrap()
                .push((system_prompt.to_string(), user_content.to_string()));
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(AgentError::InvalidResponse("script exhausted".into())))
        }
    }

    /// Evidence source returning a fixed document
    pub struct FixedEvidence(pub String);

    #[async_trait]
    impl EvidenceSource for FixedEvidence {
        async fn collect(&self) -> String {
            self.0.clone()
        }
    }
}
