//! Evidence-to-draft pipeline with bounded re-prompting

use super::draft::{has_disallowed_phrases, is_valid_email_draft};
use super::founder::{founder_email, identify_target_founder, Founder};
use super::prompts::{ApplicantDetails, CONTENT_REMINDER, FORMAT_REMINDER, SYSTEM_PROMPT};
use crate::config::AgentSettings;
use crate::error::{AgentError, Result};
use crate::evidence::EvidenceSource;
use crate::llm::LanguageModel;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Drafts application emails from collected evidence
pub struct Agent {
    evidence: Arc<dyn EvidenceSource>,
    model: Arc<dyn LanguageModel>,
    settings: AgentSettings,
}

impl Agent {
    pub fn new(
        evidence: Arc<dyn EvidenceSource>,
        model: Arc<dyn LanguageModel>,
        settings: AgentSettings,
    ) -> Self {
        Self {
            evidence,
            model,
            settings,
        }
    }

    fn attempts(&self) -> u32 {
        self.settings.max_attempts.max(1)
    }

    /// Produce a validated draft for the applicant
    pub async fn run(&self, details: &ApplicantDetails) -> Result<String> {
        self.run_prompt(&details.render()).await
    }

    /// Produce a validated draft for an already rendered user prompt
    pub async fn run_prompt(&self, user_prompt: &str) -> Result<String> {
        let start = Instant::now();
        info!("run_agent start attempts={}", self.attempts());

        let evidence = self.evidence.collect().await;
        let founder = identify_target_founder(self.model.as_ref(), &evidence, self.attempts()).await?;
        let email = founder_email(&founder.name, &self.settings.email_domain);
        info!(
            "run_agent founder_selected name={:?} email={:?}",
            founder.name, email
        );

        let prompt = compose_prompt(user_prompt, &founder, &email, &evidence);
        let mut corrections = String::new();

        for attempt in 1..=self.attempts() {
            info!("run_agent model_attempt={}", attempt);
            let content = self
                .model
                .generate(SYSTEM_PROMPT, &format!("{}{}", prompt, corrections))
                .await?;

            if !is_valid_email_draft(&content) {
                warn!(
                    "run_agent rejected_response reason=invalid_format attempt={}",
                    attempt
                );
                corrections.push_str(FORMAT_REMINDER);
                continue;
            }
            if has_disallowed_phrases(&content) {
                warn!(
                    "run_agent rejected_response reason=disallowed_phrases attempt={}",
                    attempt
                );
                corrections.push_str(CONTENT_REMINDER);
                continue;
            }

            info!(
                "run_agent success attempt={} duration_ms={}",
                attempt,
                start.elapsed().as_millis()
            );
            return Ok(content);
        }

        Err(AgentError::InvalidDraft {
            attempts: self.attempts(),
        })
    }
}

/// User content for the drafting call
pub fn compose_prompt(user_prompt: &str, founder: &Founder, email: &str, evidence: &str) -> String {
    format!(
        "{}\n\n\
         Selected founder: {}\n\
         Required recipient email: {}\n\
         Source URL for selected founder: {}\n\n\
         Evidence (for verification only):\n\
         {}\n\n\
         Now produce the final answer in the required format. \
         Do not change the recipient email.",
        user_prompt, founder.name, email, founder.source_url, evidence
    )
}
