//! Founder identification from collected evidence

use super::prompts::{extraction_input, EXTRACTOR_PROMPT};
use crate::error::{AgentError, Result};
use crate::llm::LanguageModel;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{info, warn};

static JSON_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("Invalid JSON object regex"));

/// The founder selected as recipient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Founder {
    pub name: String,
    /// Page the model cited for the name, possibly empty
    pub source_url: String,
}

/// Parse the span from the first `{` to the last `}` as a JSON object
pub fn extract_first_json_object(text: &str) -> Option<Map<String, Value>> {
    let span = JSON_OBJECT.find(text)?;
    match serde_json::from_str::<Value>(span.as_str()) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn field(object: &Map<String, Value>, key: &str) -> String {
    match object.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string(),
    }
}

/// Whether a name contains "pr", case-insensitively
pub fn matches_target(name: &str) -> bool {
    name.to_lowercase().contains("pr")
}

/// Ask the model for the founders and keep the first acceptable target
pub async fn identify_target_founder(
    model: &dyn LanguageModel,
    evidence: &str,
    attempts: u32,
) -> Result<Founder> {
    let input = extraction_input(evidence);

    for attempt in 1..=attempts {
        info!("identify_target_founder attempt={}", attempt);
        let raw = model.generate(EXTRACTOR_PROMPT, &input).await?;

        let Some(parsed) = extract_first_json_object(&raw) else {
            warn!("identify_target_founder invalid_json attempt={}", attempt);
            continue;
        };

        let target = field(&parsed, "target_founder");
        if !target.is_empty() && matches_target(&target) {
            let source_url = field(&parsed, "target_source_url");
            info!(
                "identify_target_founder success target={:?} source={:?}",
                target, source_url
            );
            return Ok(Founder {
                name: target,
                source_url,
            });
        }
        warn!(
            "identify_target_founder no_valid_target attempt={} target={:?}",
            attempt, target
        );
    }

    Err(AgentError::FounderNotFound)
}

/// `<first name, lowercased>@<domain>`
pub fn founder_email(name: &str, domain: &str) -> String {
    let first = name.split_whitespace().next().unwrap_or_default();
    format!("{}@{}", first.to_lowercase(), domain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::testing::ScriptedModel;

    #[test]
    fn test_extract_first_json_object() {
        let text = "Sure! ```json\n{\"target_founder\": \"Pranav\", \"nested\": {\"a\": 1}}\n```";
        let parsed = extract_first_json_object(text).unwrap();
        assert_eq!(parsed["target_founder"], "Pranav");

        assert!(extract_first_json_object("no braces here").is_none());
        assert!(extract_first_json_object("{not json}").is_none());
        // Two objects make the greedy span invalid
        assert!(extract_first_json_object("{\"a\": 1} and {\"b\": 2}").is_none());
    }

    #[test]
    fn test_founder_email() {
        assert_eq!(founder_email("Pranav Raj", "unravel.tech"), "pranav@unravel.tech");
        assert_eq!(founder_email("  PRIYA  ", "unravel.tech"), "priya@unravel.tech");
    }

    #[test]
    fn test_matches_target() {
        assert!(matches_target("Pranav"));
        assert!(matches_target("Kapri"));
        assert!(!matches_target("Alice Smith"));
    }

    #[tokio::test]
    async fn test_first_acceptable_attempt_wins() {
        let model = ScriptedModel::new([
            "I could not find it",
            r#"{"target_founder": "Alice Smith", "target_source_url": "https://a"}"#,
            r#"Here: {"founders": [], "target_founder": " Pranav Raj ", "target_source_url": "https://unravel.tech/about", "confidence": "high"}"#,
        ]);

        let founder = identify_target_founder(&model, "evidence", 3).await.unwrap();
        assert_eq!(
            founder,
            Founder {
                name: "Pranav Raj".to_string(),
                source_url: "https://unravel.tech/about".to_string(),
            }
        );
        assert_eq!(model.calls(), 3);
        let prompts = model.prompts();
        assert_eq!(prompts[0].0, EXTRACTOR_PROMPT);
        assert!(prompts[0].1.starts_with("Evidence:\nevidence"));
    }

    #[tokio::test]
    async fn test_gives_up_after_attempts() {
        let model = ScriptedModel::new([
            r#"{"target_founder": ""}"#,
            r#"{"target_founder": null}"#,
            r#"{"target_founder": "Pranav"}"#,
        ]);

        let err = identify_target_founder(&model, "evidence", 2).await.unwrap_err();
        assert!(matches!(err, AgentError::FounderNotFound));
        assert_eq!(model.calls(), 2);
    }

    #[tokio::test]
    async fn test_model_errors_propagate() {
        let model = ScriptedModel::failing(AgentError::MissingCredential("GEMINI_API_KEY"));
        let err = identify_target_founder(&model, "evidence", 3).await.unwrap_err();
        assert!(matches!(err, AgentError::MissingCredential("GEMINI_API_KEY")));
        assert_eq!(model.calls(), 1);
    }
}
