//! Gemini `generateContent` client

use super::LanguageModel;
use crate::config::{timeout_duration, LlmSettings};
use crate::engines::EngineRequest;
use crate::error::{AgentError, Result};
use crate::network::{accept_json, HttpClient};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tracing::info;

/// Client for the Gemini generative-language API
#[derive(Clone)]
pub struct GeminiClient {
    client: HttpClient,
    settings: LlmSettings,
    timeout: Duration,
}

impl GeminiClient {
    /// Fails when `settings.timeout` is not a positive number of seconds
    pub fn new(client: HttpClient, settings: LlmSettings) -> anyhow::Result<Self> {
        let timeout = timeout_duration("llm.timeout", settings.timeout)?;
        Ok(Self {
            client,
            settings,
            timeout,
        })
    }

    /// Model identifier in use
    pub fn model(&self) -> &str {
        &self.settings.model
    }

    fn api_key(&self) -> Result<&str> {
        self.settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(AgentError::MissingCredential("GEMINI_API_KEY"))
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model
        )
    }

    fn request_body(&self, system_prompt: &str, user_content: &str) -> Value {
        json!({
            "system_instruction": {"parts": [{"text": system_prompt}]},
            "contents": [{"role": "user", "parts": [{"text": user_content}]}],
            "generationConfig": {"temperature": self.settings.temperature},
        })
    }
}

/// Join the text parts of the first candidate
fn parse_response(body: &Value) -> Result<String> {
    let candidate = body
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|c| c.first())
        .ok_or_else(|| AgentError::InvalidResponse("no candidates in response".to_string()))?;

    let text = candidate
        .pointer("/content/parts")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default();

    let text = text.trim();
    if text.is_empty() {
        let reason = candidate
            .get("finishReason")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        return Err(AgentError::InvalidResponse(format!(
            "no text returned (finish reason: {})",
            reason
        )));
    }
    Ok(text.to_string())
}

/// Describe a transport failure without echoing request URLs
fn transport_error(err: anyhow::Error) -> AgentError {
    let detail = match err.downcast::<reqwest::Error>() {
        Ok(e) if e.is_timeout() => "request timed out".to_string(),
        Ok(e) if e.is_connect() => "connection failed".to_string(),
        Ok(e) => e.without_url().to_string(),
        Err(other) => other.to_string(),
    };
    AgentError::Upstream(detail)
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate(&self, system_prompt: &str, user_content: &str) -> Result<String> {
        let api_key = self.api_key()?;

        let request = EngineRequest::post(self.endpoint())
            .param("key", api_key)
            .header("Accept", accept_json())
            .json(self.request_body(system_prompt, user_content));

        let start = Instant::now();
        info!("call_model start model={}", self.settings.model);
        let response = self
            .client
            .execute_with_timeout(request, self.timeout)
            .await
            .map_err(transport_error)?;
        info!(
            "call_model status={} duration_ms={}",
            response.status,
            start.elapsed().as_millis()
        );

        if !response.is_success() {
            return Err(AgentError::Upstream(format!(
                "generative API returned HTTP {}",
                response.status
            )));
        }

        let body: Value = response
            .json()
            .map_err(|e| AgentError::InvalidResponse(format!("malformed JSON: {}", e)))?;
        parse_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base_url: &str, key: Option<&str>) -> GeminiClient {
        GeminiClient::new(
            HttpClient::new().unwrap(),
            LlmSettings {
                base_url: base_url.to_string(),
                api_key: key.map(str::to_string),
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_generate() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.5-flash:generateContent"))
            .and(query_param("key", "test-key"))
            .and(body_partial_json(json!({
                "system_instruction": {"parts": [{"text": "be brief"}]},
                "contents": [{"role": "user", "parts": [{"text": "hello"}]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"parts": [{"text": "  Hi "}, {"text": ""}, {"text": "there"}]},
                    "finishReason": "STOP"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let gemini = client(&server.uri(), Some("test-key"));
        let text = gemini.generate("be brief", "hello").await.unwrap();
        assert_eq!(text, "Hi \nthere");
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let gemini = client(&server.uri(), Some("  "));
        let err = gemini.generate("s", "u").await.unwrap_err();
        assert!(matches!(err, AgentError::MissingCredential("GEMINI_API_KEY")));
    }

    #[tokio::test]
    async fn test_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota"))
            .mount(&server)
            .await;

        let gemini = client(&server.uri(), Some("k"));
        let err = gemini.generate("s", "u").await.unwrap_err();
        assert!(matches!(err, AgentError::Upstream(ref m) if m.contains("429")));
    }

    #[test]
    fn test_parse_response_without_candidates() {
        let err = parse_response(&json!({"candidates": []})).unwrap_err();
        assert!(matches!(err, AgentError::InvalidResponse(_)));

        let err = parse_response(&json!({
            "candidates": [{"content": {"parts": []}, "finishReason": "SAFETY"}]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_endpoint_trims_slash() {
        let gemini = client("https://example.com/v1beta/", Some("k"));
        assert_eq!(
            gemini.endpoint(),
            "https://example.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        for timeout in [-1.0, 0.0, f64::NAN, f64::INFINITY] {
            let settings = LlmSettings {
                timeout,
                ..Default::default()
            };
            assert!(GeminiClient::new(HttpClient::new().unwrap(), settings).is_err());
        }
    }
}
