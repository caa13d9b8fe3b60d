//! HTTP client for making requests to providers and target pages

use super::user_agent::{accept_html, accept_language, generate_user_agent};
use crate::config::{timeout_duration, OutgoingSettings};
use crate::engines::{EngineRequest, EngineResponse, HttpMethod, RequestBody};
use anyhow::Result;
use reqwest::{Client, Response};
use std::collections::HashMap;
use std::time::Duration;

/// HTTP client wrapper with browser-like default headers
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    default_timeout: Duration,
    user_agent: String,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self> {
        let timeout = timeout_duration("outgoing.request_timeout", settings.request_timeout)?;
        let mut builder = Client::builder().timeout(timeout).gzip(true).brotli(true);

        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(ref proxy_url) = settings.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            default_timeout: timeout,
            user_agent: settings
                .user_agent
                .clone()
                .unwrap_or_else(generate_user_agent),
        })
    }

    /// Default per-request timeout
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Execute a request with the default timeout
    pub async fn execute(&self, request: EngineRequest) -> Result<EngineResponse> {
        self.execute_with_timeout(request, self.default_timeout).await
    }

    /// Execute a request with custom timeout
    pub async fn execute_with_timeout(
        &self,
        request: EngineRequest,
        timeout: Duration,
    ) -> Result<EngineResponse> {
        let mut req_builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        req_builder = req_builder
            .timeout(timeout)
            .header("User-Agent", &self.user_agent)
            .header("Accept", accept_html())
            .header("Accept-Language", accept_language("en"))
            .header("DNT", "1")
            .header("Upgrade-Insecure-Requests", "1");

        // Request-specific headers override the defaults
        for (key, value) in &request.headers {
            req_builder = req_builder.header(key, value);
        }

        if !request.params.is_empty() {
            req_builder = req_builder.query(&request.params);
        }

        if let Some(body) = request.data {
            req_builder = match body {
                RequestBody::Form(data) => req_builder.form(&data),
                RequestBody::Json(json) => req_builder.json(&json),
            };
        }

        let response = req_builder.send().await?;

        Self::parse_response(response).await
    }

    /// Parse response into EngineResponse
    async fn parse_response(response: Response) -> Result<EngineResponse> {
        let status = response.status().as_u16();

        let mut headers = HashMap::new();
        for (key, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(key.as_str().to_lowercase(), v.to_string());
            }
        }

        let text = response.text().await?;

        Ok(EngineResponse {
            status,
            headers,
            text,
        })
    }

    /// Get current user agent
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_client_creation() {
        let client = HttpClient::new().unwrap();
        assert!(client.user_agent().starts_with("Mozilla/5.0"));
        assert_eq!(client.default_timeout(), Duration::from_secs(20));
    }

    #[tokio::test]
    async fn test_fixed_user_agent() {
        let settings = OutgoingSettings {
            user_agent: Some("job-agent-test".to_string()),
            ..Default::default()
        };
        let client = HttpClient::with_settings(&settings).unwrap();
        assert_eq!(client.user_agent(), "job-agent-test");
    }

    #[test]
    fn test_invalid_timeout_is_error() {
        for secs in [-1.0, 0.0, f64::NAN] {
            let settings = OutgoingSettings {
                request_timeout: secs,
                ..Default::default()
            };
            assert!(HttpClient::with_settings(&settings).is_err());
        }
    }

    #[tokio::test]
    async fn test_execute_collects_status_and_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .and(query_param("q", "rust"))
            .and(header_exists("user-agent"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_raw("missing", "text/plain"),
            )
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let request = EngineRequest::get(format!("{}/page", server.uri())).param("q", "rust");
        let response = client.execute(request).await.unwrap();

        assert_eq!(response.status, 404);
        assert!(!response.is_success());
        assert_eq!(response.content_type(), "text/plain");
        assert_eq!(response.text, "missing");
    }
}
