//! Engine traits and types

use crate::config::timeout_duration;
use crate::network::HttpClient;
use crate::results::{Provider, SearchResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Parameters for building a search request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestParams {
    /// Search query string, already trimmed
    pub query: String,
    /// Number of results wanted from the backend
    pub max_results: usize,
}

impl RequestParams {
    pub fn new(query: impl Into<String>, max_results: usize) -> Self {
        Self {
            query: query.into(),
            max_results,
        }
    }
}

/// HTTP request to be made by the engine
#[derive(Debug, Clone)]
pub struct EngineRequest {
    /// URL to request
    pub url: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Query parameters
    pub params: HashMap<String, String>,
    /// POST body data
    pub data: Option<RequestBody>,
}

impl EngineRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self::with_method(url, HttpMethod::Get)
    }

    /// Create a POST request
    pub fn post(url: impl Into<String>) -> Self {
        Self::with_method(url, HttpMethod::Post)
    }

    fn with_method(url: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            url: url.into(),
            method,
            headers: HashMap::new(),
            params: HashMap::new(),
            data: None,
        }
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Add form data (sets content-type to form-urlencoded)
    pub fn form(mut self, data: HashMap<String, String>) -> Self {
        self.data = Some(RequestBody::Form(data));
        self
    }

    /// Add JSON body
    pub fn json(mut self, data: serde_json::Value) -> Self {
        self.data = Some(RequestBody::Json(data));
        self
    }
}

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Request body types
#[derive(Debug, Clone)]
pub enum RequestBody {
    Form(HashMap<String, String>),
    Json(serde_json::Value),
}

/// HTTP response from engine request
#[derive(Debug)]
pub struct EngineResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers, keys lowercased
    pub headers: HashMap<String, String>,
    /// Response body as text
    pub text: String,
}

impl EngineResponse {
    /// Parse response as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> anyhow::Result<T> {
        Ok(serde_json::from_str(&self.text)?)
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Content-Type header, empty when absent
    pub fn content_type(&self) -> &str {
        self.headers
            .get("content-type")
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Check if response indicates CAPTCHA
    pub fn is_captcha(&self) -> bool {
        self.text.contains("captcha")
            || self.text.contains("CAPTCHA")
            || self.text.contains("unusual traffic")
            || self.text.contains("automated requests")
    }
}

/// Read a field of an upstream JSON object as a string.
///
/// Missing or null fields become empty strings; other scalars are rendered.
pub fn json_str(item: &serde_json::Value, key: &str) -> String {
    match item.get(key) {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Search provider capability: one backend, one outbound call per search
#[async_trait]
pub trait Engine: Send + Sync {
    /// Engine name
    fn name(&self) -> &str;

    /// Provider tag stamped on every result
    fn provider(&self) -> Provider;

    /// Short description of the engine
    fn about(&self) -> EngineAbout {
        EngineAbout::default()
    }

    /// Custom timeout in seconds (none = client default)
    fn timeout(&self) -> Option<f64> {
        None
    }

    /// Whether required credentials are present. Unconfigured engines return
    /// no results without issuing a request.
    fn is_configured(&self) -> bool {
        true
    }

    /// Build the HTTP request for a search
    fn request(&self, params: &RequestParams) -> anyhow::Result<EngineRequest>;

    /// Parse the HTTP response into results
    fn response(&self, response: EngineResponse) -> anyhow::Result<Vec<SearchResult>>;

    /// Run one search against the backend, returning at most `max_results`.
    ///
    /// Errors on transport failure, non-2xx status or a malformed body; the
    /// caller decides how to degrade.
    async fn search(
        &self,
        client: &HttpClient,
        query: &str,
        max_results: usize,
    ) -> anyhow::Result<Vec<SearchResult>> {
        if !self.is_configured() {
            return Ok(Vec::new());
        }

        let request = self.request(&RequestParams::new(query, max_results))?;
        let timeout = match self.timeout() {
            Some(secs) => timeout_duration(self.name(), secs)?,
            None => client.default_timeout(),
        };
        let response = client.execute_with_timeout(request, timeout).await?;

        let mut results = self.response(response)?;
        results.truncate(max_results);
        Ok(results)
    }
}

/// Engine metadata
#[derive(Debug, Clone, Default, Serialize)]
pub struct EngineAbout {
    /// Website URL
    pub website: Option<String>,
    /// Whether an API key is required
    pub require_api_key: bool,
    /// Result format (HTML, JSON)
    pub results: String,
}

impl EngineAbout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn website(mut self, url: impl Into<String>) -> Self {
        self.website = Some(url.into());
        self
    }

    pub fn api_key_required(mut self, required: bool) -> Self {
        self.require_api_key = required;
        self
    }

    pub fn results_format(mut self, format: impl Into<String>) -> Self {
        self.results = format.into();
        self
    }
}
