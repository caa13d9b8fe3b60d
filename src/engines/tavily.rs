//! Tavily search API engine implementation

use super::traits::*;
use crate::config::ProviderConfig;
use crate::results::{Provider, SearchResult};
use anyhow::Result as AnyhowResult;
use serde_json::json;

/// Tavily search engine, keyed. The key travels in the JSON body.
pub struct Tavily {
    base_url: String,
    api_key: Option<String>,
    timeout: Option<f64>,
}

impl Tavily {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_key: config.key().map(str::to_string),
            timeout: config.timeout,
        }
    }
}

impl Engine for Tavily {
    fn name(&self) -> &str {
        "tavily"
    }

    fn provider(&self) -> Provider {
        Provider::Tavily
    }

    fn about(&self) -> EngineAbout {
        EngineAbout::new()
            .website("https://tavily.com")
            .api_key_required(true)
            .results_format("JSON")
    }

    fn timeout(&self) -> Option<f64> {
        self.timeout
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn request(&self, params: &RequestParams) -> AnyhowResult<EngineRequest> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("tavily API key is not set"))?;

        Ok(EngineRequest::post(&self.base_url)
            .header("Accept", crate::network::accept_json())
            .json(json!({
                "api_key": api_key,
                "query": params.query,
                "max_results": params.max_results,
                "search_depth": "advanced",
            })))
    }

    fn response(&self, response: EngineResponse) -> AnyhowResult<Vec<SearchResult>> {
        if !response.is_success() {
            return Err(anyhow::anyhow!("HTTP error: {}", response.status));
        }

        let json: serde_json::Value = response.json()?;
        let results = json
            .get("results")
            .and_then(|v| v.as_array())
            .map(Vec::as_slice)
            .unwrap_or_default();

        Ok(results
            .iter()
            .map(|item| {
                SearchResult::new(
                    json_str(item, "title"),
                    json_str(item, "url"),
                    json_str(item, "content"),
                    self.provider(),
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::HttpClient;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn tavily(base_url: &str, key: Option<&str>) -> Tavily {
        Tavily::new(&ProviderConfig {
            api_key: key.map(str::to_string),
            ..ProviderConfig::with_url(base_url)
        })
    }

    #[tokio::test]
    async fn test_tavily_search() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(body_partial_json(json!({
                "api_key": "tvly-key",
                "query": "unravel",
                "max_results": 3,
                "search_depth": "advanced"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    {"title": "About", "url": "https://unravel.tech/about", "content": "Founded by"},
                    {"title": "No url"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let engine = tavily(&format!("{}/search", server.uri()), Some("tvly-key"));
        let client = HttpClient::new().unwrap();
        let results = engine.search(&client, "unravel", 3).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].url, "https://unravel.tech/about");
        assert_eq!(results[0].snippet, "Founded by");
        assert_eq!(results[0].provider, Provider::Tavily);
        assert_eq!(results[1].url, "");
    }

    #[tokio::test]
    async fn test_tavily_missing_results_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": null})))
            .mount(&server)
            .await;

        let engine = tavily(&format!("{}/search", server.uri()), Some("k"));
        let client = HttpClient::new().unwrap();
        let results = engine.search(&client, "unravel", 3).await.unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_tavily_unconfigured() {
        let engine = tavily("https://api.tavily.com/search", Some("  "));
        assert!(!engine.is_configured());
        assert!(engine.request(&RequestParams::new("q", 1)).is_err());
    }
}
