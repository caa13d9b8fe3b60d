//! Serper (Google results API) engine implementation

use super::traits::*;
use crate::config::ProviderConfig;
use crate::results::{Provider, SearchResult};
use anyhow::Result as AnyhowResult;
use serde_json::json;

/// Serper web search engine, keyed
pub struct Serper {
    base_url: String,
    api_key: Option<String>,
    timeout: Option<f64>,
}

impl Serper {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_key: config.key().map(str::to_string),
            timeout: config.timeout,
        }
    }
}

impl Engine for Serper {
    fn name(&self) -> &str {
        "serper"
    }

    fn provider(&self) -> Provider {
        Provider::Serper
    }

    fn about(&self) -> EngineAbout {
        EngineAbout::new()
            .website("https://serper.dev")
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
            .ok_or_else(|| anyhow::anyhow!("serper API key is not set"))?;

        Ok(EngineRequest::post(&self.base_url)
            .header("X-API-KEY", api_key)
            .header("Content-Type", "application/json")
            .header("Accept", crate::network::accept_json())
            .json(json!({
                "q": params.query,
                "num": params.max_results,
            })))
    }

    fn response(&self, response: EngineResponse) -> AnyhowResult<Vec<SearchResult>> {
        if !response.is_success() {
            return Err(anyhow::anyhow!("HTTP error: {}", response.status));
        }

        let json: serde_json::Value = response.json()?;
        let organic = json
            .get("organic")
            .and_then(|v| v.as_array())
            .map(Vec::as_slice)
            .unwrap_or_default();

        Ok(organic
            .iter()
            .map(|item| {
                SearchResult::new(
                    json_str(item, "title"),
                    json_str(item, "link"),
                    json_str(item, "snippet"),
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
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn serper(base_url: &str, key: Option<&str>) -> Serper {
        Serper::new(&ProviderConfig {
            api_key: key.map(str::to_string),
            ..ProviderConfig::with_url(base_url)
        })
    }

    #[test]
    fn test_serper_request() {
        let engine = serper("https://google.serper.dev/search", Some("k"));
        let request = engine.request(&RequestParams::new("rust", 8)).unwrap();

        assert!(request.url.contains("serper.dev"));
        assert_eq!(request.headers.get("X-API-KEY").unwrap(), "k");
        match request.data {
            Some(RequestBody::Json(body)) => {
                assert_eq!(body["q"], "rust");
                assert_eq!(body["num"], 8);
            }
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_serper_search() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(header("X-API-KEY", "secret"))
            .and(body_partial_json(json!({"q": "unravel founders", "num": 5})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "organic": [
                    {"title": "Unravel", "link": "https://unravel.tech/", "snippet": "AI studio"},
                    {"link": "https://linkedin.com/company/unravel"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let engine = serper(&format!("{}/search", server.uri()), Some("secret"));
        let client = HttpClient::new().unwrap();
        let results = engine.search(&client, "unravel founders", 5).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Unravel");
        assert_eq!(results[0].provider, Provider::Serper);
        assert_eq!(results[1].title, "");
        assert_eq!(results[1].snippet, "");
    }

    #[tokio::test]
    async fn test_serper_without_key_skips_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let engine = serper(&format!("{}/search", server.uri()), None);
        let client = HttpClient::new().unwrap();
        let results = engine.search(&client, "anything", 5).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_serper_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let engine = serper(&format!("{}/search", server.uri()), Some("bad"));
        let client = HttpClient::new().unwrap();
        assert!(engine.search(&client, "anything", 5).await.is_err());
    }

    #[tokio::test]
    async fn test_serper_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let engine = serper(&format!("{}/search", server.uri()), Some("k"));
        let client = HttpClient::new().unwrap();
        assert!(engine.search(&client, "anything", 5).await.is_err());
    }
}
