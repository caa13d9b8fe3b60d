//! Page fetcher: retrieves a URL and returns bounded plain text

use super::client::HttpClient;
use super::html::{html_to_text, truncate_chars};
use crate::engines::EngineRequest;
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Default maximum characters of page text
pub const DEFAULT_MAX_PAGE_CHARS: usize = 6000;

/// Source of page text. Implementations never fail: an unavailable page is empty.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> String;
}

/// Fetches HTML pages over HTTP and converts them to plain text
#[derive(Clone)]
pub struct PageFetcher {
    client: HttpClient,
    timeout: Duration,
    max_chars: usize,
}

impl PageFetcher {
    pub fn new(client: HttpClient) -> Self {
        Self {
            timeout: client.default_timeout(),
            client,
            max_chars: DEFAULT_MAX_PAGE_CHARS,
        }
    }

    /// Set the per-page timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum characters returned per page
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    async fn try_fetch(&self, url: &str) -> anyhow::Result<String> {
        let response = self
            .client
            .execute_with_timeout(EngineRequest::get(url), self.timeout)
            .await?;

        if !response.is_success() {
            return Err(anyhow::anyhow!("HTTP error: {}", response.status));
        }

        let content_type = response.content_type().to_lowercase();
        if !content_type.contains("text/html") {
            info!(
                "fetch_page skipped_non_html url={} content_type={}",
                url, content_type
            );
            return Ok(String::new());
        }

        let text = html_to_text(&response.text);
        Ok(truncate_chars(&text, self.max_chars))
    }
}

#[async_trait]
impl PageSource for PageFetcher {
    async fn fetch(&self, url: &str) -> String {
        let start = Instant::now();
        debug!("fetch_page start url={}", url);

        match self.try_fetch(url).await {
            Ok(text) => {
                if !text.is_empty() {
                    info!(
                        "fetch_page done url={} chars={} duration_ms={}",
                        url,
                        text.chars().count(),
                        start.elapsed().as_millis()
                    );
                }
                text
            }
            Err(e) => {
                warn!("fetch_page failed url={}: {}", url, e);
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn serve(server: &MockServer, route: &str, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(response)
            .mount(server)
            .await;
    }

    fn fetcher() -> PageFetcher {
        PageFetcher::new(HttpClient::new().unwrap())
    }

    #[tokio::test]
    async fn test_fetch_html_page() {
        let server = MockServer::start().await;
        serve(
            &server,
            "/about",
            ResponseTemplate::new(200)
                .set_body_raw(
                    "<html><body><script>x()</script><p>Founded in 2023</p></body></html>",
                    "text/html; charset=utf-8",
                ),
        )
        .await;

        let text = fetcher().fetch(&format!("{}/about", server.uri())).await;
        assert_eq!(text, "Founded in 2023");
    }

    #[tokio::test]
    async fn test_fetch_truncates() {
        let server = MockServer::start().await;
        let body = format!("<p>{}</p>", "a".repeat(10_000));
        serve(
            &server,
            "/long",
            ResponseTemplate::new(200)
                .set_body_raw(body, "text/html"),
        )
        .await;

        let text = fetcher().fetch(&format!("{}/long", server.uri())).await;
        assert_eq!(text.len(), DEFAULT_MAX_PAGE_CHARS);

        let short = fetcher()
            .with_max_chars(10)
            .fetch(&format!("{}/long", server.uri()))
            .await;
        assert_eq!(short.len(), 10);
    }

    #[tokio::test]
    async fn test_fetch_skips_non_html() {
        let server = MockServer::start().await;
        serve(
            &server,
            "/resume.pdf",
            ResponseTemplate::new(200)
                .set_body_raw("%PDF-1.4", "application/pdf"),
        )
        .await;

        let text = fetcher().fetch(&format!("{}/resume.pdf", server.uri())).await;
        assert!(text.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_http_error_is_empty() {
        let server = MockServer::start().await;
        serve(&server, "/gone", ResponseTemplate::new(500)).await;

        let text = fetcher().fetch(&format!("{}/gone", server.uri())).await;
        assert!(text.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_timeout_is_empty() {
        let server = MockServer::start().await;
        serve(
            &server,
            "/slow",
            ResponseTemplate::new(200)
                .set_body_raw("<p>late</p>", "text/html")
                .set_delay(Duration::from_millis(500)),
        )
        .await;

        let text = fetcher()
            .with_timeout(Duration::from_millis(50))
            .fetch(&format!("{}/slow", server.uri()))
            .await;
        assert!(text.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_unreachable_is_empty() {
        let text = fetcher().fetch("http://127.0.0.1:9/nothing").await;
        assert!(text.is_empty());
    }
}
