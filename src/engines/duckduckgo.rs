//! DuckDuckGo search engine implementation (keyless HTML endpoint)

use super::traits::*;
use crate::config::ProviderConfig;
use crate::network::collapse_whitespace;
use crate::results::{Provider, SearchResult};
use anyhow::Result as AnyhowResult;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashMap;
use url::Url;

static RESULT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.result").expect("valid selector"));
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.result__a").expect("valid selector"));
static SNIPPET_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".result__snippet").expect("valid selector"));

/// DuckDuckGo web search engine. Needs no credentials.
pub struct DuckDuckGo {
    html_url: String,
    timeout: Option<f64>,
}

impl DuckDuckGo {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            html_url: config.base_url.clone(),
            timeout: config.timeout,
        }
    }

    fn parse_html_results(&self, html: &str) -> Vec<SearchResult> {
        let document = Html::parse_document(html);
        let mut results = Vec::new();

        for element in document.select(&RESULT_SELECTOR) {
            // Sponsored results
            if element.value().classes().any(|c| c == "result--ad") {
                continue;
            }

            let title_elem = match element.select(&TITLE_SELECTOR).next() {
                Some(t) => t,
                None => continue,
            };

            let title = collapse_whitespace(&title_elem.text().collect::<String>());
            let url = title_elem
                .value()
                .attr("href")
                .map(resolve_redirect)
                .unwrap_or_default();

            // Internal links (related searches, ad redirects) stay on DDG
            if url.is_empty() || points_at_duckduckgo(&url) {
                continue;
            }

            let snippet = element
                .select(&SNIPPET_SELECTOR)
                .next()
                .map(|s| collapse_whitespace(&s.text().collect::<String>()))
                .unwrap_or_default();

            results.push(SearchResult::new(title, url, snippet, self.provider()));
        }

        results
    }
}

/// Whether the URL's host is duckduckgo.com or one of its subdomains
fn points_at_duckduckgo(url: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(is_duckduckgo_host))
        .unwrap_or(false)
}

fn is_duckduckgo_host(host: &str) -> bool {
    host == "duckduckgo.com" || host.ends_with(".duckduckgo.com")
}

/// Unwrap DuckDuckGo's `/l/?uddg=<target>` redirect links
fn resolve_redirect(href: &str) -> String {
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.to_string()
    };

    match Url::parse(&absolute) {
        Ok(parsed) if parsed.host_str().map_or(false, is_duckduckgo_host) => parsed
            .query_pairs()
            .find(|(k, _)| k == "uddg")
            .map(|(_, v)| v.into_owned())
            .unwrap_or(absolute),
        _ => absolute,
    }
}

impl Engine for DuckDuckGo {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    fn provider(&self) -> Provider {
        Provider::Ddg
    }

    fn about(&self) -> EngineAbout {
        EngineAbout::new()
            .website("https://duckduckgo.com")
            .results_format("HTML")
    }

    fn timeout(&self) -> Option<f64> {
        self.timeout
    }

    fn request(&self, params: &RequestParams) -> AnyhowResult<EngineRequest> {
        let mut form_data = HashMap::new();
        form_data.insert("q".to_string(), params.query.clone());
        form_data.insert("b".to_string(), String::new());
        form_data.insert("kl".to_string(), "wt-wt".to_string());
        // Safe search off
        form_data.insert("kp".to_string(), "-2".to_string());

        Ok(EngineRequest::post(&self.html_url).form(form_data))
    }

    fn response(&self, response: EngineResponse) -> AnyhowResult<Vec<SearchResult>> {
        if !response.is_success() {
            return Err(anyhow::anyhow!("HTTP error: {}", response.status));
        }

        let results = self.parse_html_results(&response.text);
        // A challenge page carries no result blocks; a snippet mentioning
        // captchas does not make a results page a challenge.
        if results.is_empty() && response.is_captcha() {
            return Err(anyhow::anyhow!("CAPTCHA required"));
        }

        Ok(results)
    }
}
