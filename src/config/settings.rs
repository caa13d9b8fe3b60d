//! Settings structures for the job agent configuration

use crate::search::MAX_RESULTS;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main settings structure, loaded from `settings.yml` and the environment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub outgoing: OutgoingSettings,
    pub search: SearchSettings,
    pub providers: ProviderSettings,
    pub evidence: EvidenceSettings,
    pub llm: LlmSettings,
    pub agent: AgentSettings,
    pub smtp: SmtpSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from a YAML document
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with process environment variables
    pub fn merge_env(&mut self) {
        self.merge_from(|key| std::env::var(key).ok());
    }

    /// Merge with variables from an arbitrary lookup. Empty values count as unset.
    pub fn merge_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(val) = var("GEMINI_API_KEY") {
            self.llm.api_key = Some(val);
        }
        if let Some(val) = var("GEMINI_MODEL") {
            self.llm.model = val;
        }
        if let Some(val) = var("GEMINI_API_URL") {
            self.llm.base_url = val;
        }
        if let Some(val) = var("SERPER_API_KEY") {
            self.providers.serper.api_key = Some(val);
        }
        if let Some(val) = var("TAVILY_API_KEY") {
            self.providers.tavily.api_key = Some(val);
        }
        if let Some(val) = var("SMTP_HOST") {
            self.smtp.host = Some(val);
        }
        if let Some(port) = var("SMTP_PORT").and_then(|v| v.trim().parse().ok()) {
            self.smtp.port = port;
        }
        if let Some(val) = var("SMTP_USERNAME") {
            self.smtp.username = Some(val);
        }
        if let Some(val) = var("SMTP_PASSWORD") {
            self.smtp.password = Some(val);
        }
        if let Some(val) = var("SMTP_FROM_EMAIL") {
            self.smtp.from_email = Some(val);
        }
        if let Some(flag) = var("SMTP_USE_TLS").and_then(|v| parse_flag(&v)) {
            self.smtp.use_tls = flag;
        }
        if let Some(val) = var("LOG_LEVEL") {
            self.logging.level = val.to_lowercase();
        }
        if let Some(port) = var("JOB_AGENT_PORT").and_then(|v| v.trim().parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("JOB_AGENT_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Some(pages) = var("MAX_FETCH_PAGES").and_then(|v| v.trim().parse().ok()) {
            self.evidence.max_fetch_pages = pages;
        }
        if let Some(secs) = var("REQUEST_TIMEOUT_SEC").and_then(|v| v.trim().parse().ok()) {
            self.outgoing.request_timeout = secs;
        }
    }

    /// Reject values no component can run with
    pub fn validate(&self) -> Result<()> {
        timeout_duration("outgoing.request_timeout", self.outgoing.request_timeout)?;
        for (name, provider) in [
            ("providers.serper.timeout", &self.providers.serper),
            ("providers.tavily.timeout", &self.providers.tavily),
            ("providers.duckduckgo.timeout", &self.providers.duckduckgo),
        ] {
            if let Some(secs) = provider.timeout {
                timeout_duration(name, secs)?;
            }
        }
        timeout_duration("llm.timeout", self.llm.timeout)?;
        timeout_duration("smtp.timeout", self.smtp.timeout)?;
        if !(1..=MAX_RESULTS).contains(&self.search.max_results) {
            bail!(
                "search.max_results must be between 1 and {}, got {}",
                MAX_RESULTS,
                self.search.max_results
            );
        }
        Ok(())
    }
}

/// Convert a timeout in seconds, rejecting zero, negative and non-finite values
pub fn timeout_duration(name: &str, secs: f64) -> Result<Duration> {
    if !secs.is_finite() || secs <= 0.0 {
        bail!("{} must be a positive number of seconds, got {}", name, secs);
    }
    Ok(Duration::try_from_secs_f64(secs)?)
}

/// Accepts the usual spellings of a boolean environment toggle
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8000,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Timeout for search and page requests, in seconds
    pub request_timeout: f64,
    /// Fixed user agent (none = random browser-like agent)
    pub user_agent: Option<String>,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy for all outgoing requests
    pub proxy: Option<String>,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 20.0,
            user_agent: None,
            verify_ssl: true,
            proxy: None,
        }
    }
}

/// Search aggregation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Upper bound for any requested result count; never above 10
    pub max_results: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { max_results: 10 }
    }
}

/// Per-provider settings, in fan-out priority order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub serper: ProviderConfig,
    pub tavily: ProviderConfig,
    pub duckduckgo: ProviderConfig,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            serper: ProviderConfig::with_url("https://google.serper.dev/search"),
            tavily: ProviderConfig::with_url("https://api.tavily.com/search"),
            duckduckgo: ProviderConfig {
                timeout: Some(15.0),
                ..ProviderConfig::with_url("https://html.duckduckgo.com/html/")
            },
        }
    }
}

/// Individual provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Whether the provider takes part in the fan-out
    pub disabled: bool,
    /// Endpoint URL
    pub base_url: String,
    /// API key if required
    pub api_key: Option<String>,
    /// Custom timeout for this provider, in seconds
    pub timeout: Option<f64>,
}

impl ProviderConfig {
    pub fn with_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// API key, treating blank strings as absent
    pub fn key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            disabled: false,
            base_url: String::new(),
            api_key: None,
            timeout: None,
        }
    }
}

/// Evidence collection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvidenceSettings {
    /// Queries run in order through the aggregator
    pub queries: Vec<String>,
    /// URLs always considered for fetching
    pub seed_urls: Vec<String>,
    /// Title given to seed pseudo-results
    pub seed_title: String,
    /// Result cap per query
    pub results_per_query: usize,
    /// Number of ranked URLs to fetch
    pub max_fetch_pages: usize,
    /// Domain tiers; a URL on a domain in tier `i` ranks with priority `i`
    pub domain_tiers: Vec<Vec<String>>,
    /// Keywords that anchor a page excerpt, tried in order
    pub keywords: Vec<String>,
    /// Characters kept before the keyword match
    pub excerpt_before: usize,
    /// Characters kept after the keyword match start
    pub excerpt_after: usize,
    /// Characters kept when no keyword matches
    pub fallback_excerpt: usize,
    /// Maximum characters of page text kept after extraction
    pub max_page_chars: usize,
}

impl Default for EvidenceSettings {
    fn default() -> Self {
        Self {
            queries: vec![
                "Unravel.tech founders startup founded in 2023".to_string(),
                "site:unravel.tech founder".to_string(),
                "site:linkedin.com/company unravel.tech founders".to_string(),
                "site:linkedin.com/in unravel tech founder".to_string(),
                "Unravel.tech AI startup founder profile".to_string(),
            ],
            seed_urls: vec![
                "https://unravel.tech/".to_string(),
                "https://www.unravel.tech/".to_string(),
                "https://unravel.tech/about".to_string(),
                "https://www.unravel.tech/about".to_string(),
            ],
            seed_title: "Seed URL".to_string(),
            results_per_query: 8,
            max_fetch_pages: 8,
            domain_tiers: vec![
                vec!["unravel.tech".to_string()],
                vec!["linkedin.com".to_string()],
                vec!["x.com".to_string(), "twitter.com".to_string()],
            ],
            keywords: vec![
                "founder".to_string(),
                "co-founder".to_string(),
                "founded".to_string(),
                "founding".to_string(),
                "ceo".to_string(),
            ],
            excerpt_before: 350,
            excerpt_after: 950,
            fallback_excerpt: 1200,
            max_page_chars: 6000,
        }
    }
}

/// Generative-language API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Model identifier
    pub model: String,
    /// API base URL (the model path is appended)
    pub base_url: String,
    /// API key
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout: f64,
    /// Sampling temperature
    pub temperature: f32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: None,
            timeout: 45.0,
            temperature: 0.2,
        }
    }
}

/// Draft generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Attempts allowed for founder extraction and for draft generation
    pub max_attempts: u32,
    /// Domain used to build the recipient address
    pub email_domain: String,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            email_domain: "unravel.tech".to_string(),
        }
    }
}

/// SMTP delivery settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpSettings {
    pub host: Option<String>,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_email: Option<String>,
    /// Upgrade the connection with STARTTLS
    pub use_tls: bool,
    /// Send timeout in seconds
    pub timeout: f64,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: None,
            port: 587,
            username: None,
            password: None,
            from_email: None,
            use_tls: true,
            timeout: 30.0,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive (`info`, `debug`, `job_agent=trace`, ...)
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.evidence.queries.len(), 5);
        assert_eq!(settings.evidence.seed_urls.len(), 4);
        assert_eq!(settings.evidence.max_fetch_pages, 8);
        assert_eq!(settings.agent.max_attempts, 3);
        assert!(settings.providers.serper.key().is_none());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
server:
  port: 9100
evidence:
  max_fetch_pages: 3
  seed_urls: ["https://example.com/"]
"#;
        let settings = Settings::from_yaml(yaml).unwrap();
        assert_eq!(settings.server.port, 9100);
        assert_eq!(settings.server.bind_address, "127.0.0.1");
        assert_eq!(settings.evidence.max_fetch_pages, 3);
        assert_eq!(settings.evidence.seed_urls, vec!["https://example.com/"]);
        assert_eq!(settings.evidence.excerpt_before, 350);
    }

    #[test]
    fn test_env_overlay() {
        let env: HashMap<&str, &str> = [
            ("SERPER_API_KEY", "serper-key"),
            ("TAVILY_API_KEY", "   "),
            ("SMTP_PORT", "2525"),
            ("SMTP_USE_TLS", "no"),
            ("LOG_LEVEL", "DEBUG"),
            ("MAX_FETCH_PAGES", "4"),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        settings.merge_from(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(settings.providers.serper.key(), Some("serper-key"));
        assert!(settings.providers.tavily.key().is_none());
        assert_eq!(settings.smtp.port, 2525);
        assert!(!settings.smtp.use_tls);
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.evidence.max_fetch_pages, 4);
    }

    #[test]
    fn test_negative_timeout_is_rejected() {
        let mut settings = Settings::default();
        settings.merge_from(|key| (key == "REQUEST_TIMEOUT_SEC").then(|| "-1".to_string()));
        assert_eq!(settings.outgoing.request_timeout, -1.0);

        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("outgoing.request_timeout"));

        let yaml = "llm:\n  timeout: -5\n";
        let err = Settings::from_yaml(yaml).unwrap().validate().unwrap_err();
        assert!(err.to_string().contains("llm.timeout"));

        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_result_cap_above_ten_is_rejected() {
        let settings = Settings::from_yaml("search:\n  max_results: 50\n").unwrap();
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("search.max_results"));
    }

    #[test]
    fn test_timeout_duration() {
        assert_eq!(
            timeout_duration("t", 1.5).unwrap(),
            Duration::from_millis(1500)
        );
        assert!(timeout_duration("t", 0.0).is_err());
        assert!(timeout_duration("t", f64::NAN).is_err());
        assert!(timeout_duration("t", f64::INFINITY).is_err());
        assert!(timeout_duration("t", 1e30).is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
