//! Domain-priority ranking of discovered URLs

use crate::results::SearchResult;
use url::Url;

/// Ranks URLs by which configured domain tier their host belongs to.
///
/// A host matches a domain when it equals it or is a subdomain of it, so
/// `www.linkedin.com` matches `linkedin.com` but `dropbox.com` does not
/// match `x.com`. Hosts outside every tier rank last.
#[derive(Debug, Clone)]
pub struct DomainRanker {
    tiers: Vec<Vec<String>>,
}

impl DomainRanker {
    pub fn new(tiers: Vec<Vec<String>>) -> Self {
        let tiers = tiers
            .into_iter()
            .map(|tier| {
                tier.into_iter()
                    .map(|d| d.trim().trim_start_matches('.').to_lowercase())
                    .filter(|d| !d.is_empty())
                    .collect()
            })
            .collect();
        Self { tiers }
    }

    /// Priority of a URL; lower is fetched first
    pub fn priority(&self, url: &str) -> usize {
        let host = match Url::parse(url.trim()) {
            Ok(parsed) => parsed.host_str().map(str::to_lowercase),
            Err(_) => None,
        };
        let Some(host) = host else {
            return self.tiers.len();
        };

        self.tiers
            .iter()
            .position(|tier| tier.iter().any(|domain| host_matches(&host, domain)))
            .unwrap_or(self.tiers.len())
    }

    /// Stable sort by priority; ties keep their prior relative order
    pub fn rank(&self, results: &mut [SearchResult]) {
        results.sort_by_cached_key(|r| self.priority(&r.url));
    }
}

fn host_matches(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .map_or(false, |prefix| prefix.ends_with('.'))
}
