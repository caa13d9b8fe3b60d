//! Evidence collection: searches, ranks, fetches and excerpts pages

use super::excerpt::ExcerptExtractor;
use super::ranking::DomainRanker;
use crate::config::EvidenceSettings;
use crate::network::PageSource;
use crate::results::{dedupe_results, SearchResult};
use crate::search::Search;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Source of the evidence document handed to fact extraction
#[async_trait]
pub trait EvidenceSource: Send + Sync {
    async fn collect(&self) -> String;
}

/// Builds one evidence document from search results and fetched pages
pub struct EvidenceCollector {
    search: Arc<Search>,
    pages: Arc<dyn PageSource>,
    settings: EvidenceSettings,
    ranker: DomainRanker,
    excerpts: ExcerptExtractor,
}

impl EvidenceCollector {
    pub fn new(search: Arc<Search>, pages: Arc<dyn PageSource>, settings: EvidenceSettings) -> Self {
        Self {
            ranker: DomainRanker::new(settings.domain_tiers.clone()),
            excerpts: ExcerptExtractor::from_settings(&settings),
            search,
            pages,
            settings,
        }
    }

    async fn build(&self) -> String {
        let start = Instant::now();
        let mut chunks = Vec::new();
        let mut pool = Vec::new();

        for (idx, query) in self.settings.queries.iter().enumerate() {
            info!("collect_evidence query_{}={:?}", idx + 1, query);
            let results = self
                .search
                .aggregate(query, self.settings.results_per_query)
                .await;
            chunks.push(format_query_block(idx + 1, query, &results));
            pool.extend(results);
        }

        pool.extend(
            self.settings
                .seed_urls
                .iter()
                .map(|url| SearchResult::seed(self.settings.seed_title.clone(), url.clone())),
        );

        let mut ranked = dedupe_results(pool);
        self.ranker.rank(&mut ranked);
        let unique_urls = ranked.len();
        ranked.truncate(self.settings.max_fetch_pages);
        info!(
            "collect_evidence unique_urls={} fetched_urls={}",
            unique_urls,
            ranked.len()
        );

        let mut page_chunks = Vec::new();
        for item in &ranked {
            let text = self.pages.fetch(&item.url).await;
            if text.is_empty() {
                debug!("collect_evidence no_text url={}", item.url);
                continue;
            }
            let excerpt = self.excerpts.extract(&text);
            page_chunks.push(format!(
                "URL: {}\nTitle: {}\nExcerpt:\n{}\n",
                item.url, item.title, excerpt
            ));
        }

        if !page_chunks.is_empty() {
            chunks.push(format!("Fetched Page Evidence:\n{}", page_chunks.join("\n")));
        }

        let document = chunks.join("\n\n");
        info!(
            "collect_evidence done pages={} chars={} duration_ms={}",
            page_chunks.len(),
            document.chars().count(),
            start.elapsed().as_millis()
        );
        document
    }
}

#[async_trait]
impl EvidenceSource for EvidenceCollector {
    async fn collect(&self) -> String {
        self.build().await
    }
}

/// Render one query's results as a numbered block
pub fn format_query_block(index: usize, query: &str, results: &[SearchResult]) -> String {
    if results.is_empty() {
        return format!("Search Query {}: {}\nNo results found.", index, query);
    }

    let lines: Vec<String> = results
        .iter()
        .enumerate()
        .map(|(rank, item)| {
            format!(
                "[{}] ({}) {}\n    URL: {}\n    {}",
                rank + 1,
                item.provider,
                item.title,
                item.url,
                item.snippet
            )
        })
        .collect();

    format!("Search Query {}: {}\n{}", index, query, lines.join("\n"))
}
