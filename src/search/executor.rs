//! Search aggregation across providers

use super::models::SearchQuery;
use crate::config::SearchSettings;
use crate::engines::{Engine, EngineRegistry};
use crate::network::HttpClient;
use crate::results::{ResultContainer, SearchResult};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Search aggregator that queries every provider in priority order
pub struct Search {
    /// HTTP client for making requests
    client: HttpClient,
    /// Engine registry
    registry: Arc<EngineRegistry>,
    /// Result count bounds
    settings: SearchSettings,
}

impl Search {
    /// Create a new search aggregator
    pub fn new(client: HttpClient, registry: Arc<EngineRegistry>) -> Self {
        Self {
            client,
            registry,
            settings: SearchSettings::default(),
        }
    }

    /// Set result count bounds
    pub fn with_settings(mut self, settings: SearchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Search all providers and merge their results.
    ///
    /// Never fails: provider errors are logged and skipped, and anything
    /// unexpected yields an empty list.
    pub async fn aggregate(&self, query: &str, max_results: usize) -> Vec<SearchResult> {
        let query = SearchQuery::new(query, max_results, self.settings.max_results);
        if query.is_empty() {
            warn!("search called with empty query");
            return Vec::new();
        }

        match AssertUnwindSafe(self.execute(&query)).catch_unwind().await {
            Ok(results) => results,
            Err(_) => {
                error!(
                    "search failed query={:?} max_results={}",
                    query.query, query.max_results
                );
                Vec::new()
            }
        }
    }

    async fn execute(&self, query: &SearchQuery) -> Vec<SearchResult> {
        let start = Instant::now();
        info!(
            "search start query={:?} max_results={}",
            query.query, query.max_results
        );

        let mut container = ResultContainer::new();
        for engine in self.registry.iter() {
            let results = self.search_engine(engine.as_ref(), query).await;
            container.extend_results(results);
        }

        let results = container.into_results(query.max_results);
        info!(
            "search done query={:?} results={} total_duration_ms={}",
            query.query,
            results.len(),
            start.elapsed().as_millis()
        );
        results
    }

    /// Search a single engine, isolating its failure
    async fn search_engine(&self, engine: &dyn Engine, query: &SearchQuery) -> Vec<SearchResult> {
        let engine_name = engine.name();
        if !engine.is_configured() {
            debug!("search provider={} skipped: not configured", engine_name);
            return Vec::new();
        }

        let start = Instant::now();
        match engine
            .search(&self.client, &query.query, query.max_results)
            .await
        {
            Ok(results) => {
                info!(
                    "search provider={} results={} duration_ms={}",
                    engine_name,
                    results.len(),
                    start.elapsed().as_millis()
                );
                results
            }
            Err(e) => {
                warn!("search provider={} failed: {:#}", engine_name, e);
                Vec::new()
            }
        }
    }
}
