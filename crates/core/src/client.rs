//! High-level catalog client.
//!
//! Wires the provider, the shared cache and the enrichment pipeline
//! together behind one entry point. Library users construct this once
//! from configuration and call it; the individual pipeline pieces stay
//! available for anyone who needs finer control.

use std::sync::Arc;

use tracing::info;

use crate::catalog::{
    CacheStats, CacheStore, CatalogError, CatalogId, CatalogProvider, DetailRecord,
    DiscoverFilter, EnrichedMovie, MovieItem, SearchResult, TmdbCatalog,
};
use crate::config::{Config, EnricherConfig};
use crate::enricher::{
    CandidatePoolBuilder, DetailFetcher, EnrichmentReport, ParallelEnricher, TitleResolver,
};

/// Facade over the full enrichment stack.
pub struct CatalogClient {
    provider: Arc<dyn CatalogProvider>,
    cache: Arc<CacheStore>,
    resolver: Arc<TitleResolver>,
    fetcher: Arc<DetailFetcher>,
    enricher: ParallelEnricher,
    pool_builder: CandidatePoolBuilder,
}

impl CatalogClient {
    /// Build a client backed by the real provider.
    ///
    /// Fails with [`CatalogError::NotConfigured`] when the API key is
    /// missing.
    pub fn new(config: Config) -> Result<Self, CatalogError> {
        let enable_cache = config.tmdb.enable_cache;
        let provider = Arc::new(TmdbCatalog::new(config.tmdb)?);
        info!(cache = enable_cache, "catalog client initialized");
        Ok(Self::assemble(provider, &config.enricher, enable_cache))
    }

    /// Build a client on top of an arbitrary provider.
    ///
    /// Used by tests to run the whole pipeline against a mock, and by
    /// anyone wrapping the provider with their own middleware.
    pub fn with_provider(
        provider: Arc<dyn CatalogProvider>,
        enricher_config: &EnricherConfig,
        enable_cache: bool,
    ) -> Self {
        Self::assemble(provider, enricher_config, enable_cache)
    }

    fn assemble(
        provider: Arc<dyn CatalogProvider>,
        enricher_config: &EnricherConfig,
        enable_cache: bool,
    ) -> Self {
        let cache = Arc::new(CacheStore::new(enable_cache));
        let resolver = Arc::new(TitleResolver::new(
            Arc::clone(&provider),
            Arc::clone(&cache),
            enricher_config,
        ));
        let fetcher = Arc::new(DetailFetcher::new(
            Arc::clone(&provider),
            Arc::clone(&cache),
        ));
        let enricher = ParallelEnricher::new(
            Arc::clone(&resolver),
            Arc::clone(&fetcher),
            enricher_config.batch_size,
        );
        let pool_builder = CandidatePoolBuilder::new(
            Arc::clone(&provider),
            Arc::clone(&fetcher),
            enricher_config.batch_size,
        );

        Self {
            provider,
            cache,
            resolver,
            fetcher,
            enricher,
            pool_builder,
        }
    }

    /// Resolve a free-text title to a catalog identity.
    pub async fn resolve_title(
        &self,
        title: &str,
        year: Option<u16>,
    ) -> Result<Option<CatalogId>, CatalogError> {
        self.resolver.resolve(title, year).await
    }

    /// Fetch the full detail record for a known identity.
    pub async fn movie_details(&self, id: CatalogId) -> Result<DetailRecord, CatalogError> {
        self.fetcher.fetch(id).await
    }

    /// Enrich a batch of raw items.
    pub async fn enrich_movies(
        &self,
        items: &[MovieItem],
    ) -> Result<EnrichmentReport, CatalogError> {
        self.enricher.enrich(items).await
    }

    /// Build a candidate pool seeded from enriched watched movies.
    pub async fn build_candidate_pool(
        &self,
        watched: &[EnrichedMovie],
        per_seed_limit: usize,
        max_total: usize,
        min_rating: Option<f32>,
    ) -> Result<Vec<DetailRecord>, CatalogError> {
        self.pool_builder
            .build(watched, per_seed_limit, max_total, min_rating)
            .await
    }

    /// Discover movies by filter, sorted by vote count on the provider
    /// side.
    pub async fn discover_movies(
        &self,
        filter: &DiscoverFilter,
        limit: usize,
    ) -> Result<Vec<SearchResult>, CatalogError> {
        self.provider.discover_movies(filter, limit).await
    }

    /// Current cache occupancy.
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    /// Drop all cached resolutions and records.
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
        info!("catalog cache cleared");
    }
}
