//! Mock catalog provider for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::catalog::{
    CatalogError, CatalogId, CatalogProvider, DetailRecord, DiscoverFilter, SearchResult,
};

/// A recorded catalog query for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedQuery {
    SearchMovies { query: String, year: Option<u16> },
    MovieDetails { id: CatalogId },
    SimilarMovies { id: CatalogId, limit: usize },
    RecommendedMovies { id: CatalogId, limit: usize },
    DiscoverMovies { limit: usize },
}

/// Mock implementation of the [`CatalogProvider`] trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable search/detail/listing results
/// - Track queries for assertions
/// - Simulate failures
///
/// Every query is recorded, including ones that fail through error
/// injection. Searches return exactly what was configured for the
/// `(query, year)` pair, and nothing for unconfigured pairs.
#[derive(Debug)]
pub struct MockCatalog {
    /// Search results by (query, year).
    searches: Arc<RwLock<HashMap<(String, Option<u16>), Vec<SearchResult>>>>,
    /// Detail records by id.
    movies: Arc<RwLock<HashMap<CatalogId, DetailRecord>>>,
    /// Similar listings by seed id.
    similar: Arc<RwLock<HashMap<CatalogId, Vec<SearchResult>>>>,
    /// Recommended listings by seed id.
    recommended: Arc<RwLock<HashMap<CatalogId, Vec<SearchResult>>>>,
    /// Discover results, shared across filters.
    discover: Arc<RwLock<Vec<SearchResult>>>,
    /// Recorded queries.
    queries: Arc<RwLock<Vec<RecordedQuery>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<CatalogError>>>,
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCatalog {
    /// Create a new empty mock catalog.
    pub fn new() -> Self {
        Self {
            searches: Arc::new(RwLock::new(HashMap::new())),
            movies: Arc::new(RwLock::new(HashMap::new())),
            similar: Arc::new(RwLock::new(HashMap::new())),
            recommended: Arc::new(RwLock::new(HashMap::new())),
            discover: Arc::new(RwLock::new(Vec::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Configure the results for one exact `(query, year)` search.
    pub async fn set_search_results(
        &self,
        query: &str,
        year: Option<u16>,
        results: Vec<SearchResult>,
    ) {
        self.searches
            .write()
            .await
            .insert((query.to_string(), year), results);
    }

    /// Add a detail record, keyed by its id.
    pub async fn add_movie(&self, record: DetailRecord) {
        self.movies.write().await.insert(record.id, record);
    }

    /// Configure the similar listing for a seed.
    pub async fn set_similar(&self, id: CatalogId, results: Vec<SearchResult>) {
        self.similar.write().await.insert(id, results);
    }

    /// Configure the recommended listing for a seed.
    pub async fn set_recommended(&self, id: CatalogId, results: Vec<SearchResult>) {
        self.recommended.write().await.insert(id, results);
    }

    /// Configure the discover results, returned for any filter.
    pub async fn set_discover_results(&self, results: Vec<SearchResult>) {
        *self.discover.write().await = results;
    }

    /// Get all recorded queries.
    pub async fn recorded_queries(&self) -> Vec<RecordedQuery> {
        self.queries.read().await.clone()
    }

    /// Get the number of queries performed.
    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }

    /// How many similar listings were requested for a given seed.
    pub async fn similar_count_for(&self, seed: CatalogId) -> usize {
        self.queries
            .read()
            .await
            .iter()
            .filter(|q| matches!(q, RecordedQuery::SimilarMovies { id, .. } if *id == seed))
            .count()
    }

    /// How many recommendation listings were requested for a given seed.
    pub async fn recommended_count_for(&self, seed: CatalogId) -> usize {
        self.queries
            .read()
            .await
            .iter()
            .filter(|q| matches!(q, RecordedQuery::RecommendedMovies { id, .. } if *id == seed))
            .count()
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: CatalogError) {
        *self.next_error.write().await = Some(error);
    }

    /// Take the next error if set.
    async fn take_error(&self) -> Option<CatalogError> {
        self.next_error.write().await.take()
    }

    /// Record a query.
    async fn record(&self, query: RecordedQuery) {
        self.queries.write().await.push(query);
    }
}

#[async_trait]
impl CatalogProvider for MockCatalog {
    async fn search_movies(
        &self,
        query: &str,
        year: Option<u16>,
    ) -> Result<Vec<SearchResult>, CatalogError> {
        self.record(RecordedQuery::SearchMovies {
            query: query.to_string(),
            year,
        })
        .await;

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        Ok(self
            .searches
            .read()
            .await
            .get(&(query.to_string(), year))
            .cloned()
            .unwrap_or_default())
    }

    async fn movie_details(&self, id: CatalogId) -> Result<DetailRecord, CatalogError> {
        self.record(RecordedQuery::MovieDetails { id }).await;

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.movies
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("movie {id}")))
    }

    async fn similar_movies(
        &self,
        id: CatalogId,
        limit: usize,
    ) -> Result<Vec<SearchResult>, CatalogError> {
        self.record(RecordedQuery::SimilarMovies { id, limit }).await;

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        Ok(self
            .similar
            .read()
            .await
            .get(&id)
            .map(|results| results.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn recommended_movies(
        &self,
        id: CatalogId,
        limit: usize,
    ) -> Result<Vec<SearchResult>, CatalogError> {
        self.record(RecordedQuery::RecommendedMovies { id, limit })
            .await;

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        Ok(self
            .recommended
            .read()
            .await
            .get(&id)
            .map(|results| results.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn discover_movies(
        &self,
        _filter: &DiscoverFilter,
        limit: usize,
    ) -> Result<Vec<SearchResult>, CatalogError> {
        self.record(RecordedQuery::DiscoverMovies { limit }).await;

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        Ok(self
            .discover
            .read()
            .await
            .iter()
            .take(limit)
            .cloned()
            .collect())
    }
}
