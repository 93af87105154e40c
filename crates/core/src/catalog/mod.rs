//! External movie catalog integration.
//!
//! This module provides the HTTP client for the metadata provider along
//! with the pieces that keep it within budget: a minimum-interval rate
//! limiter, a retrying transport for transient network failures, and a
//! process-lifetime cache shared by resolution and detail lookups.

mod cache;
mod rate_limiter;
mod tmdb;
mod transport;
mod types;

pub use cache::{CacheStats, CacheStore};
pub use rate_limiter::RateLimiter;
pub use tmdb::TmdbCatalog;
pub use transport::{RetryPolicy, RetryingTransport};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when interacting with the movie catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Client not configured (missing API key, etc.). Fatal at construction.
    #[error("Catalog client not configured: {0}")]
    NotConfigured(String),

    /// The provider rejected our credentials (401). Never retried.
    #[error("Catalog authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The provider throttled us (429). Propagated as-is, not retried.
    #[error("Catalog rate limit exceeded, wait before retrying")]
    RateLimited,

    /// A specific resource does not exist (404). Local to one item.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Transport-level failure (timeout, connection error) after the
    /// retry budget was exhausted.
    #[error("Network error: {0}")]
    Network(String),

    /// The provider returned a payload we could not parse.
    #[error("Invalid catalog response: {0}")]
    InvalidResponse(String),

    /// Any other non-success HTTP status.
    #[error("Catalog API error: {status} - {message}")]
    ApiError { status: u16, message: String },
}

impl CatalogError {
    /// Whether this error should abort a whole batch operation.
    ///
    /// Item-local failures (missing resource, bad payload, exhausted
    /// retries on one call) only drop the item they belong to. Credential
    /// problems and provider-wide throttling are fatal to the call.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CatalogError::NotConfigured(_)
                | CatalogError::AuthenticationFailed(_)
                | CatalogError::RateLimited
        )
    }
}

/// Trait for movie catalog providers.
///
/// Implemented by [`TmdbCatalog`] and by the test mock, allowing the
/// enrichment pipeline to run against either.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Search for movies by free-text query, optionally constrained by
    /// release year. Only the first results page is consumed.
    async fn search_movies(
        &self,
        query: &str,
        year: Option<u16>,
    ) -> Result<Vec<SearchResult>, CatalogError>;

    /// Fetch the full detail record for a movie in a single composite
    /// round trip (credits, keywords and regional releases included).
    async fn movie_details(&self, id: CatalogId) -> Result<DetailRecord, CatalogError>;

    /// List movies the provider considers similar to the given one.
    async fn similar_movies(
        &self,
        id: CatalogId,
        limit: usize,
    ) -> Result<Vec<SearchResult>, CatalogError>;

    /// List the provider's own recommendations for the given movie.
    async fn recommended_movies(
        &self,
        id: CatalogId,
        limit: usize,
    ) -> Result<Vec<SearchResult>, CatalogError>;

    /// Discover movies matching a filter, sorted by vote count.
    async fn discover_movies(
        &self,
        filter: &DiscoverFilter,
        limit: usize,
    ) -> Result<Vec<SearchResult>, CatalogError>;
}
