//! Detail retrieval with shared caching.

use std::sync::Arc;

use tracing::debug;

use crate::catalog::{CacheStore, CatalogError, CatalogId, CatalogProvider, DetailRecord};

/// Fetches full detail records, one composite provider round trip per
/// identity, memoized for the life of the process.
pub struct DetailFetcher {
    provider: Arc<dyn CatalogProvider>,
    cache: Arc<CacheStore>,
}

impl DetailFetcher {
    pub fn new(provider: Arc<dyn CatalogProvider>, cache: Arc<CacheStore>) -> Self {
        Self { provider, cache }
    }

    /// Fetch the detail record for an identity.
    ///
    /// Records are complete or absent: any provider failure surfaces as
    /// an error, never as a partially populated record.
    pub async fn fetch(&self, id: CatalogId) -> Result<DetailRecord, CatalogError> {
        if let Some(cached) = self.cache.get_details(id).await {
            debug!(%id, "detail cache hit");
            return Ok(cached);
        }

        let record = self.provider.movie_details(id).await?;
        self.cache.put_details(record.clone()).await;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, MockCatalog};

    #[tokio::test]
    async fn test_fetch_caches_by_id() {
        let mock = Arc::new(MockCatalog::new());
        mock.add_movie(fixtures::detail_record(603, "The Matrix", Some(1999)))
            .await;

        let cache = Arc::new(CacheStore::new(true));
        let fetcher = DetailFetcher::new(Arc::clone(&mock) as _, cache);

        let first = fetcher.fetch(CatalogId(603)).await.unwrap();
        assert_eq!(first.title, "The Matrix");
        assert_eq!(mock.query_count().await, 1);

        let second = fetcher.fetch(CatalogId(603)).await.unwrap();
        assert_eq!(second, first);
        assert_eq!(mock.query_count().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let mock = Arc::new(MockCatalog::new());
        let cache = Arc::new(CacheStore::new(true));
        let fetcher = DetailFetcher::new(Arc::clone(&mock) as _, cache);

        let result = fetcher.fetch(CatalogId(404)).await;
        assert!(matches!(result, Err(CatalogError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let mock = Arc::new(MockCatalog::new());
        let cache = Arc::new(CacheStore::new(true));
        let fetcher = DetailFetcher::new(Arc::clone(&mock) as _, cache);

        assert!(fetcher.fetch(CatalogId(7)).await.is_err());

        // The record appears later (e.g. transient outage recovered)
        mock.add_movie(fixtures::detail_record(7, "Late Arrival", Some(2020)))
            .await;
        let record = fetcher.fetch(CatalogId(7)).await.unwrap();
        assert_eq!(record.title, "Late Arrival");
    }
}
