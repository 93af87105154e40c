//! Concurrent batch enrichment with per-item failure isolation.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::catalog::{CatalogError, EnrichedMovie, MovieItem};

use super::fetcher::DetailFetcher;
use super::resolver::TitleResolver;

/// Outcome of a batch enrichment run.
///
/// Only aggregate counts are reported; per-item diagnostics go to the
/// log. Output order is unspecified.
#[derive(Debug)]
pub struct EnrichmentReport {
    /// Successfully enriched movies.
    pub movies: Vec<EnrichedMovie>,
    /// Items fully resolved and fetched.
    pub succeeded: usize,
    /// Items dropped (unresolvable, missing, or failed item-locally).
    pub failed: usize,
}

/// Fans resolution and detail fetching out over bounded batches.
///
/// At most `batch_size` items are in flight at once; the next batch is
/// only submitted once the previous one has fully completed. That is the
/// pipeline's only backpressure mechanism.
pub struct ParallelEnricher {
    resolver: Arc<TitleResolver>,
    fetcher: Arc<DetailFetcher>,
    batch_size: usize,
}

impl ParallelEnricher {
    pub fn new(resolver: Arc<TitleResolver>, fetcher: Arc<DetailFetcher>, batch_size: usize) -> Self {
        Self {
            resolver,
            fetcher,
            batch_size: batch_size.max(1),
        }
    }

    /// Enrich a list of raw items.
    ///
    /// A single item failing to resolve or fetch drops only that item.
    /// Credential problems and provider-wide throttling abort the whole
    /// call (see [`CatalogError::is_fatal`]).
    pub async fn enrich(&self, items: &[MovieItem]) -> Result<EnrichmentReport, CatalogError> {
        let mut movies = Vec::with_capacity(items.len());
        let mut failed = 0usize;

        for batch in items.chunks(self.batch_size) {
            let futures: Vec<_> = batch.iter().map(|item| self.enrich_one(item)).collect();

            for (item, result) in batch.iter().zip(join_all(futures).await) {
                match result {
                    Ok(Some(enriched)) => movies.push(enriched),
                    Ok(None) => {
                        debug!(title = %item.title, year = ?item.year, "not found in catalog");
                        failed += 1;
                    }
                    Err(e) if e.is_fatal() => return Err(e),
                    Err(e) => {
                        warn!(title = %item.title, error = %e, "enrichment failed");
                        failed += 1;
                    }
                }
            }
        }

        let succeeded = movies.len();
        info!(total = items.len(), succeeded, failed, "batch enrichment complete");

        Ok(EnrichmentReport {
            movies,
            succeeded,
            failed,
        })
    }

    async fn enrich_one(&self, item: &MovieItem) -> Result<Option<EnrichedMovie>, CatalogError> {
        let Some(id) = self.resolver.resolve(&item.title, item.year).await? else {
            return Ok(None);
        };
        let detail = self.fetcher.fetch(id).await?;
        Ok(Some(EnrichedMovie::new(item.clone(), detail)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use crate::catalog::{CacheStore, CatalogId};
    use crate::config::EnricherConfig;
    use crate::testing::{fixtures, MockCatalog};

    fn enricher(mock: Arc<MockCatalog>, batch_size: usize) -> ParallelEnricher {
        let cache = Arc::new(CacheStore::new(true));
        let resolver = Arc::new(TitleResolver::new(
            Arc::clone(&mock) as _,
            Arc::clone(&cache),
            &EnricherConfig::default(),
        ));
        let fetcher = Arc::new(DetailFetcher::new(mock as _, cache));
        ParallelEnricher::new(resolver, fetcher, batch_size)
    }

    async fn seed_movie(mock: &MockCatalog, id: u64, title: &str, year: u16) {
        mock.set_search_results(
            title,
            Some(year),
            vec![fixtures::search_result(id, title, Some(year))],
        )
        .await;
        mock.add_movie(fixtures::detail_record(id, title, Some(year)))
            .await;
    }

    #[tokio::test]
    async fn test_enrich_all_resolvable() {
        let mock = Arc::new(MockCatalog::new());
        seed_movie(&mock, 1, "Alpha", 2000).await;
        seed_movie(&mock, 2, "Beta", 2001).await;

        let enricher = enricher(Arc::clone(&mock), 10);
        let report = enricher
            .enrich(&[
                MovieItem::new("Alpha", Some(2000)),
                MovieItem::new("Beta", Some(2001)),
            ])
            .await
            .unwrap();

        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 0);
        assert_eq!(report.movies.len(), 2);
    }

    #[tokio::test]
    async fn test_partial_failures_return_exact_resolvable_subset() {
        let mock = Arc::new(MockCatalog::new());
        seed_movie(&mock, 1, "Alpha", 2000).await;
        seed_movie(&mock, 3, "Gamma", 2002).await;
        // "Beta" and "Delta" are not in the catalog at all

        let enricher = enricher(Arc::clone(&mock), 2);
        let report = enricher
            .enrich(&[
                MovieItem::new("Alpha", Some(2000)),
                MovieItem::new("Beta", Some(2001)),
                MovieItem::new("Gamma", Some(2002)),
                MovieItem::new("Delta", Some(2003)),
            ])
            .await
            .unwrap();

        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 2);

        let ids: HashSet<CatalogId> = report.movies.iter().map(|m| m.id()).collect();
        assert_eq!(ids, HashSet::from([CatalogId(1), CatalogId(3)]));
    }

    #[tokio::test]
    async fn test_resolved_but_unfetchable_item_is_dropped() {
        let mock = Arc::new(MockCatalog::new());
        // Resolves fine, but details are missing (404 on fetch)
        mock.set_search_results(
            "Ghost",
            Some(1990),
            vec![fixtures::search_result(9, "Ghost", Some(1990))],
        )
        .await;
        seed_movie(&mock, 1, "Alpha", 2000).await;

        let enricher = enricher(Arc::clone(&mock), 10);
        let report = enricher
            .enrich(&[
                MovieItem::new("Alpha", Some(2000)),
                MovieItem::new("Ghost", Some(1990)),
            ])
            .await
            .unwrap();

        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.movies[0].title(), "Alpha");
    }

    #[tokio::test]
    async fn test_fatal_error_aborts_batch() {
        let mock = Arc::new(MockCatalog::new());
        seed_movie(&mock, 1, "Alpha", 2000).await;
        mock.set_next_error(CatalogError::AuthenticationFailed("bad key".into()))
            .await;

        let enricher = enricher(Arc::clone(&mock), 10);
        let result = enricher.enrich(&[MovieItem::new("Alpha", Some(2000))]).await;

        assert!(matches!(
            result,
            Err(CatalogError::AuthenticationFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_repeated_enrichment_makes_no_further_calls() {
        let mock = Arc::new(MockCatalog::new());
        seed_movie(&mock, 242, "The Godfather", 1972).await;

        let enricher = enricher(Arc::clone(&mock), 10);
        let items = [MovieItem::new("The Godfather", Some(1972))];

        let report = enricher.enrich(&items).await.unwrap();
        assert_eq!(report.succeeded, 1);
        let calls_after_first = mock.query_count().await;

        let report = enricher.enrich(&items).await.unwrap();
        assert_eq!(report.succeeded, 1);
        assert_eq!(mock.query_count().await, calls_after_first);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let mock = Arc::new(MockCatalog::new());
        let enricher = enricher(mock, 10);
        let report = enricher.enrich(&[]).await.unwrap();
        assert_eq!(report.succeeded, 0);
        assert_eq!(report.failed, 0);
        assert!(report.movies.is_empty());
    }
}
