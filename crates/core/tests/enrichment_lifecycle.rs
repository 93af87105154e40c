//! Enrichment lifecycle integration tests.
//!
//! These tests run the full client against the mock provider:
//! - Resolution cascade from exact to fuzzy to fallback
//! - Cache behavior across repeated operations
//! - Partial failure isolation in batches
//! - Candidate pool deduplication and bounds

use std::collections::HashSet;
use std::sync::Arc;

use cinescout_core::{
    testing::{fixtures, MockCatalog},
    CatalogClient, CatalogError, CatalogId, EnrichedMovie, EnricherConfig, MovieItem,
};

/// Test helper wiring the client to a mock provider.
struct TestHarness {
    client: CatalogClient,
    catalog: Arc<MockCatalog>,
}

impl TestHarness {
    fn new() -> Self {
        Self::with_config(EnricherConfig::default())
    }

    fn with_config(config: EnricherConfig) -> Self {
        let catalog = Arc::new(MockCatalog::new());
        let client = CatalogClient::with_provider(Arc::clone(&catalog) as _, &config, true);
        Self { client, catalog }
    }

    /// Register a movie that resolves cleanly by title and year.
    async fn add_known_movie(&self, id: u64, title: &str, year: u16) {
        self.catalog
            .set_search_results(
                title,
                Some(year),
                vec![fixtures::search_result(id, title, Some(year))],
            )
            .await;
        self.catalog
            .add_movie(fixtures::detail_record(id, title, Some(year)))
            .await;
    }

    /// Register a neighbor listing plus fetchable records for a seed.
    async fn add_neighbors(&self, seed: u64, similar: &[u64], recommended: &[u64]) {
        for &id in similar.iter().chain(recommended) {
            self.catalog
                .add_movie(fixtures::detail_record(id, &format!("Movie {id}"), Some(2012)))
                .await;
        }
        self.catalog
            .set_similar(
                CatalogId(seed),
                similar
                    .iter()
                    .map(|&id| fixtures::search_result(id, &format!("Movie {id}"), Some(2012)))
                    .collect(),
            )
            .await;
        self.catalog
            .set_recommended(
                CatalogId(seed),
                recommended
                    .iter()
                    .map(|&id| fixtures::search_result(id, &format!("Movie {id}"), Some(2012)))
                    .collect(),
            )
            .await;
    }
}

#[tokio::test]
async fn test_enrich_and_reenrich_hits_cache() {
    let harness = TestHarness::new();
    harness.add_known_movie(242, "The Godfather", 1972).await;
    harness.add_known_movie(603, "The Matrix", 1999).await;

    let items = [
        MovieItem::new("The Godfather", Some(1972)),
        MovieItem::new("The Matrix", Some(1999)),
    ];

    let report = harness.client.enrich_movies(&items).await.unwrap();
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed, 0);
    let calls = harness.catalog.query_count().await;

    // Everything is cached: the second run touches the provider zero times
    let report = harness.client.enrich_movies(&items).await.unwrap();
    assert_eq!(report.succeeded, 2);
    assert_eq!(harness.catalog.query_count().await, calls);
}

#[tokio::test]
async fn test_fuzzy_resolution_across_punctuation() {
    let harness = TestHarness::new();
    harness
        .catalog
        .set_search_results(
            "Wall-E",
            None,
            vec![
                fixtures::search_result(5, "Wallace & Gromit", Some(2005)),
                fixtures::search_result(10681, "WALL·E", Some(2008)),
            ],
        )
        .await;
    harness
        .catalog
        .add_movie(fixtures::detail_record(10681, "WALL·E", Some(2008)))
        .await;

    let report = harness
        .client
        .enrich_movies(&[MovieItem::new("Wall-E", None)])
        .await
        .unwrap();

    assert_eq!(report.succeeded, 1);
    assert_eq!(report.movies[0].id(), CatalogId(10681));
    assert_eq!(report.movies[0].title(), "WALL·E");
}

#[tokio::test]
async fn test_partial_failure_returns_resolvable_subset() {
    let harness = TestHarness::with_config(EnricherConfig {
        batch_size: 2,
        ..EnricherConfig::default()
    });
    harness.add_known_movie(1, "Alpha", 2000).await;
    harness.add_known_movie(3, "Gamma", 2002).await;

    let report = harness
        .client
        .enrich_movies(&[
            MovieItem::new("Alpha", Some(2000)),
            MovieItem::new("Unknown One", Some(2001)),
            MovieItem::new("Gamma", Some(2002)),
            MovieItem::new("Unknown Two", Some(2003)),
        ])
        .await
        .unwrap();

    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed, 2);
    let ids: HashSet<CatalogId> = report.movies.iter().map(|m| m.id()).collect();
    assert_eq!(ids, HashSet::from([CatalogId(1), CatalogId(3)]));
}

#[tokio::test]
async fn test_auth_failure_aborts_enrichment() {
    let harness = TestHarness::new();
    harness.add_known_movie(1, "Alpha", 2000).await;
    harness
        .catalog
        .set_next_error(CatalogError::AuthenticationFailed("bad key".into()))
        .await;

    let result = harness
        .client
        .enrich_movies(&[MovieItem::new("Alpha", Some(2000))])
        .await;

    assert!(matches!(result, Err(CatalogError::AuthenticationFailed(_))));
}

#[tokio::test]
async fn test_candidate_pool_end_to_end() {
    let harness = TestHarness::new();
    harness.add_known_movie(1, "Seed One", 2000).await;
    harness.add_known_movie(2, "Seed Two", 2001).await;
    // Listings overlap and include the seeds themselves
    harness.add_neighbors(1, &[2, 10, 11], &[12]).await;
    harness.add_neighbors(2, &[10, 13], &[1, 14]).await;

    let report = harness
        .client
        .enrich_movies(&[
            MovieItem::new("Seed One", Some(2000)),
            MovieItem::new("Seed Two", Some(2001)),
        ])
        .await
        .unwrap();
    let watched: Vec<EnrichedMovie> = report.movies;

    let pool = harness
        .client
        .build_candidate_pool(&watched, 6, 50, None)
        .await
        .unwrap();

    let pool_ids: HashSet<CatalogId> = pool.iter().map(|r| r.id).collect();
    // No watched ids, no duplicates
    assert!(!pool_ids.contains(&CatalogId(1)));
    assert!(!pool_ids.contains(&CatalogId(2)));
    assert_eq!(pool.len(), pool_ids.len());
    assert_eq!(
        pool_ids,
        HashSet::from([
            CatalogId(10),
            CatalogId(11),
            CatalogId(12),
            CatalogId(13),
            CatalogId(14),
        ])
    );
}

#[tokio::test]
async fn test_candidate_pool_respects_max_and_rating() {
    let harness = TestHarness::new();
    harness.add_known_movie(1, "Seed One", 2000).await;
    harness.add_neighbors(1, &[10, 11], &[12, 13]).await;
    // One candidate falls below the rating floor
    harness
        .catalog
        .add_movie(fixtures::detail_record_rated(11, "Movie 11", 3.2))
        .await;

    let report = harness
        .client
        .enrich_movies(&[MovieItem::new("Seed One", Some(2000))])
        .await
        .unwrap();

    let pool = harness
        .client
        .build_candidate_pool(&report.movies, 4, 3, Some(6.0))
        .await
        .unwrap();

    // The cutoff kept 3 of 4 ids, then the filter dropped the low-rated one
    assert!(pool.len() <= 3);
    assert!(pool.iter().all(|r| r.vote_average >= 6.0));
}

#[tokio::test]
async fn test_cache_stats_reflect_activity() {
    let harness = TestHarness::new();
    harness.add_known_movie(949, "Heat", 1995).await;

    let stats = harness.client.cache_stats().await;
    assert!(stats.enabled);
    assert_eq!(stats.size, 0);

    harness
        .client
        .enrich_movies(&[MovieItem::new("Heat", Some(1995))])
        .await
        .unwrap();

    // One resolution entry plus one detail record
    assert_eq!(harness.client.cache_stats().await.size, 2);

    harness.client.clear_cache().await;
    assert_eq!(harness.client.cache_stats().await.size, 0);
}

#[tokio::test]
async fn test_unresolvable_title_cached_as_negative() {
    let harness = TestHarness::new();

    let report = harness
        .client
        .enrich_movies(&[MovieItem::new("No Such Film", None)])
        .await
        .unwrap();
    assert_eq!(report.succeeded, 0);
    assert_eq!(report.failed, 1);
    let calls = harness.catalog.query_count().await;

    let report = harness
        .client
        .enrich_movies(&[MovieItem::new("No Such Film", None)])
        .await
        .unwrap();
    assert_eq!(report.failed, 1);
    assert_eq!(harness.catalog.query_count().await, calls);
}
