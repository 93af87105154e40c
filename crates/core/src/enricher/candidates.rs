//! Candidate pool construction from a watched set.
//!
//! Neighbors come from the provider's "similar" and "recommended"
//! listings, half the per-seed budget each, deduplicated against both
//! the watched set and what has already been gathered. Seeds past the
//! point where the pool fills are never queried.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::catalog::{
    CatalogError, CatalogId, CatalogProvider, DetailRecord, EnrichedMovie,
};

use super::fetcher::DetailFetcher;

/// Builds deduplicated, bounded candidate pools.
pub struct CandidatePoolBuilder {
    provider: Arc<dyn CatalogProvider>,
    fetcher: Arc<DetailFetcher>,
    batch_size: usize,
}

impl CandidatePoolBuilder {
    pub fn new(
        provider: Arc<dyn CatalogProvider>,
        fetcher: Arc<DetailFetcher>,
        batch_size: usize,
    ) -> Self {
        Self {
            provider,
            fetcher,
            batch_size: batch_size.max(1),
        }
    }

    /// Build a candidate pool from enriched watched movies.
    ///
    /// The result never intersects the watched set and never exceeds
    /// `max_total`. When `min_rating` is set it is applied after
    /// enrichment and after the size cutoff, so the pool may come back
    /// smaller; it is never backfilled from further seeds.
    pub async fn build(
        &self,
        watched: &[EnrichedMovie],
        per_seed_limit: usize,
        max_total: usize,
        min_rating: Option<f32>,
    ) -> Result<Vec<DetailRecord>, CatalogError> {
        let watched_ids: HashSet<CatalogId> = watched.iter().map(|m| m.id()).collect();

        let candidate_ids = self
            .gather_candidate_ids(watched, &watched_ids, per_seed_limit, max_total)
            .await?;

        debug!(candidates = candidate_ids.len(), "gathered unique candidate ids");

        let mut records = self.fetch_candidates(&candidate_ids).await?;

        if let Some(min) = min_rating {
            let before = records.len();
            records.retain(|r| r.vote_average >= min);
            debug!(
                kept = records.len(),
                filtered = before - records.len(),
                min_rating = min,
                "applied rating filter"
            );
        }

        info!(
            seeds = watched.len(),
            pool = records.len(),
            "candidate pool built"
        );

        Ok(records)
    }

    /// Collect unique neighbor ids seed by seed until the pool fills.
    async fn gather_candidate_ids(
        &self,
        watched: &[EnrichedMovie],
        watched_ids: &HashSet<CatalogId>,
        per_seed_limit: usize,
        max_total: usize,
    ) -> Result<Vec<CatalogId>, CatalogError> {
        let half = per_seed_limit / 2;
        let mut seen: HashSet<CatalogId> = HashSet::new();
        let mut ordered: Vec<CatalogId> = Vec::new();

        for seed in watched {
            let id = seed.id();

            let listings = [
                self.provider.similar_movies(id, half).await,
                self.provider.recommended_movies(id, half).await,
            ];

            for listing in listings {
                match listing {
                    Ok(neighbors) => {
                        for neighbor in neighbors {
                            if !watched_ids.contains(&neighbor.id) && seen.insert(neighbor.id) {
                                ordered.push(neighbor.id);
                            }
                        }
                    }
                    Err(e) if e.is_fatal() => return Err(e),
                    Err(e) => {
                        warn!(seed = %id, error = %e, "neighbor listing failed");
                    }
                }
            }

            // Seeds beyond the crossing point are never queried.
            if ordered.len() >= max_total {
                break;
            }
        }

        ordered.truncate(max_total);
        Ok(ordered)
    }

    /// Detail-fetch the surviving ids through the shared bounded pool.
    async fn fetch_candidates(
        &self,
        ids: &[CatalogId],
    ) -> Result<Vec<DetailRecord>, CatalogError> {
        let mut records = Vec::with_capacity(ids.len());

        for batch in ids.chunks(self.batch_size) {
            let futures: Vec<_> = batch.iter().map(|&id| self.fetcher.fetch(id)).collect();

            for (id, result) in batch.iter().zip(join_all(futures).await) {
                match result {
                    Ok(record) => records.push(record),
                    Err(e) if e.is_fatal() => return Err(e),
                    Err(e) => {
                        warn!(%id, error = %e, "candidate detail fetch failed");
                    }
                }
            }
        }

        Ok(records)
    }
}
