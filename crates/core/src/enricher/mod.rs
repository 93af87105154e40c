//! The enrichment pipeline: title resolution, detail fetching, bounded
//! parallel batching and candidate pool construction.
//!
//! All stages share one [`CacheStore`](crate::catalog::CacheStore) so a
//! title resolved or a record fetched anywhere in the pipeline is never
//! requested from the provider again.

mod candidates;
mod fetcher;
mod parallel;
mod resolver;

pub use candidates::CandidatePoolBuilder;
pub use fetcher::DetailFetcher;
pub use parallel::{EnrichmentReport, ParallelEnricher};
pub use resolver::{normalize, similarity, TitleResolver};
