//! Catalog-enrichment core for cinescout.
//!
//! Resolves free-text movie titles against an external metadata catalog,
//! fetches full detail records under a strict per-provider request budget,
//! and assembles deduplicated candidate pools for downstream ranking.

pub mod catalog;
pub mod client;
pub mod config;
pub mod enricher;
pub mod testing;

pub use catalog::{
    CacheStats, CacheStore, CastMember, CatalogError, CatalogId, CatalogProvider, DetailRecord,
    DiscoverFilter, EnrichedMovie, MovieItem, RateLimiter, RetryPolicy, RetryingTransport,
    SearchResult, TmdbCatalog,
};
pub use client::CatalogClient;
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, EnricherConfig,
    SanitizedConfig, TmdbConfig,
};
pub use enricher::{
    CandidatePoolBuilder, DetailFetcher, EnrichmentReport, ParallelEnricher, TitleResolver,
};
