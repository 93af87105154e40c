//! Title-to-identity resolution.
//!
//! Free-text titles from scraped lists rarely match catalog titles
//! exactly ("WALL·E" vs "Wall-E", "Le fabuleux destin d'Amélie Poulain"
//! vs "Amélie"), so resolution cascades from exact year matching through
//! fuzzy scoring down to a best-effort fallback. Every outcome, including
//! "not in the catalog", is cached for the life of the process.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex_lite::Regex;
use tracing::debug;

use crate::catalog::{CacheStore, CatalogError, CatalogId, CatalogProvider, SearchResult};
use crate::config::EnricherConfig;

/// Fuzzy matching only ever considers the top results of a search page.
const FUZZY_WINDOW: usize = 10;

static LEADING_ARTICLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(the|a|an|le|la|les|un|une|der|die|das|el|los|las)\s+").unwrap()
});

/// Normalize a title for matching and cache keying.
///
/// Lowercases, strips one leading article in common languages, drops
/// everything non-alphanumeric and collapses whitespace. Idempotent.
pub fn normalize(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = LEADING_ARTICLE.replace(&lowered, "");
    let cleaned: String = stripped
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Similarity ratio between two normalized strings, 0-100.
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b) * 100.0
}

/// Maps `(title, year?)` inputs to catalog identities.
pub struct TitleResolver {
    provider: Arc<dyn CatalogProvider>,
    cache: Arc<CacheStore>,
    match_threshold: f64,
    relaxed_threshold: f64,
    year_bonus: f64,
}

impl TitleResolver {
    pub fn new(
        provider: Arc<dyn CatalogProvider>,
        cache: Arc<CacheStore>,
        config: &EnricherConfig,
    ) -> Self {
        Self {
            provider,
            cache,
            match_threshold: config.match_threshold as f64,
            relaxed_threshold: config.relaxed_threshold as f64,
            year_bonus: config.year_bonus as f64,
        }
    }

    /// Resolve a title to a catalog identity.
    ///
    /// Returns `Ok(None)` when the catalog simply has no match; that is
    /// an outcome, not an error, and is cached like any hit.
    pub async fn resolve(
        &self,
        title: &str,
        year: Option<u16>,
    ) -> Result<Option<CatalogId>, CatalogError> {
        let key = normalize(title);
        if let Some(cached) = self.cache.get_resolution(&key, year).await {
            return Ok(cached);
        }

        let resolved = self.resolve_uncached(title, year).await?;
        self.cache.put_resolution(&key, year, resolved).await;
        Ok(resolved)
    }

    async fn resolve_uncached(
        &self,
        title: &str,
        year: Option<u16>,
    ) -> Result<Option<CatalogId>, CatalogError> {
        let results = self.provider.search_movies(title, year).await?;

        // Strategy 1: the year-constrained search already nailed it.
        if let (Some(y), Some(first)) = (year, results.first()) {
            if first.release_year == Some(y) {
                return Ok(Some(first.id));
            }
        }

        // Strategy 2: the year constraint may have excluded the right
        // entry; search again without it and fuzzy-match.
        let mut unconstrained = None;
        if year.is_some() {
            debug!(title, ?year, "retrying search without year constraint");
            let no_year = self.provider.search_movies(title, None).await?;
            if let Some(id) = self.fuzzy_match(title, &no_year, year, self.match_threshold) {
                return Ok(Some(id));
            }
            unconstrained = Some(no_year);
        }

        // Strategy 3: fuzzy-match within the original result set.
        if let Some(id) = self.fuzzy_match(title, &results, year, self.match_threshold) {
            return Ok(Some(id));
        }

        // Strategy 4: best-effort fallback to the top result.
        if let Some(first) = results.first() {
            debug!(title, id = %first.id, "using best available match");
            return Ok(Some(first.id));
        }

        // Strategy 5: last resort with a lowered threshold.
        if year.is_some() {
            let pool = unconstrained.as_deref().unwrap_or(&results);
            if let Some(id) = self.fuzzy_match(title, pool, year, self.relaxed_threshold) {
                return Ok(Some(id));
            }
        }

        Ok(None)
    }

    /// Best fuzzy candidate at or above `threshold`, if any.
    fn fuzzy_match(
        &self,
        title: &str,
        results: &[SearchResult],
        year: Option<u16>,
        threshold: f64,
    ) -> Option<CatalogId> {
        let wanted = normalize(title);

        let mut best: Option<CatalogId> = None;
        let mut best_score = 0.0;

        for result in results.iter().take(FUZZY_WINDOW) {
            let mut score = similarity(&wanted, &normalize(&result.title));
            if year.is_some() && result.release_year == year {
                score += self.year_bonus;
            }

            if score >= threshold && score > best_score {
                best_score = score;
                best = Some(result.id);
            }
        }

        if let Some(id) = best {
            debug!(title, %id, score = best_score, "fuzzy match");
        }
        best
    }
}
