//! TMDB (The Movie Database) catalog provider.
//!
//! All detail data for a movie is fetched in one composite request using
//! `append_to_response`, so credits, keywords and regional release data
//! cost a single unit of the request budget. Responses are converted to
//! the canonical types right here at the parsing boundary.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::config::TmdbConfig;

use super::transport::{RetryPolicy, RetryingTransport};
use super::types::{CastMember, CatalogId, DetailRecord, DiscoverFilter, SearchResult};
use super::{CatalogError, CatalogProvider, RateLimiter};

/// TMDB API client.
///
/// Owns its rate limiter and retrying transport; multiple independent
/// clients can coexist since nothing is process-global.
pub struct TmdbCatalog {
    client: Client,
    transport: RetryingTransport,
    rate_limiter: RateLimiter,
    base_url: String,
    image_base_url: String,
    api_key: String,
    region: String,
}

impl TmdbCatalog {
    /// Create a new TMDB catalog client.
    ///
    /// Fails with [`CatalogError::NotConfigured`] when the API key is
    /// missing.
    pub fn new(config: TmdbConfig) -> Result<Self, CatalogError> {
        if config.api_key.is_empty() {
            return Err(CatalogError::NotConfigured(
                "TMDB API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        Ok(Self {
            client,
            transport: RetryingTransport::new(RetryPolicy::default()),
            rate_limiter: RateLimiter::new(Duration::from_millis(
                config.min_request_interval_ms,
            )),
            base_url: config.base_url,
            image_base_url: config.image_base_url,
            api_key: config.api_key,
            region: config.region,
        })
    }

    /// Rate-limited, retried GET returning a deserialized payload.
    ///
    /// Status-derived errors are classified here, one layer above the
    /// retry boundary, so they are never retried.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        context: &str,
    ) -> Result<T, CatalogError> {
        self.rate_limiter.acquire().await;

        let url = format!("{}{}", self.base_url, path);
        debug!(path, context, "TMDB request");

        let request = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params);

        let response = self.transport.execute(request).await?;

        let status = response.status();
        match status.as_u16() {
            401 => {
                return Err(CatalogError::AuthenticationFailed(
                    "Invalid TMDB API key".to_string(),
                ))
            }
            429 => return Err(CatalogError::RateLimited),
            404 => return Err(CatalogError::NotFound(context.to_string())),
            _ if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                return Err(CatalogError::ApiError {
                    status: status.as_u16(),
                    message: body.chars().take(200).collect(),
                });
            }
            _ => {}
        }

        response
            .json()
            .await
            .map_err(|e| CatalogError::InvalidResponse(format!("{}: {}", context, e)))
    }
}

#[async_trait]
impl CatalogProvider for TmdbCatalog {
    async fn search_movies(
        &self,
        query: &str,
        year: Option<u16>,
    ) -> Result<Vec<SearchResult>, CatalogError> {
        let mut params = vec![("query", query.to_string())];
        if let Some(y) = year {
            params.push(("year", y.to_string()));
        }

        let response: ListingResponse = self
            .get_json("/search/movie", &params, "movie search")
            .await?;

        Ok(response.results.into_iter().map(|r| r.into()).collect())
    }

    async fn movie_details(&self, id: CatalogId) -> Result<DetailRecord, CatalogError> {
        let params = vec![(
            "append_to_response",
            "credits,keywords,release_dates".to_string(),
        )];

        let response: MovieDetailsResponse = self
            .get_json(
                &format!("/movie/{}", id),
                &params,
                &format!("movie {}", id),
            )
            .await?;

        Ok(response.into_record(&self.image_base_url, &self.region))
    }

    async fn similar_movies(
        &self,
        id: CatalogId,
        limit: usize,
    ) -> Result<Vec<SearchResult>, CatalogError> {
        let response: ListingResponse = self
            .get_json(
                &format!("/movie/{}/similar", id),
                &[],
                &format!("similar to {}", id),
            )
            .await?;

        Ok(response
            .results
            .into_iter()
            .take(limit)
            .map(|r| r.into())
            .collect())
    }

    async fn recommended_movies(
        &self,
        id: CatalogId,
        limit: usize,
    ) -> Result<Vec<SearchResult>, CatalogError> {
        let response: ListingResponse = self
            .get_json(
                &format!("/movie/{}/recommendations", id),
                &[],
                &format!("recommendations for {}", id),
            )
            .await?;

        Ok(response
            .results
            .into_iter()
            .take(limit)
            .map(|r| r.into())
            .collect())
    }

    async fn discover_movies(
        &self,
        filter: &DiscoverFilter,
        limit: usize,
    ) -> Result<Vec<SearchResult>, CatalogError> {
        let mut params = vec![("sort_by", "vote_count.desc".to_string())];

        if !filter.genres.is_empty() {
            params.push(("with_genres", join_ids(&filter.genres)));
        }
        if !filter.keywords.is_empty() {
            params.push(("with_keywords", join_ids(&filter.keywords)));
        }
        if let Some(y) = filter.min_year {
            params.push(("primary_release_date.gte", format!("{}-01-01", y)));
        }
        if let Some(y) = filter.max_year {
            params.push(("primary_release_date.lte", format!("{}-12-31", y)));
        }
        if let Some(r) = filter.min_rating {
            params.push(("vote_average.gte", r.to_string()));
        }

        let response: ListingResponse = self
            .get_json("/discover/movie", &params, "discover")
            .await?;

        Ok(response
            .results
            .into_iter()
            .take(limit)
            .map(|r| r.into())
            .collect())
    }
}

fn join_ids(ids: &[u32]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Strict ISO release-year parse. Malformed or missing dates yield
/// `None`, never an error.
fn parse_release_year(date: Option<&str>) -> Option<u16> {
    let date = date?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .map(|d| d.year() as u16)
}

/// Lenient year-prefix parse for listing entries, where dates may be
/// partial ("2008-01").
fn listing_year(date: Option<&str>) -> Option<u16> {
    date?.split('-').next().and_then(|y| y.parse().ok())
}

// ============================================================================
// TMDB API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct ListingResponse {
    #[serde(default)]
    results: Vec<MovieListing>,
}

#[derive(Debug, Deserialize)]
struct MovieListing {
    id: u64,
    title: String,
    release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MovieDetailsResponse {
    id: u64,
    title: String,
    original_title: Option<String>,
    release_date: Option<String>,
    runtime: Option<u32>,
    overview: Option<String>,
    tagline: Option<String>,
    status: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    #[serde(default)]
    genres: Vec<Named>,
    #[serde(default)]
    vote_average: f32,
    #[serde(default)]
    vote_count: u32,
    #[serde(default)]
    popularity: f32,
    #[serde(default)]
    budget: u64,
    #[serde(default)]
    revenue: u64,
    imdb_id: Option<String>,
    #[serde(default)]
    credits: CreditsResponse,
    #[serde(default)]
    keywords: KeywordsResponse,
    #[serde(default)]
    release_dates: ReleaseDatesResponse,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct CreditsResponse {
    #[serde(default)]
    cast: Vec<CastEntry>,
    #[serde(default)]
    crew: Vec<CrewEntry>,
}

#[derive(Debug, Deserialize)]
struct CastEntry {
    name: String,
    profile_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CrewEntry {
    name: String,
    job: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct KeywordsResponse {
    #[serde(default)]
    keywords: Vec<Named>,
}

#[derive(Debug, Default, Deserialize)]
struct ReleaseDatesResponse {
    #[serde(default)]
    results: Vec<RegionalReleases>,
}

#[derive(Debug, Deserialize)]
struct RegionalReleases {
    iso_3166_1: String,
    #[serde(default)]
    release_dates: Vec<ReleaseEntry>,
}

#[derive(Debug, Deserialize)]
struct ReleaseEntry {
    #[serde(default)]
    certification: String,
}

// ============================================================================
// Conversions
// ============================================================================

impl From<MovieListing> for SearchResult {
    fn from(r: MovieListing) -> Self {
        Self {
            id: CatalogId(r.id),
            release_year: listing_year(r.release_date.as_deref()),
            title: r.title,
        }
    }
}

impl MovieDetailsResponse {
    fn into_record(self, image_base_url: &str, region: &str) -> DetailRecord {
        let directors = self
            .credits
            .crew
            .into_iter()
            .filter(|c| c.job.as_deref() == Some("Director"))
            .map(|c| c.name)
            .collect();

        let cast = self
            .credits
            .cast
            .into_iter()
            .take(5)
            .map(|c| CastMember {
                profile_url: c
                    .profile_path
                    .map(|p| format!("{}{}", image_base_url, p)),
                name: c.name,
            })
            .collect();

        // Scan the target region's entries from most recent to oldest and
        // keep the first non-empty rating.
        let certification = self
            .release_dates
            .results
            .iter()
            .find(|r| r.iso_3166_1 == region)
            .and_then(|r| {
                r.release_dates
                    .iter()
                    .rev()
                    .map(|rd| rd.certification.trim())
                    .find(|c| !c.is_empty())
                    .map(|c| c.to_string())
            });

        DetailRecord {
            id: CatalogId(self.id),
            original_title: self.original_title.unwrap_or_else(|| self.title.clone()),
            release_year: parse_release_year(self.release_date.as_deref()),
            release_date: self.release_date.unwrap_or_default(),
            overview: self.overview.unwrap_or_default(),
            genres: self.genres.into_iter().map(|g| g.name).collect(),
            directors,
            cast,
            runtime_minutes: self.runtime,
            vote_average: self.vote_average,
            vote_count: self.vote_count,
            popularity: self.popularity,
            keywords: self.keywords.keywords.into_iter().map(|k| k.name).collect(),
            certification,
            poster_url: self
                .poster_path
                .map(|p| format!("{}{}", image_base_url, p)),
            backdrop_path: self.backdrop_path,
            tagline: self.tagline.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            budget: self.budget,
            revenue: self.revenue,
            external_id: self.imdb_id,
            title: self.title,
        }
    }
}
