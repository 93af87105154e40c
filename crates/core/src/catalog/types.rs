//! Canonical types for catalog data.
//!
//! Provider responses are converted into these shapes at the parsing
//! boundary; nothing downstream branches on raw payload structure.

use serde::{Deserialize, Serialize};

/// Opaque identity of a title in the external catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogId(pub u64);

impl std::fmt::Display for CatalogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A raw input item as produced by list/profile scraping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieItem {
    /// Free-text title.
    pub title: String,
    /// Release year, when the source knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
}

impl MovieItem {
    pub fn new(title: impl Into<String>, year: Option<u16>) -> Self {
        Self {
            title: title.into(),
            year,
        }
    }
}

/// A lightweight entry from search, similar or recommended listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Catalog identity.
    pub id: CatalogId,
    /// Title as listed by the provider.
    pub title: String,
    /// Release year, when the listing carries a parseable date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_year: Option<u16>,
}

/// A billed cast member with an optional profile image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    /// Actor name.
    pub name: String,
    /// Profile image URL, built only when the provider has an image path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
}

/// Full metadata record for one catalog identity.
///
/// Assembled from a single composite provider response. A record is
/// either complete or absent; partially populated records are never
/// handed out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailRecord {
    /// Catalog identity.
    pub id: CatalogId,
    /// Display title.
    pub title: String,
    /// Title in the original language.
    pub original_title: String,
    /// Release year, strictly parsed from the release date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_year: Option<u16>,
    /// Release date as reported (YYYY-MM-DD, possibly empty).
    pub release_date: String,
    /// Synopsis.
    pub overview: String,
    /// Genre names.
    #[serde(default)]
    pub genres: Vec<String>,
    /// Directors in credit order.
    #[serde(default)]
    pub directors: Vec<String>,
    /// Top billed cast (at most five), in billing order.
    #[serde(default)]
    pub cast: Vec<CastMember>,
    /// Runtime in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_minutes: Option<u32>,
    /// Average vote (0-10).
    pub vote_average: f32,
    /// Number of votes.
    pub vote_count: u32,
    /// Provider popularity score.
    pub popularity: f32,
    /// Keyword names.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Regional certification (G, PG-13, ...), when published.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certification: Option<String>,
    /// Poster image URL, built only when the provider has a poster path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    /// Backdrop path relative to the image base.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop_path: Option<String>,
    /// Tagline.
    pub tagline: String,
    /// Release status (Released, Post Production, ...).
    pub status: String,
    /// Production budget in USD.
    pub budget: u64,
    /// Box office revenue in USD.
    pub revenue: u64,
    /// External (IMDB) identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

/// A source item merged with its resolved detail record.
///
/// Exists only when resolution succeeded; on overlapping fields the
/// detail record wins, so accessors read from the record and the original
/// scraped values stay available under `source`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedMovie {
    /// The raw input item this record was resolved from.
    pub source: MovieItem,
    /// The full catalog record.
    pub detail: DetailRecord,
}

impl EnrichedMovie {
    pub fn new(source: MovieItem, detail: DetailRecord) -> Self {
        Self { source, detail }
    }

    /// Catalog identity of the resolved record.
    pub fn id(&self) -> CatalogId {
        self.detail.id
    }

    /// Canonical title (the catalog's, not the scraped one).
    pub fn title(&self) -> &str {
        &self.detail.title
    }

    /// Canonical release year, falling back to the scraped year when the
    /// catalog date was unparseable.
    pub fn year(&self) -> Option<u16> {
        self.detail.release_year.or(self.source.year)
    }
}

/// Filter for the discover endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscoverFilter {
    /// Provider genre ids to require.
    #[serde(default)]
    pub genres: Vec<u32>,
    /// Provider keyword ids to require.
    #[serde(default)]
    pub keywords: Vec<u32>,
    /// Earliest release year, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_year: Option<u16>,
    /// Latest release year, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_year: Option<u16>,
    /// Minimum average vote.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_detail(id: u64, title: &str, year: Option<u16>) -> DetailRecord {
        DetailRecord {
            id: CatalogId(id),
            title: title.to_string(),
            original_title: title.to_string(),
            release_year: year,
            release_date: year.map(|y| format!("{y}-01-01")).unwrap_or_default(),
            overview: String::new(),
            genres: vec![],
            directors: vec![],
            cast: vec![],
            runtime_minutes: None,
            vote_average: 7.5,
            vote_count: 100,
            popularity: 10.0,
            keywords: vec![],
            certification: None,
            poster_url: None,
            backdrop_path: None,
            tagline: String::new(),
            status: "Released".to_string(),
            budget: 0,
            revenue: 0,
            external_id: None,
        }
    }

    #[test]
    fn test_enriched_movie_detail_wins() {
        let source = MovieItem::new("the godfather", Some(1971)); // scraper got the year wrong
        let detail = sample_detail(242, "The Godfather", Some(1972));
        let enriched = EnrichedMovie::new(source, detail);

        assert_eq!(enriched.title(), "The Godfather");
        assert_eq!(enriched.year(), Some(1972));
        assert_eq!(enriched.id(), CatalogId(242));
        // The scraped values stay reachable
        assert_eq!(enriched.source.title, "the godfather");
    }

    #[test]
    fn test_enriched_movie_year_fallback() {
        let source = MovieItem::new("Obscure Film", Some(1964));
        let detail = sample_detail(7, "Obscure Film", None);
        let enriched = EnrichedMovie::new(source, detail);

        assert_eq!(enriched.year(), Some(1964));
    }

    #[test]
    fn test_catalog_id_display_and_serde() {
        let id = CatalogId(603);
        assert_eq!(id.to_string(), "603");
        assert_eq!(serde_json::to_string(&id).unwrap(), "603");
        let back: CatalogId = serde_json::from_str("603").unwrap();
        assert_eq!(back, id);
    }
}
