//! Canned catalog data for tests.

use crate::catalog::{CatalogId, DetailRecord, SearchResult};

pub fn search_result(id: u64, title: &str, year: Option<u16>) -> SearchResult {
    SearchResult {
        id: CatalogId(id),
        title: title.to_string(),
        release_year: year,
    }
}

pub fn detail_record(id: u64, title: &str, year: Option<u16>) -> DetailRecord {
    DetailRecord {
        id: CatalogId(id),
        title: title.to_string(),
        original_title: title.to_string(),
        release_year: year,
        release_date: year.map(|y| format!("{y}-06-15")).unwrap_or_default(),
        overview: format!("Overview of {title}."),
        genres: vec!["Drama".to_string()],
        directors: vec!["Jane Director".to_string()],
        cast: vec![],
        runtime_minutes: Some(117),
        vote_average: 7.4,
        vote_count: 1200,
        popularity: 42.0,
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

/// A detail record with a specific average vote, for rating-filter tests.
pub fn detail_record_rated(id: u64, title: &str, vote_average: f32) -> DetailRecord {
    DetailRecord {
        vote_average,
        ..detail_record(id, title, Some(2010))
    }
}
