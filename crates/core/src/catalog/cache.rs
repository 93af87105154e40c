//! Process-lifetime cache for resolution and detail lookups.
//!
//! Entries are written once and read thereafter; nothing is evicted and
//! nothing expires. Negative resolution outcomes ("this title does not
//! exist in the catalog") are cached the same as hits so repeated misses
//! cost zero network calls.

use std::collections::HashMap;

use serde::Serialize;
use tokio::sync::RwLock;

use super::types::{CatalogId, DetailRecord};

/// Key for a cached resolution: normalized title plus optional year.
type ResolutionKey = (String, Option<u16>);

/// Cache introspection snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Total entries across both namespaces.
    pub size: usize,
    /// Whether caching is enabled at all.
    pub enabled: bool,
}

/// Shared in-memory cache for the enrichment pipeline.
///
/// When disabled by configuration every lookup misses and every insert is
/// a no-op, so callers never branch on the flag themselves.
pub struct CacheStore {
    enabled: bool,
    resolutions: RwLock<HashMap<ResolutionKey, Option<CatalogId>>>,
    details: RwLock<HashMap<CatalogId, DetailRecord>>,
}

impl CacheStore {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            resolutions: RwLock::new(HashMap::new()),
            details: RwLock::new(HashMap::new()),
        }
    }

    /// Look up a cached resolution outcome.
    ///
    /// `Some(None)` is a cached negative: the title was searched before
    /// and found absent.
    pub async fn get_resolution(
        &self,
        title: &str,
        year: Option<u16>,
    ) -> Option<Option<CatalogId>> {
        if !self.enabled {
            return None;
        }
        self.resolutions
            .read()
            .await
            .get(&(title.to_string(), year))
            .copied()
    }

    /// Record a resolution outcome, including absent ones.
    pub async fn put_resolution(&self, title: &str, year: Option<u16>, id: Option<CatalogId>) {
        if !self.enabled {
            return;
        }
        self.resolutions
            .write()
            .await
            .insert((title.to_string(), year), id);
    }

    /// Look up a cached detail record.
    pub async fn get_details(&self, id: CatalogId) -> Option<DetailRecord> {
        if !self.enabled {
            return None;
        }
        self.details.read().await.get(&id).cloned()
    }

    /// Record a detail record.
    pub async fn put_details(&self, record: DetailRecord) {
        if !self.enabled {
            return;
        }
        self.details.write().await.insert(record.id, record);
    }

    /// Current cache size and enabled flag.
    pub async fn stats(&self) -> CacheStats {
        let size = if self.enabled {
            self.resolutions.read().await.len() + self.details.read().await.len()
        } else {
            0
        };
        CacheStats {
            size,
            enabled: self.enabled,
        }
    }

    /// Drop every entry.
    pub async fn clear(&self) {
        self.resolutions.write().await.clear();
        self.details.write().await.clear();
    }
}
