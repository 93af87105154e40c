use serde::{Deserialize, Serialize};

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub enricher: EnricherConfig,
}

/// TMDB catalog provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    /// TMDB API key (required)
    pub api_key: String,
    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Image base URL for posters and cast profiles
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    /// Minimum interval between outbound requests in milliseconds
    #[serde(default = "default_min_request_interval")]
    pub min_request_interval_ms: u64,
    /// Region used for certification lookup (ISO 3166-1)
    #[serde(default = "default_region")]
    pub region: String,
    /// Whether the in-process cache is enabled
    #[serde(default = "default_enable_cache")]
    pub enable_cache: bool,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
            timeout_secs: default_timeout(),
            min_request_interval_ms: default_min_request_interval(),
            region: default_region(),
            enable_cache: default_enable_cache(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_min_request_interval() -> u64 {
    100
}

fn default_region() -> String {
    "US".to_string()
}

fn default_enable_cache() -> bool {
    true
}

/// Enrichment pipeline configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EnricherConfig {
    /// Items in flight per batch (default: 10)
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Fuzzy-match acceptance threshold, 0-100
    #[serde(default = "default_match_threshold")]
    pub match_threshold: u8,
    /// Lowered last-resort threshold, 0-100
    #[serde(default = "default_relaxed_threshold")]
    pub relaxed_threshold: u8,
    /// Score bonus for an exact release-year match
    #[serde(default = "default_year_bonus")]
    pub year_bonus: u8,
}

impl Default for EnricherConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            match_threshold: default_match_threshold(),
            relaxed_threshold: default_relaxed_threshold(),
            year_bonus: default_year_bonus(),
        }
    }
}

fn default_batch_size() -> usize {
    10
}

fn default_match_threshold() -> u8 {
    85
}

fn default_relaxed_threshold() -> u8 {
    75
}

fn default_year_bonus() -> u8 {
    15
}

/// Sanitized config for introspection surfaces (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub tmdb: SanitizedTmdbConfig,
    pub enricher: EnricherConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTmdbConfig {
    pub api_key: String,
    pub base_url: String,
    pub image_base_url: String,
    pub timeout_secs: u32,
    pub min_request_interval_ms: u64,
    pub region: String,
    pub enable_cache: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            tmdb: SanitizedTmdbConfig {
                api_key: "***".to_string(),
                base_url: config.tmdb.base_url.clone(),
                image_base_url: config.tmdb.image_base_url.clone(),
                timeout_secs: config.tmdb.timeout_secs,
                min_request_interval_ms: config.tmdb.min_request_interval_ms,
                region: config.tmdb.region.clone(),
                enable_cache: config.tmdb.enable_cache,
            },
            enricher: config.enricher.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tmdb_defaults() {
        let config = TmdbConfig::default();
        assert_eq!(config.base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.image_base_url, "https://image.tmdb.org/t/p/w500");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.min_request_interval_ms, 100);
        assert_eq!(config.region, "US");
        assert!(config.enable_cache);
    }

    #[test]
    fn test_enricher_defaults() {
        let config = EnricherConfig::default();
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.match_threshold, 85);
        assert_eq!(config.relaxed_threshold, 75);
        assert_eq!(config.year_bonus, 15);
    }

    #[test]
    fn test_sanitized_redacts_api_key() {
        let config = Config {
            tmdb: TmdbConfig {
                api_key: "super-secret".to_string(),
                ..TmdbConfig::default()
            },
            enricher: EnricherConfig::default(),
        };

        let sanitized = SanitizedConfig::from(&config);
        assert_eq!(sanitized.tmdb.api_key, "***");
        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("super-secret"));
    }
}
