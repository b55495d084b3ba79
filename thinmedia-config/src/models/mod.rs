pub mod legacy;

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thinmedia_core::matching::DEFAULT_MIN_MATCH;
use thinmedia_core::providers::tmdb::{TMDB_API_BASE, TMDB_IMAGE_BASE};
use thinmedia_core::rate_limit::{DEFAULT_CAPACITY, DEFAULT_INTERVAL};
use thinmedia_core::{
    DEFAULT_ARTWORK_HEIGHT, IndexerSettings, RateLimitSettings, TmdbEndpoints,
    default_media_extensions_vec,
};

/// Name of the only metadata provider the indexer ships with.
pub const TMDB_PROVIDER: &str = "tmdb";

/// File name of the catalog inside the data directory when `catalog_path`
/// is not set.
pub const DEFAULT_CATALOG_FILE: &str = "catalog.json";

/// Complete indexer configuration. Every section is optional in the source
/// file; missing values fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct IndexerConfig {
    pub metadata: MetadataConfig,
    pub rate_limit: RateLimitConfig,
    pub artwork: ArtworkConfig,
    pub library: LibraryConfig,
    pub matching: MatchingConfig,
    /// Where the JSON catalog lives. Defaults to `<data_dir>/catalog.json`.
    pub catalog_path: Option<PathBuf>,
}

/// Which metadata provider to talk to and how to reach it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MetadataConfig {
    pub provider: String,
    /// TMDB v3 API key. `$TMDB_API_KEY` takes precedence when set.
    pub api_key: String,
    pub api_base: String,
    pub image_base: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            provider: TMDB_PROVIDER.to_string(),
            api_key: String::new(),
            api_base: TMDB_API_BASE.to_string(),
            image_base: TMDB_IMAGE_BASE.to_string(),
        }
    }
}

/// Token bucket shared by every provider call: `capacity` calls per
/// `interval_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub capacity: u32,
    pub interval_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            interval_ms: DEFAULT_INTERVAL.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ArtworkConfig {
    /// Height in pixels every downloaded image is resized to.
    pub target_height: u32,
    pub episode_thumbnails: bool,
    pub data_dir: PathBuf,
}

impl Default for ArtworkConfig {
    fn default() -> Self {
        Self {
            target_height: DEFAULT_ARTWORK_HEIGHT,
            episode_thumbnails: true,
            data_dir: PathBuf::from("data"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LibraryConfig {
    pub paths: Vec<PathBuf>,
    /// Extensions without the leading dot, matched case-insensitively.
    pub media_extensions: Vec<String>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            media_extensions: default_media_extensions_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Minimum fuzzy score (0-100) a search result needs to be accepted.
    pub min_match: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            min_match: DEFAULT_MIN_MATCH,
        }
    }
}

impl IndexerConfig {
    /// Runtime settings for the core engine.
    pub fn to_settings(&self) -> IndexerSettings {
        IndexerSettings {
            library_paths: self.library.paths.clone(),
            media_extensions: self
                .library
                .media_extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            data_dir: self.artwork.data_dir.clone(),
            artwork_height: self.artwork.target_height,
            episode_thumbnails: self.artwork.episode_thumbnails,
            min_match: self.matching.min_match,
            rate_limit: RateLimitSettings {
                capacity: self.rate_limit.capacity,
                interval: Duration::from_millis(self.rate_limit.interval_ms),
            },
        }
    }

    pub fn endpoints(&self) -> TmdbEndpoints {
        TmdbEndpoints {
            api_base: self.metadata.api_base.clone(),
            image_base: self.metadata.image_base.clone(),
        }
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.catalog_path
            .clone()
            .unwrap_or_else(|| self.artwork.data_dir.join(DEFAULT_CATALOG_FILE))
    }
}
