use std::path::PathBuf;

use crate::matching::DEFAULT_MIN_MATCH;
use crate::rate_limit::RateLimitSettings;

/// Media file extensions recognised by the file mapper and discovery.
pub const DEFAULT_MEDIA_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi"];

/// Height, in pixels, artwork is resized to.
pub const DEFAULT_ARTWORK_HEIGHT: u32 = 360;

/// Convenience helper for config layers that work with owned strings.
pub fn default_media_extensions_vec() -> Vec<String> {
    DEFAULT_MEDIA_EXTENSIONS
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

/// Runtime knobs for an indexing session, fixed at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexerSettings {
    /// Library roots whose immediate subfolders become catalog entries.
    pub library_paths: Vec<PathBuf>,
    pub media_extensions: Vec<String>,
    /// Artwork is written under `<data_dir>/img`.
    pub data_dir: PathBuf,
    pub artwork_height: u32,
    /// Fetch a still for every episode, not just the series backdrop.
    pub episode_thumbnails: bool,
    pub min_match: f64,
    pub rate_limit: RateLimitSettings,
}

impl Default for IndexerSettings {
    fn default() -> Self {
        Self {
            library_paths: Vec::new(),
            media_extensions: default_media_extensions_vec(),
            data_dir: PathBuf::from("data"),
            artwork_height: DEFAULT_ARTWORK_HEIGHT,
            episode_thumbnails: true,
            min_match: DEFAULT_MIN_MATCH,
            rate_limit: RateLimitSettings::default(),
        }
    }
}
