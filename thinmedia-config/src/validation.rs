use thiserror::Error;

use crate::models::{IndexerConfig, TMDB_PROVIDER};

/// Faults that make a configuration unusable.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigGuardRailError {
    #[error("metadata provider '{0}' is not supported (expected '{TMDB_PROVIDER}')")]
    UnknownProvider(String),
    #[error("metadata API key is empty")]
    MissingApiKey,
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
    #[error("matching.min_match must be within 0-100, got {0}")]
    MinMatchOutOfRange(f64),
    #[error("library.media_extensions must list at least one extension")]
    NoMediaExtensions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(&mut self, message: S, hint: H) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Reject configurations the indexer cannot run with and collect the
/// questionable ones as warnings.
pub fn apply_guard_rails(config: &IndexerConfig) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let metadata = &config.metadata;
    if !metadata.provider.eq_ignore_ascii_case(TMDB_PROVIDER) {
        return Err(ConfigGuardRailError::UnknownProvider(metadata.provider.clone()));
    }
    if metadata.api_key.trim().is_empty() {
        return Err(ConfigGuardRailError::MissingApiKey);
    }

    if config.rate_limit.capacity == 0 {
        return Err(ConfigGuardRailError::Zero {
            field: "rate_limit.capacity",
        });
    }
    if config.rate_limit.interval_ms == 0 {
        return Err(ConfigGuardRailError::Zero {
            field: "rate_limit.interval_ms",
        });
    }
    if config.artwork.target_height == 0 {
        return Err(ConfigGuardRailError::Zero {
            field: "artwork.target_height",
        });
    }

    let min_match = config.matching.min_match;
    if !(0.0..=100.0).contains(&min_match) {
        return Err(ConfigGuardRailError::MinMatchOutOfRange(min_match));
    }
    if config.library.media_extensions.iter().all(|ext| ext.trim().is_empty()) {
        return Err(ConfigGuardRailError::NoMediaExtensions);
    }

    let mut warnings = ConfigWarnings::default();
    if config.library.paths.is_empty() {
        warnings.push_with_hint(
            "no library paths configured; discovery and rescans will find nothing",
            "Add directories to library.paths",
        );
    }
    for path in &config.library.paths {
        if !path.is_dir() {
            warnings.push(format!("library path {} does not exist or is not a directory", path.display()));
        }
    }
    if !config.artwork.episode_thumbnails {
        warnings.push("episode thumbnails disabled; only series backdrops will be downloaded");
    }

    Ok(warnings)
}
