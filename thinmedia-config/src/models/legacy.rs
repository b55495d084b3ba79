//! The flat `indexer_config.json` layout older installs still carry.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{IndexerConfig, TMDB_PROVIDER};

/// Top-level keys only the flat layout uses.
const LEGACY_KEYS: &[&str] = &["indexer", "tmdb_api_key", "img_s", "use_episode_img"];

/// Image height was written both as a number and as a numeric string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum LegacyHeight {
    Number(u32),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LegacyConfig {
    pub indexer: Option<String>,
    pub tmdb_api_key: String,
    pub img_s: Option<LegacyHeight>,
    pub use_episode_img: Option<bool>,
    pub paths: Vec<PathBuf>,
}

impl LegacyConfig {
    /// Whether a parsed JSON document uses the flat layout.
    pub fn matches(value: &Value) -> bool {
        value
            .as_object()
            .is_some_and(|map| LEGACY_KEYS.iter().any(|key| map.contains_key(*key)))
    }

    pub fn into_config(self) -> anyhow::Result<IndexerConfig> {
        let mut config = IndexerConfig::default();

        config.metadata.provider = self.indexer.unwrap_or_else(|| TMDB_PROVIDER.to_string());
        config.metadata.api_key = self.tmdb_api_key;
        config.library.paths = self.paths;

        match self.img_s {
            Some(LegacyHeight::Number(height)) => config.artwork.target_height = height,
            Some(LegacyHeight::Text(raw)) => {
                config.artwork.target_height = raw
                    .trim()
                    .parse()
                    .map_err(|err| anyhow::anyhow!("invalid img_s value '{raw}': {err}"))?;
            }
            None => {}
        }
        if let Some(enabled) = self.use_episode_img {
            config.artwork.episode_thumbnails = enabled;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_flat_layout() {
        let raw = r#"{
            "indexer": "tmdb",
            "tmdb_api_key": "k",
            "img_s": "480",
            "use_episode_img": false,
            "paths": ["/mnt/tv", "/mnt/films"]
        }"#;
        let value: Value = serde_json::from_str(raw).unwrap();
        assert!(LegacyConfig::matches(&value));

        let config = serde_json::from_value::<LegacyConfig>(value)
            .unwrap()
            .into_config()
            .unwrap();
        assert_eq!(config.metadata.api_key, "k");
        assert_eq!(config.artwork.target_height, 480);
        assert!(!config.artwork.episode_thumbnails);
        assert_eq!(config.library.paths.len(), 2);
    }

    #[test]
    fn nested_layout_is_not_legacy() {
        let value = serde_json::json!({ "metadata": { "api_key": "k" } });
        assert!(!LegacyConfig::matches(&value));
    }

    #[test]
    fn rejects_non_numeric_height() {
        let legacy = LegacyConfig {
            img_s: Some(LegacyHeight::Text("tall".into())),
            ..LegacyConfig::default()
        };
        assert!(legacy.into_config().is_err());
    }
}
