use std::collections::BTreeMap;

/// Artwork paths for an entry, relative to the data directory.
///
/// Thumbnails that were never fetched are stored as empty strings so that
/// clients can tell "no artwork" apart from "unknown episode".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageMap {
    #[cfg_attr(feature = "serde", serde(default))]
    pub base: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub header: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub seasons: BTreeMap<u32, BTreeMap<u32, String>>,
}

impl ImageMap {
    pub fn with_base(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            ..Self::default()
        }
    }

    pub fn ensure_season(&mut self, season: u32) {
        self.seasons.entry(season).or_default();
    }

    pub fn set_thumbnail(
        &mut self,
        season: u32,
        episode: u32,
        path: impl Into<String>,
    ) {
        self.seasons
            .entry(season)
            .or_default()
            .insert(episode, path.into());
    }

    pub fn thumbnail(&self, season: u32, episode: u32) -> Option<&str> {
        self.seasons
            .get(&season)?
            .get(&episode)
            .map(String::as_str)
    }
}
