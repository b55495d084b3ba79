use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::files::FileMapping;
use crate::ids::CatalogId;
use crate::image::ImageMap;
use crate::media_type::MediaKind;

/// Metadata for a single episode. Movies use the `(0, 0)` sentinel.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EpisodeRecord {
    pub season: u32,
    pub episode: u32,
    pub title: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub synopsis: String,
}

impl EpisodeRecord {
    pub fn new(
        season: u32,
        episode: u32,
        title: impl Into<String>,
        synopsis: impl Into<String>,
    ) -> Self {
        Self {
            season,
            episode,
            title: title.into(),
            synopsis: synopsis.into(),
        }
    }
}

/// Season -> episode -> record table.
///
/// A season may exist with no episodes when its details could not be fetched.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EpisodeTable(BTreeMap<u32, BTreeMap<u32, EpisodeRecord>>);

impl EpisodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table for a movie: one record at `(0, 0)`.
    pub fn movie(title: impl Into<String>, synopsis: impl Into<String>) -> Self {
        let mut table = Self::new();
        table.insert(EpisodeRecord::new(0, 0, title, synopsis));
        table
    }

    pub fn ensure_season(&mut self, season: u32) {
        self.0.entry(season).or_default();
    }

    pub fn insert(&mut self, record: EpisodeRecord) {
        self.0
            .entry(record.season)
            .or_default()
            .insert(record.episode, record);
    }

    pub fn contains(&self, season: u32, episode: u32) -> bool {
        self.0
            .get(&season)
            .is_some_and(|episodes| episodes.contains_key(&episode))
    }

    pub fn get(&self, season: u32, episode: u32) -> Option<&EpisodeRecord> {
        self.0.get(&season)?.get(&episode)
    }

    pub fn season(&self, season: u32) -> Option<&BTreeMap<u32, EpisodeRecord>> {
        self.0.get(&season)
    }

    pub fn seasons(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.keys().copied()
    }

    /// All `(season, episode)` keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.0.iter().flat_map(|(season, episodes)| {
            episodes.keys().map(move |episode| (*season, *episode))
        })
    }

    pub fn episode_count(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Every field of an entry that re-identification may replace.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntryFields {
    pub kind: MediaKind,
    pub title: String,
    pub clean_title: String,
    pub year: i32,
    pub rating: f64,
    pub rating_count: u64,
    pub synopsis: String,
    pub genres: Vec<String>,
    pub episodes: EpisodeTable,
    pub files: FileMapping,
    pub images: ImageMap,
}

/// A library folder linked to one external catalog record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatalogEntry {
    pub id: CatalogId,
    pub kind: MediaKind,
    pub title: String,
    pub clean_title: String,
    pub year: i32,
    pub rating: f64,
    pub rating_count: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub synopsis: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub genres: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub episodes: EpisodeTable,
    #[cfg_attr(feature = "serde", serde(default))]
    pub files: FileMapping,
    #[cfg_attr(feature = "serde", serde(default))]
    pub images: ImageMap,
    pub root_path: PathBuf,
}

impl CatalogEntry {
    pub fn new(root_path: impl Into<PathBuf>, fields: EntryFields) -> Self {
        let mut entry = Self {
            id: CatalogId::new(),
            kind: fields.kind,
            title: String::new(),
            clean_title: String::new(),
            year: 0,
            rating: 0.0,
            rating_count: 0,
            synopsis: String::new(),
            genres: Vec::new(),
            episodes: EpisodeTable::new(),
            files: FileMapping::new(),
            images: ImageMap::default(),
            root_path: root_path.into(),
        };
        entry.apply(fields);
        entry
    }

    /// Replace every metadata field, keeping the id and root path.
    pub fn apply(&mut self, fields: EntryFields) {
        self.kind = fields.kind;
        self.title = fields.title;
        self.clean_title = fields.clean_title;
        self.year = fields.year;
        self.rating = fields.rating;
        self.rating_count = fields.rating_count;
        self.synopsis = fields.synopsis;
        self.genres = fields.genres;
        self.episodes = fields.episodes;
        self.files = fields.files;
        self.images = fields.images;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn episode_table_keys_are_ordered() {
        let mut table = EpisodeTable::new();
        table.insert(EpisodeRecord::new(2, 1, "b", ""));
        table.insert(EpisodeRecord::new(1, 3, "a", ""));
        table.insert(EpisodeRecord::new(1, 1, "c", ""));
        table.ensure_season(4);

        let keys: Vec<_> = table.keys().collect();
        assert_eq!(keys, vec![(1, 1), (1, 3), (2, 1)]);
        assert_eq!(table.seasons().collect::<Vec<_>>(), vec![1, 2, 4]);
        assert_eq!(table.episode_count(), 3);
        assert!(table.contains(1, 3));
        assert!(!table.contains(4, 1));
    }

    #[test]
    fn movie_table_uses_sentinel_key() {
        let table = EpisodeTable::movie("Heat", "A heist.");
        assert_eq!(table.keys().collect::<Vec<_>>(), vec![(0, 0)]);
        assert_eq!(table.get(0, 0).map(|r| r.title.as_str()), Some("Heat"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn integer_keys_become_strings_only_on_the_wire() {
        let table = EpisodeTable::movie("Heat", "");
        let json = serde_json::to_value(&table).unwrap();
        assert!(json.get("0").and_then(|s| s.get("0")).is_some());

        let back: EpisodeTable = serde_json::from_value(json).unwrap();
        assert!(back.contains(0, 0));
    }
}
