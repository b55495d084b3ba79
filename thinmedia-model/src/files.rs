use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::catalog::EpisodeTable;

/// Season -> episode -> absolute file path.
///
/// Every key must also exist in the owning entry's [`EpisodeTable`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct FileMapping(BTreeMap<u32, BTreeMap<u32, PathBuf>>);

impl FileMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mapping for a movie: the single file at `(0, 0)`.
    pub fn movie(path: impl Into<PathBuf>) -> Self {
        let mut mapping = Self::new();
        mapping.insert(0, 0, path);
        mapping
    }

    pub fn insert(&mut self, season: u32, episode: u32, path: impl Into<PathBuf>) {
        self.0.entry(season).or_default().insert(episode, path.into());
    }

    pub fn get(&self, season: u32, episode: u32) -> Option<&Path> {
        self.0.get(&season)?.get(&episode).map(PathBuf::as_path)
    }

    pub fn keys(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.0.iter().flat_map(|(season, episodes)| {
            episodes.keys().map(move |episode| (*season, *episode))
        })
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> + '_ {
        self.0
            .values()
            .flat_map(|episodes| episodes.values().map(PathBuf::as_path))
    }

    pub fn len(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when every key is present in `episodes`.
    pub fn is_covered_by(&self, episodes: &EpisodeTable) -> bool {
        self.keys().all(|(season, episode)| episodes.contains(season, episode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EpisodeRecord;

    #[test]
    fn coverage_checks_every_key() {
        let mut table = EpisodeTable::new();
        table.insert(EpisodeRecord::new(1, 1, "Pilot", ""));

        let mut mapping = FileMapping::new();
        mapping.insert(1, 1, "/a.mkv");
        assert!(mapping.is_covered_by(&table));

        mapping.insert(1, 2, "/b.mkv");
        assert!(!mapping.is_covered_by(&table));
    }
}
