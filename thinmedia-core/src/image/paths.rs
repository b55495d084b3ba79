use std::path::{Path, PathBuf};

const ARTWORK_DIR: &str = "img";
const ARTWORK_FILE: &str = "base.jpg";
const BACKDROP_DIR: &str = "base";
const UNTITLED_DIR: &str = "untitled";

/// Where a piece of artwork lives: the absolute file path to write and the
/// data-dir relative form stored in image maps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtworkPath {
    pub absolute: PathBuf,
    pub relative: String,
}

/// Artwork tree under the data directory:
/// `img/<clean title>/base/base.jpg` for backdrops and
/// `img/<clean title>/S<s>E<e>/base.jpg` for episode stills.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtworkLayout {
    data_dir: PathBuf,
}

impl ArtworkLayout {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn backdrop(&self, clean_title: &str) -> ArtworkPath {
        self.artwork(clean_title, BACKDROP_DIR)
    }

    pub fn episode_still(&self, clean_title: &str, season: u32, episode: u32) -> ArtworkPath {
        self.artwork(clean_title, &format!("S{season}E{episode}"))
    }

    fn artwork(&self, clean_title: &str, slot: &str) -> ArtworkPath {
        let title_dir = if clean_title.trim().is_empty() {
            UNTITLED_DIR
        } else {
            clean_title
        };
        let relative = format!("{ARTWORK_DIR}/{title_dir}/{slot}/{ARTWORK_FILE}");
        let absolute = self
            .data_dir
            .join(ARTWORK_DIR)
            .join(title_dir)
            .join(slot)
            .join(ARTWORK_FILE);
        ArtworkPath { absolute, relative }
    }
}
