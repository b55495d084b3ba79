use std::path::{Path, PathBuf};

use thinmedia_model::{EpisodeTable, FileMapping, MediaKind};
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

use crate::naming::MediaNameParser;

/// Classifies the media files under an entry's root folder into a
/// season -> episode -> path table.
pub struct FileMapper<'a> {
    parser: &'a dyn MediaNameParser,
    extensions: &'a [String],
}

impl std::fmt::Debug for FileMapper<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileMapper")
            .field("extensions", &self.extensions)
            .finish_non_exhaustive()
    }
}

impl<'a> FileMapper<'a> {
    pub fn new(parser: &'a dyn MediaNameParser, extensions: &'a [String]) -> Self {
        Self { parser, extensions }
    }

    pub fn is_media_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)))
    }

    /// Media files under `root`, in sorted walk order. Unreadable entries are
    /// logged and skipped.
    pub fn media_files(&self, root: &Path) -> Vec<PathBuf> {
        let walker = WalkDir::new(root).follow_links(true).sort_by_file_name();

        let mut files = Vec::new();
        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && self.is_media_file(entry.path()) {
                        files.push(entry.into_path());
                    }
                }
                Err(e) => warn!(root = %root.display(), error = %e, "error walking directory"),
            }
        }
        files
    }

    /// Recompute the file map for an entry rooted at `root`.
    ///
    /// Movies take the first media file at `(0, 0)`. Series files are keyed by
    /// the episode parsed from their name and kept only when that episode is
    /// in `episodes`.
    pub fn map(&self, root: &Path, episodes: &EpisodeTable, kind: MediaKind) -> FileMapping {
        let files = self.media_files(root);

        if kind.is_movie() {
            return match files.into_iter().next() {
                Some(path) => FileMapping::movie(path),
                None => {
                    debug!(root = %root.display(), "no media file found for movie");
                    FileMapping::new()
                }
            };
        }

        let mut mapping = FileMapping::new();
        for path in files {
            let Some((season, episode)) = self.parser.episode(&path) else {
                trace!(path = %path.display(), "no episode number in file name");
                continue;
            };
            if !episodes.contains(season, episode) {
                trace!(path = %path.display(), season, episode, "episode not in table");
                continue;
            }
            mapping.insert(season, episode, path);
        }
        mapping
    }

    /// Immediate subfolders of a library root that hold at least one media
    /// file, sorted by name.
    pub fn library_folders(&self, library_root: &Path) -> Vec<PathBuf> {
        let walker = WalkDir::new(library_root)
            .follow_links(true)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        let mut folders = Vec::new();
        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_dir() => {
                    if !self.media_files(entry.path()).is_empty() {
                        folders.push(entry.into_path());
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(root = %library_root.display(), error = %e, "error listing library root")
                }
            }
        }
        folders
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::FilenameParser;
    use crate::scan::settings::default_media_extensions_vec;
    use std::fs;
    use tempfile::TempDir;
    use thinmedia_model::EpisodeRecord;

    fn touch(root: &Path, relative: &str) -> PathBuf {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"").unwrap();
        path
    }

    #[test]
    fn extension_filter_is_case_insensitive() {
        let parser = FilenameParser::new();
        let extensions = default_media_extensions_vec();
        let mapper = FileMapper::new(&parser, &extensions);

        assert!(mapper.is_media_file(Path::new("a/Show.S01E01.MKV")));
        assert!(mapper.is_media_file(Path::new("movie.mp4")));
        assert!(!mapper.is_media_file(Path::new("movie.nfo")));
        assert!(!mapper.is_media_file(Path::new("mkv")));
    }

    #[test]
    fn movie_takes_the_first_file_in_walk_order() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "b.mkv");
        let first = touch(dir.path(), "a.avi");
        touch(dir.path(), "poster.jpg");

        let parser = FilenameParser::new();
        let extensions = default_media_extensions_vec();
        let mapper = FileMapper::new(&parser, &extensions);
        let mapping = mapper.map(dir.path(), &EpisodeTable::movie("X", ""), MediaKind::Movie);

        assert_eq!(mapping, FileMapping::movie(first));
    }

    #[test]
    fn movie_without_files_maps_nothing() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "notes.txt");

        let parser = FilenameParser::new();
        let extensions = default_media_extensions_vec();
        let mapper = FileMapper::new(&parser, &extensions);
        assert!(mapper.map(dir.path(), &EpisodeTable::movie("X", ""), MediaKind::Movie).is_empty());
    }

    #[test]
    fn series_keeps_only_known_episodes() {
        let dir = TempDir::new().unwrap();
        let known = touch(dir.path(), "Show.S01E02.mkv");
        touch(dir.path(), "Show.S01E05.mkv");
        touch(dir.path(), "Show.Behind.The.Scenes.mkv");

        let mut table = EpisodeTable::new();
        table.insert(EpisodeRecord::new(1, 1, "One", ""));
        table.insert(EpisodeRecord::new(1, 2, "Two", ""));

        let parser = FilenameParser::new();
        let extensions = default_media_extensions_vec();
        let mapper = FileMapper::new(&parser, &extensions);
        let mapping = mapper.map(dir.path(), &table, MediaKind::Series);

        let mut expected = FileMapping::new();
        expected.insert(1, 2, known);
        assert_eq!(mapping, expected);
    }

    #[test]
    fn library_folders_need_media() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "Heat (1995)/heat.mkv");
        touch(dir.path(), "Dark/Season 1/Dark.S01E01.mp4");
        touch(dir.path(), "Empty/readme.txt");
        touch(dir.path(), "loose.mkv");

        let parser = FilenameParser::new();
        let extensions = default_media_extensions_vec();
        let mapper = FileMapper::new(&parser, &extensions);

        assert_eq!(
            mapper.library_folders(dir.path()),
            vec![dir.path().join("Dark"), dir.path().join("Heat (1995)")]
        );
    }
}
