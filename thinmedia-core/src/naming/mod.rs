//! Title and episode extraction from file and folder names.

pub mod filename_parser;
pub mod tv_parser;

pub use filename_parser::FilenameParser;
pub use tv_parser::TvParser;

use std::path::Path;

/// Filename heuristics used by discovery and file mapping.
pub trait MediaNameParser: Send + Sync {
    /// Candidate titles for a file or folder name, primary title first.
    /// Empty when nothing usable can be extracted.
    fn titles(&self, name: &str) -> Vec<String>;

    /// `(season, episode)` for a media file, when the path encodes one.
    fn episode(&self, path: &Path) -> Option<(u32, u32)>;
}

/// Normalized title used for artwork folders: punctuation removed, runs of
/// whitespace collapsed to one space.
pub fn clean_title(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}
