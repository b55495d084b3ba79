use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::ops::Range;
use std::path::Path;
use tracing::trace;

/// Episode-number heuristics for series files.
#[derive(Debug, Clone, Copy, Default)]
pub struct TvParser;

// S01E02, s1e2, S01.E02, S01 E02, S01E02-E03 (first episode wins)
static SEASON_EPISODE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|[^a-z0-9])s(\d{1,3})[\s._-]*e(\d{1,4})")
        .expect("season/episode regex should compile")
});
// 1x02; resolutions such as 1920x1080 are excluded by the digit limits
static CROSS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|[^a-z0-9])(\d{1,2})x(\d{1,3})(?:[^0-9]|$)")
        .expect("NxNN regex should compile")
});
static SPELLED_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)season[\s._-]*(\d{1,3})[\s._-]*episode[\s._-]*(\d{1,4})")
        .expect("spelled season/episode regex should compile")
});
// Episode-only markers, resolved against the season folder
static EPISODE_ONLY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|[\s._-])(?:episode|ep|e)[\s._-]*(\d{1,4})(?:[^0-9]|$)")
        .expect("episode-only regex should compile")
});
static LEADING_NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,3})(?:[\s._-]|$)").expect("leading number regex should compile")
});

static SEASON_FOLDER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)^season[\s._-]*(\d{1,3})$",
        r"(?i)^s(\d{1,3})$",
        r"(?i)^series[\s._-]*(\d{1,3})$",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("season folder regex should compile"))
    .collect()
});
static SPECIALS_FOLDER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^specials?$").expect("specials folder regex should compile")
});

fn numbers(captures: &Captures<'_>) -> Option<(u32, u32)> {
    let season = captures.get(1)?.as_str().parse().ok()?;
    let episode = captures.get(2)?.as_str().parse().ok()?;
    Some((season, episode))
}

impl TvParser {
    /// `(season, episode)` from a file path.
    ///
    /// The file name is tried first; an episode-only name falls back to the
    /// season number of its parent folder.
    pub fn parse_episode(path: &Path) -> Option<(u32, u32)> {
        let stem = path.file_stem()?.to_str()?;
        if let Some(pair) = Self::parse_name(stem) {
            return Some(pair);
        }

        let season = path
            .parent()
            .and_then(|parent| parent.file_name())
            .and_then(|name| name.to_str())
            .and_then(Self::parse_season_folder)?;

        let episode = EPISODE_ONLY_PATTERN
            .captures(stem)
            .or_else(|| LEADING_NUMBER_PATTERN.captures(stem))
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok())?;

        trace!(stem, season, episode, "episode resolved from season folder");
        Some((season, episode))
    }

    /// `(season, episode)` from a bare name, without folder context.
    pub fn parse_name(name: &str) -> Option<(u32, u32)> {
        [&*SEASON_EPISODE_PATTERN, &*SPELLED_PATTERN, &*CROSS_PATTERN]
            .into_iter()
            .find_map(|pattern| pattern.captures(name).as_ref().and_then(numbers))
    }

    /// Season number encoded in a folder name such as `Season 02` or `S2`.
    pub fn parse_season_folder(folder_name: &str) -> Option<u32> {
        let folder_name = folder_name.trim();
        if SPECIALS_FOLDER_PATTERN.is_match(folder_name) {
            return Some(0);
        }
        SEASON_FOLDER_PATTERNS.iter().find_map(|pattern| {
            pattern
                .captures(folder_name)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse().ok())
        })
    }

    /// Byte range of the first season/episode marker in `name`.
    pub fn episode_marker(name: &str) -> Option<Range<usize>> {
        [&*SEASON_EPISODE_PATTERN, &*SPELLED_PATTERN, &*CROSS_PATTERN]
            .into_iter()
            .filter_map(|pattern| {
                let captures = pattern.captures(name)?;
                let whole = captures.get(0)?;
                // Skip the boundary character some patterns consume
                let start = captures.get(1).map_or(whole.start(), |first| {
                    name[whole.start()..first.start()]
                        .char_indices()
                        .find(|(_, c)| c.is_ascii_alphanumeric())
                        .map_or(first.start(), |(offset, _)| whole.start() + offset)
                });
                let end = captures.get(2).map_or(whole.end(), |second| second.end());
                Some(start..end)
            })
            .min_by_key(|range| range.start)
    }
}
