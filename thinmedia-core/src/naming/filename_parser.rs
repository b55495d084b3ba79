use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use super::MediaNameParser;
use super::tv_parser::TvParser;

static EXTENSION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\.(mkv|mp4|avi|mov|wmv|flv|webm|m4v|mpg|mpeg|ts)$")
        .expect("extension regex should compile")
});
static BRACKET_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[[^\]]*\]|\{[^}]*\}").expect("bracket regex should compile")
});
static QUALITY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(2160p|1080p|720p|576p|480p|4k|uhd|blu-?ray|bdrip|brrip|web-?dl|webrip|hdrip|hdtv|dvdrip|remux|x264|x265|h\.?264|h\.?265|hevc|10bit|proper|repack|extended|unrated|directors\s+cut)\b",
    )
    .expect("quality regex should compile")
});
static YEAR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\(?\b(?:19|20)\d{2}\b\)?").expect("year regex should compile")
});
static DASH_SPLIT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+-\s+").expect("dash split regex should compile"));

/// Default regex-driven name parser.
///
/// Titles come out primary first: the show or movie name, then an episode or
/// alternate title when the name carries one.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilenameParser;

impl FilenameParser {
    pub fn new() -> Self {
        Self
    }

    /// Strip the extension and bracketed tags, turn dot/underscore separators
    /// into spaces.
    fn normalize(&self, name: &str) -> String {
        let name = EXTENSION_PATTERN.replace(name.trim(), "");
        let name = BRACKET_PATTERN.replace_all(&name, " ");
        name.replace(['.', '_'], " ")
    }

    /// Cut release noise and a trailing year off a title fragment.
    fn clean_fragment(&self, fragment: &str) -> Option<String> {
        let mut text = fragment.to_string();

        if let Some(m) = QUALITY_PATTERN.find(&text) {
            text.truncate(m.start());
        }

        // The last year-looking token marks the release year, unless nothing
        // precedes it (titles such as "1917").
        if let Some(m) = YEAR_PATTERN.find_iter(&text).last()
            && !text[..m.start()].trim().is_empty()
        {
            text.truncate(m.start());
        }

        let cleaned = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let trimmed = cleaned
            .trim_matches(|c: char| c.is_whitespace() || c == '-' || c == '(' || c == ')')
            .to_string();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

impl MediaNameParser for FilenameParser {
    fn titles(&self, name: &str) -> Vec<String> {
        let normalized = self.normalize(name);

        let (primary, secondary) = match TvParser::episode_marker(&normalized) {
            Some(marker) => (
                normalized[..marker.start].to_string(),
                Some(normalized[marker.end..].to_string()),
            ),
            None => {
                let mut parts = DASH_SPLIT_PATTERN.splitn(&normalized, 2);
                let first = parts.next().unwrap_or_default().to_string();
                (first, parts.next().map(str::to_string))
            }
        };

        let mut titles = Vec::new();
        for fragment in [Some(primary), secondary].into_iter().flatten() {
            if let Some(title) = self.clean_fragment(&fragment)
                && !titles.contains(&title)
            {
                titles.push(title);
            }
        }
        titles
    }

    fn episode(&self, path: &Path) -> Option<(u32, u32)> {
        TvParser::parse_episode(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(name: &str) -> Vec<String> {
        FilenameParser::new().titles(name)
    }

    #[test]
    fn folder_names_with_year() {
        assert_eq!(titles("Heat (1995)"), vec!["Heat"]);
        assert_eq!(titles("Blade.Runner.2049.2017.1080p.BluRay.x264"), vec!["Blade Runner 2049"]);
        assert_eq!(titles("1917 (2019)"), vec!["1917"]);
        assert_eq!(titles("1917"), vec!["1917"]);
    }

    #[test]
    fn episode_files_yield_show_then_episode_title() {
        assert_eq!(
            titles("The.Office.S02E03.The.Office.Olympics.720p.mkv"),
            vec!["The Office", "The Office Olympics"]
        );
        assert_eq!(titles("Show.S01E02.mkv"), vec!["Show"]);
    }

    #[test]
    fn dash_separated_alternate_title() {
        assert_eq!(
            titles("Il Gladiatore II - Gladiator II (2024)"),
            vec!["Il Gladiatore II", "Gladiator II"]
        );
    }

    #[test]
    fn release_tags_are_dropped() {
        assert_eq!(titles("[Group] Dark [1080p]"), vec!["Dark"]);
        assert_eq!(titles("Breaking_Bad_Complete"), vec!["Breaking Bad Complete"]);
    }

    #[test]
    fn nothing_extractable_gives_empty_list() {
        assert!(titles("").is_empty());
        assert!(titles("[Group].mkv").is_empty());
        assert!(titles("1080p").is_empty());
    }

    #[test]
    fn episode_numbers_come_from_the_tv_parser() {
        let parser = FilenameParser::new();
        assert_eq!(parser.episode(Path::new("/lib/Show/Show.S01E02.mkv")), Some((1, 2)));
        assert_eq!(parser.episode(Path::new("/lib/Show/trailer.mkv")), None);
    }
}
