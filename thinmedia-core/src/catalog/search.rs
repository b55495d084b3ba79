//! Local queries over catalog entries. These never reach the metadata
//! provider.

use thinmedia_model::{CatalogEntry, MediaKind};

use crate::matching::ratio_ignore_case;

/// Titles must score above this to appear in search results.
pub const MIN_SEARCH_SCORE: f64 = 40.0;
pub const MAX_SEARCH_RESULTS: usize = 20;

/// Entries whose title fuzzily matches `query`, best first.
///
/// Ties keep their input order.
pub fn search_titles<'a>(query: &str, entries: &[&'a CatalogEntry]) -> Vec<&'a CatalogEntry> {
    let mut scored: Vec<(f64, &'a CatalogEntry)> = entries
        .iter()
        .map(|entry| (ratio_ignore_case(query, &entry.title), *entry))
        .filter(|(score, _)| *score > MIN_SEARCH_SCORE)
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.truncate(MAX_SEARCH_RESULTS);
    scored.into_iter().map(|(_, entry)| entry).collect()
}

/// Kind filter, then free-text search, then any-of genre match.
///
/// An empty query or genre list skips that stage.
pub fn apply_filters<'a>(
    entries: &'a [CatalogEntry],
    query: Option<&str>,
    genres: &[String],
    kind: Option<MediaKind>,
) -> Vec<&'a CatalogEntry> {
    let mut selected: Vec<&CatalogEntry> = entries
        .iter()
        .filter(|entry| kind.is_none_or(|kind| entry.kind == kind))
        .collect();

    if let Some(query) = query.map(str::trim).filter(|q| !q.is_empty()) {
        selected = search_titles(query, &selected);
    }

    if !genres.is_empty() {
        selected.retain(|entry| entry.genres.iter().any(|g| genres.contains(g)));
    }
    selected
}

/// Every genre across `entries`, deduplicated and sorted case-insensitively.
pub fn unique_genres(entries: &[CatalogEntry]) -> Vec<String> {
    let mut genres: Vec<String> = entries
        .iter()
        .flat_map(|entry| entry.genres.iter().cloned())
        .collect();
    genres.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));
    genres.dedup();
    genres
}
