use thinmedia_model::SearchResult;
use tracing::{debug, trace};

use super::fuzzy::ratio_ignore_case;
use crate::naming::MediaNameParser;
use crate::providers::MetadataProvider;
use crate::rate_limit::RateLimiter;

pub const DEFAULT_MIN_MATCH: f64 = 75.0;

/// First result, in provider order, whose display name scores at least
/// `min_match` against `title`.
pub fn first_acceptable<'r>(
    title: &str,
    results: &'r [SearchResult],
    min_match: f64,
) -> Option<&'r SearchResult> {
    results.iter().find(|result| {
        let score = ratio_ignore_case(title, &result.display_name);
        if score >= min_match {
            debug!(title, candidate = %result.display_name, score, "title matched");
            true
        } else {
            trace!(title, candidate = %result.display_name, score, min_match, "match score too low");
            false
        }
    })
}

/// Resolves folder and file names to an external identity.
pub struct TitleResolver<'a> {
    provider: &'a dyn MetadataProvider,
    limiter: &'a RateLimiter,
    parser: &'a dyn MediaNameParser,
    min_match: f64,
}

impl std::fmt::Debug for TitleResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TitleResolver")
            .field("min_match", &self.min_match)
            .finish_non_exhaustive()
    }
}

impl<'a> TitleResolver<'a> {
    pub fn new(
        provider: &'a dyn MetadataProvider,
        limiter: &'a RateLimiter,
        parser: &'a dyn MediaNameParser,
    ) -> Self {
        Self {
            provider,
            limiter,
            parser,
            min_match: DEFAULT_MIN_MATCH,
        }
    }

    pub fn with_min_match(mut self, min_match: f64) -> Self {
        self.min_match = min_match;
        self
    }

    /// Resolve a raw file or folder name.
    pub fn resolve(&self, name: &str) -> Option<SearchResult> {
        let titles = self.parser.titles(name);
        if titles.is_empty() {
            debug!(name, "no title could be extracted");
            return None;
        }
        self.resolve_titles(&titles)
    }

    /// Try each candidate title in order; the first acceptable result wins.
    pub fn resolve_titles(&self, titles: &[String]) -> Option<SearchResult> {
        for title in titles {
            self.limiter.consume(1);
            let results = match self.provider.search(title) {
                Ok(results) => results,
                Err(e) => {
                    debug!(title = %title, error = %e, "search failed");
                    continue;
                }
            };

            if let Some(found) = first_acceptable(title, &results, self.min_match) {
                return Some(found.clone());
            }
            debug!(title = %title, results = results.len(), "could not match title");
        }
        None
    }
}
