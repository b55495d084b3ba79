use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::ids::ExternalId;

/// Summary row of a provider search, in provider order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchResult {
    pub id: ExternalId,
    pub display_name: String,
}

impl SearchResult {
    pub fn new(id: ExternalId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }
}

/// A library folder waiting to become a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchCandidate {
    pub path: PathBuf,
    /// Identity picked by a user; wins over `resolved`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub proposed: Option<ExternalId>,
    /// Best-effort identity found by automatic resolution.
    #[cfg_attr(feature = "serde", serde(default))]
    pub resolved: Option<SearchResult>,
}

impl MatchCandidate {
    pub fn new(path: impl Into<PathBuf>, resolved: Option<SearchResult>) -> Self {
        Self {
            path: path.into(),
            proposed: None,
            resolved,
        }
    }

    /// The identity to confirm, if any.
    pub fn identity(&self) -> Option<ExternalId> {
        self.proposed
            .or_else(|| self.resolved.as_ref().map(|result| result.id))
    }
}

/// Discovery accumulator keyed by full folder path.
///
/// Merges never overwrite an existing key, so user choices survive later
/// discovery passes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct MatchCandidates(BTreeMap<PathBuf, MatchCandidate>);

impl MatchCandidates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.0.contains_key(path)
    }

    pub fn get(&self, path: &Path) -> Option<&MatchCandidate> {
        self.0.get(path)
    }

    /// Insert unless the path is already tracked. Returns whether it was added.
    pub fn insert_if_absent(&mut self, candidate: MatchCandidate) -> bool {
        if self.0.contains_key(&candidate.path) {
            return false;
        }
        self.0.insert(candidate.path.clone(), candidate);
        true
    }

    /// Record a user-confirmed identity, creating the candidate if needed.
    pub fn choose(&mut self, path: impl Into<PathBuf>, id: ExternalId) {
        let path = path.into();
        self.0
            .entry(path.clone())
            .or_insert_with(|| MatchCandidate::new(path, None))
            .proposed = Some(id);
    }

    pub fn remove(&mut self, path: &Path) -> Option<MatchCandidate> {
        self.0.remove(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MatchCandidate> + '_ {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existing_choices_survive_rediscovery() {
        let mut candidates = MatchCandidates::new();
        candidates.choose("/lib/Heat", ExternalId::movie(949));

        let added = candidates.insert_if_absent(MatchCandidate::new(
            "/lib/Heat",
            Some(SearchResult::new(ExternalId::movie(1), "Heat 2")),
        ));

        assert!(!added);
        let kept = candidates.get(Path::new("/lib/Heat")).unwrap();
        assert_eq!(kept.identity(), Some(ExternalId::movie(949)));
        assert!(kept.resolved.is_none());
    }

    #[test]
    fn proposed_identity_wins_over_resolved() {
        let mut candidate = MatchCandidate::new(
            "/lib/Dark",
            Some(SearchResult::new(ExternalId::series(70523), "Dark")),
        );
        assert_eq!(candidate.identity(), Some(ExternalId::series(70523)));

        candidate.proposed = Some(ExternalId::movie(5));
        assert_eq!(candidate.identity(), Some(ExternalId::movie(5)));

        assert_eq!(MatchCandidate::new("/lib/x", None).identity(), None);
    }
}
