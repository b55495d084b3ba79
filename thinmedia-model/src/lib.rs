//! Core data model definitions shared across ThinMedia crates.
#![allow(missing_docs)]

pub mod catalog;
pub mod details;
pub mod files;
pub mod ids;
pub mod image;
pub mod matching;
pub mod media_type;

// Intentionally curated re-exports for downstream consumers.
pub use catalog::{CatalogEntry, EntryFields, EpisodeRecord, EpisodeTable};
pub use details::{MediaDetails, SeasonEpisode};
pub use files::FileMapping;
pub use ids::{CatalogId, ExternalId};
pub use image::ImageMap;
pub use matching::{MatchCandidate, MatchCandidates, SearchResult};
pub use media_type::{MediaKind, ParseMediaKindError};
