//! Catalog persistence port, the bundled JSON implementation and local
//! queries over stored entries.

pub mod json_store;
pub mod search;
pub mod store;

pub use json_store::JsonCatalogStore;
pub use search::{apply_filters, search_titles, unique_genres, MAX_SEARCH_RESULTS, MIN_SEARCH_SCORE};
pub use store::{CatalogStore, StoreError};
