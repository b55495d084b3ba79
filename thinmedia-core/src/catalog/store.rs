use std::path::{Path, PathBuf};

use thinmedia_model::{CatalogEntry, CatalogId, EntryFields, FileMapping};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No entry titled {0:?}")]
    UnknownTitle(String),

    #[error("No entry with id {0}")]
    UnknownId(CatalogId),

    #[error("Another entry is already titled {0:?}")]
    DuplicateTitle(String),

    #[error("Catalog file {path} is not readable: {reason}")]
    Corrupt { path: PathBuf, reason: String },
}

/// Persistent record store consumed by the scan orchestrator.
///
/// Titles are unique; `create` leaves the store untouched when an entry with
/// the same title already exists.
pub trait CatalogStore: Send + Sync {
    /// Every entry, in store order.
    fn list_all(&self) -> Result<Vec<CatalogEntry>, StoreError>;

    fn get_by_id(&self, id: CatalogId) -> Result<Option<CatalogEntry>, StoreError>;

    fn get_by_path(&self, root_path: &Path) -> Result<Option<CatalogEntry>, StoreError>;

    fn get_by_title(&self, title: &str) -> Result<Option<CatalogEntry>, StoreError>;

    /// Insert `entry`. Returns `false` when the title is already taken.
    fn create(&self, entry: CatalogEntry) -> Result<bool, StoreError>;

    fn update_file_map(&self, title: &str, mapping: FileMapping) -> Result<(), StoreError>;

    /// Replace every metadata field of entry `id`, keeping its id and root path.
    /// Fails with [`StoreError::DuplicateTitle`] when another entry already
    /// carries the new title.
    fn update_full(&self, id: CatalogId, fields: EntryFields) -> Result<(), StoreError>;
}
