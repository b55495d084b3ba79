use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use thinmedia_model::{CatalogEntry, CatalogId, EntryFields, FileMapping};
use tracing::{debug, info};

use super::store::{CatalogStore, StoreError};

/// Catalog kept in memory in insertion order, optionally mirrored to a JSON
/// file.
///
/// Every mutation rewrites the whole file through a sibling temp file and a
/// rename, so a crash leaves either the old or the new catalog on disk. The
/// in-memory copy only changes once the write has succeeded.
#[derive(Debug, Default)]
pub struct JsonCatalogStore {
    entries: RwLock<Vec<CatalogEntry>>,
    path: Option<PathBuf>,
}

impl JsonCatalogStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<CatalogEntry>) -> Self {
        Self {
            entries: RwLock::new(entries),
            path: None,
        }
    }

    /// Open the catalog file at `path`, starting empty when it does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = if path.exists() {
            let raw = fs::read(&path)?;
            if raw.iter().all(u8::is_ascii_whitespace) {
                Vec::new()
            } else {
                serde_json::from_slice(&raw).map_err(|e| StoreError::Corrupt {
                    path: path.clone(),
                    reason: e.to_string(),
                })?
            }
        } else {
            Vec::new()
        };

        info!(path = %path.display(), entries = entries.len(), "catalog opened");
        Ok(Self {
            entries: RwLock::new(entries),
            path: Some(path),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn persist(&self, entries: &[CatalogEntry]) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(entries)?;
        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, path)?;
        debug!(path = %path.display(), entries = entries.len(), "catalog persisted");
        Ok(())
    }

    fn find<P>(&self, predicate: P) -> Option<CatalogEntry>
    where
        P: Fn(&CatalogEntry) -> bool,
    {
        self.entries.read().iter().find(|e| predicate(*e)).cloned()
    }
}

impl CatalogStore for JsonCatalogStore {
    fn list_all(&self) -> Result<Vec<CatalogEntry>, StoreError> {
        Ok(self.entries.read().clone())
    }

    fn get_by_id(&self, id: CatalogId) -> Result<Option<CatalogEntry>, StoreError> {
        Ok(self.find(|e| e.id == id))
    }

    fn get_by_path(&self, root_path: &Path) -> Result<Option<CatalogEntry>, StoreError> {
        Ok(self.find(|e| e.root_path == root_path))
    }

    fn get_by_title(&self, title: &str) -> Result<Option<CatalogEntry>, StoreError> {
        Ok(self.find(|e| e.title == title))
    }

    fn create(&self, entry: CatalogEntry) -> Result<bool, StoreError> {
        let mut entries = self.entries.write();
        if entries.iter().any(|e| e.title == entry.title) {
            debug!(title = %entry.title, "entry already exists; create skipped");
            return Ok(false);
        }
        let mut next = entries.clone();
        next.push(entry);
        self.persist(&next)?;
        *entries = next;
        Ok(true)
    }

    fn update_file_map(&self, title: &str, mapping: FileMapping) -> Result<(), StoreError> {
        let mut entries = self.entries.write();
        let index = entries
            .iter()
            .position(|e| e.title == title)
            .ok_or_else(|| StoreError::UnknownTitle(title.to_string()))?;
        let mut next = entries.clone();
        next[index].files = mapping;
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn update_full(&self, id: CatalogId, fields: EntryFields) -> Result<(), StoreError> {
        let mut entries = self.entries.write();
        let index = entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(StoreError::UnknownId(id))?;
        if entries.iter().any(|e| e.id != id && e.title == fields.title) {
            return Err(StoreError::DuplicateTitle(fields.title));
        }
        let mut next = entries.clone();
        next[index].apply(fields);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use thinmedia_model::{EpisodeTable, ImageMap, MediaKind};

    fn fields(title: &str) -> EntryFields {
        EntryFields {
            kind: MediaKind::Movie,
            title: title.to_string(),
            clean_title: title.to_string(),
            year: 1995,
            rating: 7.9,
            rating_count: 10,
            synopsis: String::new(),
            genres: vec!["Crime".into()],
            episodes: EpisodeTable::movie(title, ""),
            files: FileMapping::new(),
            images: ImageMap::default(),
        }
    }

    #[test]
    fn create_is_a_no_op_for_taken_titles() {
        let store = JsonCatalogStore::in_memory();
        assert!(store.create(CatalogEntry::new("/lib/Heat", fields("Heat"))).unwrap());
        assert!(!store.create(CatalogEntry::new("/lib/Heat (1995)", fields("Heat"))).unwrap());
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get_by_title("Heat").unwrap().unwrap().root_path,
            PathBuf::from("/lib/Heat")
        );
    }

    #[test]
    fn lookups_by_path_and_id() {
        let store = JsonCatalogStore::in_memory();
        let entry = CatalogEntry::new("/lib/Heat", fields("Heat"));
        let id = entry.id;
        store.create(entry).unwrap();

        assert_eq!(store.get_by_id(id).unwrap().unwrap().title, "Heat");
        assert!(store.get_by_path(Path::new("/lib/Heat")).unwrap().is_some());
        assert!(store.get_by_path(Path::new("/lib/Other")).unwrap().is_none());
    }

    #[test]
    fn update_full_keeps_identity_and_root() {
        let store = JsonCatalogStore::in_memory();
        let entry = CatalogEntry::new("/lib/Heat", fields("Heat"));
        let id = entry.id;
        store.create(entry).unwrap();

        store.update_full(id, fields("Heat 2")).unwrap();
        let updated = store.get_by_id(id).unwrap().unwrap();
        assert_eq!(updated.title, "Heat 2");
        assert_eq!(updated.root_path, PathBuf::from("/lib/Heat"));

        let missing = store.update_full(CatalogId::new(), fields("x"));
        assert!(matches!(missing, Err(StoreError::UnknownId(_))));
    }

    #[test]
    fn update_full_rejects_a_title_held_by_another_entry() {
        let store = JsonCatalogStore::in_memory();
        let heat = CatalogEntry::new("/lib/Heat", fields("Heat"));
        let other = CatalogEntry::new("/lib/Other", fields("Other"));
        let other_id = other.id;
        store.create(heat).unwrap();
        store.create(other).unwrap();

        let err = store.update_full(other_id, fields("Heat")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateTitle(ref t) if t == "Heat"));
        assert_eq!(store.get_by_id(other_id).unwrap().unwrap().title, "Other");

        // Re-applying an entry's own title is fine
        store.update_full(other_id, fields("Other")).unwrap();
    }

    #[test]
    fn failed_write_leaves_memory_untouched() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"").unwrap();
        let path = blocker.join("catalog.json");

        let store = JsonCatalogStore::open(&path).unwrap();
        assert!(store.create(CatalogEntry::new("/lib/Heat", fields("Heat"))).is_err());
        assert!(store.is_empty());
        assert!(store.create(CatalogEntry::new("/lib/Heat", fields("Heat"))).is_err());
        assert!(store.get_by_title("Heat").unwrap().is_none());
    }

    #[test]
    fn failed_update_keeps_previous_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.json");
        let store = JsonCatalogStore::open(&path).unwrap();
        let entry = CatalogEntry::new("/lib/Heat", fields("Heat"));
        let id = entry.id;
        store.create(entry).unwrap();

        // A directory where the temp file should go makes the write fail
        fs::create_dir(dir.path().join("catalog.json.tmp")).unwrap();

        assert!(
            store
                .update_file_map("Heat", FileMapping::movie("/lib/Heat/heat.mkv"))
                .is_err()
        );
        assert!(store.get_by_title("Heat").unwrap().unwrap().files.is_empty());

        assert!(store.update_full(id, fields("Heat 2")).is_err());
        assert_eq!(store.get_by_id(id).unwrap().unwrap().title, "Heat");
    }

    #[test]
    fn file_backed_catalog_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("catalog.json");

        {
            let store = JsonCatalogStore::open(&path).unwrap();
            store.create(CatalogEntry::new("/lib/Heat", fields("Heat"))).unwrap();
            store
                .update_file_map("Heat", FileMapping::movie("/lib/Heat/heat.mkv"))
                .unwrap();
        }

        let reopened = JsonCatalogStore::open(&path).unwrap();
        let entry = reopened.get_by_title("Heat").unwrap().unwrap();
        assert_eq!(entry.files.get(0, 0), Some(Path::new("/lib/Heat/heat.mkv")));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn unreadable_catalog_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(&path, "{ not json").unwrap();

        let err = JsonCatalogStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }
}
