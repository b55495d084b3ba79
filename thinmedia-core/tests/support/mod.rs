//! Shared fakes and fixtures for the core integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use thinmedia_core::model::{
    CatalogEntry, CatalogId, EntryFields, EpisodeTable, ExternalId, FileMapping, ImageMap,
    MediaDetails, MediaKind, SearchResult, SeasonEpisode,
};
use thinmedia_core::{
    CatalogStore, IndexerContext, IndexerSettings, JsonCatalogStore, MetadataProvider,
    ProviderError, RateLimitSettings, StoreError,
};

/// In-memory metadata provider with per-method call counters.
#[derive(Debug, Default)]
pub struct FakeProvider {
    search: HashMap<String, Vec<SearchResult>>,
    details: HashMap<ExternalId, MediaDetails>,
    seasons: HashMap<(u64, u32), Vec<SeasonEpisode>>,
    images: HashMap<String, Vec<u8>>,
    pub search_calls: AtomicUsize,
    pub details_calls: AtomicUsize,
    pub image_calls: AtomicUsize,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, query: &str, results: Vec<SearchResult>) -> Self {
        self.search.insert(query.to_string(), results);
        self
    }

    pub fn with_details(mut self, id: ExternalId, details: MediaDetails) -> Self {
        self.details.insert(id, details);
        self
    }

    pub fn with_season(mut self, series_id: u64, season: u32, episodes: Vec<SeasonEpisode>) -> Self {
        self.seasons.insert((series_id, season), episodes);
        self
    }

    pub fn with_image(mut self, remote: &str, bytes: Vec<u8>) -> Self {
        self.images.insert(remote.to_string(), bytes);
        self
    }
}

impl MetadataProvider for FakeProvider {
    fn search(&self, query: &str) -> Result<Vec<SearchResult>, ProviderError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.search.get(query).cloned().unwrap_or_default())
    }

    fn details(&self, id: ExternalId) -> Result<MediaDetails, ProviderError> {
        self.details_calls.fetch_add(1, Ordering::SeqCst);
        self.details.get(&id).cloned().ok_or(ProviderError::NotFound)
    }

    fn season(&self, series_id: u64, season_number: u32) -> Result<Vec<SeasonEpisode>, ProviderError> {
        self.seasons
            .get(&(series_id, season_number))
            .cloned()
            .ok_or(ProviderError::NotFound)
    }

    fn download_image(&self, remote_path: &str) -> Result<Vec<u8>, ProviderError> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        self.images
            .get(remote_path)
            .cloned()
            .ok_or_else(|| ProviderError::ApiError(format!("{remote_path}: HTTP 500")))
    }

    fn validate_credentials(&self) -> Result<bool, ProviderError> {
        Ok(true)
    }
}

/// JSON store that counts file-map writes.
#[derive(Debug, Default)]
pub struct CountingStore {
    inner: JsonCatalogStore,
    pub file_map_updates: AtomicUsize,
}

impl CountingStore {
    pub fn with_entries(entries: Vec<CatalogEntry>) -> Self {
        Self {
            inner: JsonCatalogStore::with_entries(entries),
            file_map_updates: AtomicUsize::new(0),
        }
    }

    pub fn updates(&self) -> usize {
        self.file_map_updates.load(Ordering::SeqCst)
    }
}

impl CatalogStore for CountingStore {
    fn list_all(&self) -> Result<Vec<CatalogEntry>, StoreError> {
        self.inner.list_all()
    }

    fn get_by_id(&self, id: CatalogId) -> Result<Option<CatalogEntry>, StoreError> {
        self.inner.get_by_id(id)
    }

    fn get_by_path(&self, root_path: &Path) -> Result<Option<CatalogEntry>, StoreError> {
        self.inner.get_by_path(root_path)
    }

    fn get_by_title(&self, title: &str) -> Result<Option<CatalogEntry>, StoreError> {
        self.inner.get_by_title(title)
    }

    fn create(&self, entry: CatalogEntry) -> Result<bool, StoreError> {
        self.inner.create(entry)
    }

    fn update_file_map(&self, title: &str, mapping: FileMapping) -> Result<(), StoreError> {
        self.file_map_updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update_file_map(title, mapping)
    }

    fn update_full(&self, id: CatalogId, fields: EntryFields) -> Result<(), StoreError> {
        self.inner.update_full(id, fields)
    }
}

pub fn settings(library: &Path, data_dir: &Path) -> IndexerSettings {
    IndexerSettings {
        library_paths: vec![library.to_path_buf()],
        data_dir: data_dir.to_path_buf(),
        artwork_height: 10,
        rate_limit: RateLimitSettings {
            capacity: 100,
            interval: Duration::from_millis(20),
        },
        ..IndexerSettings::default()
    }
}

pub fn context(
    provider: impl Into<Arc<FakeProvider>>,
    store: Arc<CountingStore>,
    settings: IndexerSettings,
) -> IndexerContext {
    IndexerContext::new(provider.into(), store, settings).expect("context")
}

pub fn touch(root: &Path, relative: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
    fs::write(&path, b"").expect("write file");
    path
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    let buffer = ImageBuffer::from_pixel(width, height, Rgb([10u8, 120, 200]));
    let mut bytes = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(buffer)
        .write_to(&mut bytes, ImageFormat::Png)
        .expect("encode png");
    bytes.into_inner()
}

pub fn movie_details(title: &str, backdrop: Option<&str>) -> MediaDetails {
    MediaDetails {
        title: title.to_string(),
        year: 1995,
        rating: 7.9,
        rating_count: 100,
        synopsis: format!("{title} synopsis"),
        genres: vec!["Crime".to_string()],
        backdrop_path: backdrop.map(str::to_string),
        seasons: Vec::new(),
    }
}

pub fn series_details(title: &str, backdrop: Option<&str>, seasons: Vec<u32>) -> MediaDetails {
    MediaDetails {
        seasons,
        genres: vec!["Drama".to_string()],
        ..movie_details(title, backdrop)
    }
}

pub fn episode(number: u32, title: &str, still: Option<&str>) -> SeasonEpisode {
    SeasonEpisode {
        still_path: still.map(str::to_string),
        ..SeasonEpisode::new(number, title)
    }
}

/// Stored entry for a movie rooted at `root`.
pub fn movie_entry(title: &str, root: &Path) -> CatalogEntry {
    CatalogEntry::new(
        root,
        EntryFields {
            kind: MediaKind::Movie,
            title: title.to_string(),
            clean_title: thinmedia_core::clean_title(title),
            year: 2000,
            rating: 5.0,
            rating_count: 1,
            synopsis: String::new(),
            genres: Vec::new(),
            episodes: EpisodeTable::movie(title, ""),
            files: FileMapping::new(),
            images: ImageMap::default(),
        },
    )
}
