use std::sync::Arc;

use crate::catalog::CatalogStore;
use crate::error::Result;
use crate::image::{ArtworkLayout, ThumbnailPool};
use crate::matching::TitleResolver;
use crate::naming::{FilenameParser, MediaNameParser};
use crate::providers::MetadataProvider;
use crate::rate_limit::RateLimiter;
use crate::scan::file_mapper::FileMapper;
use crate::scan::settings::IndexerSettings;

/// Everything an indexing run needs, injected once at startup.
#[derive(Clone)]
pub struct IndexerContext {
    provider: Arc<dyn MetadataProvider>,
    store: Arc<dyn CatalogStore>,
    parser: Arc<dyn MediaNameParser>,
    limiter: RateLimiter,
    settings: IndexerSettings,
}

impl std::fmt::Debug for IndexerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexerContext")
            .field("limiter", &self.limiter)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl IndexerContext {
    /// Context with the default filename parser and a fresh limiter built
    /// from `settings.rate_limit`.
    pub fn new(
        provider: Arc<dyn MetadataProvider>,
        store: Arc<dyn CatalogStore>,
        settings: IndexerSettings,
    ) -> Result<Self> {
        let limiter = RateLimiter::new(settings.rate_limit)?;
        Ok(Self {
            provider,
            store,
            parser: Arc::new(FilenameParser::new()),
            limiter,
            settings,
        })
    }

    pub fn with_parser(mut self, parser: Arc<dyn MediaNameParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Share an existing limiter, e.g. with another context talking to the
    /// same provider.
    pub fn with_limiter(mut self, limiter: RateLimiter) -> Self {
        self.limiter = limiter;
        self
    }

    pub fn provider(&self) -> &dyn MetadataProvider {
        self.provider.as_ref()
    }

    pub fn store(&self) -> &dyn CatalogStore {
        self.store.as_ref()
    }

    pub fn parser(&self) -> &dyn MediaNameParser {
        self.parser.as_ref()
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn settings(&self) -> &IndexerSettings {
        &self.settings
    }

    pub fn resolver(&self) -> TitleResolver<'_> {
        TitleResolver::new(self.provider(), &self.limiter, self.parser())
            .with_min_match(self.settings.min_match)
    }

    pub fn file_mapper(&self) -> FileMapper<'_> {
        FileMapper::new(self.parser(), &self.settings.media_extensions)
    }

    pub fn thumbnail_pool(&self) -> ThumbnailPool<'_> {
        ThumbnailPool::new(self.provider(), &self.limiter)
    }

    pub fn artwork_layout(&self) -> ArtworkLayout {
        ArtworkLayout::new(&self.settings.data_dir)
    }
}
