//! # ThinMedia Core
//!
//! Indexing and synchronization engine for the ThinMedia media server. It
//! links library folders on disk to records in an external metadata catalog
//! and keeps the per-episode file maps of those records in step with the
//! files that are actually present.
//!
//! ## Components
//!
//! - [`rate_limit`]: periodic-reset token bucket gating provider calls
//! - [`naming`]: title and episode extraction from file and folder names
//! - [`matching`]: fuzzy scoring and provider-backed title resolution
//! - [`scan`]: file mapper, entry assembly and the [`ScanOrchestrator`]
//! - [`image`]: artwork layout and the bounded thumbnail fetch pool
//! - [`providers`]: the [`MetadataProvider`] port and its TMDB client
//! - [`catalog`]: the [`CatalogStore`] port, a JSON store and local queries
//!
//! Everything runs on OS threads; there is no async runtime. Components are
//! wired together through an [`IndexerContext`].
//!
//! ```no_run
//! use std::sync::Arc;
//! use thinmedia_core::{
//!     IndexerContext, IndexerSettings, JsonCatalogStore, ScanOrchestrator, ScanStart,
//!     TmdbProvider,
//! };
//!
//! fn rescan() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = Arc::new(TmdbProvider::new("api-key")?);
//!     let store = Arc::new(JsonCatalogStore::open("data/catalog.json")?);
//!     let ctx = IndexerContext::new(provider, store, IndexerSettings::default())?;
//!     let orchestrator = ScanOrchestrator::new(ctx);
//!
//!     if let ScanStart::Started(progress) = orchestrator.rescan()? {
//!         for message in progress {
//!             println!("{message}");
//!         }
//!     }
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

pub mod catalog;
pub mod context;
pub mod error;
pub mod image;
pub mod matching;
pub mod naming;
pub mod providers;
pub mod rate_limit;
pub mod scan;

pub use catalog::{CatalogStore, JsonCatalogStore, StoreError};
pub use context::IndexerContext;
pub use error::{MediaError, Result};
pub use matching::TitleResolver;
pub use naming::{FilenameParser, MediaNameParser, clean_title};
pub use providers::{MetadataProvider, ProviderError, TmdbEndpoints, TmdbProvider};
pub use rate_limit::{RateLimitSettings, RateLimiter};
pub use scan::{
    ConfirmReport, DEFAULT_ARTWORK_HEIGHT, DEFAULT_MEDIA_EXTENSIONS, IndexerSettings, RESCAN_DONE,
    RescanProgress, ScanOrchestrator, ScanStart, default_media_extensions_vec,
};

pub use thinmedia_model as model;
