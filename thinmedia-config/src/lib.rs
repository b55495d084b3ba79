//! Configuration library for the ThinMedia indexer.
//!
//! Loads the indexer configuration from a file, the environment, or one of
//! the well-known default locations, converts the legacy flat JSON layout,
//! and applies guard rails before anything talks to the metadata provider.

#![allow(missing_docs)]

pub mod loader;
pub mod models;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoader, ConfigSource, error::ConfigLoadError};
pub use models::legacy::LegacyConfig;
pub use models::{
    ArtworkConfig, IndexerConfig, LibraryConfig, MatchingConfig, MetadataConfig,
    RateLimitConfig,
};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings, apply_guard_rails};
