//! Artwork layout on disk and the bounded thumbnail fetch pool.

pub mod paths;
pub mod thumbnails;

pub use paths::{ArtworkLayout, ArtworkPath};
pub use thumbnails::{ThumbnailOutcome, ThumbnailPool, ThumbnailTask};
