use thiserror::Error;

use crate::catalog::StoreError;
use crate::providers::ProviderError;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Metadata provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Catalog store error: {0}")]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, MediaError>;
