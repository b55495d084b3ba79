use thinmedia_model::{ExternalId, MediaDetails, SearchResult, SeasonEpisode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Not found")]
    NotFound,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Remote metadata catalog consulted while indexing.
///
/// Implementations do not rate-limit; callers take a token from the shared
/// [`RateLimiter`](crate::rate_limit::RateLimiter) before each call.
#[cfg_attr(test, mockall::automock)]
pub trait MetadataProvider: Send + Sync {
    /// Free-text search over movies and series, in provider order.
    fn search(&self, query: &str) -> Result<Vec<SearchResult>, ProviderError>;

    /// Full record for a movie or a series.
    fn details(&self, id: ExternalId) -> Result<MediaDetails, ProviderError>;

    /// Episode listing for one season of a series.
    fn season(
        &self,
        series_id: u64,
        season_number: u32,
    ) -> Result<Vec<SeasonEpisode>, ProviderError>;

    /// Raw bytes of an artwork image addressed by its remote path.
    fn download_image(&self, remote_path: &str) -> Result<Vec<u8>, ProviderError>;

    fn validate_credentials(&self) -> Result<bool, ProviderError>;
}
