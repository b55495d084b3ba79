pub mod tmdb;
pub mod traits;

pub use tmdb::{TmdbEndpoints, TmdbProvider};
pub use traits::{MetadataProvider, ProviderError};
