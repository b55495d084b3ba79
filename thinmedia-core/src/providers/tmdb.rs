use chrono::{Datelike, NaiveDate};
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thinmedia_model::{
    ExternalId, MediaDetails, MediaKind, SearchResult, SeasonEpisode,
};
use tracing::{debug, warn};

use super::traits::{MetadataProvider, ProviderError};

pub const TMDB_API_BASE: &str = "https://api.themoviedb.org/3/";
pub const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

/// Artwork is always fetched at the original size and resized locally.
const IMAGE_SIZE: &str = "original";

/// Base URLs for the REST API and the image CDN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TmdbEndpoints {
    pub api_base: String,
    pub image_base: String,
}

impl Default for TmdbEndpoints {
    fn default() -> Self {
        Self {
            api_base: TMDB_API_BASE.to_string(),
            image_base: TMDB_IMAGE_BASE.to_string(),
        }
    }
}

/// TMDB v3 client over blocking HTTP.
#[derive(Debug, Clone)]
pub struct TmdbProvider {
    client: Client,
    api_key: String,
    endpoints: TmdbEndpoints,
}

impl TmdbProvider {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        Self::with_endpoints(api_key, TmdbEndpoints::default())
    }

    pub fn with_endpoints(
        api_key: impl Into<String>,
        endpoints: TmdbEndpoints,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(concat!("thinmedia/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoints,
        })
    }

    fn api_url(&self, path: &str) -> String {
        let base = self.endpoints.api_base.trim_end_matches('/');
        format!("{base}/{}", path.trim_start_matches('/'))
    }

    fn image_url(&self, remote_path: &str) -> String {
        let base = self.endpoints.image_base.trim_end_matches('/');
        let path = remote_path.trim_start_matches('/');
        format!("{base}/{IMAGE_SIZE}/{path}")
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        let url = self.api_url(path);
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .send()?;

        let response = check_status(response, path)?;
        response
            .json::<T>()
            .map_err(|e| ProviderError::ParseError(e.to_string()))
    }
}

fn check_status(response: Response, what: &str) -> Result<Response, ProviderError> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::NOT_FOUND => {
            debug!(request = what, "provider returned 404");
            Err(ProviderError::NotFound)
        }
        StatusCode::UNAUTHORIZED => Err(ProviderError::InvalidApiKey),
        status => {
            warn!(request = what, %status, "provider request failed");
            Err(ProviderError::ApiError(format!("{what}: HTTP {status}")))
        }
    }
}

impl MetadataProvider for TmdbProvider {
    fn search(&self, query: &str) -> Result<Vec<SearchResult>, ProviderError> {
        let page: SearchPage = self.get_json(
            "search/multi",
            &[("query", query), ("include_adult", "true"), ("page", "1")],
        )?;
        Ok(page.into_results())
    }

    fn details(&self, id: ExternalId) -> Result<MediaDetails, ProviderError> {
        match id.kind {
            MediaKind::Movie => {
                let movie: MovieDto = self.get_json(&format!("movie/{}", id.id), &[])?;
                Ok(movie.into())
            }
            MediaKind::Series => {
                let show: TvDto = self.get_json(&format!("tv/{}", id.id), &[])?;
                Ok(show.into())
            }
        }
    }

    fn season(
        &self,
        series_id: u64,
        season_number: u32,
    ) -> Result<Vec<SeasonEpisode>, ProviderError> {
        let season: SeasonDto =
            self.get_json(&format!("tv/{series_id}/season/{season_number}"), &[])?;
        Ok(season.episodes.into_iter().map(Into::into).collect())
    }

    fn download_image(&self, remote_path: &str) -> Result<Vec<u8>, ProviderError> {
        let url = self.image_url(remote_path);
        let response = self.client.get(&url).send()?;
        let response = check_status(response, remote_path)?;
        Ok(response.bytes()?.to_vec())
    }

    fn validate_credentials(&self) -> Result<bool, ProviderError> {
        match self.get_json::<AuthenticationDto>("authentication", &[]) {
            Ok(auth) => Ok(auth.success),
            Err(ProviderError::InvalidApiKey) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Year of a `YYYY-MM-DD` date, `0` when missing or malformed.
fn year_of(date: Option<&str>) -> i32 {
    date.and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok())
        .map(|d| d.year())
        .unwrap_or(0)
}

fn round_rating(vote_average: f64) -> f64 {
    (vote_average * 10.0).round() / 10.0
}

/// TMDB sometimes sends the literal string "None" for missing artwork.
fn artwork_path(path: Option<String>) -> Option<String> {
    path.filter(|p| !p.is_empty() && p != "None")
}

#[derive(Debug, Deserialize)]
struct AuthenticationDto {
    #[serde(default)]
    success: bool,
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    results: Vec<SearchHitDto>,
}

impl SearchPage {
    fn into_results(self) -> Vec<SearchResult> {
        self.results
            .into_iter()
            .filter_map(|hit| {
                let kind = match hit.media_type.as_deref() {
                    Some("movie") => MediaKind::Movie,
                    Some("tv") => MediaKind::Series,
                    _ => return None,
                };
                let name = hit.title.or(hit.name)?;
                Some(SearchResult::new(ExternalId::new(kind, hit.id), name))
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct SearchHitDto {
    id: u64,
    media_type: Option<String>,
    title: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenreDto {
    name: String,
}

#[derive(Debug, Deserialize)]
struct MovieDto {
    title: String,
    release_date: Option<String>,
    #[serde(default)]
    vote_average: f64,
    #[serde(default)]
    vote_count: u64,
    overview: Option<String>,
    #[serde(default)]
    genres: Vec<GenreDto>,
    backdrop_path: Option<String>,
}

impl From<MovieDto> for MediaDetails {
    fn from(movie: MovieDto) -> Self {
        MediaDetails {
            year: year_of(movie.release_date.as_deref()),
            title: movie.title,
            rating: round_rating(movie.vote_average),
            rating_count: movie.vote_count,
            synopsis: movie.overview.unwrap_or_default(),
            genres: movie.genres.into_iter().map(|g| g.name).collect(),
            backdrop_path: artwork_path(movie.backdrop_path),
            seasons: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SeasonSummaryDto {
    season_number: u32,
}

#[derive(Debug, Deserialize)]
struct TvDto {
    name: String,
    first_air_date: Option<String>,
    #[serde(default)]
    vote_average: f64,
    #[serde(default)]
    vote_count: u64,
    overview: Option<String>,
    #[serde(default)]
    genres: Vec<GenreDto>,
    backdrop_path: Option<String>,
    #[serde(default)]
    seasons: Vec<SeasonSummaryDto>,
}

impl From<TvDto> for MediaDetails {
    fn from(show: TvDto) -> Self {
        MediaDetails {
            year: year_of(show.first_air_date.as_deref()),
            title: show.name,
            rating: round_rating(show.vote_average),
            rating_count: show.vote_count,
            synopsis: show.overview.unwrap_or_default(),
            genres: show.genres.into_iter().map(|g| g.name).collect(),
            backdrop_path: artwork_path(show.backdrop_path),
            seasons: show.seasons.into_iter().map(|s| s.season_number).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SeasonDto {
    #[serde(default)]
    episodes: Vec<EpisodeDto>,
}

#[derive(Debug, Deserialize)]
struct EpisodeDto {
    episode_number: u32,
    #[serde(default)]
    name: String,
    overview: Option<String>,
    still_path: Option<String>,
}

impl From<EpisodeDto> for SeasonEpisode {
    fn from(ep: EpisodeDto) -> Self {
        SeasonEpisode {
            episode_number: ep.episode_number,
            title: ep.name,
            synopsis: ep.overview.unwrap_or_default(),
            still_path: artwork_path(ep.still_path),
        }
    }
}
