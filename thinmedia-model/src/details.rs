/// Full record for a movie or series as returned by a metadata provider.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MediaDetails {
    pub title: String,
    /// Release (or first air) year, `0` when unknown
    pub year: i32,
    pub rating: f64,
    pub rating_count: u64,
    pub synopsis: String,
    pub genres: Vec<String>,
    pub backdrop_path: Option<String>,
    /// Season numbers announced by the provider. Empty for movies.
    pub seasons: Vec<u32>,
}

/// One episode inside a season listing.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeasonEpisode {
    pub episode_number: u32,
    pub title: String,
    pub synopsis: String,
    pub still_path: Option<String>,
}

impl SeasonEpisode {
    pub fn new(episode_number: u32, title: impl Into<String>) -> Self {
        Self {
            episode_number,
            title: title.into(),
            ..Self::default()
        }
    }
}
