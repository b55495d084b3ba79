use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Kind of catalog entry. Movies carry a single `(0, 0)` episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MediaKind {
    /// Single feature-length file
    Movie,
    /// Seasons of episodes
    #[cfg_attr(feature = "serde", serde(alias = "tv"))]
    Series,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Series => "series",
        }
    }

    pub fn is_movie(&self) -> bool {
        matches!(self, MediaKind::Movie)
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMediaKindError(pub String);

impl Display for ParseMediaKindError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "unknown media kind '{}'", self.0)
    }
}

impl std::error::Error for ParseMediaKindError {}

impl FromStr for MediaKind {
    type Err = ParseMediaKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" => Ok(MediaKind::Movie),
            "series" | "tv" | "show" => Ok(MediaKind::Series),
            other => Err(ParseMediaKindError(other.to_string())),
        }
    }
}
