use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::escape_title;
use crate::title::ParsedTitleInfo;
use crate::torrent::TorrentType;

/// What to look up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityQuery {
    /// Escaped title (see [`escape_title`]).
    pub title: String,
    pub year: Option<u32>,
    pub media_type: TorrentType,
    /// Season, used to pick the right entry of a multi-season anime.
    pub season: Option<u32>,
}

impl IdentityQuery {
    /// Build a query from parsed title attributes. The year falls back to
    /// the year of the air date.
    pub fn from_parsed(info: &ParsedTitleInfo, media_type: TorrentType) -> Self {
        Self {
            title: escape_title(&info.title),
            year: info.search_year(),
            media_type,
            season: info.season,
        }
    }

    /// Type used by IMDb lookups, where anime is a series.
    pub fn imdb_type(&self) -> &'static str {
        match self.media_type {
            TorrentType::Movie => "movie",
            TorrentType::Series | TorrentType::Anime => "series",
        }
    }
}

/// A resolved canonical identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", content = "id", rename_all = "snake_case")]
pub enum CanonicalId {
    /// `tt` + digits.
    Imdb(String),
    /// Bare numeric Kitsu id.
    Kitsu(String),
}

impl CanonicalId {
    pub fn imdb_id(&self) -> Option<&str> {
        match self {
            CanonicalId::Imdb(id) => Some(id),
            CanonicalId::Kitsu(_) => None,
        }
    }

    pub fn kitsu_id(&self) -> Option<&str> {
        match self {
            CanonicalId::Kitsu(id) => Some(id),
            CanonicalId::Imdb(_) => None,
        }
    }

    /// The id itself, whichever catalog it belongs to.
    pub fn as_str(&self) -> &str {
        match self {
            CanonicalId::Imdb(id) | CanonicalId::Kitsu(id) => id,
        }
    }
}

/// Errors that can occur during identity resolution.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Identity not found: {0}")]
    NotFound(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status}")]
    Api { status: u16 },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("No search host available")]
    NoHostAvailable,
}

impl IdentityError {
    /// Whether every source answered without a match. Any other error means
    /// some source could not be asked and the lookup is worth retrying.
    pub fn is_not_found(&self) -> bool {
        matches!(self, IdentityError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::title::parse_title;

    #[test]
    fn test_query_from_parsed_uses_date_year() {
        let info = parse_title("Late.Night.Show.2019.05.14.720p");
        let query = IdentityQuery::from_parsed(&info, TorrentType::Series);
        assert_eq!(query.title, "late night show");
        assert_eq!(query.year, Some(2019));
        assert_eq!(query.imdb_type(), "series");
    }
}
