//! Types for the canonical catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A playable unit of a torrent: one movie, or one episode of one file.
///
/// Series entries always carry both `season` and `episode`; movie entries
/// carry neither. Featurettes of a series carry no id at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalFile {
    pub info_hash: String,
    /// Index in the torrent's file table, `None` when the torrent holds a
    /// single video or the listing was unknown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_index: Option<u32>,
    pub title: String,
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kitsu_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
}

impl CanonicalFile {
    /// Whether this entry describes an episode rather than a movie.
    pub fn is_episode(&self) -> bool {
        self.season.is_some() && self.episode.is_some()
    }
}

/// Torrent that must never be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipRecord {
    pub info_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Torrent whose identity could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedIdentityRecord {
    pub info_hash: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Torrent not stored: {0}")]
    MissingTorrent(String),

    #[error("Corrupt row: {0}")]
    Corrupt(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_file_serialization_skips_episode_fields() {
        let file = CanonicalFile {
            info_hash: "a".repeat(40),
            file_index: None,
            title: "Movie 2020".to_string(),
            size: 1024,
            imdb_id: Some("tt1234567".to_string()),
            kitsu_id: None,
            season: None,
            episode: None,
        };
        let json = serde_json::to_string(&file).unwrap();
        assert!(!json.contains("season"));
        assert!(!json.contains("file_index"));
        assert!(!file.is_episode());
    }
}
