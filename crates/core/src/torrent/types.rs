//! Types describing a discovered torrent release.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Content type of a torrent release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TorrentType {
    Movie,
    Series,
    Anime,
}

impl TorrentType {
    /// String form used in cache keys and persistence.
    pub fn as_str(&self) -> &'static str {
        match self {
            TorrentType::Movie => "movie",
            TorrentType::Series => "series",
            TorrentType::Anime => "anime",
        }
    }
}

impl fmt::Display for TorrentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TorrentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(TorrentType::Movie),
            "series" => Ok(TorrentType::Series),
            "anime" => Ok(TorrentType::Anime),
            other => Err(format!("unknown torrent type: {}", other)),
        }
    }
}

/// A fully resolved torrent release, ready for ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TorrentRecord {
    /// Info hash (40-char lowercase hex).
    pub info_hash: String,
    /// Provider that discovered this torrent.
    pub provider: String,
    /// Release title as published.
    pub title: String,
    /// Content type.
    #[serde(rename = "type")]
    pub torrent_type: TorrentType,
    /// Total size in bytes.
    pub size: u64,
    /// When the release was uploaded to the provider.
    pub upload_date: DateTime<Utc>,
    /// Seeders reported by the provider.
    #[serde(default)]
    pub seeders: u32,
    /// .torrent download URL (if available).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub torrent_link: Option<String>,
    /// Magnet URI (if available).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magnet_link: Option<String>,
    /// IMDb id published by the provider, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
    /// Kitsu id published by the provider, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kitsu_id: Option<String>,
    /// Provider hint that this torrent bundles several items.
    #[serde(default)]
    pub pack: bool,
}

impl TorrentRecord {
    /// Magnet URI for this torrent, built from the info hash when the
    /// provider did not supply one.
    pub fn magnet_uri(&self) -> String {
        match &self.magnet_link {
            Some(magnet) => magnet.clone(),
            None => format!("magnet:?xt=urn:btih:{}", self.info_hash),
        }
    }
}

/// Check that a string looks like a v1 info hash (40 hex chars).
pub fn is_valid_info_hash(hash: &str) -> bool {
    hash.len() == 40 && hash.chars().all(|c| c.is_ascii_hexdigit())
}

/// Extract the lowercase hex info hash from a magnet URI.
pub fn info_hash_from_magnet(magnet: &str) -> Option<String> {
    let lower = magnet.to_lowercase();
    let start = lower.find("urn:btih:")? + "urn:btih:".len();
    let hash: String = lower[start..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect();

    if is_valid_info_hash(&hash) {
        Some(hash)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_torrent_type_roundtrip_str() {
        for t in [TorrentType::Movie, TorrentType::Series, TorrentType::Anime] {
            assert_eq!(t.as_str().parse::<TorrentType>().unwrap(), t);
        }
        assert!("music".parse::<TorrentType>().is_err());
    }

    #[test]
    fn test_torrent_type_serialization() {
        assert_eq!(
            serde_json::to_string(&TorrentType::Anime).unwrap(),
            "\"anime\""
        );
    }

    #[test]
    fn test_info_hash_from_magnet() {
        let magnet = "magnet:?xt=urn:btih:ABCDEF0123456789ABCDEF0123456789ABCDEF01&dn=Some.Show";
        assert_eq!(
            info_hash_from_magnet(magnet).as_deref(),
            Some("abcdef0123456789abcdef0123456789abcdef01")
        );
    }

    #[test]
    fn test_info_hash_from_magnet_rejects_short_hash() {
        assert!(info_hash_from_magnet("magnet:?xt=urn:btih:abc123").is_none());
        assert!(info_hash_from_magnet("https://example.com").is_none());
    }

    #[test]
    fn test_magnet_uri_fallback() {
        let record = TorrentRecord {
            info_hash: "abcdef0123456789abcdef0123456789abcdef01".to_string(),
            provider: "test".to_string(),
            title: "Test".to_string(),
            torrent_type: TorrentType::Movie,
            size: 0,
            upload_date: Utc::now(),
            seeders: 0,
            torrent_link: None,
            magnet_link: None,
            imdb_id: None,
            kitsu_id: None,
            pack: false,
        };
        assert_eq!(
            record.magnet_uri(),
            "magnet:?xt=urn:btih:abcdef0123456789abcdef0123456789abcdef01"
        );
    }
}
