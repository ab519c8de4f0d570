use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Countries whose release timestamps are published at local midnight of
/// the US west coast, so the UTC date is a day late.
const PACIFIC_COUNTRIES: &[&str] = &["United States", "USA"];

const PACIFIC_OFFSET_SECS: i32 = -8 * 3600;

/// Episode structure of a title, as reported by a metadata addon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kitsu_id: Option<String>,
    /// Type reported by the source ("movie", "series").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    /// Episodes per season, in season order. Specials (season 0) excluded.
    #[serde(default)]
    pub episode_count_per_season: Vec<u32>,
    #[serde(default)]
    pub total_episode_count: u32,
    /// Every episode with a known air date, specials included.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub videos: Vec<EpisodeVideo>,
}

/// One episode and the local date it aired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeVideo {
    pub season: u32,
    pub episode: u32,
    /// `YYYY-MM-DD`
    pub released: String,
}

impl SeriesMetadata {
    /// Episode count of a 1-based season.
    pub fn episode_count(&self, season: u32) -> Option<u32> {
        let idx = season.checked_sub(1)? as usize;
        self.episode_count_per_season.get(idx).copied()
    }

    /// Season and episode that aired on `date` (`YYYY-MM-DD`).
    pub fn episode_on(&self, date: &str) -> Option<(u32, u32)> {
        self.videos
            .iter()
            .find(|v| v.released == date)
            .map(|v| (v.season, v.episode))
    }

    /// Build from an addon `meta` object. `None` when it carries no id.
    pub(crate) fn from_meta(meta: Meta) -> Option<Self> {
        let imdb_id = meta.imdb_id.filter(|id| !id.is_empty());
        let kitsu_id = meta.kitsu_id.and_then(|v| value_to_string(&v));
        if imdb_id.is_none() && kitsu_id.is_none() {
            return None;
        }

        let offset = release_offset(meta.country.as_deref());
        let mut per_season: BTreeMap<u32, u32> = BTreeMap::new();
        let mut videos = Vec::new();
        for video in &meta.videos {
            if let (Some(season), Some(episode)) = (video.season, video.episode) {
                if season != 0 && episode != 0 {
                    *per_season.entry(season).or_insert(0) += 1;
                }
                if let Some(released) = video.released.as_deref().and_then(|r| local_date(r, offset)) {
                    videos.push(EpisodeVideo {
                        season,
                        episode,
                        released,
                    });
                }
            }
        }

        Some(Self {
            imdb_id,
            kitsu_id,
            media_type: meta.media_type,
            title: meta.name.unwrap_or_default(),
            year: meta.year.as_ref().and_then(leading_year),
            total_episode_count: per_season.values().sum(),
            episode_count_per_season: per_season.into_values().collect(),
            videos,
        })
    }
}

/// Addon response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct MetaResponse {
    #[serde(default)]
    pub meta: Option<Meta>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Meta {
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub kitsu_id: Option<serde_json::Value>,
    #[serde(default, rename = "type")]
    pub media_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Number or string such as "2008-2013".
    #[serde(default)]
    pub year: Option<serde_json::Value>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub videos: Vec<Video>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Video {
    #[serde(default)]
    pub season: Option<u32>,
    #[serde(default)]
    pub episode: Option<u32>,
    /// RFC 3339 timestamp.
    #[serde(default)]
    pub released: Option<String>,
}

fn release_offset(country: Option<&str>) -> i32 {
    match country {
        Some(c) if PACIFIC_COUNTRIES.contains(&c) => PACIFIC_OFFSET_SECS,
        _ => 0,
    }
}

fn local_date(released: &str, offset_secs: i32) -> Option<String> {
    let offset = FixedOffset::east_opt(offset_secs)?;
    let timestamp = DateTime::parse_from_rfc3339(released).ok()?;
    Some(timestamp.with_timezone(&offset).format("%Y-%m-%d").to_string())
}

fn value_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn leading_year(value: &serde_json::Value) -> Option<u32> {
    match value {
        serde_json::Value::Number(n) => n.as_u64().map(|y| y as u32),
        serde_json::Value::String(s) => s.get(..4).and_then(|y| y.parse().ok()),
        _ => None,
    }
}

/// Errors that can occur while fetching metadata.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Metadata not found: {0}")]
    NotFound(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status}")]
    Api { status: u16 },

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Option<SeriesMetadata> {
        let response: MetaResponse = serde_json::from_str(body).unwrap();
        response.meta.and_then(SeriesMetadata::from_meta)
    }

    #[test]
    fn test_episode_counts_group_by_season() {
        let meta = parse(
            r#"{"meta":{"imdb_id":"tt0903747","type":"series","name":"Breaking Bad","year":"2008-2013",
            "videos":[
                {"season":0,"episode":1},
                {"season":1,"episode":1},{"season":1,"episode":2},{"season":1,"episode":3},
                {"season":2,"episode":0},
                {"season":2,"episode":1},{"season":2,"episode":2}
            ]}}"#,
        )
        .unwrap();

        assert_eq!(meta.imdb_id.as_deref(), Some("tt0903747"));
        assert_eq!(meta.year, Some(2008));
        assert_eq!(meta.media_type.as_deref(), Some("series"));
        assert_eq!(meta.episode_count_per_season, vec![3, 2]);
        assert_eq!(meta.total_episode_count, 5);
        assert_eq!(meta.episode_count(1), Some(3));
        assert_eq!(meta.episode_count(2), Some(2));
        assert_eq!(meta.episode_count(3), None);
        assert_eq!(meta.episode_count(0), None);
    }

    #[test]
    fn test_release_dates_follow_country() {
        let meta = parse(
            r#"{"meta":{"imdb_id":"tt0115147","type":"series","country":"USA",
            "videos":[
                {"season":26,"episode":80,"released":"2021-03-16T08:00:00.000Z"},
                {"season":26,"episode":81,"released":"2021-03-17T08:00:00.000Z"},
                {"season":26,"episode":82}
            ]}}"#,
        )
        .unwrap();
        assert_eq!(meta.videos.len(), 2);
        assert_eq!(meta.episode_on("2021-03-16"), Some((26, 80)));
        assert_eq!(meta.episode_on("2021-03-17"), Some((26, 81)));
        assert_eq!(meta.episode_on("2021-03-18"), None);

        let meta = parse(
            r#"{"meta":{"imdb_id":"tt0115147","country":"United Kingdom",
            "videos":[{"season":1,"episode":1,"released":"2021-03-16T08:00:00.000Z"}]}}"#,
        )
        .unwrap();
        assert_eq!(meta.episode_on("2021-03-16"), Some((1, 1)));
    }

    #[test]
    fn test_numeric_kitsu_id_and_year() {
        let meta = parse(
            r#"{"meta":{"kitsu_id":7442,"type":"series","name":"Attack on Titan","year":2013,
            "videos":[{"season":1,"episode":1}]}}"#,
        )
        .unwrap();
        assert_eq!(meta.kitsu_id.as_deref(), Some("7442"));
        assert!(meta.imdb_id.is_none());
        assert_eq!(meta.year, Some(2013));
    }

    #[test]
    fn test_meta_without_id_is_rejected() {
        assert!(parse(r#"{"meta":{"name":"Unknown","videos":[]}}"#).is_none());
        assert!(parse(r#"{}"#).is_none());
    }
}
