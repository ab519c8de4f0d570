use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::{MetadataError, MetadataSource, SeriesMetadata, StremioMetaClient};
use crate::cache::{self, CacheStore};
use crate::config::MetadataConfig;
use crate::torrent::TorrentType;

const METADATA_NAMESPACE: &str = "metadata";

/// Fetches episode structure for a canonical id, with caching.
///
/// The anime addon is asked first and the general addon second. When both
/// come back empty the general addon is asked again under the other meta
/// type, since upstream data sometimes files series as movies.
pub struct MetadataFetcher {
    anime: Arc<dyn MetadataSource>,
    general: Arc<dyn MetadataSource>,
    cache: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl MetadataFetcher {
    pub fn new(
        anime: Arc<dyn MetadataSource>,
        general: Arc<dyn MetadataSource>,
        cache: Arc<dyn CacheStore>,
        ttl: Duration,
    ) -> Self {
        Self {
            anime,
            general,
            cache,
            ttl,
        }
    }

    pub fn from_config(
        config: &MetadataConfig,
        cache: Arc<dyn CacheStore>,
        ttl: Duration,
    ) -> Result<Self, MetadataError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let anime = Arc::new(StremioMetaClient::new("kitsu", &config.kitsu_url, timeout)?);
        let general = Arc::new(StremioMetaClient::new(
            "cinemeta",
            &config.cinemeta_url,
            timeout,
        )?);
        Ok(Self::new(anime, general, cache, ttl))
    }

    /// Fetch metadata for an IMDb id or a bare Kitsu id.
    pub async fn fetch(
        &self,
        id: &str,
        media_type: TorrentType,
    ) -> Result<SeriesMetadata, MetadataError> {
        let key = meta_key(id);
        if let Some(meta) =
            cache::get_json::<SeriesMetadata>(self.cache.as_ref(), METADATA_NAMESPACE, &key).await
        {
            return Ok(meta);
        }

        let meta_type = meta_type_for(media_type);
        let other_type = if meta_type == "movie" { "series" } else { "movie" };
        let attempts: [(&Arc<dyn MetadataSource>, &str); 3] = [
            (&self.anime, meta_type),
            (&self.general, meta_type),
            (&self.general, other_type),
        ];

        for (source, requested_type) in attempts {
            match source.fetch(requested_type, &key).await {
                Ok(Some(meta)) => {
                    debug!(
                        source = source.name(),
                        key = %key,
                        seasons = meta.episode_count_per_season.len(),
                        "Metadata resolved"
                    );
                    cache::set_json(self.cache.as_ref(), METADATA_NAMESPACE, &key, &meta, self.ttl)
                        .await;
                    return Ok(meta);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(source = source.name(), key = %key, error = %e, "Metadata request failed");
                }
            }
        }

        Err(MetadataError::NotFound(key))
    }
}

/// Numeric ids are Kitsu ids and are addressed as `kitsu:{id}`.
pub fn meta_key(id: &str) -> String {
    if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
        format!("kitsu:{}", id)
    } else {
        id.to_string()
    }
}

fn meta_type_for(media_type: TorrentType) -> &'static str {
    match media_type {
        TorrentType::Movie => "movie",
        TorrentType::Series | TorrentType::Anime => "series",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::testing::MockMetadataSource;

    fn meta(counts: Vec<u32>) -> SeriesMetadata {
        SeriesMetadata {
            imdb_id: Some("tt0903747".to_string()),
            total_episode_count: counts.iter().sum(),
            episode_count_per_season: counts,
            ..Default::default()
        }
    }

    #[test]
    fn test_meta_key() {
        assert_eq!(meta_key("7442"), "kitsu:7442");
        assert_eq!(meta_key("tt0903747"), "tt0903747");
    }

    #[tokio::test]
    async fn test_anime_source_first() {
        let anime = Arc::new(MockMetadataSource::returning("kitsu", Some(meta(vec![12]))));
        let general = Arc::new(MockMetadataSource::returning("cinemeta", Some(meta(vec![24]))));
        let fetcher = MetadataFetcher::new(
            anime.clone(),
            general.clone(),
            Arc::new(MemoryCache::new()),
            Duration::from_secs(60),
        );

        let result = fetcher.fetch("7442", TorrentType::Anime).await.unwrap();
        assert_eq!(result.episode_count_per_season, vec![12]);
        assert_eq!(anime.requests(), vec![("series".to_string(), "kitsu:7442".to_string())]);
        assert!(general.requests().is_empty());
    }

    #[tokio::test]
    async fn test_retries_general_with_other_type() {
        let anime = Arc::new(MockMetadataSource::returning("kitsu", None));
        let general = Arc::new(MockMetadataSource::for_type("cinemeta", "series", meta(vec![7])));
        let fetcher = MetadataFetcher::new(
            anime.clone(),
            general.clone(),
            Arc::new(MemoryCache::new()),
            Duration::from_secs(60),
        );

        let result = fetcher.fetch("tt0903747", TorrentType::Movie).await.unwrap();
        assert_eq!(result.episode_count_per_season, vec![7]);
        assert_eq!(
            general.requests(),
            vec![
                ("movie".to_string(), "tt0903747".to_string()),
                ("series".to_string(), "tt0903747".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_all_sources_empty_is_not_found() {
        let fetcher = MetadataFetcher::new(
            Arc::new(MockMetadataSource::returning("kitsu", None)),
            Arc::new(MockMetadataSource::failing("cinemeta")),
            Arc::new(MemoryCache::new()),
            Duration::from_secs(60),
        );
        assert!(matches!(
            fetcher.fetch("tt1", TorrentType::Series).await,
            Err(MetadataError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_result_is_cached() {
        let anime = Arc::new(MockMetadataSource::returning("kitsu", None));
        let general = Arc::new(MockMetadataSource::returning("cinemeta", Some(meta(vec![24, 24]))));
        let fetcher = MetadataFetcher::new(
            anime.clone(),
            general.clone(),
            Arc::new(MemoryCache::new()),
            Duration::from_secs(60),
        );

        fetcher.fetch("tt0903747", TorrentType::Series).await.unwrap();
        fetcher.fetch("tt0903747", TorrentType::Series).await.unwrap();
        assert_eq!(anime.requests().len(), 1);
        assert_eq!(general.requests().len(), 1);
    }
}
