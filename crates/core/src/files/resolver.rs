use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::cached::{store_listing, CacheFallbackStrategy};
use super::extension::is_video;
use super::peer_wire::PeerWireStrategy;
use super::torrent_file::DirectDownloadStrategy;
use super::{FileCandidate, FileListingError};
use crate::cache::CacheStore;
use crate::config::FilesConfig;
use crate::metrics;
use crate::torrent::TorrentRecord;

/// One way of obtaining a torrent's file table.
#[async_trait]
pub trait ListingStrategy: Send + Sync {
    /// Name used in logs and metrics.
    fn name(&self) -> &'static str;

    /// List every file of the torrent, videos or not.
    async fn list(&self, record: &TorrentRecord) -> Result<Vec<FileCandidate>, FileListingError>;

    /// Whether a listing from this strategy should be written to the cache.
    fn write_back(&self) -> bool {
        true
    }
}

/// Runs listing strategies in order until one succeeds.
pub struct FileListingResolver {
    strategies: Vec<Arc<dyn ListingStrategy>>,
    cache: Option<Arc<dyn CacheStore>>,
    cache_ttl: Duration,
    min_video_size: u64,
}

impl FileListingResolver {
    /// Create a resolver over an explicit strategy chain.
    pub fn new(
        strategies: Vec<Arc<dyn ListingStrategy>>,
        cache: Option<Arc<dyn CacheStore>>,
        cache_ttl: Duration,
        min_video_size_mb: u64,
    ) -> Self {
        Self {
            strategies,
            cache,
            cache_ttl,
            min_video_size: min_video_size_mb * 1024 * 1024,
        }
    }

    /// Standard chain: .torrent download, peer wire (when enabled), cache.
    pub fn from_config(
        config: &FilesConfig,
        cache: Arc<dyn CacheStore>,
        cache_ttl: Duration,
    ) -> Self {
        let mut strategies: Vec<Arc<dyn ListingStrategy>> = vec![Arc::new(
            DirectDownloadStrategy::new(Duration::from_secs(config.direct_timeout_secs)),
        )];
        if config.peer_wire_enabled {
            strategies.push(Arc::new(PeerWireStrategy::new(config)));
        }
        strategies.push(Arc::new(CacheFallbackStrategy::new(cache.clone())));

        Self::new(strategies, Some(cache), cache_ttl, config.min_video_size_mb)
    }

    /// Full file table from the first strategy that returns one.
    pub async fn list_files(
        &self,
        record: &TorrentRecord,
    ) -> Result<Vec<FileCandidate>, FileListingError> {
        for strategy in &self.strategies {
            match strategy.list(record).await {
                Ok(files) if !files.is_empty() => {
                    metrics::LISTING_ATTEMPTS
                        .with_label_values(&[strategy.name(), "success"])
                        .inc();
                    debug!(
                        info_hash = %record.info_hash,
                        strategy = strategy.name(),
                        files = files.len(),
                        "File listing resolved"
                    );

                    if strategy.write_back() {
                        if let Some(ref cache) = self.cache {
                            store_listing(cache.as_ref(), &record.info_hash, &files, self.cache_ttl)
                                .await;
                        }
                    }
                    return Ok(files);
                }
                Ok(_) => {
                    metrics::LISTING_ATTEMPTS
                        .with_label_values(&[strategy.name(), "empty"])
                        .inc();
                }
                Err(e) => {
                    metrics::LISTING_ATTEMPTS
                        .with_label_values(&[strategy.name(), e.status()])
                        .inc();
                    match e {
                        FileListingError::Unavailable(_) | FileListingError::NoFilesFound => {
                            debug!(
                                info_hash = %record.info_hash,
                                strategy = strategy.name(),
                                reason = %e,
                                "Listing strategy skipped"
                            );
                        }
                        _ => {
                            warn!(
                                info_hash = %record.info_hash,
                                strategy = strategy.name(),
                                error = %e,
                                "Listing strategy failed, trying next"
                            );
                        }
                    }
                }
            }
        }

        Err(FileListingError::NoFilesFound)
    }

    /// Video files of the torrent.
    ///
    /// When there is more than one video, files under the minimum size
    /// (samples, extras) are dropped.
    pub async fn list_videos(
        &self,
        record: &TorrentRecord,
    ) -> Result<Vec<FileCandidate>, FileListingError> {
        let files = self.list_files(record).await?;
        let videos = select_videos(files, self.min_video_size);
        if videos.is_empty() {
            return Err(FileListingError::NoFilesFound);
        }
        Ok(videos)
    }
}

/// Keep videos, dropping small ones when several are present.
pub fn select_videos(files: Vec<FileCandidate>, min_size: u64) -> Vec<FileCandidate> {
    let videos: Vec<FileCandidate> = files.into_iter().filter(|f| is_video(&f.path)).collect();
    if videos.len() <= 1 {
        return videos;
    }
    videos.into_iter().filter(|f| f.size >= min_size).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::files::CacheFallbackStrategy;
    use crate::testing::{fixtures, MockListingStrategy};

    const MB: u64 = 1024 * 1024;

    fn file(idx: u32, path: &str, size: u64) -> FileCandidate {
        FileCandidate::from_path(idx, path, size)
    }

    #[test]
    fn test_select_videos_filters_extensions() {
        let files = vec![
            file(0, "Show.S01E01.mkv", 500 * MB),
            file(1, "Show.S01E01.srt", 1),
            file(2, "Show.S01E02.MP4", 500 * MB),
        ];
        let videos = select_videos(files, 20 * MB);
        assert_eq!(videos.len(), 2);
        assert_eq!(videos[1].file_index, 2);
    }

    #[test]
    fn test_select_videos_drops_small_when_multiple() {
        let files = vec![
            file(0, "Movie.mkv", 900 * MB),
            file(1, "Sample/sample.mkv", 5 * MB),
        ];
        let videos = select_videos(files, 20 * MB);
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].name, "Movie.mkv");
    }

    #[test]
    fn test_select_videos_keeps_single_small_video() {
        let videos = select_videos(vec![file(0, "Short.mkv", MB)], 20 * MB);
        assert_eq!(videos.len(), 1);
    }

    #[tokio::test]
    async fn test_first_success_short_circuits() {
        let direct = Arc::new(MockListingStrategy::succeeding(
            "direct",
            vec![file(0, "Show.S01E01.mkv", 500 * MB)],
        ));
        let peer = Arc::new(MockListingStrategy::failing(
            "peer",
            FileListingError::Timeout,
        ));
        let resolver = FileListingResolver::new(
            vec![direct.clone() as Arc<dyn ListingStrategy>, peer.clone()],
            None,
            Duration::from_secs(60),
            20,
        );

        let record = fixtures::series_record("Show.S01.1080p");
        let files = resolver.list_videos(&record).await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(direct.calls(), 1);
        assert_eq!(peer.calls(), 0);
    }

    #[tokio::test]
    async fn test_falls_back_after_timeout() {
        let direct = Arc::new(MockListingStrategy::failing(
            "direct",
            FileListingError::Timeout,
        ));
        let peer = Arc::new(MockListingStrategy::succeeding(
            "peer",
            vec![file(0, "Show.S01E01.mkv", 500 * MB)],
        ));
        let resolver = FileListingResolver::new(
            vec![direct.clone() as Arc<dyn ListingStrategy>, peer.clone()],
            None,
            Duration::from_secs(60),
            20,
        );

        let record = fixtures::series_record("Show.S01.1080p");
        assert_eq!(resolver.list_videos(&record).await.unwrap().len(), 1);
        assert_eq!(direct.calls(), 1);
        assert_eq!(peer.calls(), 1);
    }

    #[tokio::test]
    async fn test_all_fail_is_no_files() {
        let resolver = FileListingResolver::new(
            vec![Arc::new(MockListingStrategy::failing(
                "direct",
                FileListingError::Http("HTTP 404".to_string()),
            ))],
            None,
            Duration::from_secs(60),
            20,
        );
        let record = fixtures::series_record("Show.S01.1080p");
        assert!(matches!(
            resolver.list_files(&record).await,
            Err(FileListingError::NoFilesFound)
        ));
    }

    #[tokio::test]
    async fn test_no_videos_is_no_files() {
        let resolver = FileListingResolver::new(
            vec![Arc::new(MockListingStrategy::succeeding(
                "direct",
                vec![file(0, "readme.txt", 10)],
            ))],
            None,
            Duration::from_secs(60),
            20,
        );
        let record = fixtures::series_record("Show.S01.1080p");
        assert!(matches!(
            resolver.list_videos(&record).await,
            Err(FileListingError::NoFilesFound)
        ));
    }

    #[tokio::test]
    async fn test_success_is_written_back_to_cache() {
        let cache: Arc<dyn CacheStore> = Arc::new(MemoryCache::new());
        let direct = Arc::new(MockListingStrategy::succeeding(
            "direct",
            vec![
                file(0, "Show.S01E01.mkv", 500 * MB),
                file(1, "Show.S01E02.mkv", 500 * MB),
            ],
        ));
        let resolver = FileListingResolver::new(
            vec![direct as Arc<dyn ListingStrategy>],
            Some(cache.clone()),
            Duration::from_secs(60),
            20,
        );
        let record = fixtures::series_record("Show.S01.1080p");
        resolver.list_files(&record).await.unwrap();

        // a later resolver with only the cache strategy sees the listing
        let offline = FileListingResolver::new(
            vec![Arc::new(CacheFallbackStrategy::new(cache.clone()))],
            Some(cache),
            Duration::from_secs(60),
            20,
        );
        let files = offline.list_files(&record).await.unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[1].name, "Show.S01E02.mkv");
    }
}
