//! Listing from entries previously written to the lookup cache.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::{FileCandidate, FileListingError, ListingStrategy};
use crate::cache::{self, CacheStore};
use crate::torrent::TorrentRecord;

/// Cache namespace for file listings.
pub const FILES_NAMESPACE: &str = "files";

/// Size reported for cached entries, which only keep index and path.
pub const PLACEHOLDER_SIZE: u64 = 300_000_000;

/// Serves listings stored as `index@@path` entries keyed by info hash.
pub struct CacheFallbackStrategy {
    cache: Arc<dyn CacheStore>,
}

impl CacheFallbackStrategy {
    pub fn new(cache: Arc<dyn CacheStore>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl ListingStrategy for CacheFallbackStrategy {
    fn name(&self) -> &'static str {
        "cache"
    }

    fn write_back(&self) -> bool {
        false
    }

    async fn list(&self, record: &TorrentRecord) -> Result<Vec<FileCandidate>, FileListingError> {
        let entries: Vec<String> =
            cache::get_json(self.cache.as_ref(), FILES_NAMESPACE, &record.info_hash)
                .await
                .ok_or(FileListingError::NoFilesFound)?;

        let files: Vec<FileCandidate> = entries.iter().filter_map(|e| decode_entry(e)).collect();
        if files.is_empty() {
            return Err(FileListingError::NoFilesFound);
        }
        Ok(files)
    }
}

/// Store a listing for later use by [`CacheFallbackStrategy`].
pub async fn store_listing(
    cache: &dyn CacheStore,
    info_hash: &str,
    files: &[FileCandidate],
    ttl: Duration,
) {
    let entries: Vec<String> = files.iter().map(encode_entry).collect();
    cache::set_json(cache, FILES_NAMESPACE, info_hash, &entries, ttl).await;
}

fn encode_entry(file: &FileCandidate) -> String {
    format!("{}@@{}", file.file_index, file.path)
}

fn decode_entry(entry: &str) -> Option<FileCandidate> {
    let (index, path) = entry.split_once("@@")?;
    let index = index.parse().ok()?;
    if path.is_empty() {
        return None;
    }
    Some(FileCandidate::from_path(index, path, PLACEHOLDER_SIZE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::testing::fixtures;

    #[test]
    fn test_decode_entry() {
        let file = decode_entry("4@@Season 2/Show.S02E05.mkv").unwrap();
        assert_eq!(file.file_index, 4);
        assert_eq!(file.name, "Show.S02E05.mkv");
        assert_eq!(file.size, PLACEHOLDER_SIZE);

        assert!(decode_entry("no-separator").is_none());
        assert!(decode_entry("x@@file.mkv").is_none());
        assert!(decode_entry("1@@").is_none());
    }

    #[tokio::test]
    async fn test_store_then_list() {
        let cache = Arc::new(MemoryCache::new());
        let record = fixtures::series_record("Show.S01.1080p");
        let files = vec![
            FileCandidate::from_path(0, "Show.S01E01.mkv", 500),
            FileCandidate::from_path(1, "Show.S01E02.mkv", 500),
        ];
        store_listing(cache.as_ref(), &record.info_hash, &files, Duration::from_secs(60)).await;

        let strategy = CacheFallbackStrategy::new(cache);
        let listed = strategy.list(&record).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[1].path, "Show.S01E02.mkv");
        assert_eq!(listed[1].size, PLACEHOLDER_SIZE);
    }

    #[tokio::test]
    async fn test_miss_is_no_files() {
        let strategy = CacheFallbackStrategy::new(Arc::new(MemoryCache::new()));
        let record = fixtures::series_record("Show.S01.1080p");
        assert!(matches!(
            strategy.list(&record).await,
            Err(FileListingError::NoFilesFound)
        ));
    }
}
