//! Listing by downloading the .torrent file published by the provider.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use librqbit_core::torrent_metainfo::{torrent_from_bytes, TorrentMetaV1Owned};
use reqwest::Client;
use tracing::debug;

use super::metainfo::listing_from_info;
use super::{FileCandidate, FileListingError, ListingStrategy};
use crate::metrics;
use crate::torrent::TorrentRecord;

/// Fetches the record's `torrent_link` and decodes its file table.
pub struct DirectDownloadStrategy {
    http_client: Client,
}

impl DirectDownloadStrategy {
    pub fn new(timeout: Duration) -> Self {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { http_client }
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FileListingError> {
        let response = self.http_client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FileListingError::Timeout
            } else {
                FileListingError::Http(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(FileListingError::Http(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let bytes = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                FileListingError::Timeout
            } else {
                FileListingError::Http(e.to_string())
            }
        })?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl ListingStrategy for DirectDownloadStrategy {
    fn name(&self) -> &'static str {
        "torrent_file"
    }

    async fn list(&self, record: &TorrentRecord) -> Result<Vec<FileCandidate>, FileListingError> {
        let url = record
            .torrent_link
            .as_deref()
            .ok_or_else(|| FileListingError::Unavailable("no torrent link".to_string()))?;

        debug!(info_hash = %record.info_hash, url = %url, "Fetching .torrent file");
        let started = Instant::now();
        let result = self.fetch(url).await;
        metrics::observe_external_call("torrent_file", "download", started, result.is_ok());

        parse_torrent_listing(&result?)
    }
}

/// Decode the file table of raw .torrent bytes.
pub fn parse_torrent_listing(bytes: &[u8]) -> Result<Vec<FileCandidate>, FileListingError> {
    let torrent: TorrentMetaV1Owned =
        torrent_from_bytes(bytes).map_err(|e| FileListingError::Parse(e.to_string()))?;
    listing_from_info(&torrent.info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    const MULTI_FILE: &[u8] = b"d4:infod5:filesld6:lengthi1000e4:pathl8:Season 110:S01E01.mkveed6:lengthi10e4:pathl9:notes.txteee4:name4:Show12:piece lengthi16384e6:pieces20:aaaaaaaaaaaaaaaaaaaaee";

    const SINGLE_FILE: &[u8] =
        b"d4:infod6:lengthi2048e4:name14:Movie.2020.mkv12:piece lengthi16384e6:pieces20:aaaaaaaaaaaaaaaaaaaaee";

    #[test]
    fn test_parse_multi_file_strips_root() {
        let files = parse_torrent_listing(MULTI_FILE).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].file_index, 0);
        assert_eq!(files[0].path, "Season 1/S01E01.mkv");
        assert_eq!(files[0].name, "S01E01.mkv");
        assert_eq!(files[0].size, 1000);
        assert_eq!(files[1].file_index, 1);
        assert_eq!(files[1].path, "notes.txt");
    }

    #[test]
    fn test_parse_single_file() {
        let files = parse_torrent_listing(SINGLE_FILE).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "Movie.2020.mkv");
        assert_eq!(files[0].size, 2048);
    }

    #[test]
    fn test_parse_invalid_torrent() {
        assert!(matches!(
            parse_torrent_listing(b"not a valid torrent"),
            Err(FileListingError::Parse(_))
        ));
        assert!(parse_torrent_listing(b"").is_err());
    }

    #[tokio::test]
    async fn test_missing_link_is_unavailable() {
        let strategy = DirectDownloadStrategy::new(Duration::from_secs(1));
        let record = fixtures::series_record("Show.S01.1080p");
        let err = strategy.list(&record).await.unwrap_err();
        assert!(matches!(err, FileListingError::Unavailable(_)));
    }
}
