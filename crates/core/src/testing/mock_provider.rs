//! Mock provider for testing.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::provider::{Provider, ProviderError, TorrentCandidate};
use crate::torrent::TorrentRecord;

/// Provider publishing a fixed set of records.
#[derive(Debug)]
pub struct MockProvider {
    name: String,
    records: Vec<TorrentRecord>,
    discover_calls: AtomicUsize,
}

impl MockProvider {
    pub fn new(name: &str, records: Vec<TorrentRecord>) -> Self {
        Self {
            name: name.to_string(),
            records,
            discover_calls: AtomicUsize::new(0),
        }
    }

    /// Number of discovery passes so far.
    pub fn discover_calls(&self) -> usize {
        self.discover_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn discover(&self) -> Result<Vec<TorrentCandidate>, ProviderError> {
        self.discover_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .records
            .iter()
            .map(|r| TorrentCandidate {
                title: r.title.clone(),
                torrent_type: r.torrent_type,
                size: r.size,
                upload_date: r.upload_date,
                seeders: r.seeders,
                info_hash: Some(r.info_hash.clone()),
                magnet_link: r.magnet_link.clone(),
                torrent_link: r.torrent_link.clone(),
                imdb_id: r.imdb_id.clone(),
                kitsu_id: r.kitsu_id.clone(),
                pack: r.pack,
            })
            .collect())
    }

    async fn resolve(&self, candidate: &TorrentCandidate) -> Result<TorrentRecord, ProviderError> {
        self.records
            .iter()
            .find(|r| Some(&r.info_hash) == candidate.info_hash.as_ref())
            .cloned()
            .ok_or_else(|| ProviderError::InvalidCandidate(candidate.title.clone()))
    }
}
