//! JSON-lines feed provider.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{Provider, ProviderError, TorrentCandidate};
use crate::torrent::{info_hash_from_magnet, is_valid_info_hash, TorrentRecord};

/// Reads candidates from a file holding one JSON object per line, as
/// written by an external scraping adapter.
pub struct FeedProvider {
    name: String,
    path: PathBuf,
}

impl FeedProvider {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

#[async_trait]
impl Provider for FeedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn discover(&self) -> Result<Vec<TorrentCandidate>, ProviderError> {
        let content =
            tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|e| ProviderError::Io {
                    path: self.path.display().to_string(),
                    message: e.to_string(),
                })?;

        let mut candidates = Vec::new();
        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<TorrentCandidate>(line) {
                Ok(candidate) => candidates.push(candidate),
                Err(e) => {
                    warn!(
                        provider = %self.name,
                        line = line_no + 1,
                        error = %e,
                        "Skipping malformed feed line"
                    );
                }
            }
        }

        debug!(provider = %self.name, count = candidates.len(), "Feed read");
        Ok(candidates)
    }

    async fn resolve(&self, candidate: &TorrentCandidate) -> Result<TorrentRecord, ProviderError> {
        let info_hash = candidate
            .info_hash
            .as_deref()
            .map(str::to_lowercase)
            .filter(|hash| is_valid_info_hash(hash))
            .or_else(|| candidate.magnet_link.as_deref().and_then(info_hash_from_magnet))
            .ok_or_else(|| {
                ProviderError::InvalidCandidate(format!("no info hash for '{}'", candidate.title))
            })?;

        Ok(TorrentRecord {
            info_hash,
            provider: self.name.clone(),
            title: candidate.title.clone(),
            torrent_type: candidate.torrent_type,
            size: candidate.size,
            upload_date: candidate.upload_date,
            seeders: candidate.seeders,
            torrent_link: candidate.torrent_link.clone(),
            magnet_link: candidate.magnet_link.clone(),
            imdb_id: candidate.imdb_id.clone(),
            kitsu_id: candidate.kitsu_id.clone(),
            pack: candidate.pack,
        })
    }
}
