use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::torrent::TorrentType;

/// A torrent as listed by a provider, before its info hash is known for
/// sure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TorrentCandidate {
    pub title: String,
    #[serde(rename = "type")]
    pub torrent_type: TorrentType,
    #[serde(default)]
    pub size: u64,
    #[serde(default = "Utc::now")]
    pub upload_date: DateTime<Utc>,
    #[serde(default)]
    pub seeders: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magnet_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub torrent_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kitsu_id: Option<String>,
    #[serde(default)]
    pub pack: bool,
}

/// Errors raised by providers.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Failed to read feed {path}: {message}")]
    Io { path: String, message: String },

    #[error("Invalid candidate: {0}")]
    InvalidCandidate(String),
}

/// Per-outcome counts of one scrape pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScrapeSummary {
    pub discovered: usize,
    pub stored: usize,
    pub stored_without_files: usize,
    pub skipped: usize,
    pub failed_identity: usize,
    pub deferred: usize,
    /// Candidates that could not be resolved or whose processing failed.
    pub errors: usize,
}

impl ScrapeSummary {
    /// Add the counts of another summary.
    pub fn merge(&mut self, other: &ScrapeSummary) {
        self.discovered += other.discovered;
        self.stored += other.stored;
        self.stored_without_files += other.stored_without_files;
        self.skipped += other.skipped;
        self.failed_identity += other.failed_identity;
        self.deferred += other.deferred;
        self.errors += other.errors;
    }
}
