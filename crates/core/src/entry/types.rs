use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::CatalogError;

/// Why a torrent was not processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// On the skip list.
    SkipList,
    /// Already in the catalog.
    AlreadyStored,
    /// Identity resolution failed on an earlier pass.
    FailedIdentity,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SkipReason::SkipList => "skip_list",
            SkipReason::AlreadyStored => "already_stored",
            SkipReason::FailedIdentity => "failed_identity",
        };
        f.write_str(s)
    }
}

/// Result of processing one torrent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum IngestOutcome {
    /// Torrent and `files` canonical files were persisted.
    Stored { files: usize },
    /// Torrent persisted without files (complete releases whose files or
    /// identity could not be determined).
    StoredWithoutFiles,
    /// Short-circuited by the dedup gate. Nothing was written.
    Skipped { reason: SkipReason },
    /// Identity not found by any source. A marker was written so the
    /// torrent is not retried.
    FailedIdentity,
    /// Nothing persisted; the torrent is revisited on the next pass. Covers
    /// missing listings and identity services that could not be reached.
    Deferred { reason: String },
}

impl IngestOutcome {
    /// Metrics label.
    pub fn label(&self) -> &'static str {
        match self {
            IngestOutcome::Stored { .. } => "stored",
            IngestOutcome::StoredWithoutFiles => "stored_without_files",
            IngestOutcome::Skipped { .. } => "skipped",
            IngestOutcome::FailedIdentity => "failed_identity",
            IngestOutcome::Deferred { .. } => "deferred",
        }
    }
}

/// Errors that abort processing of a torrent.
///
/// Stage failures (listing, identity, metadata) are turned into outcomes;
/// only persistence failures surface here.
#[derive(Debug, Error)]
pub enum EntryError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}
