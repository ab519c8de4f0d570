//! Canonical catalog - the persisted output of ingestion.
//!
//! Holds ingested torrents, their canonical files, and the two terminal
//! markers consulted by the dedup gate: skipped torrents and torrents whose
//! identity could not be resolved.

mod sqlite;
mod types;

pub use sqlite::SqliteCatalog;
pub use types::*;

use crate::torrent::TorrentRecord;

/// Trait for catalog storage.
///
/// Writes are upserts. Files can only be created once their torrent is
/// stored, and deleting a torrent deletes its files.
pub trait CatalogStore: Send + Sync {
    /// Get a stored torrent by info hash.
    fn get_torrent(&self, info_hash: &str) -> Result<Option<TorrentRecord>, CatalogError>;

    /// Insert or update a torrent.
    fn create_torrent(&self, torrent: &TorrentRecord) -> Result<(), CatalogError>;

    /// Insert or update a file, keyed by (info_hash, file_index, episode).
    fn create_file(&self, file: &CanonicalFile) -> Result<(), CatalogError>;

    /// All files of a torrent.
    fn get_files(&self, info_hash: &str) -> Result<Vec<CanonicalFile>, CatalogError>;

    /// Delete a torrent and its files. Returns whether it existed.
    fn delete_torrent(&self, info_hash: &str) -> Result<bool, CatalogError>;

    fn get_skip_torrent(&self, info_hash: &str) -> Result<Option<SkipRecord>, CatalogError>;

    fn create_skip_torrent(&self, info_hash: &str) -> Result<(), CatalogError>;

    fn get_failed_identity(
        &self,
        info_hash: &str,
    ) -> Result<Option<FailedIdentityRecord>, CatalogError>;

    fn create_failed_identity(&self, info_hash: &str, title: &str) -> Result<(), CatalogError>;
}
