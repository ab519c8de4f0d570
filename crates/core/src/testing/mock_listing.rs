//! Mock listing strategy for testing.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::files::{FileCandidate, FileListingError, ListingStrategy};
use crate::torrent::TorrentRecord;

/// Listing strategy with a fixed answer that counts how often it was asked.
///
/// # Example
///
/// ```rust,ignore
/// use streamdex_core::testing::MockListingStrategy;
///
/// let direct = Arc::new(MockListingStrategy::succeeding("direct", files));
/// let peer = Arc::new(MockListingStrategy::failing("peer", FileListingError::Timeout));
/// // ... run the resolver ...
/// assert_eq!(peer.calls(), 0);
/// ```
#[derive(Debug)]
pub struct MockListingStrategy {
    name: &'static str,
    result: Result<Vec<FileCandidate>, FileListingError>,
    calls: AtomicUsize,
}

impl MockListingStrategy {
    /// Strategy that always returns `files`.
    pub fn succeeding(name: &'static str, files: Vec<FileCandidate>) -> Self {
        Self {
            name,
            result: Ok(files),
            calls: AtomicUsize::new(0),
        }
    }

    /// Strategy that always fails with `error`.
    pub fn failing(name: &'static str, error: FileListingError) -> Self {
        Self {
            name,
            result: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of listings requested so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ListingStrategy for MockListingStrategy {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn list(&self, _record: &TorrentRecord) -> Result<Vec<FileCandidate>, FileListingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}
