//! Torrent providers and the scrape loop.
//!
//! A [`Provider`] discovers candidates from some directory and resolves each
//! into a [`TorrentRecord`]. Site-specific adapters live outside this crate;
//! [`FeedProvider`] consumes what they write.

mod feed;
mod runner;
mod types;

pub use feed::FeedProvider;
pub use runner::ScrapeRunner;
pub use types::*;

use async_trait::async_trait;

use crate::torrent::TorrentRecord;

/// A source of torrent releases.
#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &str;

    /// List the candidates currently published.
    async fn discover(&self) -> Result<Vec<TorrentCandidate>, ProviderError>;

    /// Turn a candidate into a full record.
    async fn resolve(&self, candidate: &TorrentCandidate) -> Result<TorrentRecord, ProviderError>;
}
