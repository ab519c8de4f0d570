//! Testing utilities and mock implementations.
//!
//! Mocks for every network-facing seam of the pipeline, so that the whole
//! ingestion path can be exercised without peers, HTTP services or feeds.
//!
//! # Example
//!
//! ```rust,ignore
//! use streamdex_core::testing::{fixtures, MockIdentitySource, MockListingStrategy};
//!
//! let listing = Arc::new(MockListingStrategy::succeeding("direct", files));
//! let imdb = Arc::new(MockIdentitySource::returning("imdb", Some("tt0903747")));
//! let record = fixtures::series_record("Show.S01.1080p");
//! ```

mod mock_identity;
mod mock_listing;
mod mock_metadata;
mod mock_provider;

pub use mock_identity::MockIdentitySource;
pub use mock_listing::MockListingStrategy;
pub use mock_metadata::MockMetadataSource;
pub use mock_provider::MockProvider;

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    use chrono::Utc;

    use crate::files::FileCandidate;
    use crate::metadata::SeriesMetadata;
    use crate::torrent::{TorrentRecord, TorrentType};

    const MB: u64 = 1024 * 1024;

    /// Deterministic info hash derived from a title.
    pub fn info_hash(title: &str) -> String {
        let mut hasher = DefaultHasher::new();
        title.hash(&mut hasher);
        let h = hasher.finish();
        format!("{:016x}{:016x}{:08x}", h, h.rotate_left(17), (h >> 32) as u32)
    }

    /// Create a test record with reasonable defaults (1 GB, no links).
    pub fn record(title: &str, torrent_type: TorrentType) -> TorrentRecord {
        TorrentRecord {
            info_hash: info_hash(title),
            provider: "test".to_string(),
            title: title.to_string(),
            torrent_type,
            size: 1024 * MB,
            upload_date: Utc::now(),
            seeders: 10,
            torrent_link: None,
            magnet_link: None,
            imdb_id: None,
            kitsu_id: None,
            pack: false,
        }
    }

    pub fn series_record(title: &str) -> TorrentRecord {
        record(title, TorrentType::Series)
    }

    pub fn movie_record(title: &str) -> TorrentRecord {
        record(title, TorrentType::Movie)
    }

    pub fn anime_record(title: &str) -> TorrentRecord {
        record(title, TorrentType::Anime)
    }

    /// A video of `size_mb` megabytes at `path`.
    pub fn video(file_index: u32, path: &str, size_mb: u64) -> FileCandidate {
        FileCandidate::from_path(file_index, path, size_mb * MB)
    }

    /// Series metadata with the given per-season episode counts.
    pub fn series_metadata(imdb_id: &str, counts: Vec<u32>) -> SeriesMetadata {
        SeriesMetadata {
            imdb_id: Some(imdb_id.to_string()),
            total_episode_count: counts.iter().sum(),
            episode_count_per_season: counts,
            ..Default::default()
        }
    }
}
