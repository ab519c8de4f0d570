pub mod cache;
pub mod catalog;
pub mod config;
pub mod entry;
pub mod files;
pub mod identity;
pub mod metadata;
pub mod metrics;
pub mod provider;
pub mod reconcile;
pub mod testing;
pub mod title;
pub mod torrent;

pub use cache::{CacheError, CacheStore, MemoryCache, SqliteCache};
pub use catalog::{CanonicalFile, CatalogError, CatalogStore, SqliteCatalog};
pub use config::{
    load_config, load_config_from_str, validate_config, CacheBackend, Config, ConfigError,
};
pub use entry::{EntryBuilder, EntryError, IngestOutcome, SkipReason};
pub use files::{FileCandidate, FileListingError, FileListingResolver, ListingStrategy};
pub use identity::{CanonicalId, IdentityError, IdentityQuery, IdentityResolver, IdentitySource};
pub use metadata::{MetadataError, MetadataFetcher, MetadataSource, SeriesMetadata};
pub use provider::{FeedProvider, Provider, ProviderError, ScrapeRunner, ScrapeSummary};
pub use reconcile::{EpisodeReconciler, ParsedFile};
pub use title::{parse_file_name, parse_title, ParsedTitleInfo};
pub use torrent::{TorrentRecord, TorrentType};
