use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub files: FilesConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub metadata: MetadataConfig,
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Catalog database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("streamdex.db")
}

/// Where cached lookups are kept.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackend {
    /// In-process only, lost on restart.
    Memory,
    /// SQLite file shared across runs.
    Sqlite,
}

/// Lookup cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_backend")]
    pub backend: CacheBackend,
    /// SQLite file used when `backend = "sqlite"`.
    #[serde(default = "default_cache_path")]
    pub path: PathBuf,
    /// TTL for identity and metadata entries (seconds, default 7 days).
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    /// TTL for file listings written back after a successful fetch.
    #[serde(default = "default_ttl_secs")]
    pub files_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: default_cache_backend(),
            path: default_cache_path(),
            ttl_secs: default_ttl_secs(),
            files_ttl_secs: default_ttl_secs(),
        }
    }
}

fn default_cache_backend() -> CacheBackend {
    CacheBackend::Sqlite
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("streamdex-cache.db")
}

fn default_ttl_secs() -> u64 {
    7 * 24 * 60 * 60
}

/// File listing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FilesConfig {
    /// Timeout for downloading a .torrent file (seconds).
    #[serde(default = "default_direct_timeout")]
    pub direct_timeout_secs: u64,
    /// Overall timeout for fetching metadata from peers (seconds).
    #[serde(default = "default_peer_timeout")]
    pub peer_timeout_secs: u64,
    /// Maximum concurrent peer-wire metadata fetches.
    #[serde(default = "default_max_peer_connections")]
    pub max_peer_connections: usize,
    /// Videos smaller than this are ignored when a torrent has several.
    #[serde(default = "default_min_video_size_mb")]
    pub min_video_size_mb: u64,
    /// Whether the peer-wire strategy is enabled.
    #[serde(default = "default_true")]
    pub peer_wire_enabled: bool,
    /// Working directory of the embedded BitTorrent session.
    #[serde(default = "default_session_path")]
    pub session_path: PathBuf,
    /// Enable DHT for magnet resolution.
    #[serde(default = "default_true")]
    pub enable_dht: bool,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            direct_timeout_secs: default_direct_timeout(),
            peer_timeout_secs: default_peer_timeout(),
            max_peer_connections: default_max_peer_connections(),
            min_video_size_mb: default_min_video_size_mb(),
            peer_wire_enabled: default_true(),
            session_path: default_session_path(),
            enable_dht: default_true(),
        }
    }
}

fn default_direct_timeout() -> u64 {
    10
}

fn default_peer_timeout() -> u64 {
    30
}

fn default_max_peer_connections() -> usize {
    20
}

fn default_min_video_size_mb() -> u64 {
    20
}

fn default_session_path() -> PathBuf {
    PathBuf::from("streamdex-peer")
}

fn default_true() -> bool {
    true
}

/// Identity resolution configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IdentityConfig {
    /// Request timeout (seconds).
    #[serde(default = "default_identity_timeout")]
    pub timeout_secs: u64,
    /// IMDb suggestion API base URL.
    #[serde(default = "default_imdb_suggest_url")]
    pub imdb_suggest_url: String,
    /// Kitsu addon base URL used for anime title search.
    #[serde(default = "default_kitsu_url")]
    pub kitsu_url: String,
    /// HTML search endpoints used as a fallback (rotated, evicted on error).
    #[serde(default = "default_search_hosts")]
    pub search_hosts: Vec<String>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_identity_timeout(),
            imdb_suggest_url: default_imdb_suggest_url(),
            kitsu_url: default_kitsu_url(),
            search_hosts: default_search_hosts(),
        }
    }
}

fn default_identity_timeout() -> u64 {
    10
}

fn default_imdb_suggest_url() -> String {
    "https://v3.sg.media-imdb.com/suggestion".to_string()
}

fn default_kitsu_url() -> String {
    "https://anime-kitsu.strem.fun".to_string()
}

fn default_cinemeta_url() -> String {
    "https://v3-cinemeta.strem.io".to_string()
}

fn default_search_hosts() -> Vec<String> {
    vec![
        "https://html.duckduckgo.com/html/".to_string(),
        "https://lite.duckduckgo.com/lite/".to_string(),
    ]
}

/// Metadata fetch configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetadataConfig {
    /// Request timeout (seconds).
    #[serde(default = "default_metadata_timeout")]
    pub timeout_secs: u64,
    /// Anime-oriented metadata addon.
    #[serde(default = "default_kitsu_url")]
    pub kitsu_url: String,
    /// General metadata addon.
    #[serde(default = "default_cinemeta_url")]
    pub cinemeta_url: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_metadata_timeout(),
            kitsu_url: default_kitsu_url(),
            cinemeta_url: default_cinemeta_url(),
        }
    }
}

fn default_metadata_timeout() -> u64 {
    20
}

/// Scrape loop configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScraperConfig {
    /// Global limit on torrents processed at once, across providers.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
    /// Seconds between passes. Unset runs a single pass and exits.
    #[serde(default)]
    pub interval_secs: Option<u64>,
    /// JSON-lines feeds to ingest.
    #[serde(default)]
    pub feeds: Vec<FeedConfig>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
            interval_secs: None,
            feeds: Vec::new(),
        }
    }
}

fn default_max_concurrent() -> usize {
    20
}

/// A provider backed by a JSON-lines feed file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedConfig {
    /// Provider name stored on every record.
    pub name: String,
    /// Path of the feed file.
    pub path: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Metrics export configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MetricsConfig {
    /// Write the text exposition here after each pass.
    #[serde(default)]
    pub textfile_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.database.path.to_str().unwrap(), "streamdex.db");
        assert_eq!(config.cache.backend, CacheBackend::Sqlite);
        assert_eq!(config.cache.ttl_secs, 604_800);
        assert_eq!(config.files.direct_timeout_secs, 10);
        assert_eq!(config.files.peer_timeout_secs, 30);
        assert_eq!(config.files.max_peer_connections, 20);
        assert_eq!(config.files.min_video_size_mb, 20);
        assert_eq!(config.metadata.timeout_secs, 20);
        assert_eq!(config.scraper.max_concurrent, 20);
        assert!(config.scraper.interval_secs.is_none());
        assert!(config.scraper.feeds.is_empty());
        assert_eq!(config.logging.level, "info");
        assert!(config.metrics.textfile_path.is_none());
    }

    #[test]
    fn test_deserialize_feeds() {
        let toml = r#"
[scraper]
max_concurrent = 5
interval_secs = 900

[[scraper.feeds]]
name = "feed-a"
path = "/data/feed-a.jsonl"

[[scraper.feeds]]
name = "feed-b"
path = "/data/feed-b.jsonl"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.scraper.max_concurrent, 5);
        assert_eq!(config.scraper.interval_secs, Some(900));
        assert_eq!(config.scraper.feeds.len(), 2);
        assert_eq!(config.scraper.feeds[1].name, "feed-b");
    }

    #[test]
    fn test_deserialize_memory_cache() {
        let toml = r#"
[cache]
backend = "memory"
ttl_secs = 60
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.cache.backend, CacheBackend::Memory);
        assert_eq!(config.cache.ttl_secs, 60);
        assert_eq!(config.cache.files_ttl_secs, 604_800);
    }

    #[test]
    fn test_deserialize_identity_overrides() {
        let toml = r#"
[identity]
timeout_secs = 5
search_hosts = ["https://search.example/html"]
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.identity.timeout_secs, 5);
        assert_eq!(config.identity.search_hosts, vec!["https://search.example/html"]);
        assert_eq!(config.identity.kitsu_url, "https://anime-kitsu.strem.fun");
    }
}
