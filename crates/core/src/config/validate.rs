use super::{types::Config, ConfigError};

/// Validate configuration
/// Rejects:
/// - zero timeouts and zero TTLs
/// - zero concurrency limits
/// - empty endpoint URLs and an empty search host list
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let non_zero = [
        ("files.direct_timeout_secs", config.files.direct_timeout_secs),
        ("files.peer_timeout_secs", config.files.peer_timeout_secs),
        ("identity.timeout_secs", config.identity.timeout_secs),
        ("metadata.timeout_secs", config.metadata.timeout_secs),
        ("cache.ttl_secs", config.cache.ttl_secs),
        ("cache.files_ttl_secs", config.cache.files_ttl_secs),
        ("files.max_peer_connections", config.files.max_peer_connections as u64),
        ("scraper.max_concurrent", config.scraper.max_concurrent as u64),
    ];
    for (name, value) in non_zero {
        if value == 0 {
            return Err(ConfigError::ValidationError(format!("{} cannot be 0", name)));
        }
    }

    if config.scraper.interval_secs == Some(0) {
        return Err(ConfigError::ValidationError(
            "scraper.interval_secs cannot be 0".to_string(),
        ));
    }

    let endpoints = [
        ("identity.imdb_suggest_url", &config.identity.imdb_suggest_url),
        ("identity.kitsu_url", &config.identity.kitsu_url),
        ("metadata.kitsu_url", &config.metadata.kitsu_url),
        ("metadata.cinemeta_url", &config.metadata.cinemeta_url),
    ];
    for (name, url) in endpoints {
        if url.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!("{} cannot be empty", name)));
        }
    }

    if config.identity.search_hosts.is_empty() {
        return Err(ConfigError::ValidationError(
            "identity.search_hosts cannot be empty".to_string(),
        ));
    }

    for feed in &config.scraper.feeds {
        if feed.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "scraper.feeds[].name cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}
