use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix of environment overrides. Nested keys are separated by `__`, so
/// `STREAMDEX_SCRAPER__MAX_CONCURRENT=5` sets `scraper.max_concurrent`.
const ENV_PREFIX: &str = "STREAMDEX_";

/// Load the scraper configuration from a TOML file, then apply environment
/// overrides.
///
/// Every section (`database`, `cache`, `files`, `identity`, `metadata`,
/// `scraper`, `logging`, `metrics`) has defaults, so the file only needs
/// what differs from them.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Parse a TOML document without environment overrides.
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheBackend;
    use figment::Jail;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_files_section_keeps_other_timeouts() {
        let toml = r#"
[files]
peer_timeout_secs = 45
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.files.peer_timeout_secs, 45);
        assert_eq!(config.files.direct_timeout_secs, 10);
        assert_eq!(config.scraper.max_concurrent, 20);
    }

    #[test]
    fn test_non_numeric_concurrency_rejected() {
        let toml = r#"
[scraper]
max_concurrent = "lots"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_missing_config_file() {
        let err = load_config(Path::new("/nonexistent/streamdex.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_catalog_path_and_feeds_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[database]
path = "/data/catalog.db"

[[scraper.feeds]]
name = "eztv"
path = "/feeds/eztv.jsonl"

[logging]
json = true
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.database.path.to_str().unwrap(), "/data/catalog.db");
        assert_eq!(config.scraper.feeds.len(), 1);
        assert_eq!(config.scraper.feeds[0].name, "eztv");
        assert!(config.logging.json);
    }

    #[test]
    fn test_env_overrides_nested_sections() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "streamdex.toml",
                r#"
[scraper]
max_concurrent = 8

[cache]
backend = "sqlite"
"#,
            )?;
            jail.set_env("STREAMDEX_SCRAPER__MAX_CONCURRENT", "3");
            jail.set_env("STREAMDEX_CACHE__BACKEND", "memory");
            jail.set_env("STREAMDEX_SCRAPER__INTERVAL_SECS", "900");

            let config = load_config(Path::new("streamdex.toml")).unwrap();
            assert_eq!(config.scraper.max_concurrent, 3);
            assert_eq!(config.scraper.interval_secs, Some(900));
            assert_eq!(config.cache.backend, CacheBackend::Memory);
            Ok(())
        });
    }
}
