use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::{
    normalize_imdb_id, CanonicalId, HostRotation, IdentityError, IdentityQuery, IdentitySource,
    ImdbSuggestSource, KitsuSearchSource, WebSearchSource,
};
use crate::cache::{self, CacheStore};
use crate::config::IdentityConfig;
use crate::torrent::TorrentType;

const IMDB_NAMESPACE: &str = "imdb_id";
const KITSU_NAMESPACE: &str = "kitsu_id";

/// Resolves canonical ids through ordered source chains, with caching.
///
/// Anime is looked up on Kitsu, everything else on IMDb. Only successful
/// lookups are cached, so a title that was not found is retried on the next
/// attempt. [`IdentityError::NotFound`] is returned only when every source
/// answered; if any of them failed, the last failure is returned instead.
pub struct IdentityResolver {
    imdb_sources: Vec<Arc<dyn IdentitySource>>,
    kitsu_sources: Vec<Arc<dyn IdentitySource>>,
    cache: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl IdentityResolver {
    pub fn new(
        imdb_sources: Vec<Arc<dyn IdentitySource>>,
        kitsu_sources: Vec<Arc<dyn IdentitySource>>,
        cache: Arc<dyn CacheStore>,
        ttl: Duration,
    ) -> Self {
        Self {
            imdb_sources,
            kitsu_sources,
            cache,
            ttl,
        }
    }

    /// Standard chains: IMDb suggestions then web search; Kitsu search.
    pub fn from_config(
        config: &IdentityConfig,
        cache: Arc<dyn CacheStore>,
        ttl: Duration,
    ) -> Result<Self, IdentityError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let hosts = Arc::new(HostRotation::new(config.search_hosts.clone()));

        let imdb_sources: Vec<Arc<dyn IdentitySource>> = vec![
            Arc::new(ImdbSuggestSource::new(&config.imdb_suggest_url, timeout)?),
            Arc::new(WebSearchSource::new(hosts, timeout)?),
        ];
        let kitsu_sources: Vec<Arc<dyn IdentitySource>> =
            vec![Arc::new(KitsuSearchSource::new(&config.kitsu_url, timeout)?)];

        Ok(Self::new(imdb_sources, kitsu_sources, cache, ttl))
    }

    /// Resolve the identity appropriate for the query's media type.
    pub async fn resolve(&self, query: &IdentityQuery) -> Result<CanonicalId, IdentityError> {
        match query.media_type {
            TorrentType::Anime => self.resolve_kitsu(query).await.map(CanonicalId::Kitsu),
            TorrentType::Movie | TorrentType::Series => {
                self.resolve_imdb(query).await.map(CanonicalId::Imdb)
            }
        }
    }

    /// Resolve an IMDb id (`tt` + at least 7 digits).
    pub async fn resolve_imdb(&self, query: &IdentityQuery) -> Result<String, IdentityError> {
        let key = imdb_cache_key(query);
        if let Some(id) = cache::get_json::<String>(self.cache.as_ref(), IMDB_NAMESPACE, &key).await
        {
            return Ok(id);
        }

        let found = Self::first_match(&self.imdb_sources, query, normalize_imdb_id)
            .await?
            .ok_or_else(|| IdentityError::NotFound(key.clone()))?;

        cache::set_json(self.cache.as_ref(), IMDB_NAMESPACE, &key, &found, self.ttl).await;
        Ok(found)
    }

    /// Resolve a Kitsu id.
    pub async fn resolve_kitsu(&self, query: &IdentityQuery) -> Result<String, IdentityError> {
        let key = KitsuSearchSource::search_text(query);
        if let Some(id) =
            cache::get_json::<String>(self.cache.as_ref(), KITSU_NAMESPACE, &key).await
        {
            return Ok(id);
        }

        let found = Self::first_match(&self.kitsu_sources, query, |raw| {
            let id = raw.trim();
            (!id.is_empty()).then(|| id.to_string())
        })
        .await?
        .ok_or_else(|| IdentityError::NotFound(key.clone()))?;

        cache::set_json(self.cache.as_ref(), KITSU_NAMESPACE, &key, &found, self.ttl).await;
        Ok(found)
    }

    async fn first_match(
        sources: &[Arc<dyn IdentitySource>],
        query: &IdentityQuery,
        accept: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<String>, IdentityError> {
        let mut last_error = None;
        for source in sources {
            match source.find_id(query).await {
                Ok(Some(raw)) => {
                    if let Some(id) = accept(&raw) {
                        debug!(source = source.name(), title = %query.title, id = %id, "Identity resolved");
                        return Ok(Some(id));
                    }
                    debug!(source = source.name(), raw = %raw, "Discarding malformed id");
                }
                Ok(None) => {
                    debug!(source = source.name(), title = %query.title, "No identity match");
                }
                Err(e) => {
                    warn!(source = source.name(), title = %query.title, error = %e, "Identity lookup failed");
                    last_error = Some(e);
                }
            }
        }
        match last_error {
            Some(e) => Err(e),
            None => Ok(None),
        }
    }
}

/// `{title}_{year}_{type}`, the year left empty when unknown.
fn imdb_cache_key(query: &IdentityQuery) -> String {
    let year = query.year.map(|y| y.to_string()).unwrap_or_default();
    format!("{}_{}_{}", query.title, year, query.imdb_type())
}
