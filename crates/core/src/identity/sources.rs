//! Remote identity lookups.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex_lite::Regex;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{HostRotation, IdentityError, IdentityQuery};
use crate::metrics;
use crate::torrent::TorrentType;

/// A service able to map a title to a canonical id.
#[async_trait]
pub trait IdentitySource: Send + Sync {
    /// Name used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Look up an id. `Ok(None)` means the service answered without a match.
    async fn find_id(&self, query: &IdentityQuery) -> Result<Option<String>, IdentityError>;
}

fn http_client(timeout: Duration) -> Result<Client, IdentityError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

// =============================================================================
// IMDb suggestion API
// =============================================================================

#[derive(Debug, Deserialize)]
struct SuggestionResponse {
    #[serde(default)]
    d: Vec<Suggestion>,
}

#[derive(Debug, Deserialize)]
struct Suggestion {
    id: String,
    /// Title type ("movie", "tvSeries", ...).
    #[serde(default)]
    qid: Option<String>,
    /// Release year.
    #[serde(default)]
    y: Option<u32>,
}

/// Structured name-to-id lookup against the IMDb suggestion endpoint.
pub struct ImdbSuggestSource {
    client: Client,
    base_url: String,
}

impl ImdbSuggestSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, IdentityError> {
        Ok(Self {
            client: http_client(timeout)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn matches_type(qid: Option<&str>, query: &IdentityQuery) -> bool {
        match (qid, query.media_type) {
            (None, _) => true,
            (Some(qid), TorrentType::Movie) => matches!(qid, "movie" | "tvMovie" | "video"),
            (Some(qid), _) => matches!(qid, "tvSeries" | "tvMiniSeries"),
        }
    }

    fn matches_year(year: Option<u32>, query: &IdentityQuery) -> bool {
        match (year, query.year) {
            (Some(found), Some(wanted)) => found.abs_diff(wanted) <= 1,
            _ => true,
        }
    }

    /// Pick the first suggestion compatible with the query.
    fn select(suggestions: Vec<Suggestion>, query: &IdentityQuery) -> Option<String> {
        suggestions
            .into_iter()
            .filter(|s| s.id.starts_with("tt"))
            .find(|s| Self::matches_type(s.qid.as_deref(), query) && Self::matches_year(s.y, query))
            .map(|s| s.id)
    }
}

#[async_trait]
impl IdentitySource for ImdbSuggestSource {
    fn name(&self) -> &'static str {
        "imdb_suggest"
    }

    async fn find_id(&self, query: &IdentityQuery) -> Result<Option<String>, IdentityError> {
        let first = match query.title.chars().next() {
            Some(c) if c.is_ascii_alphanumeric() => c,
            _ => 'x',
        };
        let url = format!(
            "{}/{}/{}.json",
            self.base_url,
            first,
            urlencoding::encode(&query.title)
        );

        debug!(title = %query.title, year = ?query.year, "IMDb suggestion lookup");
        let started = Instant::now();
        let response = self.client.get(&url).send().await;
        let response = match response {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                metrics::observe_external_call(self.name(), "search", started, false);
                return Err(IdentityError::Api {
                    status: r.status().as_u16(),
                });
            }
            Err(e) => {
                metrics::observe_external_call(self.name(), "search", started, false);
                return Err(e.into());
            }
        };

        let body: Result<SuggestionResponse, _> = response.json().await;
        metrics::observe_external_call(self.name(), "search", started, body.is_ok());
        let body = body.map_err(|e| IdentityError::Parse(e.to_string()))?;

        Ok(Self::select(body.d, query))
    }
}

// =============================================================================
// Web search fallback
// =============================================================================

static IMDB_TITLE_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"imdb\.com/title/(tt\d+)").unwrap());

/// General web search restricted to IMDb title pages.
///
/// Hosts are HTML search endpoints taking a `q` parameter. A host that
/// errors is evicted from the rotation.
pub struct WebSearchSource {
    client: Client,
    hosts: Arc<HostRotation>,
}

impl WebSearchSource {
    pub fn new(hosts: Arc<HostRotation>, timeout: Duration) -> Result<Self, IdentityError> {
        Ok(Self {
            client: http_client(timeout)?,
            hosts,
        })
    }

    /// Search text, e.g. `the matrix 1999 movie imdb`.
    pub fn search_text(query: &IdentityQuery) -> String {
        match query.year {
            Some(year) => format!("{} {} {} imdb", query.title, year, query.imdb_type()),
            None => format!("{} {} imdb", query.title, query.imdb_type()),
        }
    }

    /// First IMDb title id linked from a result page.
    pub fn first_title_link(html: &str) -> Option<String> {
        IMDB_TITLE_LINK
            .captures(html)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    async fn search(&self, host: &str, text: &str) -> Result<String, IdentityError> {
        let response = self.client.get(host).query(&[("q", text)]).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IdentityError::Api {
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl IdentitySource for WebSearchSource {
    fn name(&self) -> &'static str {
        "web_search"
    }

    async fn find_id(&self, query: &IdentityQuery) -> Result<Option<String>, IdentityError> {
        let host = self.hosts.next().ok_or(IdentityError::NoHostAvailable)?;
        let text = Self::search_text(query);

        debug!(host = %host, query = %text, "Web search lookup");
        let started = Instant::now();
        let result = self.search(&host, &text).await;
        metrics::observe_external_call(self.name(), "search", started, result.is_ok());

        match result {
            Ok(html) => Ok(Self::first_title_link(&html)),
            Err(e) => {
                self.hosts.evict(&host);
                Err(e)
            }
        }
    }
}

// =============================================================================
// Kitsu anime search
// =============================================================================

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    #[serde(default)]
    metas: Vec<CatalogMeta>,
}

#[derive(Debug, Deserialize)]
struct CatalogMeta {
    id: String,
}

/// Anime title search through the Kitsu catalog addon.
pub struct KitsuSearchSource {
    client: Client,
    base_url: String,
}

impl KitsuSearchSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, IdentityError> {
        Ok(Self {
            client: http_client(timeout)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Search text: title, then year and ` S{n}` for later seasons.
    pub fn search_text(query: &IdentityQuery) -> String {
        let mut text = query.title.clone();
        if let Some(year) = query.year {
            text.push_str(&format!(" {}", year));
        }
        if let Some(season) = query.season.filter(|s| *s > 1) {
            text.push_str(&format!(" S{}", season));
        }
        text
    }
}

#[async_trait]
impl IdentitySource for KitsuSearchSource {
    fn name(&self) -> &'static str {
        "kitsu_search"
    }

    async fn find_id(&self, query: &IdentityQuery) -> Result<Option<String>, IdentityError> {
        let text = Self::search_text(query);
        let url = format!(
            "{}/catalog/series/kitsu-anime-list/search={}.json",
            self.base_url,
            urlencoding::encode(&text)
        );

        debug!(query = %text, "Kitsu search lookup");
        let started = Instant::now();
        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                metrics::observe_external_call(self.name(), "search", started, false);
                return Err(e.into());
            }
        };
        if !response.status().is_success() {
            metrics::observe_external_call(self.name(), "search", started, false);
            return Err(IdentityError::Api {
                status: response.status().as_u16(),
            });
        }

        let body: Result<CatalogResponse, _> = response.json().await;
        metrics::observe_external_call(self.name(), "search", started, body.is_ok());
        let body = body.map_err(|e| IdentityError::Parse(e.to_string()))?;

        Ok(body
            .metas
            .into_iter()
            .next()
            .map(|meta| meta.id.trim_start_matches("kitsu:").to_string()))
    }
}
