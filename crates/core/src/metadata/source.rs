use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use super::types::MetaResponse;
use super::{MetadataError, SeriesMetadata};
use crate::metrics;

/// A metadata addon.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Name used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Fetch `meta_type` ("movie" or "series") metadata for `key` (an IMDb
    /// id or `kitsu:{id}`). `Ok(None)` when the addon has no usable entry.
    async fn fetch(
        &self,
        meta_type: &str,
        key: &str,
    ) -> Result<Option<SeriesMetadata>, MetadataError>;
}

/// Client for a Stremio-style addon serving `/meta/{type}/{id}.json`.
pub struct StremioMetaClient {
    name: &'static str,
    client: Client,
    base_url: String,
}

impl StremioMetaClient {
    pub fn new(
        name: &'static str,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, MetadataError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            name,
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn request(&self, url: &str) -> Result<Option<SeriesMetadata>, MetadataError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(MetadataError::Api {
                status: status.as_u16(),
            });
        }

        let body: MetaResponse = response
            .json()
            .await
            .map_err(|e| MetadataError::Parse(e.to_string()))?;
        Ok(body.meta.and_then(SeriesMetadata::from_meta))
    }
}

#[async_trait]
impl MetadataSource for StremioMetaClient {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch(
        &self,
        meta_type: &str,
        key: &str,
    ) -> Result<Option<SeriesMetadata>, MetadataError> {
        let url = format!("{}/meta/{}/{}.json", self.base_url, meta_type, key);
        debug!(source = self.name, url = %url, "Fetching metadata");

        let started = Instant::now();
        let result = self.request(&url).await;
        metrics::observe_external_call(self.name, "meta", started, result.is_ok());
        result
    }
}
