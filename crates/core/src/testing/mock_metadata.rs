//! Mock metadata source for testing.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::metadata::{MetadataError, MetadataSource, SeriesMetadata};

/// Metadata addon with a fixed answer, recording `(meta_type, key)` of
/// every request.
#[derive(Debug)]
pub struct MockMetadataSource {
    name: &'static str,
    meta: Option<SeriesMetadata>,
    /// When set, `meta` is only returned for this meta type.
    only_type: Option<String>,
    fail: bool,
    requests: Mutex<Vec<(String, String)>>,
}

impl MockMetadataSource {
    /// Source returning `meta` for every request.
    pub fn returning(name: &'static str, meta: Option<SeriesMetadata>) -> Self {
        Self {
            name,
            meta,
            only_type: None,
            fail: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Source returning `meta` only when asked for `meta_type`.
    pub fn for_type(name: &'static str, meta_type: &str, meta: SeriesMetadata) -> Self {
        Self {
            only_type: Some(meta_type.to_string()),
            ..Self::returning(name, Some(meta))
        }
    }

    /// Source whose every request fails.
    pub fn failing(name: &'static str) -> Self {
        Self {
            fail: true,
            ..Self::returning(name, None)
        }
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetadataSource for MockMetadataSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch(
        &self,
        meta_type: &str,
        key: &str,
    ) -> Result<Option<SeriesMetadata>, MetadataError> {
        self.requests
            .lock()
            .unwrap()
            .push((meta_type.to_string(), key.to_string()));

        if self.fail {
            return Err(MetadataError::Api { status: 503 });
        }
        match &self.only_type {
            Some(only) if only != meta_type => Ok(None),
            _ => Ok(self.meta.clone()),
        }
    }
}
