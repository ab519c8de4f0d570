//! Listing by fetching the info dictionary from the swarm.
//!
//! An embedded librqbit session is started on first use and torrents are
//! added in list-only mode: once the metadata arrives the session hands back
//! the info dictionary without keeping the torrent, so nothing stays
//! allocated after the call returns.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use librqbit::{AddTorrent, AddTorrentOptions, AddTorrentResponse, Session, SessionOptions};
use tokio::sync::{OnceCell, Semaphore};
use tracing::{debug, info, warn};

use super::metainfo::listing_from_info;
use super::{FileCandidate, FileListingError, ListingStrategy};
use crate::config::FilesConfig;
use crate::metrics;
use crate::torrent::TorrentRecord;

/// Resolves file listings over the BitTorrent peer wire protocol.
pub struct PeerWireStrategy {
    session: OnceCell<Arc<Session>>,
    session_path: PathBuf,
    enable_dht: bool,
    permits: Semaphore,
    timeout: Duration,
}

impl PeerWireStrategy {
    pub fn new(config: &FilesConfig) -> Self {
        Self {
            session: OnceCell::new(),
            session_path: config.session_path.clone(),
            enable_dht: config.enable_dht,
            permits: Semaphore::new(config.max_peer_connections),
            timeout: Duration::from_secs(config.peer_timeout_secs),
        }
    }

    async fn session(&self) -> Result<&Arc<Session>, FileListingError> {
        self.session
            .get_or_try_init(|| async {
                std::fs::create_dir_all(&self.session_path).map_err(|e| {
                    FileListingError::Session(format!(
                        "Failed to create session directory: {}",
                        e
                    ))
                })?;

                let mut opts = SessionOptions::default();
                opts.disable_dht = !self.enable_dht;
                opts.persistence = None;

                info!(
                    path = %self.session_path.display(),
                    dht_enabled = self.enable_dht,
                    "Initializing metadata session"
                );

                Session::new_with_opts(self.session_path.clone(), opts)
                    .await
                    .map_err(|e| {
                        FileListingError::Session(format!(
                            "Failed to initialize librqbit session: {}",
                            e
                        ))
                    })
            })
            .await
    }

    async fn fetch(
        &self,
        session: &Arc<Session>,
        magnet: &str,
    ) -> Result<Vec<FileCandidate>, FileListingError> {
        let opts = AddTorrentOptions {
            list_only: true,
            ..Default::default()
        };

        let add_future = session.add_torrent(AddTorrent::from_url(magnet), Some(opts));
        let response = tokio::time::timeout(self.timeout, add_future)
            .await
            .map_err(|_| FileListingError::Timeout)?
            .map_err(|e| FileListingError::Session(format!("Failed to fetch metadata: {}", e)))?;

        match response {
            AddTorrentResponse::ListOnly(list) => listing_from_info(&list.info),
            AddTorrentResponse::Added(id, _) => {
                if let Err(e) = session.delete(id.into(), false).await {
                    warn!(error = %e, "Failed to release torrent added outside list-only mode");
                }
                Err(FileListingError::Session(
                    "torrent was added instead of listed".to_string(),
                ))
            }
            AddTorrentResponse::AlreadyManaged(_, _) => Err(FileListingError::Session(
                "torrent is already managed by the session".to_string(),
            )),
        }
    }
}

#[async_trait]
impl ListingStrategy for PeerWireStrategy {
    fn name(&self) -> &'static str {
        "peer_wire"
    }

    async fn list(&self, record: &TorrentRecord) -> Result<Vec<FileCandidate>, FileListingError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| FileListingError::Session(e.to_string()))?;

        let session = self.session().await?;
        let magnet = record.magnet_uri();

        debug!(info_hash = %record.info_hash, "Fetching metadata from peers");
        let started = Instant::now();
        let result = self.fetch(session, &magnet).await;
        metrics::observe_external_call("peer_wire", "metadata", started, result.is_ok());
        result
    }
}
