//! Per-torrent ingestion.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::{EntryError, IngestOutcome, SkipReason};
use crate::catalog::{CanonicalFile, CatalogStore};
use crate::files::{FileCandidate, FileListingResolver};
use crate::identity::{CanonicalId, IdentityError, IdentityQuery, IdentityResolver};
use crate::metadata::MetadataFetcher;
use crate::metrics;
use crate::reconcile::{
    is_featurette, is_multi_part_movie, is_pack_torrent, EpisodeReconciler, ParsedFile,
};
use crate::title::{parse_file_name, parse_title, ParsedTitleInfo};
use crate::torrent::{TorrentRecord, TorrentType};

/// Sequences the pipeline for one torrent and is the only component that
/// writes to the catalog.
///
/// Before any work the dedup gate checks, in order, the skip list, the
/// catalog itself and the failed identity markers. A hit returns
/// [`IngestOutcome::Skipped`] without touching the network.
pub struct EntryBuilder {
    catalog: Arc<dyn CatalogStore>,
    files: Arc<FileListingResolver>,
    identity: Arc<IdentityResolver>,
    reconciler: EpisodeReconciler,
}

impl EntryBuilder {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        files: Arc<FileListingResolver>,
        identity: Arc<IdentityResolver>,
        metadata: Arc<MetadataFetcher>,
    ) -> Self {
        Self {
            catalog,
            files,
            identity,
            reconciler: EpisodeReconciler::new(metadata),
        }
    }

    /// Put a torrent on the skip list.
    pub fn skip(&self, info_hash: &str) -> Result<(), EntryError> {
        self.catalog.create_skip_torrent(info_hash)?;
        debug!(info_hash = %info_hash, "Torrent added to skip list");
        Ok(())
    }

    /// Process one torrent to exactly one outcome.
    pub async fn process(&self, record: &TorrentRecord) -> Result<IngestOutcome, EntryError> {
        let started = Instant::now();
        let result = self.process_inner(record).await;

        let label = match &result {
            Ok(outcome) => outcome.label(),
            Err(_) => "error",
        };
        metrics::INGEST_OUTCOMES.with_label_values(&[label]).inc();
        metrics::INGEST_DURATION
            .with_label_values(&[label])
            .observe(started.elapsed().as_secs_f64());

        match &result {
            Ok(IngestOutcome::Stored { files }) => {
                metrics::FILES_STORED.inc_by(*files as u64);
                info!(
                    info_hash = %record.info_hash,
                    title = %record.title,
                    files = files,
                    "Torrent stored"
                );
            }
            Ok(IngestOutcome::Skipped { reason }) => {
                debug!(info_hash = %record.info_hash, reason = %reason, "Torrent skipped");
            }
            Ok(outcome) => {
                info!(
                    info_hash = %record.info_hash,
                    title = %record.title,
                    outcome = outcome.label(),
                    "Torrent processed"
                );
            }
            Err(e) => {
                warn!(info_hash = %record.info_hash, error = %e, "Torrent processing failed");
            }
        }

        result
    }

    async fn process_inner(&self, record: &TorrentRecord) -> Result<IngestOutcome, EntryError> {
        if let Some(reason) = self.gate(&record.info_hash)? {
            return Ok(IngestOutcome::Skipped { reason });
        }

        let info = parse_title(&record.title);
        let mut record = record.clone();
        if record.torrent_type == TorrentType::Movie
            && (info.season.is_some() || !info.seasons.is_empty())
        {
            debug!(
                info_hash = %record.info_hash,
                title = %record.title,
                "Movie torrent carries seasons, processing as series"
            );
            record.torrent_type = TorrentType::Series;
        }

        match record.torrent_type {
            TorrentType::Movie if is_pack_torrent(&record, &info) => {
                self.process_movie_collection(record, &info).await
            }
            TorrentType::Movie => self.process_movie(record, &info).await,
            TorrentType::Series | TorrentType::Anime => self.process_series(record, &info).await,
        }
    }

    fn gate(&self, info_hash: &str) -> Result<Option<SkipReason>, EntryError> {
        if self.catalog.get_skip_torrent(info_hash)?.is_some() {
            return Ok(Some(SkipReason::SkipList));
        }
        if self.catalog.get_torrent(info_hash)?.is_some() {
            return Ok(Some(SkipReason::AlreadyStored));
        }
        if self.catalog.get_failed_identity(info_hash)?.is_some() {
            return Ok(Some(SkipReason::FailedIdentity));
        }
        Ok(None)
    }

    // =========================================================================
    // Movies
    // =========================================================================

    async fn process_movie(
        &self,
        mut record: TorrentRecord,
        info: &ParsedTitleInfo,
    ) -> Result<IngestOutcome, EntryError> {
        let id = match self.torrent_identity(&record, info).await {
            Ok(id) => id,
            Err(e) => return self.identity_failed(&record, info, &e),
        };
        apply_identity(&mut record, &id);

        // The listing only narrows down which file to play; a movie is
        // stored even when it is unknown.
        let videos = match self.files.list_videos(&record).await {
            Ok(videos) => without_featurettes(videos),
            Err(e) => {
                debug!(info_hash = %record.info_hash, reason = %e, "Movie listing unavailable");
                Vec::new()
            }
        };
        if is_multi_part_movie(&videos) {
            let parts: Vec<CanonicalFile> = videos
                .iter()
                .map(|video| movie_entry(&record, video, &id))
                .collect();
            return self.persist(&record, &parts);
        }

        let main = if videos.len() > 1 {
            videos.iter().max_by_key(|f| f.size)
        } else {
            None
        };

        let file = CanonicalFile {
            info_hash: record.info_hash.clone(),
            file_index: main.map(|f| f.file_index),
            title: main.map(|f| f.name.clone()).unwrap_or_else(|| record.title.clone()),
            size: main.map(|f| f.size).unwrap_or(record.size),
            imdb_id: id.imdb_id().map(str::to_string),
            kitsu_id: id.kitsu_id().map(str::to_string),
            season: None,
            episode: None,
        };
        self.persist(&record, &[file])
    }

    /// Each video of a collection is a movie with its own identity.
    async fn process_movie_collection(
        &self,
        record: TorrentRecord,
        info: &ParsedTitleInfo,
    ) -> Result<IngestOutcome, EntryError> {
        let videos = match self.files.list_videos(&record).await {
            Ok(videos) => without_featurettes(videos),
            Err(e) => return self.no_files(&record, info, &e.to_string()),
        };
        if videos.is_empty() {
            return self.no_files(&record, info, "only featurettes listed");
        }

        let mut entries = Vec::new();
        let mut unavailable = None;
        for video in &videos {
            let parsed = parse_file_name(&video.name, video.parent_folder(), None);
            let query = IdentityQuery::from_parsed(&parsed, TorrentType::Movie);
            match self.identity.resolve(&query).await {
                Ok(id) => entries.push(movie_entry(&record, video, &id)),
                Err(e) => {
                    debug!(
                        info_hash = %record.info_hash,
                        file = %video.name,
                        reason = %e,
                        "Collection movie not identified"
                    );
                    if !e.is_not_found() {
                        unavailable = Some(e);
                    }
                }
            }
        }

        if entries.is_empty() {
            let error = unavailable
                .unwrap_or_else(|| IdentityError::NotFound(record.title.clone()));
            return self.identity_failed(&record, info, &error);
        }
        self.persist(&record, &entries)
    }

    // =========================================================================
    // Series
    // =========================================================================

    async fn process_series(
        &self,
        mut record: TorrentRecord,
        info: &ParsedTitleInfo,
    ) -> Result<IngestOutcome, EntryError> {
        let id = match self.torrent_identity(&record, info).await {
            Ok(id) => id,
            Err(e) => return self.identity_failed(&record, info, &e),
        };
        apply_identity(&mut record, &id);

        let parsed = match self.files.list_videos(&record).await {
            Ok(videos) => videos
                .iter()
                .map(|video| ParsedFile::from_candidate(video, info))
                .collect(),
            Err(e) if !is_pack_torrent(&record, info) => {
                debug!(
                    info_hash = %record.info_hash,
                    reason = %e,
                    "Listing unavailable, using the torrent title as its only file"
                );
                vec![ParsedFile::synthetic(&record, info)]
            }
            Err(e) => return self.no_files(&record, info, &e.to_string()),
        };

        let reconciled = self
            .reconciler
            .reconcile(&record, info, id.as_str(), parsed)
            .await;

        let mut entries = Vec::new();
        let mut extras = Vec::new();
        for file in &reconciled {
            if is_featurette(&file.path) {
                extras.push(featurette_entry(&record, file));
                continue;
            }
            if file.is_movie {
                if let Some(entry) = self.bundled_movie_entry(&record, file).await {
                    entries.push(entry);
                }
                continue;
            }
            entries.extend(episode_entries(&record, file, &id));
        }

        if entries.is_empty() {
            return self.no_files(&record, info, "no file maps to an episode");
        }
        entries.extend(extras);
        self.persist(&record, &entries)
    }

    /// A movie found inside a series torrent, under its own identity.
    async fn bundled_movie_entry(
        &self,
        record: &TorrentRecord,
        file: &ParsedFile,
    ) -> Option<CanonicalFile> {
        let media_type = match record.torrent_type {
            TorrentType::Anime => TorrentType::Anime,
            _ => TorrentType::Movie,
        };
        let query = IdentityQuery::from_parsed(&file.info, media_type);
        match self.identity.resolve(&query).await {
            Ok(id) => Some(CanonicalFile {
                info_hash: record.info_hash.clone(),
                file_index: file.file_index,
                title: file.name.clone(),
                size: file.size,
                imdb_id: id.imdb_id().map(str::to_string),
                kitsu_id: id.kitsu_id().map(str::to_string),
                season: None,
                episode: None,
            }),
            Err(e) => {
                debug!(
                    info_hash = %record.info_hash,
                    file = %file.name,
                    reason = %e,
                    "Bundled movie not identified, dropping"
                );
                None
            }
        }
    }

    // =========================================================================
    // Shared steps
    // =========================================================================

    /// Identity published by the provider, or resolved from the title.
    async fn torrent_identity(
        &self,
        record: &TorrentRecord,
        info: &ParsedTitleInfo,
    ) -> Result<CanonicalId, IdentityError> {
        if let Some(id) = preset_identity(record) {
            return Ok(id);
        }

        let query = IdentityQuery::from_parsed(info, record.torrent_type);
        self.identity.resolve(&query).await.map_err(|e| {
            debug!(
                info_hash = %record.info_hash,
                title = %query.title,
                reason = %e,
                "Identity not resolved"
            );
            e
        })
    }

    /// Only a lookup every source answered is final. When some source could
    /// not be reached the torrent is deferred and nothing is recorded.
    fn identity_failed(
        &self,
        record: &TorrentRecord,
        info: &ParsedTitleInfo,
        error: &IdentityError,
    ) -> Result<IngestOutcome, EntryError> {
        if !error.is_not_found() {
            return Ok(IngestOutcome::Deferred {
                reason: format!("identity lookup unavailable: {}", error),
            });
        }
        if info.complete {
            self.catalog.create_torrent(record)?;
            return Ok(IngestOutcome::StoredWithoutFiles);
        }
        self.catalog
            .create_failed_identity(&record.info_hash, &record.title)?;
        Ok(IngestOutcome::FailedIdentity)
    }

    fn no_files(
        &self,
        record: &TorrentRecord,
        info: &ParsedTitleInfo,
        reason: &str,
    ) -> Result<IngestOutcome, EntryError> {
        if info.complete {
            self.catalog.create_torrent(record)?;
            return Ok(IngestOutcome::StoredWithoutFiles);
        }
        Ok(IngestOutcome::Deferred {
            reason: reason.to_string(),
        })
    }

    /// Torrent first, then its files.
    fn persist(
        &self,
        record: &TorrentRecord,
        files: &[CanonicalFile],
    ) -> Result<IngestOutcome, EntryError> {
        self.catalog.create_torrent(record)?;
        for file in files {
            self.catalog.create_file(file)?;
        }
        Ok(IngestOutcome::Stored { files: files.len() })
    }
}

fn preset_identity(record: &TorrentRecord) -> Option<CanonicalId> {
    let imdb = record.imdb_id.clone().map(CanonicalId::Imdb);
    let kitsu = record.kitsu_id.clone().map(CanonicalId::Kitsu);
    match record.torrent_type {
        TorrentType::Anime => kitsu.or(imdb),
        TorrentType::Movie | TorrentType::Series => imdb.or(kitsu),
    }
}

fn apply_identity(record: &mut TorrentRecord, id: &CanonicalId) {
    match id {
        CanonicalId::Imdb(imdb_id) => record.imdb_id = Some(imdb_id.clone()),
        CanonicalId::Kitsu(kitsu_id) => record.kitsu_id = Some(kitsu_id.clone()),
    }
}

fn without_featurettes(videos: Vec<FileCandidate>) -> Vec<FileCandidate> {
    videos.into_iter().filter(|v| !is_featurette(&v.path)).collect()
}

/// Featurettes of a series are kept, but tied to no title.
fn featurette_entry(record: &TorrentRecord, file: &ParsedFile) -> CanonicalFile {
    CanonicalFile {
        info_hash: record.info_hash.clone(),
        file_index: file.file_index,
        title: file.name.clone(),
        size: file.size,
        imdb_id: None,
        kitsu_id: None,
        season: None,
        episode: None,
    }
}

fn movie_entry(record: &TorrentRecord, video: &FileCandidate, id: &CanonicalId) -> CanonicalFile {
    CanonicalFile {
        info_hash: record.info_hash.clone(),
        file_index: Some(video.file_index),
        title: video.name.clone(),
        size: video.size,
        imdb_id: id.imdb_id().map(str::to_string),
        kitsu_id: id.kitsu_id().map(str::to_string),
        season: None,
        episode: None,
    }
}

/// One entry per episode of the file. Files lacking a season or an episode
/// produce nothing.
fn episode_entries(record: &TorrentRecord, file: &ParsedFile, id: &CanonicalId) -> Vec<CanonicalFile> {
    let Some(season) = file.info.season else {
        return Vec::new();
    };
    file.info
        .episodes
        .iter()
        .map(|episode| CanonicalFile {
            info_hash: record.info_hash.clone(),
            file_index: file.file_index,
            title: file.name.clone(),
            size: file.size,
            imdb_id: id.imdb_id().map(str::to_string),
            kitsu_id: id.kitsu_id().map(str::to_string),
            season: Some(season),
            episode: Some(*episode),
        })
        .collect()
}
