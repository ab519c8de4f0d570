use std::sync::Arc;

use tracing::{debug, warn};

use super::{
    classify_movies, decompose_concatenated_episodes, decompose_date_episodes, has_date_episodes,
    has_large_episodes, is_movie_pack, reverse_special_episodes, ParsedFile,
};
use crate::metadata::MetadataFetcher;
use crate::metrics;
use crate::title::ParsedTitleInfo;
use crate::torrent::{TorrentRecord, TorrentType};

/// Aligns parsed file numbering with the episode structure of the series.
pub struct EpisodeReconciler {
    metadata: Arc<MetadataFetcher>,
}

impl EpisodeReconciler {
    pub fn new(metadata: Arc<MetadataFetcher>) -> Self {
        Self { metadata }
    }

    /// Reconcile the files of a series torrent whose identity is
    /// `canonical_id`.
    ///
    /// Metadata is only fetched when some file has an episode number of 100
    /// or more, or when every file is named by air date. A failed fetch
    /// leaves the numbering untouched.
    pub async fn reconcile(
        &self,
        record: &TorrentRecord,
        torrent_info: &ParsedTitleInfo,
        canonical_id: &str,
        mut files: Vec<ParsedFile>,
    ) -> Vec<ParsedFile> {
        reverse_special_episodes(&mut files);

        let large = has_large_episodes(&files);
        if large || has_date_episodes(&files) {
            match self.metadata.fetch(canonical_id, record.torrent_type).await {
                Ok(meta) => {
                    let (changed, kind) = if large {
                        (decompose_concatenated_episodes(&mut files, &meta), "concatenated")
                    } else {
                        (decompose_date_episodes(&mut files, &meta), "dated")
                    };
                    if changed > 0 {
                        debug!(
                            info_hash = %record.info_hash,
                            files = changed,
                            kind = kind,
                            "Renumbered episodes from metadata"
                        );
                        metrics::EPISODES_DECOMPOSED.inc_by(changed as u64);
                    }
                }
                Err(e) => {
                    warn!(
                        info_hash = %record.info_hash,
                        id = %canonical_id,
                        error = %e,
                        "Metadata unavailable, keeping episode numbers as parsed"
                    );
                }
            }
        }

        if record.torrent_type == TorrentType::Anime {
            for file in files.iter_mut() {
                if file.info.season.is_none() && file.info.has_episodes() {
                    file.info.season = Some(1);
                }
            }
        }

        let has_movies = is_movie_pack(&record.title, torrent_info);
        classify_movies(&mut files, record.torrent_type, has_movies);
        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::cache::MemoryCache;
    use crate::files::FileCandidate;
    use crate::metadata::{EpisodeVideo, SeriesMetadata};
    use crate::testing::{fixtures, MockMetadataSource};
    use crate::title::parse_title;

    const MB: u64 = 1024 * 1024;

    fn reconciler(general: Arc<MockMetadataSource>) -> EpisodeReconciler {
        let fetcher = MetadataFetcher::new(
            Arc::new(MockMetadataSource::returning("kitsu", None)),
            general,
            Arc::new(MemoryCache::new()),
            Duration::from_secs(60),
        );
        EpisodeReconciler::new(Arc::new(fetcher))
    }

    fn series_meta(counts: Vec<u32>) -> SeriesMetadata {
        SeriesMetadata {
            imdb_id: Some("tt0903747".to_string()),
            total_episode_count: counts.iter().sum(),
            episode_count_per_season: counts,
            ..Default::default()
        }
    }

    fn parse_files(names: &[&str], torrent: &ParsedTitleInfo) -> Vec<ParsedFile> {
        names
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                ParsedFile::from_candidate(
                    &FileCandidate::from_path(idx as u32, *name, 500 * MB),
                    torrent,
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn test_small_numbers_skip_metadata() {
        let general = Arc::new(MockMetadataSource::returning(
            "cinemeta",
            Some(series_meta(vec![24])),
        ));
        let reconciler = reconciler(general.clone());
        let record = fixtures::series_record("Show.S01.1080p");
        let torrent = parse_title(&record.title);
        let files = parse_files(&["Show.S01E01.mkv", "Show.S01E02.mkv"], &torrent);

        let files = reconciler.reconcile(&record, &torrent, "tt0903747", files).await;
        assert_eq!(files[1].info.episodes, vec![2]);
        assert!(general.requests().is_empty());
    }

    #[tokio::test]
    async fn test_concatenated_numbers_are_decomposed() {
        let general = Arc::new(MockMetadataSource::returning(
            "cinemeta",
            Some(series_meta(vec![24, 24])),
        ));
        let reconciler = reconciler(general.clone());
        let record = fixtures::series_record("Show.S01.1080p");
        let torrent = parse_title(&record.title);
        let files = parse_files(&["Show.S01E101.mkv", "Show.S01E102.mkv"], &torrent);

        let files = reconciler.reconcile(&record, &torrent, "tt0903747", files).await;
        assert_eq!(files[0].info.season, Some(1));
        assert_eq!(files[0].info.episodes, vec![1]);
        assert_eq!(files[1].info.episodes, vec![2]);
        assert_eq!(general.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_dated_files_map_to_aired_episodes() {
        let mut meta = series_meta(vec![]);
        meta.videos = vec![EpisodeVideo {
            season: 26,
            episode: 80,
            released: "2021-03-15".to_string(),
        }];
        let general = Arc::new(MockMetadataSource::returning("cinemeta", Some(meta)));
        let reconciler = reconciler(general.clone());
        let record = fixtures::series_record("Daily.Show.2021.03.15.720p");
        let torrent = parse_title(&record.title);
        let files = parse_files(&["Daily.Show.2021.03.15.720p.mkv"], &torrent);

        let files = reconciler.reconcile(&record, &torrent, "tt0115147", files).await;
        assert_eq!(files[0].info.season, Some(26));
        assert_eq!(files[0].info.episodes, vec![80]);
        assert!(!files[0].is_movie);
        assert_eq!(general.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_zero_episode_is_special() {
        let general = Arc::new(MockMetadataSource::returning("cinemeta", None));
        let reconciler = reconciler(general.clone());
        let record = fixtures::series_record("Show.S02.1080p");
        let torrent = parse_title(&record.title);
        let files = parse_files(&["Show.S02E00.mkv", "Show.S02E01.mkv"], &torrent);

        let files = reconciler.reconcile(&record, &torrent, "tt0903747", files).await;
        assert_eq!(files[0].info.season, Some(0));
        assert_eq!(files[0].info.episodes, vec![2]);
        assert_eq!(files[1].info.season, Some(2));
        assert!(general.requests().is_empty());
    }

    #[tokio::test]
    async fn test_metadata_failure_keeps_numbers() {
        let reconciler = reconciler(Arc::new(MockMetadataSource::failing("cinemeta")));
        let record = fixtures::series_record("Show.S01.1080p");
        let torrent = parse_title(&record.title);
        let files = parse_files(&["Show.S01E101.mkv"], &torrent);

        let files = reconciler.reconcile(&record, &torrent, "tt0903747", files).await;
        assert_eq!(files[0].info.episodes, vec![101]);
    }

    #[tokio::test]
    async fn test_anime_files_default_to_first_season() {
        let reconciler = reconciler(Arc::new(MockMetadataSource::returning("cinemeta", None)));
        let mut record = fixtures::series_record("[Group] Some Anime Batch");
        record.torrent_type = TorrentType::Anime;
        let torrent = parse_title(&record.title);
        let files = parse_files(&["[Group] Some Anime - 05 (1080p).mkv"], &torrent);

        let files = reconciler.reconcile(&record, &torrent, "7442", files).await;
        assert_eq!(files[0].info.season, Some(1));
        assert_eq!(files[0].info.episodes, vec![5]);
        assert!(!files[0].is_movie);
    }

    #[tokio::test]
    async fn test_movies_flagged_in_movie_pack() {
        let reconciler = reconciler(Arc::new(MockMetadataSource::returning("cinemeta", None)));
        let record = fixtures::series_record("Show Complete Series and Movies");
        let torrent = parse_title(&record.title);
        let files = parse_files(
            &["Season 1/Show.S01E01.mkv", "Extras/Show The Movie.mkv"],
            &torrent,
        );

        let files = reconciler.reconcile(&record, &torrent, "tt0903747", files).await;
        assert!(!files[0].is_movie);
        assert!(files[1].is_movie);
    }
}
