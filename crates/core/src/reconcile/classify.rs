//! Movie versus episode classification of files inside series torrents.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::ParsedFile;
use crate::files::FileCandidate;
use crate::title::ParsedTitleInfo;
use crate::torrent::{TorrentRecord, TorrentType};

static NUMBERED_MOVIE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:\d+[ .]movie|movie[ .]\d+)\b").unwrap());

static MOVIES_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)movies?(?:\W|$)").unwrap());

static FEATURETTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)featurettes?/|extras-grym").unwrap());

static FIRST_PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:part|disc|cd)[ ._-]?0?1\b|^0?1\.\w{2,4}$").unwrap());

static SECOND_PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:part|disc|cd)[ ._-]?0?2\b|^0?2\.\w{2,4}$").unwrap());

/// Torrents above this size are assumed to hold several episodes.
const MULTIPLE_FILES_SIZE: u64 = 4 * 1024 * 1024 * 1024;

/// Same title and year shared by this many files means the year is part of
/// a series title, not a movie release year.
const SHARED_YEAR_LIMIT: usize = 3;

/// Whether a series torrent may bundle movies alongside episodes.
pub fn is_movie_pack(title: &str, info: &ParsedTitleInfo) -> bool {
    info.complete || MOVIES_WORD.is_match(title)
}

/// Whether a torrent bundles several items rather than a single episode or
/// movie.
pub fn is_pack_torrent(record: &TorrentRecord, info: &ParsedTitleInfo) -> bool {
    if record.pack {
        return true;
    }
    if record.torrent_type == TorrentType::Movie {
        return info.complete
            || info.year_range
            || record.title.to_lowercase().contains("movies");
    }

    let multiple = info.complete
        || record.size > MULTIPLE_FILES_SIZE
        || info.seasons.len() > 1
        || info.episodes.len() > 1
        || (!info.seasons.is_empty() && info.episodes.is_empty());
    let single = info.episode.is_some() || (info.episodes.is_empty() && info.date.is_some());
    multiple && !single
}

/// Whether a video sits in a featurettes folder.
pub fn is_featurette(path: &str) -> bool {
    FEATURETTE.is_match(path)
}

/// Whether the videos are one movie split in two parts (`CD1`/`CD2`,
/// `Part 1`/`Part 2`, `01.avi`/`02.avi`).
pub fn is_multi_part_movie(videos: &[FileCandidate]) -> bool {
    videos.len() == 2
        && videos.iter().any(|v| FIRST_PART.is_match(&v.path))
        && videos.iter().any(|v| SECOND_PART.is_match(&v.path))
}

/// Set `is_movie` on every file. First matching rule wins:
///
/// 1. a detected season means an episode
/// 2. an explicit numbered movie token (`Movie 2`, `2 Movie`) means a movie
/// 3. outside movie packs and anime, everything is an episode
/// 4. no episode number means a movie
/// 5. a year means a movie unless several files share that title and year
pub fn classify_movies(files: &mut [ParsedFile], torrent_type: TorrentType, has_movies: bool) {
    let mut shared: HashMap<(String, Option<u32>), usize> = HashMap::new();
    for file in files.iter() {
        *shared
            .entry((file.info.title.clone(), file.info.year))
            .or_insert(0) += 1;
    }

    for file in files.iter_mut() {
        let same_title_year = shared
            .get(&(file.info.title.clone(), file.info.year))
            .copied()
            .unwrap_or(0);
        file.is_movie = is_movie_file(file, torrent_type, has_movies, same_title_year);
    }
}

fn is_movie_file(
    file: &ParsedFile,
    torrent_type: TorrentType,
    has_movies: bool,
    same_title_year: usize,
) -> bool {
    if file.info.season.is_some() {
        return false;
    }
    if NUMBERED_MOVIE.is_match(&file.name) {
        return true;
    }
    if !has_movies && torrent_type != TorrentType::Anime {
        return false;
    }
    if !file.info.has_episodes() {
        return true;
    }
    file.info.year.is_some() && same_title_year < SHARED_YEAR_LIMIT
}
