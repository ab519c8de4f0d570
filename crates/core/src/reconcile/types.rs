use serde::{Deserialize, Serialize};

use crate::files::FileCandidate;
use crate::title::{parse_file_name, ParsedTitleInfo};
use crate::torrent::TorrentRecord;

/// A video of a series torrent together with its parsed attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedFile {
    /// Index in the torrent's file table. `None` for a file synthesized
    /// from the torrent title when no listing was available.
    pub file_index: Option<u32>,
    pub name: String,
    pub path: String,
    pub size: u64,
    pub info: ParsedTitleInfo,
    /// Set by movie classification.
    pub is_movie: bool,
}

impl ParsedFile {
    /// Parse a listed file, inheriting season and date from its folder and
    /// from the torrent title.
    pub fn from_candidate(file: &FileCandidate, torrent: &ParsedTitleInfo) -> Self {
        let info = parse_file_name(&file.name, file.parent_folder(), Some(torrent));
        Self {
            file_index: Some(file.file_index),
            name: file.name.clone(),
            path: file.path.clone(),
            size: file.size,
            info,
            is_movie: false,
        }
    }

    /// Stand-in for the single video of a torrent whose listing is unknown.
    pub fn synthetic(record: &TorrentRecord, torrent: &ParsedTitleInfo) -> Self {
        let info = parse_file_name(&record.title, None, Some(torrent));
        Self {
            file_index: None,
            name: record.title.clone(),
            path: record.title.clone(),
            size: record.size,
            info,
            is_movie: false,
        }
    }
}
