use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A file inside a torrent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCandidate {
    /// Position in the torrent's file table.
    pub file_index: u32,
    /// File name (last path component).
    pub name: String,
    /// Path relative to the torrent root, `/`-separated.
    pub path: String,
    /// Size in bytes.
    pub size: u64,
}

impl FileCandidate {
    /// Build a candidate from a relative path, deriving the name.
    pub fn from_path(file_index: u32, path: impl Into<String>, size: u64) -> Self {
        let path = path.into();
        let name = path.rsplit('/').next().unwrap_or(&path).to_string();
        Self {
            file_index,
            name,
            path,
            size,
        }
    }

    /// Name of the directory directly containing this file, if any.
    pub fn parent_folder(&self) -> Option<&str> {
        let mut parts = self.path.rsplit('/');
        parts.next();
        parts.next().filter(|p| !p.is_empty())
    }
}

/// Errors that can occur while listing a torrent's files.
#[derive(Debug, Clone, Error)]
pub enum FileListingError {
    #[error("No files found")]
    NoFilesFound,

    #[error("Timeout fetching file listing")]
    Timeout,

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Strategy not applicable: {0}")]
    Unavailable(String),

    #[error("Session error: {0}")]
    Session(String),
}

impl FileListingError {
    /// Metrics label for this failure.
    pub fn status(&self) -> &'static str {
        match self {
            FileListingError::Timeout => "timeout",
            FileListingError::Unavailable(_) => "unavailable",
            FileListingError::NoFilesFound => "empty",
            _ => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path_derives_name() {
        let file = FileCandidate::from_path(3, "Season 1/Show.S01E04.mkv", 42);
        assert_eq!(file.name, "Show.S01E04.mkv");
        assert_eq!(file.parent_folder(), Some("Season 1"));
    }

    #[test]
    fn test_parent_folder_of_root_file() {
        let file = FileCandidate::from_path(0, "Movie.2020.mkv", 1);
        assert_eq!(file.name, "Movie.2020.mkv");
        assert_eq!(file.parent_folder(), None);
    }
}
