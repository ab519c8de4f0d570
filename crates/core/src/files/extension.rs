//! Video container allow-list.

use once_cell::sync::Lazy;
use regex_lite::Regex;

/// Container suffixes treated as playable video.
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "3g2", "3gp", "avi", "flv", "mkv", "mk3d", "mov", "mp2", "mp4", "m4v", "mpe", "mpeg", "mpg",
    "mpv", "webm", "wmv", "ogm",
];

static EXTENSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.(\w{2,4})$").unwrap());

/// The 2-4 character suffix of a file name, as written.
pub fn extension_of(name: &str) -> Option<&str> {
    EXTENSION
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Case-insensitive membership in [`VIDEO_EXTENSIONS`].
pub fn is_video_extension(ext: &str) -> bool {
    VIDEO_EXTENSIONS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(ext))
}

/// Whether a file name or path ends in a video container suffix.
pub fn is_video(name: &str) -> bool {
    extension_of(name).map(is_video_extension).unwrap_or(false)
}
