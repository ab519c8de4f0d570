use serde::{Deserialize, Serialize};

/// Structured attributes extracted from a release or file name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTitleInfo {
    /// Cleaned title (everything before the first release token).
    pub title: String,
    /// Season, when exactly one was detected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    /// All detected seasons (ranges are expanded).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub seasons: Vec<u32>,
    /// First detected episode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
    /// All detected episodes (ranges are expanded).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub episodes: Vec<u32>,
    /// Release year, the first one for a span of years.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    /// Name carries a span of years (`1962-2002`).
    #[serde(default)]
    pub year_range: bool,
    /// Air date as `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Release advertises itself as a complete collection.
    #[serde(default)]
    pub complete: bool,
}

impl ParsedTitleInfo {
    /// Whether any episode number was detected.
    pub fn has_episodes(&self) -> bool {
        !self.episodes.is_empty()
    }

    /// Replace the episode list, keeping `episode` in sync.
    pub fn set_episodes(&mut self, episodes: Vec<u32>) {
        self.episode = episodes.first().copied();
        self.episodes = episodes;
    }

    /// Year used for identity lookups: the release year, or the year of the
    /// air date.
    pub fn search_year(&self) -> Option<u32> {
        self.year.or_else(|| {
            self.date
                .as_deref()
                .and_then(|d| d.get(..4))
                .and_then(|y| y.parse().ok())
        })
    }
}
