//! Concatenated season/episode numbers.
//!
//! Some releases number episodes as `season * 100 + episode` ("101" for
//! S01E01). When the season is known and is short enough that its episode
//! numbers cannot reach 100, such numbers are split back.

use super::ParsedFile;
use crate::metadata::SeriesMetadata;

/// Renumber specials named with a zero episode: `S02E00` is the second
/// special, season 0 episode 2. Returns how many files were changed.
pub fn reverse_special_episodes(files: &mut [ParsedFile]) -> usize {
    let mut changed = 0;
    for file in files.iter_mut() {
        if let (Some(season), Some(0)) = (file.info.season, file.info.episode) {
            file.info.season = Some(0);
            file.info.seasons = vec![0];
            file.info.set_episodes(vec![season]);
            changed += 1;
        }
    }
    changed
}

/// Whether any file carries an episode number of 100 or more.
pub fn has_large_episodes(files: &[ParsedFile]) -> bool {
    files
        .iter()
        .any(|f| f.info.episodes.iter().any(|ep| *ep >= 100))
}

/// Rewrite concatenated episode numbers in place. Returns how many files
/// were changed.
///
/// A file is rewritten only when its season is known, the season has fewer
/// than 100 episodes according to `metadata` and every one of its episode
/// numbers starts with that season.
pub fn decompose_concatenated_episodes(files: &mut [ParsedFile], metadata: &SeriesMetadata) -> usize {
    let mut changed = 0;
    for file in files.iter_mut() {
        let Some(season) = file.info.season else {
            continue;
        };
        let short_season = metadata
            .episode_count(season)
            .map(|count| count < 100)
            .unwrap_or(false);
        if !short_season || !file.info.has_episodes() {
            continue;
        }
        if !file.info.episodes.iter().all(|ep| ep / 100 == season) {
            continue;
        }

        let episodes = file.info.episodes.iter().map(|ep| ep % 100).collect();
        file.info.set_episodes(episodes);
        changed += 1;
    }
    changed
}
