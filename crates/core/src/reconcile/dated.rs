//! Episodes named by air date.
//!
//! Daily shows are released as `Show.2021.03.15` with no episode number.
//! Such files are mapped to the episode whose air date matches.

use super::ParsedFile;
use crate::metadata::SeriesMetadata;

/// Whether every file is named by date and carries no episode number.
pub fn has_date_episodes(files: &[ParsedFile]) -> bool {
    !files.is_empty()
        && files
            .iter()
            .all(|f| f.info.date.is_some() && !f.info.has_episodes())
}

/// Map dated files to the episode that aired that day. Returns how many
/// files were mapped.
///
/// Nothing happens unless every file is dated and none sits in a season
/// whose episodes `metadata` already counts.
pub fn decompose_date_episodes(files: &mut [ParsedFile], metadata: &SeriesMetadata) -> usize {
    let all_dated = files.iter().all(|f| {
        f.info.date.is_some()
            && f
                .info
                .season
                .map(|season| metadata.episode_count(season).is_none())
                .unwrap_or(true)
    });
    if !all_dated {
        return 0;
    }

    let mut changed = 0;
    for file in files.iter_mut() {
        let found = file.info.date.as_deref().and_then(|d| metadata.episode_on(d));
        if let Some((season, episode)) = found {
            file.info.season = Some(season);
            file.info.seasons = vec![season];
            file.info.set_episodes(vec![episode]);
            changed += 1;
        }
    }
    changed
}
