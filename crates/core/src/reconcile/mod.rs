//! Episode reconciliation for series torrents.
//!
//! Turns the raw parse of every video into numbering that matches the
//! series. `S02E00` specials are renumbered into season 0. Concatenated
//! `S01E01`-as-`101` numbers are split back using per-season episode
//! counts, and files named by air date are matched against episode air
//! dates. Anime files without a season default to the first one, and stray
//! movies bundled with episodes are flagged.

mod classify;
mod dated;
mod decompose;
mod reconciler;
mod types;

pub use classify::{
    classify_movies, is_featurette, is_movie_pack, is_multi_part_movie, is_pack_torrent,
};
pub use dated::{decompose_date_episodes, has_date_episodes};
pub use decompose::{
    decompose_concatenated_episodes, has_large_episodes, reverse_special_episodes,
};
pub use reconciler::EpisodeReconciler;
pub use types::ParsedFile;
