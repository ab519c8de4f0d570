//! Episode structure lookups.
//!
//! Per-season episode counts are needed to decide whether a number such as
//! `101` is an absolute episode or a concatenated `S01E01`. They come from
//! Stremio-style metadata addons, cached per canonical id, together with
//! the air date of every episode for releases named by date.

mod fetcher;
mod source;
mod types;

pub use fetcher::{meta_key, MetadataFetcher};
pub use source::{MetadataSource, StremioMetaClient};
pub use types::{EpisodeVideo, MetadataError, SeriesMetadata};
