//! Torrent records as handed over by providers.
//!
//! A `TorrentRecord` is the unit of work of the ingestion pipeline: it is
//! identified by its info hash and carries whatever the provider knew about
//! the release (title, size, links).

mod types;

pub use types::*;
