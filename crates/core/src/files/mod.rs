//! Torrent file listing.
//!
//! A torrent's file table is obtained through an ordered chain of
//! [`ListingStrategy`] values, first success wins:
//!
//! 1. download the .torrent file published by the provider
//! 2. fetch the info dictionary from peers (magnet / info hash)
//! 3. fall back to a listing cached by an earlier run
//!
//! Successful network listings are written back to the cache keyed by info
//! hash. Consumers usually want [`FileListingResolver::list_videos`], which
//! applies the video extension allow-list.

mod cached;
mod extension;
mod metainfo;
mod peer_wire;
mod resolver;
mod torrent_file;
mod types;

pub use cached::{store_listing, CacheFallbackStrategy, FILES_NAMESPACE, PLACEHOLDER_SIZE};
pub use extension::{extension_of, is_video, is_video_extension, VIDEO_EXTENSIONS};
pub use peer_wire::PeerWireStrategy;
pub use resolver::{select_videos, FileListingResolver, ListingStrategy};
pub use torrent_file::{parse_torrent_listing, DirectDownloadStrategy};
pub use types::*;
