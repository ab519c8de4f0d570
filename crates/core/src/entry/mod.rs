//! Entry building and the dedup gate.
//!
//! [`EntryBuilder::process`] takes one [`TorrentRecord`](crate::torrent::TorrentRecord)
//! through identity resolution, file listing and episode reconciliation and
//! persists the resulting canonical files. Every record ends in exactly one
//! [`IngestOutcome`].

mod builder;
mod types;

pub use builder::EntryBuilder;
pub use types::{EntryError, IngestOutcome, SkipReason};
