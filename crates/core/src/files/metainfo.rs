//! Conversion of a BitTorrent info dictionary into file candidates.

use librqbit_core::torrent_metainfo::TorrentMetaV1Info;

use super::{FileCandidate, FileListingError};

/// List the files of an info dictionary.
///
/// Multi-file torrents have their root folder stripped so paths are relative
/// to the torrent root. A single-file torrent yields one entry named after
/// the torrent.
pub(crate) fn listing_from_info<B: AsRef<[u8]>>(
    info: &TorrentMetaV1Info<B>,
) -> Result<Vec<FileCandidate>, FileListingError> {
    let root_name = info.name.as_ref().map(|b| bytes_to_string(b.as_ref()));

    if let Some(ref files) = info.files {
        let listing: Vec<FileCandidate> = files
            .iter()
            .enumerate()
            .map(|(idx, file)| {
                let path = file
                    .path
                    .iter()
                    .map(|part| bytes_to_string(part.as_ref()))
                    .collect::<Vec<_>>()
                    .join("/");
                FileCandidate::from_path(idx as u32, path, file.length)
            })
            .collect();

        if listing.is_empty() {
            return Err(FileListingError::NoFilesFound);
        }
        Ok(listing)
    } else if let Some(length) = info.length {
        let name = root_name.ok_or(FileListingError::NoFilesFound)?;
        Ok(vec![FileCandidate::from_path(0, name, length)])
    } else {
        Err(FileListingError::NoFilesFound)
    }
}

/// Decode a path component, replacing invalid UTF-8.
fn bytes_to_string(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
