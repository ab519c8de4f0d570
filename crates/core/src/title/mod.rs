//! Release name parsing.
//!
//! Turns scene-style release names ("Show.Name.S01E02.1080p.WEB-DL") and
//! file names into structured attributes: title, seasons, episodes, year,
//! air date and whether the release is a complete collection.
//!
//! Parsing never fails and never performs I/O. Missing signals simply leave
//! the corresponding fields unset.

mod parser;
mod types;

pub use parser::{parse_file_name, parse_title};
pub use types::ParsedTitleInfo;
