//! Canonical identity resolution.
//!
//! Maps a parsed release title to an IMDb id (movies and series) or a Kitsu
//! id (anime). Each catalog has an ordered chain of [`IdentitySource`]s:
//! the IMDb chain tries the structured suggestion API first and falls back
//! to a web search restricted to IMDb title pages. Results are cached per
//! normalized `(title, year, type)`.

mod normalize;
mod resolver;
mod rotation;
mod sources;
mod types;

pub use normalize::{escape_title, normalize_imdb_id};
pub use resolver::IdentityResolver;
pub use rotation::HostRotation;
pub use sources::{IdentitySource, ImdbSuggestSource, KitsuSearchSource, WebSearchSource};
pub use types::*;
