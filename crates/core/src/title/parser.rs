//! Heuristic release name parser.

use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::ParsedTitleInfo;
use crate::files::extension_of;

/// `S01E02`, `s1e2`, `S01.E02` (trailing episodes handled separately).
static SEASON_EPISODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bs(\d{1,2})[ ._]?e(\d{1,4})").unwrap());

/// `1x02`
static CROSS_EPISODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})x(\d{2,3})\b").unwrap());

/// `S01`, `S01-S03`, `S01-03`
static SHORT_SEASON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bs(\d{1,2})(?:[ ._]?-[ ._]?s?(\d{1,2}))?\b").unwrap());

/// `Season 1`, `Seasons 1-3`, `Season 1 to 3`
static WORD_SEASON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:season|saison|temporada)s?[ ._]?(\d{1,2})(?:[ ._]?(?:-|to|&)[ ._]?(?:season[ ._]?)?(\d{1,2}))?\b",
    )
    .unwrap()
});

/// `Episode 5`, `Ep.5`, `E05`
static WORD_EPISODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:episode|ep)[ ._]?(\d{1,4})\b").unwrap());

static BARE_EPISODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\be(\d{2,4})\b").unwrap());

/// Anime style ` - 05`, ` - 05v2`
static DASH_EPISODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s-\s(\d{1,4})(?:v\d)?(?:\s|$|\[|\()").unwrap());

static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b((?:19|20)\d{2})[.\-_ ](\d{2})[.\-_ ](\d{2})\b").unwrap());

static DMY_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{2})[.\-](\d{2})[.\-]((?:19|20)\d{2})\b").unwrap());

static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:19|20)\d{2}").unwrap());

/// `1962-2002`, `1962 - 2002`
static YEAR_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b((?:19|20)\d{2})[ ._]?-[ ._]?((?:19|20)\d{2})\b").unwrap()
});

/// Release tags that terminate the title part of a name.
static RELEASE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:2160p|1080p|1080i|720p|576p|480p|4k|uhd|hdr|bluray|blu-ray|bdrip|brrip|web-?dl|webrip|hdtv|dvdrip|dvdscr|hdrip|x264|x265|h\.?264|h\.?265|hevc|xvid|remux|proper|repack|multi|dual[ ._-]audio)\b",
    )
    .unwrap()
});

static COMPLETE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:complete|collection|box[ ._-]?set|integral|integrale|anthology|trilogy|duology|quadrilogy|saga)\b",
    )
    .unwrap()
});

static GROUP_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\[[^\]]*\]\s*").unwrap());

/// Extensions stripped from file names before parsing, besides video ones.
const AUXILIARY_EXTENSIONS: &[&str] = &["srt", "ass", "ssa", "sub", "idx", "vtt", "nfo", "txt"];

/// Words that, preceding a number, mean it is not an episode.
const NOT_EPISODE_PREFIXES: &[&str] = &["season", "disk", "movie", "film"];

/// Words that, following a number, mean it is not an episode.
const NOT_EPISODE_SUFFIXES: &[&str] = &["disk", "movie", "film"];

/// Upper bound on expanded season/episode ranges.
const MAX_RANGE_SPAN: u32 = 200;

/// Episode lists longer than this are considered misparsed.
const MAX_FILE_EPISODES: usize = 20;

/// Parse a release name into structured attributes.
pub fn parse_title(name: &str) -> ParsedTitleInfo {
    parse_with_remainder(name).0
}

/// Parse a name, also returning the part that precedes any release tag.
/// That part may still contain numbers the parser left unclaimed.
fn parse_with_remainder(name: &str) -> (ParsedTitleInfo, String) {
    let name = strip_extension(name);
    let stripped = GROUP_PREFIX.replace(name, "");
    let name: &str = &stripped;

    let mut info = ParsedTitleInfo::default();
    // Start offset of the earliest release token; the title is what precedes it.
    let mut cut = name.len();

    if let Some(caps) = SEASON_EPISODE.captures(name) {
        let whole = caps.get(0).map(|m| (m.start(), m.end())).unwrap_or((0, 0));
        let season = caps.get(1).and_then(|m| m.as_str().parse().ok());
        let episode = caps.get(2).and_then(|m| m.as_str().parse().ok());
        if let (Some(season), Some(episode)) = (season, episode) {
            info.season = Some(season);
            info.seasons = vec![season];
            info.set_episodes(extend_episodes(episode, &name[whole.1..]));
            cut = cut.min(whole.0);
        }
    } else if let Some(caps) = CROSS_EPISODE.captures(name) {
        let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
        let season = caps.get(1).and_then(|m| m.as_str().parse().ok());
        let episode = caps.get(2).and_then(|m| m.as_str().parse::<u32>().ok());
        if let (Some(season), Some(episode)) = (season, episode) {
            info.season = Some(season);
            info.seasons = vec![season];
            info.set_episodes(vec![episode]);
            cut = cut.min(start);
        }
    }

    if info.seasons.is_empty() {
        let season_match = WORD_SEASON
            .captures(name)
            .or_else(|| SHORT_SEASON.captures(name));
        if let Some(caps) = season_match {
            let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
            let first = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok());
            let last = caps.get(2).and_then(|m| m.as_str().parse::<u32>().ok());
            if let Some(first) = first {
                info.seasons = expand_range(first, last);
                if info.seasons.len() == 1 {
                    info.season = Some(first);
                }
                cut = cut.min(start);
            }
        }
    }

    if !info.has_episodes() {
        let episode_match = WORD_EPISODE
            .captures(name)
            .or_else(|| BARE_EPISODE.captures(name))
            .or_else(|| DASH_EPISODE.captures(name));
        if let Some(caps) = episode_match {
            let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
            if let Some(episode) = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()) {
                info.set_episodes(vec![episode]);
                cut = cut.min(start);
            }
        }
    }

    let date_span = parse_date(name).map(|(date, start, end)| {
        info.date = Some(date);
        cut = cut.min(start);
        (start, end)
    });

    if let Some((first, start)) = find_year_range(name) {
        info.year = Some(first);
        info.year_range = true;
        cut = cut.min(start);
    } else if let Some((year, start)) = find_year(name, date_span) {
        info.year = Some(year);
        cut = cut.min(start);
    }

    let mut tag_cut = name.len();
    if let Some(m) = RELEASE_TAG.find(name) {
        tag_cut = tag_cut.min(m.start());
    }
    if let Some(m) = COMPLETE.find(name) {
        info.complete = true;
        tag_cut = tag_cut.min(m.start());
    }
    cut = cut.min(tag_cut);

    info.title = clean_title(&name[..cut]);
    (info, name[..tag_cut].to_string())
}

/// Parse a file inside a torrent.
///
/// On top of [`parse_title`] this applies the file-level rules, in order:
/// season from the name itself, then from the parent folder, then the first
/// of several seasons detected in the name, then the season of the torrent
/// title. Files with neither episode nor date inherit the torrent date, and
/// finally fall back to the first free-standing number before any release
/// tag (the absolute episode numbering common in anime releases).
pub fn parse_file_name(
    name: &str,
    parent_folder: Option<&str>,
    torrent: Option<&ParsedTitleInfo>,
) -> ParsedTitleInfo {
    let (mut info, remainder) = parse_with_remainder(name);

    if info.season.is_none() {
        if let Some(folder_season) = parent_folder.and_then(|f| parse_title(f).season) {
            info.season = Some(folder_season);
        }
    }
    if info.season.is_none() && info.seasons.len() > 1 {
        info.season = info.seasons.first().copied();
    }
    if info.season.is_none() {
        info.season = torrent.and_then(|t| t.season);
    }

    if !info.has_episodes() && info.date.is_none() {
        info.date = torrent.and_then(|t| t.date.clone());
    }

    if info.episodes.len() > MAX_FILE_EPISODES {
        let first = info.episodes[0];
        info.set_episodes(vec![first]);
    }

    if !info.has_episodes() && info.date.is_none() {
        if let Some(episode) = absolute_episode(&remainder, info.year) {
            info.set_episodes(vec![episode]);
        }
    }

    info
}

/// Find a free-standing 1-4 digit number, optionally followed by a variant
/// suffix (`12a`, `12v2`), that is neither the release year nor a
/// season/disk/movie/film number.
fn absolute_episode(text: &str, year: Option<u32>) -> Option<u32> {
    let tokens: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect();

    for (idx, token) in tokens.iter().enumerate() {
        let Some(number) = episode_token(token) else {
            continue;
        };
        if token.len() == 4 && year == Some(number) {
            continue;
        }
        let preceded = idx > 0 && NOT_EPISODE_PREFIXES.contains(&tokens[idx - 1].as_str());
        let followed = tokens
            .get(idx + 1)
            .map(|next| NOT_EPISODE_SUFFIXES.iter().any(|s| next.starts_with(s)))
            .unwrap_or(false);
        if !preceded && !followed {
            return Some(number);
        }
    }
    None
}

/// Parse `12`, `12a`, `12v2` into 12.
fn episode_token(token: &str) -> Option<u32> {
    let digits_end = token
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(token.len());
    if digits_end == 0 || digits_end > 4 {
        return None;
    }
    let suffix = &token[digits_end..];
    let valid_suffix = match suffix.len() {
        0 => true,
        1 => matches!(suffix, "a" | "b" | "c"),
        2 => suffix.starts_with('v') && suffix[1..].chars().all(|c| c.is_ascii_digit()),
        _ => false,
    };
    if !valid_suffix {
        return None;
    }
    token[..digits_end].parse().ok()
}

/// Collect trailing episodes after a `SxxEyy` match: `E02E03`, `-E05`, `-05`.
fn extend_episodes(first: u32, rest: &str) -> Vec<u32> {
    let mut episodes = vec![first];
    let mut last = first;
    let bytes = rest.as_bytes();
    let skip_separators = |mut j: usize| {
        while j < bytes.len() && matches!(bytes[j], b' ' | b'.' | b'_') {
            j += 1;
        }
        j
    };

    let mut i = 0;
    loop {
        let mut j = skip_separators(i);
        let dash = j;
        let is_range = j < bytes.len() && bytes[j] == b'-';
        if is_range {
            j = skip_separators(j + 1);
        }
        let spaced_dash = is_range && (dash > i || j > dash + 1);
        let has_marker = j < bytes.len() && matches!(bytes[j], b'e' | b'E');
        if has_marker {
            j += 1;
        }
        if !is_range && !has_marker {
            break;
        }

        let digits_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() && j - digits_start < 4 {
            j += 1;
        }
        if j == digits_start {
            break;
        }
        // `-720p`, `-2019` style tails are not episodes
        if j < bytes.len() && bytes[j].is_ascii_alphanumeric() && !matches!(bytes[j], b'e' | b'E')
        {
            break;
        }
        // `S01E05 - 100 Days` is an episode title, `S01E05 - 06 [1080p]` a range
        if spaced_dash && !has_marker && !closes_episode_run(&rest[j..]) {
            break;
        }
        let Ok(number) = rest[digits_start..j].parse::<u32>() else {
            break;
        };

        if is_range && number > last && number - last <= MAX_RANGE_SPAN {
            episodes.extend(last + 1..=number);
        } else if !is_range && number > last {
            episodes.push(number);
        } else {
            break;
        }
        last = number;
        i = j;
    }

    episodes
}

/// Whether `tail` ends the episode part of a name: nothing, a bracket, a
/// dash or a release tag.
fn closes_episode_run(tail: &str) -> bool {
    let tail = tail.trim_start_matches([' ', '.', '_']);
    tail.is_empty()
        || tail.starts_with(['[', '(', '-'])
        || RELEASE_TAG.find(tail).map(|m| m.start() == 0).unwrap_or(false)
}

fn expand_range(first: u32, last: Option<u32>) -> Vec<u32> {
    match last {
        Some(last) if last > first && last - first <= MAX_RANGE_SPAN => (first..=last).collect(),
        _ => vec![first],
    }
}

/// Returns the normalized date and the byte span it occupies.
fn parse_date(name: &str) -> Option<(String, usize, usize)> {
    if let Some(caps) = ISO_DATE.captures(name) {
        let whole = caps.get(0)?;
        let (y, m, d) = (caps.get(1)?.as_str(), caps.get(2)?.as_str(), caps.get(3)?.as_str());
        if valid_month_day(m, d) {
            return Some((format!("{}-{}-{}", y, m, d), whole.start(), whole.end()));
        }
    }
    if let Some(caps) = DMY_DATE.captures(name) {
        let whole = caps.get(0)?;
        let (d, m, y) = (caps.get(1)?.as_str(), caps.get(2)?.as_str(), caps.get(3)?.as_str());
        if valid_month_day(m, d) {
            return Some((format!("{}-{}-{}", y, m, d), whole.start(), whole.end()));
        }
    }
    None
}

fn valid_month_day(month: &str, day: &str) -> bool {
    let month: u32 = month.parse().unwrap_or(0);
    let day: u32 = day.parse().unwrap_or(0);
    (1..=12).contains(&month) && (1..=31).contains(&day)
}

/// First year and start offset of an ascending `YYYY-YYYY` span.
fn find_year_range(name: &str) -> Option<(u32, usize)> {
    YEAR_RANGE.captures_iter(name).find_map(|caps| {
        let whole = caps.get(0)?;
        let first: u32 = caps.get(1)?.as_str().parse().ok()?;
        let last: u32 = caps.get(2)?.as_str().parse().ok()?;
        (last > first).then_some((first, whole.start()))
    })
}

/// Pick the release year: the last standalone 19xx/20xx number outside the
/// date, ignoring a leading one that is the title itself ("1917.2019").
fn find_year(name: &str, date_span: Option<(usize, usize)>) -> Option<(u32, usize)> {
    let bytes = name.as_bytes();
    let candidates: Vec<(u32, usize)> = YEAR
        .find_iter(name)
        .filter(|m| {
            let before_ok = m.start() == 0 || !bytes[m.start() - 1].is_ascii_alphanumeric();
            let after_ok = m.end() == bytes.len() || !bytes[m.end()].is_ascii_alphanumeric();
            let in_date = date_span
                .map(|(s, e)| m.start() >= s && m.end() <= e)
                .unwrap_or(false);
            before_ok && after_ok && !in_date
        })
        .filter_map(|m| m.as_str().parse().ok().map(|y| (y, m.start())))
        .collect();

    match candidates.as_slice() {
        [] => None,
        [(_, 0)] => None,
        [.., last] => Some(*last),
    }
}

fn strip_extension(name: &str) -> &str {
    match extension_of(name) {
        Some(ext)
            if crate::files::is_video_extension(ext)
                || AUXILIARY_EXTENSIONS.contains(&ext.to_lowercase().as_str()) =>
        {
            &name[..name.len() - ext.len() - 1]
        }
        _ => name,
    }
}

fn clean_title(raw: &str) -> String {
    let replaced: String = raw
        .chars()
        .map(|c| if c == '.' || c == '_' { ' ' } else { c })
        .collect();
    let collapsed = replaced.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_end_matches(|c: char| c == '-' || c == '(' || c == '[' || c.is_whitespace())
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scene_episode() {
        let info = parse_title("Show.Name.S01E02.1080p.WEB-DL.x264-GROUP");
        assert_eq!(info.title, "Show Name");
        assert_eq!(info.season, Some(1));
        assert_eq!(info.episode, Some(2));
        assert_eq!(info.episodes, vec![2]);
        assert!(!info.complete);
    }

    #[test]
    fn test_parse_concatenated_episode_number() {
        let info = parse_title("Show.Name.S01E101.1080p");
        assert_eq!(info.season, Some(1));
        assert_eq!(info.episodes, vec![101]);
    }

    #[test]
    fn test_parse_multi_episode() {
        assert_eq!(parse_title("Show S02E01E02 720p").episodes, vec![1, 2]);
        assert_eq!(parse_title("Show S02E01-E03 720p").episodes, vec![1, 2, 3]);
        assert_eq!(parse_title("Show.S02E05-06.HDTV").episodes, vec![5, 6]);
    }

    #[test]
    fn test_episode_range_ignores_resolution_tail() {
        let info = parse_title("Show.S01E01-720p");
        assert_eq!(info.episodes, vec![1]);
    }

    #[test]
    fn test_spaced_dash_before_episode_title_is_not_range() {
        let info = parse_title("Show.S01E05 - 100 Days.1080p");
        assert_eq!(info.season, Some(1));
        assert_eq!(info.episodes, vec![5]);

        assert_eq!(parse_title("Show S01E05 - 06 [1080p]").episodes, vec![5, 6]);
        assert_eq!(parse_title("Show S01E05 - 07 720p").episodes, vec![5, 6, 7]);
    }

    #[test]
    fn test_parse_cross_format() {
        let info = parse_title("Show Name 3x07 Title");
        assert_eq!(info.title, "Show Name");
        assert_eq!(info.season, Some(3));
        assert_eq!(info.episodes, vec![7]);
    }

    #[test]
    fn test_resolution_is_not_cross_format() {
        let info = parse_title("Movie 1920x1080");
        assert!(info.season.is_none());
        assert!(info.episodes.is_empty());
    }

    #[test]
    fn test_parse_season_range() {
        let info = parse_title("Show Name Seasons 1-3 Complete 1080p");
        assert_eq!(info.title, "Show Name");
        assert_eq!(info.seasons, vec![1, 2, 3]);
        assert_eq!(info.season, None);
        assert!(info.complete);

        let info = parse_title("Show.Name.S01-S04.720p");
        assert_eq!(info.seasons, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_parse_single_season() {
        let info = parse_title("Show Name Season 2 720p");
        assert_eq!(info.season, Some(2));
        assert_eq!(info.seasons, vec![2]);
        assert!(info.episodes.is_empty());

        assert_eq!(parse_title("Show.Name.S03.1080p").season, Some(3));
    }

    #[test]
    fn test_parse_movie_year() {
        let info = parse_title("Movie.Name.2020.1080p");
        assert_eq!(info.title, "Movie Name");
        assert_eq!(info.year, Some(2020));
        assert!(info.season.is_none());
        assert!(info.episodes.is_empty());
    }

    #[test]
    fn test_parse_year_range() {
        let info = parse_title("Bond Films 1962-2002 1080p");
        assert_eq!(info.title, "Bond Films");
        assert_eq!(info.year, Some(1962));
        assert!(info.year_range);

        let info = parse_title("Movie.Name.2020.1080p");
        assert!(!info.year_range);
        let info = parse_title("Daily.Show.2021-03-15.720p");
        assert!(!info.year_range);
    }

    #[test]
    fn test_leading_year_is_title() {
        let info = parse_title("1917.2019.1080p.BluRay");
        assert_eq!(info.title, "1917");
        assert_eq!(info.year, Some(2019));

        let info = parse_title("2012 1080p");
        assert_eq!(info.title, "2012");
        assert_eq!(info.year, None);
    }

    #[test]
    fn test_parse_date() {
        let info = parse_title("Daily.Show.2021.03.15.720p");
        assert_eq!(info.title, "Daily Show");
        assert_eq!(info.date.as_deref(), Some("2021-03-15"));
        assert_eq!(info.year, None);
        assert_eq!(info.search_year(), Some(2021));
    }

    #[test]
    fn test_parse_anime_dash_episode() {
        let info = parse_title("[SubsPlease] Jujutsu Kaisen - 24 (1080p) [A1B2C3D4].mkv");
        assert_eq!(info.title, "Jujutsu Kaisen");
        assert_eq!(info.episodes, vec![24]);
        assert!(info.season.is_none());
    }

    #[test]
    fn test_parse_complete_collection() {
        let info = parse_title("Harry Potter Complete Collection 1080p");
        assert_eq!(info.title, "Harry Potter");
        assert!(info.complete);
    }

    #[test]
    fn test_parse_strips_video_extension() {
        let info = parse_title("Some.Show.S01E03.mkv");
        assert_eq!(info.title, "Some Show");
        assert_eq!(info.episodes, vec![3]);
    }

    #[test]
    fn test_file_season_from_parent_folder() {
        let info = parse_file_name("05 - The Episode.mkv", Some("Season 3"), None);
        assert_eq!(info.season, Some(3));
        assert_eq!(info.episodes, vec![5]);
    }

    #[test]
    fn test_file_name_season_wins_over_folder() {
        let info = parse_file_name("Show.S02E05.mkv", Some("Season 3"), None);
        assert_eq!(info.season, Some(2));
    }

    #[test]
    fn test_file_takes_first_of_multiple_seasons() {
        let info = parse_file_name("Show S01-S02 Special.mkv", None, None);
        assert_eq!(info.season, Some(1));
    }

    #[test]
    fn test_file_inherits_torrent_season() {
        let torrent = parse_title("Show.Name.S04.1080p");
        let info = parse_file_name("Show.Name.E07.mkv", None, Some(&torrent));
        assert_eq!(info.season, Some(4));
        assert_eq!(info.episodes, vec![7]);
    }

    #[test]
    fn test_absolute_episode_heuristic() {
        let info = parse_file_name("One Piece 1023.mkv", None, None);
        assert_eq!(info.episodes, vec![1023]);

        let info = parse_file_name("Naruto 012v2.mkv", None, None);
        assert_eq!(info.episodes, vec![12]);
    }

    #[test]
    fn test_absolute_episode_after_year() {
        let info = parse_file_name("Show 2005 01.mkv", None, None);
        assert_eq!(info.year, Some(2005));
        assert_eq!(info.episodes, vec![1]);

        let info = parse_file_name("Film.2005.1080p.mkv", None, None);
        assert!(info.episodes.is_empty());
    }

    #[test]
    fn test_absolute_episode_skips_excluded_words() {
        let info = parse_file_name("Show Movie 2.mkv", None, None);
        assert!(info.episodes.is_empty());

        let info = parse_file_name("Show 2 Movie.mkv", None, None);
        assert!(info.episodes.is_empty());

        let info = parse_file_name("Show Disk 3.mkv", None, None);
        assert!(info.episodes.is_empty());
    }

    #[test]
    fn test_absolute_episode_not_applied_when_date_present() {
        let info = parse_file_name("Show 12 2020-01-05.mkv", None, None);
        assert!(info.episodes.is_empty());
        assert_eq!(info.date.as_deref(), Some("2020-01-05"));
    }

    #[test]
    fn test_no_signal_leaves_fields_unset() {
        let info = parse_file_name("Bonus Feature.mkv", None, None);
        assert_eq!(info.title, "Bonus Feature");
        assert!(info.season.is_none());
        assert!(info.episodes.is_empty());
        assert!(info.year.is_none());
        assert!(info.date.is_none());
    }

    #[test]
    fn test_episode_token() {
        assert_eq!(episode_token("12"), Some(12));
        assert_eq!(episode_token("12a"), Some(12));
        assert_eq!(episode_token("12v2"), Some(12));
        assert_eq!(episode_token("12345"), None);
        assert_eq!(episode_token("12x"), None);
        assert_eq!(episode_token("abc"), None);
    }
}
