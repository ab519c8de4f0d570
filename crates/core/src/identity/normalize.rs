//! Title and id normalization used for identity lookups and cache keys.

use unicode_normalization::UnicodeNormalization;

/// Normalize a title for lookups.
///
/// Lower-cases, strips diacritics, spells out `&`, turns separators
/// (`;,~./_` and free-standing hyphens) into spaces, drops everything that
/// is not a word character, hyphen or parenthesis and collapses whitespace.
pub fn escape_title(title: &str) -> String {
    let folded: String = title
        .to_lowercase()
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect();
    let folded = folded.replace('&', " and ");

    let chars: Vec<char> = folded.chars().collect();
    let mut out = String::with_capacity(chars.len());
    for (i, &c) in chars.iter().enumerate() {
        let mapped = match c {
            ';' | ',' | '~' | '.' | '/' | '_' => ' ',
            '-' => {
                let before = i.checked_sub(1).and_then(|j| chars.get(j));
                let after = chars.get(i + 1);
                let joins_words = before.map(|b| b.is_alphanumeric()).unwrap_or(false)
                    && after.map(|a| a.is_alphanumeric()).unwrap_or(false);
                if joins_words {
                    '-'
                } else {
                    ' '
                }
            }
            c if c.is_alphanumeric() || c.is_whitespace() || c == '(' || c == ')' => c,
            _ => continue,
        };
        out.push(mapped);
    }

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical IMDb id: `tt` followed by at least 7 digits.
///
/// Accepts ids with or without the `tt` prefix and with any amount of zero
/// padding. Returns `None` for anything that is not a numeric id.
pub fn normalize_imdb_id(raw: &str) -> Option<String> {
    let digits = raw.trim().trim_start_matches("tt");
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return None;
    }
    Some(format!("tt{:0>7}", significant))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_title_punctuation() {
        assert_eq!(
            escape_title("Die Hard: 2 - With a Vengeance"),
            "die hard 2 with a vengeance"
        );
    }

    #[test]
    fn test_escape_title_diacritics_and_ampersand() {
        assert_eq!(escape_title("Amélie & Nino"), "amelie and nino");
        assert_eq!(escape_title("Pokémon"), "pokemon");
    }

    #[test]
    fn test_escape_title_separators() {
        assert_eq!(escape_title("The.Office_US"), "the office us");
        assert_eq!(escape_title("Love, Death & Robots"), "love death and robots");
        assert_eq!(escape_title("  Spider-Man   (2002) "), "spider-man (2002)");
    }

    #[test]
    fn test_escape_title_drops_symbols() {
        assert_eq!(escape_title("What If...?"), "what if");
        assert_eq!(escape_title("M*A*S*H"), "mash");
    }

    #[test]
    fn test_normalize_imdb_id() {
        assert_eq!(normalize_imdb_id("tt0133093").as_deref(), Some("tt0133093"));
        assert_eq!(normalize_imdb_id("133093").as_deref(), Some("tt0133093"));
        assert_eq!(normalize_imdb_id("tt00133093").as_deref(), Some("tt0133093"));
        assert_eq!(normalize_imdb_id("tt12345678").as_deref(), Some("tt12345678"));
        assert_eq!(normalize_imdb_id("tt"), None);
        assert_eq!(normalize_imdb_id("kitsu:12"), None);
    }
}
