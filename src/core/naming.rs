//! Directory name codec.
//!
//! The archive encodes everything it knows in two directory-name grammars:
//!
//! - title directories: `<Title> (<YYYY>) [Film]` and `<Title> [TV]`
//! - disk directories: `Disk [<Format>]` and `Series <N> Disk <M> [<Format>]`
//!
//! Matching is anchored and case-sensitive. Free-text parts must already be
//! in sanitized form, so every accepted name rebuilds byte-identically.

use crate::models::media::MediaKind;
use regex::Regex;
use std::sync::OnceLock;

const FILM_TAG: &str = " [Film]";
const SERIES_TAG: &str = " [TV]";
const FILM_DISK_PREFIX: &str = "Disk [";
const SERIES_DISK_PREFIX: &str = "Series ";

/// Decoded title directory name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleDirName {
    pub title: String,
    /// Year for films, 0 for series.
    pub year: u16,
    pub kind: MediaKind,
}

/// Decoded disk directory name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskDirName {
    /// Verbatim bracketed format text.
    pub format: String,
    /// Series and disk numbers; `None` for film disks.
    pub numbering: Option<(u32, u32)>,
}

/// Decode a title directory name, trying the film shape before the series shape.
pub fn parse_title_dir(name: &str) -> Option<TitleDirName> {
    parse_film_dir(name).or_else(|| parse_series_dir(name))
}

fn parse_film_dir(name: &str) -> Option<TitleDirName> {
    let rest = name.strip_suffix(FILM_TAG)?;
    let rest = rest.strip_suffix(')')?;
    // Exactly four ASCII digits, preceded by " (".
    let split = rest.len().checked_sub(4)?;
    if !rest.is_char_boundary(split) {
        return None;
    }
    let (head, digits) = rest.split_at(split);
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let title = head.strip_suffix(" (")?;
    if !is_canonical_text(title) {
        return None;
    }
    Some(TitleDirName {
        title: title.to_string(),
        year: digits.parse().ok()?,
        kind: MediaKind::Film,
    })
}

fn parse_series_dir(name: &str) -> Option<TitleDirName> {
    let title = name.strip_suffix(SERIES_TAG)?;
    if !is_canonical_text(title) {
        return None;
    }
    Some(TitleDirName {
        title: title.to_string(),
        year: 0,
        kind: MediaKind::Series,
    })
}

/// Decode a disk directory name using the grammar for `kind`.
pub fn parse_disk_dir(name: &str, kind: MediaKind) -> Option<DiskDirName> {
    match kind {
        MediaKind::Film => {
            let format = bracketed(name.strip_prefix(FILM_DISK_PREFIX)?)?;
            Some(DiskDirName {
                format: format.to_string(),
                numbering: None,
            })
        }
        MediaKind::Series => {
            let rest = name.strip_prefix(SERIES_DISK_PREFIX)?;
            let (series, rest) = leading_number(rest)?;
            let rest = rest.strip_prefix(" Disk ")?;
            let (disk, rest) = leading_number(rest)?;
            let format = bracketed(rest.strip_prefix(" [")?)?;
            Some(DiskDirName {
                format: format.to_string(),
                numbering: Some((series, disk)),
            })
        }
    }
}

/// Format text up to the closing bracket that ends the name.
fn bracketed(rest: &str) -> Option<&str> {
    let format = rest.strip_suffix(']')?;
    is_canonical_text(format).then_some(format)
}

/// A positive integer without leading zeros, and the remaining text.
fn leading_number(text: &str) -> Option<(u32, &str)> {
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    let (digits, rest) = text.split_at(end);
    if digits.is_empty() || digits.starts_with('0') {
        return None;
    }
    Some((digits.parse().ok()?, rest))
}

fn is_canonical_text(text: &str) -> bool {
    !text.is_empty() && sanitize(text) == text
}

/// Encode a title directory name.
pub fn build_title_dir(title: &str, year: u16, kind: MediaKind) -> String {
    let title = sanitize(title);
    match kind {
        MediaKind::Film => format!("{} ({:04}){}", title, year, FILM_TAG),
        MediaKind::Series => format!("{}{}", title, SERIES_TAG),
    }
}

/// Encode a disk directory name. Series and disk numbers are ignored for films.
pub fn build_disk_dir(format: &str, series: u32, disk: u32, kind: MediaKind) -> String {
    let format = sanitize(format);
    match kind {
        MediaKind::Film => format!("{}{}]", FILM_DISK_PREFIX, format),
        MediaKind::Series => format!("Series {} Disk {} [{}]", series, disk, format),
    }
}

fn underscore_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"_{2,}").expect("valid underscore pattern"))
}

/// Make free text safe for use in a directory name.
///
/// `: / \ < > | ? *` become `_`, `"` becomes `'`, ASCII control characters
/// are dropped, the result is trimmed and underscore runs collapse to one.
/// Distinct inputs can map to the same output.
pub fn sanitize(text: &str) -> String {
    let replaced: String = text
        .chars()
        .filter(|c| !c.is_ascii_control())
        .map(|c| match c {
            ':' | '/' | '\\' | '<' | '>' | '|' | '?' | '*' => '_',
            '"' => '\'',
            _ => c,
        })
        .collect();
    underscore_runs()
        .replace_all(replaced.trim(), "_")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_film_dir() {
        let parsed = parse_title_dir("War of the Worlds (2025) [Film]").unwrap();
        assert_eq!(parsed.title, "War of the Worlds");
        assert_eq!(parsed.year, 2025);
        assert_eq!(parsed.kind, MediaKind::Film);
    }

    #[test]
    fn test_parse_film_dir_greedy_title() {
        let parsed = parse_title_dir("Blade Runner (1982) (2007) [Film]").unwrap();
        assert_eq!(parsed.title, "Blade Runner (1982)");
        assert_eq!(parsed.year, 2007);
    }

    #[test]
    fn test_parse_series_dir() {
        let parsed = parse_title_dir("Better Call Saul [TV]").unwrap();
        assert_eq!(parsed.title, "Better Call Saul");
        assert_eq!(parsed.year, 0);
        assert_eq!(parsed.kind, MediaKind::Series);
    }

    #[test]
    fn test_parse_title_dir_rejects_other_shapes() {
        for name in [
            "Random Folder",
            "Alien (79) [Film]",
            "Alien (19790) [Film]",
            "Alien 1979 [Film]",
            "Alien (1979) [film]",
            " (1979) [Film]",
            " [TV]",
            "Show [TV] ",
            "Lost [Tv]",
            "Bad: Name [TV]",
        ] {
            assert!(parse_title_dir(name).is_none(), "accepted {:?}", name);
        }
    }

    #[test]
    fn test_parse_disk_dir() {
        let film = parse_disk_dir("Disk [Blu-Ray UHD]", MediaKind::Film).unwrap();
        assert_eq!(film.format, "Blu-Ray UHD");
        assert_eq!(film.numbering, None);

        let series = parse_disk_dir("Series 3 Disk 12 [DVD]", MediaKind::Series).unwrap();
        assert_eq!(series.format, "DVD");
        assert_eq!(series.numbering, Some((3, 12)));
    }

    #[test]
    fn test_parse_disk_dir_is_kind_specific() {
        assert!(parse_disk_dir("Disk [DVD]", MediaKind::Series).is_none());
        assert!(parse_disk_dir("Series 1 Disk 1 [DVD]", MediaKind::Film).is_none());
    }

    #[test]
    fn test_parse_disk_dir_rejects_bad_numbers() {
        for name in [
            "Series 0 Disk 1 [DVD]",
            "Series 1 Disk 0 [DVD]",
            "Series 01 Disk 1 [DVD]",
            "Series Disk 1 [DVD]",
            "Series 1 Disk 2 []",
            "Series 1 Disk 2 [DVD] extra",
        ] {
            assert!(
                parse_disk_dir(name, MediaKind::Series).is_none(),
                "accepted {:?}",
                name
            );
        }
        assert!(parse_disk_dir("Disk []", MediaKind::Film).is_none());
        assert!(parse_disk_dir("Disk 1 [DVD]", MediaKind::Film).is_none());
    }

    #[test]
    fn test_round_trip_title_dirs() {
        for name in [
            "War of the Worlds (2025) [Film]",
            "Old Film (0999) [Film]",
            "Heat (1995) (1995) [Film]",
            "Better Call Saul [TV]",
            "It's Always Sunny_ Philadelphia [TV]",
        ] {
            let parsed = parse_title_dir(name).unwrap();
            assert_eq!(build_title_dir(&parsed.title, parsed.year, parsed.kind), name);
        }
    }

    #[test]
    fn test_round_trip_disk_dirs() {
        for (name, kind) in [
            ("Disk [Blu-Ray]", MediaKind::Film),
            ("Disk [a]b]", MediaKind::Film),
            ("Series 1 Disk 2 [DVD]", MediaKind::Series),
            ("Series 10 Disk 300 [HD DVD]", MediaKind::Series),
        ] {
            let parsed = parse_disk_dir(name, kind).unwrap();
            let (series, disk) = parsed.numbering.unwrap_or((0, 1));
            assert_eq!(build_disk_dir(&parsed.format, series, disk, kind), name);
        }
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("Title: Sub/Part"), "Title_ Sub_Part");
        assert_eq!(sanitize("Say \"Hi\""), "Say 'Hi'");
        assert_eq!(sanitize("  a<>|?*b  "), "a_b");
        assert_eq!(sanitize("tab\there\u{7}"), "tabhere");
        assert_eq!(sanitize("C:\\\\Path"), "C_Path");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let once = sanitize(" What If...?: Part *2* ");
        assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn test_build_sanitizes_free_text() {
        assert_eq!(
            build_title_dir("Star Wars: Episode IV", 1977, MediaKind::Film),
            "Star Wars_ Episode IV (1977) [Film]"
        );
        assert_eq!(
            build_disk_dir("HD/DVD", 0, 1, MediaKind::Film),
            "Disk [HD_DVD]"
        );
        assert_eq!(
            build_disk_dir("DVD", 1, 2, MediaKind::Series),
            "Series 1 Disk 2 [DVD]"
        );
    }
}
