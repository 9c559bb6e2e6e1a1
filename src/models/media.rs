//! Catalog data models.

use crate::utils::fs::read_sidecar;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Sidecar file holding the external (TMDB) identifier.
pub const TMDB_ID_FILE: &str = "tmdb.txt";
/// Sidecar file holding the official title override.
pub const TITLE_FILE: &str = "title.txt";
/// Sidecar file holding the overview text.
pub const DESCRIPTION_FILE: &str = "description.txt";
/// Sidecar file holding comma-joined genre names.
pub const GENRE_FILE: &str = "genre.txt";

const POSTER_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Media kind enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Film,
    Series,
}

impl MediaKind {
    /// Parse a kind selector as submitted by an operator.
    pub fn from_selector(selector: &str) -> Option<Self> {
        match selector.trim().to_lowercase().as_str() {
            "film" | "movie" => Some(MediaKind::Film),
            "tv" | "series" => Some(MediaKind::Series),
            _ => None,
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Film => write!(f, "Film"),
            MediaKind::Series => write!(f, "TV"),
        }
    }
}

/// Physical disk format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiskFormat {
    /// Blu-Ray.
    BluRay,
    /// Blu-Ray UHD.
    BluRayUhd,
    /// DVD.
    Dvd,
    /// Free text supplied by the operator.
    Custom(String),
}

impl DiskFormat {
    /// Text used inside the bracketed part of a disk directory name.
    pub fn label(&self) -> &str {
        match self {
            DiskFormat::BluRay => "Blu-Ray",
            DiskFormat::BluRayUhd => "Blu-Ray UHD",
            DiskFormat::Dvd => "DVD",
            DiskFormat::Custom(text) => text,
        }
    }

    /// Form selector for this format.
    pub fn selector(&self) -> &'static str {
        match self {
            DiskFormat::BluRay => "bluray",
            DiskFormat::BluRayUhd => "bluray_uhd",
            DiskFormat::Dvd => "dvd",
            DiskFormat::Custom(_) => "custom",
        }
    }

    /// Build a format from a selector and the optional custom text.
    ///
    /// The custom text is required (non-empty) only for the `custom` selector.
    pub fn from_selector(selector: &str, custom: Option<&str>) -> crate::Result<Self> {
        match selector {
            "bluray" => Ok(DiskFormat::BluRay),
            "bluray_uhd" => Ok(DiskFormat::BluRayUhd),
            "dvd" => Ok(DiskFormat::Dvd),
            "custom" => match custom.map(str::trim) {
                Some(text) if !text.is_empty() => Ok(DiskFormat::Custom(text.to_string())),
                _ => Err(crate::Error::validation(
                    "custom_format",
                    "custom disk format text is required",
                )),
            },
            other => Err(crate::Error::validation(
                "format",
                format!("unrecognized disk format '{}'", other),
            )),
        }
    }
}

impl std::fmt::Display for DiskFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One physical backup disk belonging to a title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disk {
    /// Display name, e.g. "Disk 2" or "Series 1 Disk 2".
    pub name: String,
    /// Format text as found in the directory name.
    pub format: String,
    /// Total size in bytes.
    pub size: u64,
    /// Absolute path to the disk directory.
    pub path: PathBuf,
}

impl Disk {
    /// Size in gigabytes (1024³ bytes).
    pub fn size_gb(&self) -> f64 {
        self.size as f64 / (1024.0 * 1024.0 * 1024.0)
    }

    fn full_path(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.path.display())
    }

    /// VLC command line for playing this disk.
    pub fn vlc_command(&self, prefix: &str) -> String {
        let protocol = match player_protocol(&self.format) {
            PlayerProtocol::BluRay => "bluray://",
            PlayerProtocol::Dvd => "dvd://",
            PlayerProtocol::File => "file://",
        };
        format!("vlc \"{}{}\"", protocol, self.full_path(prefix))
    }

    /// mpv command line for playing this disk.
    pub fn mpv_command(&self, prefix: &str) -> String {
        let path = self.full_path(prefix);
        match player_protocol(&self.format) {
            PlayerProtocol::BluRay => format!("mpv bd:// --bluray-device=\"{}\"", path),
            PlayerProtocol::Dvd => format!("mpv dvd:// --dvd-device=\"{}\"", path),
            PlayerProtocol::File => format!("mpv \"{}\"", path),
        }
    }
}

enum PlayerProtocol {
    BluRay,
    Dvd,
    File,
}

fn player_protocol(format: &str) -> PlayerProtocol {
    let lower = format.to_lowercase();
    if lower.contains("blu-ray") || lower.contains("bluray") {
        PlayerProtocol::BluRay
    } else if lower.contains("dvd") {
        PlayerProtocol::Dvd
    } else {
        PlayerProtocol::File
    }
}

/// One catalog entry: a film or a whole series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    /// Display title (official title override if present).
    pub title: String,
    /// Film or series.
    pub kind: MediaKind,
    /// Release year for films, 0 for series.
    pub year: u16,
    /// External (TMDB) identifier.
    pub tmdb_id: Option<String>,
    /// Disks in directory-listing order.
    pub disks: Vec<Disk>,
    /// Absolute path to the title directory.
    pub path: PathBuf,
}

impl Title {
    /// Title with year for films, just the title for series.
    pub fn display_title(&self) -> String {
        if self.kind == MediaKind::Film && self.year > 0 {
            format!("{} ({})", self.title, self.year)
        } else {
            self.title.clone()
        }
    }

    /// URL-safe identifier derived from title, kind and year.
    pub fn slug(&self) -> String {
        slugify(&self.title, self.kind, self.year)
    }

    /// Total size of all disks in bytes.
    pub fn total_size(&self) -> u64 {
        self.disks.iter().map(|d| d.size).sum()
    }

    /// Overview text from `description.txt`, empty if absent.
    pub fn description(&self) -> String {
        read_sidecar(&self.path.join(DESCRIPTION_FILE)).unwrap_or_default()
    }

    /// Genre names from `genre.txt`.
    pub fn genres(&self) -> Vec<String> {
        match read_sidecar(&self.path.join(GENRE_FILE)) {
            Some(text) if !text.is_empty() => {
                text.split(',').map(|g| g.trim().to_string()).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Path of the poster image, if one has been saved.
    pub fn poster_file(&self) -> Option<PathBuf> {
        find_poster(&self.path)
    }
}

/// First existing `poster.<ext>` in a title directory.
pub fn find_poster(dir: &Path) -> Option<PathBuf> {
    POSTER_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("poster.{}", ext)))
        .find(|p| p.is_file())
}

fn non_alphanumeric() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("valid slug pattern"))
}

/// Lower-case the title, collapse non-alphanumeric runs to `-`, and append
/// the year for films that have one.
pub fn slugify(title: &str, kind: MediaKind, year: u16) -> String {
    let lower = title.to_lowercase();
    let slug = non_alphanumeric().replace_all(&lower, "-");
    let slug = slug.trim_matches('-');
    if kind == MediaKind::Film && year > 0 {
        format!("{}-{}", slug, year)
    } else {
        slug.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disk(format: &str) -> Disk {
        Disk {
            name: "Disk 1".to_string(),
            format: format.to_string(),
            size: 0,
            path: PathBuf::from("/media/Alien (1979) [Film]/Disk [Blu-Ray]"),
        }
    }

    #[test]
    fn test_slug_film_and_series() {
        assert_eq!(
            slugify("War of the Worlds", MediaKind::Film, 2025),
            "war-of-the-worlds-2025"
        );
        assert_eq!(
            slugify("Better Call Saul", MediaKind::Series, 0),
            "better-call-saul"
        );
    }

    #[test]
    fn test_slug_collapses_punctuation() {
        assert_eq!(
            slugify("  Mission: Impossible -- Fallout!", MediaKind::Film, 2018),
            "mission-impossible-fallout-2018"
        );
        assert_eq!(slugify("Untitled", MediaKind::Film, 0), "untitled");
    }

    #[test]
    fn test_display_title() {
        let title = Title {
            title: "Alien".to_string(),
            kind: MediaKind::Film,
            year: 1979,
            tmdb_id: None,
            disks: vec![],
            path: PathBuf::new(),
        };
        assert_eq!(title.display_title(), "Alien (1979)");
    }

    #[test]
    fn test_format_selector() {
        assert_eq!(
            DiskFormat::from_selector("bluray_uhd", None).unwrap(),
            DiskFormat::BluRayUhd
        );
        assert_eq!(
            DiskFormat::from_selector("custom", Some("HD DVD")).unwrap().label(),
            "HD DVD"
        );
        assert_eq!(
            DiskFormat::from_selector("custom", Some("  ")).unwrap_err().field(),
            Some("custom_format")
        );
        assert_eq!(
            DiskFormat::from_selector("laserdisc", None).unwrap_err().field(),
            Some("format")
        );
    }

    #[test]
    fn test_player_commands() {
        let bluray = disk("Blu-Ray UHD");
        assert_eq!(
            bluray.vlc_command("/mnt"),
            "vlc \"bluray:///mnt/media/Alien (1979) [Film]/Disk [Blu-Ray]\""
        );
        assert!(disk("DVD").mpv_command("").starts_with("mpv dvd:// --dvd-device="));
        assert!(disk("VHS").mpv_command("").starts_with("mpv \"/media"));
    }
}
